pub mod action_visibility;
pub mod attribute_predicate;
pub mod constant_condition;
pub mod exemption_rules;
pub mod root_set;

pub use action_visibility::ActionVisibility;
pub use attribute_predicate::AttributePredicate;
pub use constant_condition::ConstantCondition;
pub use exemption_rules::ExemptionRules;
pub use root_set::RootSet;
