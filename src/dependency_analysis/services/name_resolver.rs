//! Resolution of textual mentions to canonical component identities
//!
//! Precedence is strict: an exact match across the plausible kinds always
//! wins, even when a normalized (case/whitespace-insensitive) match would
//! also be unique. Within one precedence level, more than one hit is a
//! collision and is reported, never guessed.

use super::formula_scanner::normalize_quotes;
use crate::dependency_analysis::domain::component::{column_identity, split_column_identity};
use crate::dependency_analysis::domain::{
    Component, ComponentId, ComponentKind, ExpectedKind, Qualifier, ResolutionContext,
    ResolutionResult,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Column fields naming the table a Ref column points at
const REF_TABLE_FIELDS: &[&str] = &["ref_table", "referenced_table", "referenced_table_name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    Exact,
    Normalized,
}

impl MatchMode {
    fn key(self, text: &str) -> String {
        match self {
            MatchMode::Exact => text.trim().to_string(),
            MatchMode::Normalized => normalize_name(text),
        }
    }
}

/// Lowercases, straightens quotes and collapses whitespace
pub fn normalize_name(text: &str) -> String {
    normalize_quotes(text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default)]
struct NameIndex {
    by_name: HashMap<(ComponentKind, String), BTreeSet<ComponentId>>,
    /// Columns keyed by their local name, across all tables
    columns_by_local_name: HashMap<String, BTreeSet<ComponentId>>,
    slice_tables: HashMap<String, String>,
}

impl NameIndex {
    fn insert(&mut self, mode: MatchMode, id: &ComponentId) {
        self.by_name
            .entry((id.kind(), mode.key(id.name())))
            .or_default()
            .insert(id.clone());

        if id.kind() == ComponentKind::Column {
            let local = split_column_identity(id.name()).1;
            self.columns_by_local_name
                .entry(mode.key(local))
                .or_default()
                .insert(id.clone());
        }
    }

    fn get(&self, kind: ComponentKind, key: &str) -> Option<&BTreeSet<ComponentId>> {
        self.by_name.get(&(kind, key.to_string()))
    }
}

/// NameResolver service mapping mentions to component identities
///
/// Built once per analysis from the parsed components (plus any names the
/// document declares without records) and read-only afterwards.
pub struct NameResolver {
    exact: NameIndex,
    normalized: NameIndex,
    /// Normalized column identity to the table its Ref type points at
    ref_tables: HashMap<String, String>,
}

impl NameResolver {
    pub fn new<'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = &'a Component>,
    {
        let mut resolver = Self {
            exact: NameIndex::default(),
            normalized: NameIndex::default(),
            ref_tables: HashMap::new(),
        };

        for component in components {
            resolver.index(component.id());

            match component.kind() {
                ComponentKind::Slice => {
                    if let Some(table) = component.source_table() {
                        resolver.index_slice_table(component.name(), table);
                    }
                }
                ComponentKind::Column => {
                    if let Some(table) = referenced_table(component) {
                        resolver
                            .ref_tables
                            .insert(normalize_name(component.name()), table);
                    }
                }
                _ => {}
            }
        }

        resolver
    }

    /// Makes names known without a parsed record resolvable
    pub fn with_declared(mut self, declared: &BTreeMap<ComponentKind, Vec<String>>) -> Self {
        for (kind, names) in declared {
            for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
                let id = ComponentId::new(*kind, name);
                if self.exact.get(*kind, name).is_none() {
                    self.index(&id);
                }
            }
        }
        self
    }

    fn index(&mut self, id: &ComponentId) {
        self.exact.insert(MatchMode::Exact, id);
        self.normalized.insert(MatchMode::Normalized, id);
    }

    fn index_slice_table(&mut self, slice: &str, table: &str) {
        self.exact
            .slice_tables
            .insert(MatchMode::Exact.key(slice), table.trim().to_string());
        self.normalized
            .slice_tables
            .insert(MatchMode::Normalized.key(slice), table.trim().to_string());
    }

    /// Resolves a mention against the expected kind(s)
    ///
    /// # Arguments
    /// * `text` - The mention as written
    /// * `expected` - Kind or kinds the mention may refer to
    /// * `context` - Table and qualifier used to place column mentions
    ///
    /// # Returns
    /// `Resolved` for a unique hit, `Unresolved` with every hit for a
    /// collision, `NotFound` otherwise
    pub fn resolve(
        &self,
        text: &str,
        expected: &ExpectedKind,
        context: &ResolutionContext<'_>,
    ) -> ResolutionResult {
        let text = text.trim();
        if text.is_empty() {
            return ResolutionResult::NotFound;
        }

        for mode in [MatchMode::Exact, MatchMode::Normalized] {
            let hits: BTreeSet<ComponentId> = expected
                .kinds()
                .iter()
                .flat_map(|kind| self.lookup(mode, *kind, text, context))
                .collect();

            match hits.len() {
                0 => continue,
                1 => {
                    if let Some(id) = hits.into_iter().next() {
                        return ResolutionResult::Resolved(id);
                    }
                }
                _ => return ResolutionResult::Unresolved(hits),
            }
        }

        ResolutionResult::NotFound
    }

    /// The source table of a slice, if `name` is a slice
    pub fn slice_source_table(&self, name: &str) -> Option<&str> {
        self.exact
            .slice_tables
            .get(&MatchMode::Exact.key(name))
            .or_else(|| self.normalized.slice_tables.get(&MatchMode::Normalized.key(name)))
            .map(String::as_str)
    }

    fn index_for(&self, mode: MatchMode) -> &NameIndex {
        match mode {
            MatchMode::Exact => &self.exact,
            MatchMode::Normalized => &self.normalized,
        }
    }

    fn lookup(
        &self,
        mode: MatchMode,
        kind: ComponentKind,
        text: &str,
        context: &ResolutionContext<'_>,
    ) -> BTreeSet<ComponentId> {
        let index = self.index_for(mode);

        if kind != ComponentKind::Column {
            return index.get(kind, &mode.key(text)).cloned().unwrap_or_default();
        }

        // A mention already written as `Table[Column]` carries its own table
        let (written_table, column) = split_column_identity(text);

        let table = match (written_table, context.qualifier) {
            (Some(table), _) => Some(self.physical_table(mode, table)),
            (None, Qualifier::Table(qualifier)) => Some(self.physical_table(mode, qualifier)),
            (None, Qualifier::Deref(ref_column)) => self.deref_table(context.table, ref_column),
            (None, Qualifier::None) => context.table.map(|t| self.physical_table(mode, t)),
        };

        let Some(table) = table else {
            return index
                .columns_by_local_name
                .get(&mode.key(column))
                .cloned()
                .unwrap_or_default();
        };

        let qualified = index.get(kind, &mode.key(&column_identity(Some(&table), column)));
        match qualified {
            Some(hits) => hits.clone(),
            // Columns recorded without a table still match bare mentions
            None if written_table.is_none() && context.qualifier == &Qualifier::None => index
                .get(kind, &mode.key(column))
                .cloned()
                .unwrap_or_default(),
            None => BTreeSet::new(),
        }
    }

    /// Maps a slice name to its source table; tables map to themselves
    fn physical_table(&self, mode: MatchMode, name: &str) -> String {
        self.index_for(mode)
            .slice_tables
            .get(&mode.key(name))
            .cloned()
            .unwrap_or_else(|| name.trim().to_string())
    }

    fn deref_table(&self, table: Option<&str>, ref_column: &str) -> Option<String> {
        let table = table.map(|t| self.physical_table(MatchMode::Exact, t));
        let identity = column_identity(table.as_deref(), ref_column);
        self.ref_tables.get(&normalize_name(&identity)).cloned()
    }
}

/// The table a Ref column points at, from a plain field or the type qualifier
fn referenced_table(column: &Component) -> Option<String> {
    if let Some(table) = column.first_field(REF_TABLE_FIELDS) {
        return Some(table.to_string());
    }
    let qualifier: serde_json::Value = serde_json::from_str(column.field("type_qualifier")?).ok()?;
    qualifier
        .get("ReferencedTableName")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn component(kind: ComponentKind, name: &str, pairs: &[(&str, &str)]) -> Component {
        let fields: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let table = split_column_identity(name).0.map(str::to_string).or_else(|| {
            fields.get("source_table").cloned()
        });
        Component::new(ComponentId::new(kind, name), fields, table, Some(0))
    }

    fn resolver(components: &[Component]) -> NameResolver {
        NameResolver::new(components.iter())
    }

    fn id(kind: ComponentKind, name: &str) -> ComponentId {
        ComponentId::new(kind, name)
    }

    fn exactly(kind: ComponentKind) -> ExpectedKind {
        ExpectedKind::Exactly(kind)
    }

    #[test]
    fn test_exact_match_resolves() {
        let r = resolver(&[component(ComponentKind::View, "Details", &[])]);
        let result = r.resolve("Details", &exactly(ComponentKind::View), &ResolutionContext::unqualified());
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::View, "Details")));
    }

    #[test]
    fn test_exact_match_wins_over_normalized() {
        let r = resolver(&[
            component(ComponentKind::View, "Orders", &[]),
            component(ComponentKind::View, "orders ", &[]),
            component(ComponentKind::View, "ORDERS", &[]),
        ]);
        let result = r.resolve("ORDERS", &exactly(ComponentKind::View), &ResolutionContext::unqualified());
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::View, "ORDERS")));
    }

    #[test]
    fn test_normalized_match_when_no_exact() {
        let r = resolver(&[component(ComponentKind::Action, "Send  Invoice", &[])]);
        let result = r.resolve(
            "send invoice",
            &exactly(ComponentKind::Action),
            &ResolutionContext::unqualified(),
        );
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::Action, "Send  Invoice")));
    }

    #[test]
    fn test_normalized_collision_is_unresolved() {
        let r = resolver(&[
            component(ComponentKind::View, "Orders", &[]),
            component(ComponentKind::View, "ORDERS", &[]),
        ]);
        let result = r.resolve("orders", &exactly(ComponentKind::View), &ResolutionContext::unqualified());
        assert_eq!(
            result,
            ResolutionResult::Unresolved(BTreeSet::from([
                id(ComponentKind::View, "ORDERS"),
                id(ComponentKind::View, "Orders"),
            ]))
        );
    }

    #[test]
    fn test_cross_kind_collision_is_unresolved() {
        let r = resolver(&[
            component(ComponentKind::Column, "Orders[Approve]", &[]),
            component(ComponentKind::Action, "Approve", &[]),
        ]);
        let either = ExpectedKind::AnyOf(vec![ComponentKind::Column, ComponentKind::Action]);
        let table = Qualifier::None;
        let result = r.resolve("Approve", &either, &ResolutionContext::new(Some("Orders"), &table));
        assert_eq!(result.candidates().len(), 2);
        assert!(matches!(result, ResolutionResult::Unresolved(_)));
    }

    #[test]
    fn test_not_found() {
        let r = resolver(&[component(ComponentKind::Column, "Orders[Qty]", &[])]);
        let result = r.resolve("Price", &exactly(ComponentKind::Column), &ResolutionContext::unqualified());
        assert_eq!(result, ResolutionResult::NotFound);
        assert!(result.candidates().is_empty());
    }

    #[test]
    fn test_bare_column_uses_context_table() {
        let r = resolver(&[
            component(ComponentKind::Column, "Orders[Id]", &[]),
            component(ComponentKind::Column, "Customers[Id]", &[]),
        ]);
        let none = Qualifier::None;
        let in_orders = ResolutionContext::new(Some("Orders"), &none);
        assert_eq!(
            r.resolve("Id", &exactly(ComponentKind::Column), &in_orders),
            ResolutionResult::Resolved(id(ComponentKind::Column, "Orders[Id]"))
        );
        // Without a table, the same local name in two tables collides
        let result = r.resolve("Id", &exactly(ComponentKind::Column), &ResolutionContext::unqualified());
        assert_eq!(result.candidates().len(), 2);
    }

    #[test]
    fn test_slice_qualifier_maps_to_source_table() {
        let r = resolver(&[
            component(ComponentKind::Slice, "Open Orders", &[("source_table", "Orders")]),
            component(ComponentKind::Column, "Orders[Total]", &[]),
        ]);
        let qualifier = Qualifier::Table("Open Orders".to_string());
        let result = r.resolve(
            "Total",
            &exactly(ComponentKind::Column),
            &ResolutionContext::new(None, &qualifier),
        );
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::Column, "Orders[Total]")));
        assert_eq!(r.slice_source_table("open orders"), Some("Orders"));
    }

    #[test]
    fn test_slice_context_table_maps_to_source_table() {
        let r = resolver(&[
            component(ComponentKind::Slice, "Open Orders", &[("source_table", "Orders")]),
            component(ComponentKind::Column, "Orders[Status]", &[]),
        ]);
        let none = Qualifier::None;
        let result = r.resolve(
            "Status",
            &exactly(ComponentKind::Column),
            &ResolutionContext::new(Some("Open Orders"), &none),
        );
        assert!(result.resolved().is_some());
    }

    #[test]
    fn test_dereference_follows_ref_table() {
        let r = resolver(&[
            component(
                ComponentKind::Column,
                "Orders[Customer]",
                &[("type_qualifier", r#"{"ReferencedTableName": "Customers"}"#)],
            ),
            component(ComponentKind::Column, "Customers[Email]", &[]),
            component(ComponentKind::Column, "Suppliers[Email]", &[]),
        ]);
        let deref = Qualifier::Deref("Customer".to_string());
        let result = r.resolve(
            "Email",
            &exactly(ComponentKind::Column),
            &ResolutionContext::new(Some("Orders"), &deref),
        );
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::Column, "Customers[Email]")));
    }

    #[test]
    fn test_written_identity_resolves_directly() {
        let r = resolver(&[component(ComponentKind::Column, "Orders[Total]", &[])]);
        let result = r.resolve(
            "Orders[Total]",
            &exactly(ComponentKind::Column),
            &ResolutionContext::unqualified(),
        );
        assert!(result.resolved().is_some());
    }

    #[test]
    fn test_tableless_column_matches_context_mention() {
        let r = resolver(&[component(ComponentKind::Column, "Price", &[])]);
        let none = Qualifier::None;
        let result = r.resolve(
            "Price",
            &exactly(ComponentKind::Column),
            &ResolutionContext::new(Some("Orders"), &none),
        );
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::Column, "Price")));
    }

    #[test]
    fn test_declared_names_are_resolvable() {
        let declared = BTreeMap::from([(ComponentKind::View, vec!["Archive".to_string()])]);
        let r = NameResolver::new(std::iter::empty()).with_declared(&declared);
        let result = r.resolve("Archive", &exactly(ComponentKind::View), &ResolutionContext::unqualified());
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::View, "Archive")));
    }

    #[test]
    fn test_same_name_different_kind_does_not_collide_when_kind_is_known() {
        let r = resolver(&[
            component(ComponentKind::View, "Orders", &[]),
            component(ComponentKind::Slice, "Orders", &[("source_table", "Orders")]),
        ]);
        let result = r.resolve("Orders", &exactly(ComponentKind::View), &ResolutionContext::unqualified());
        assert_eq!(result, ResolutionResult::Resolved(id(ComponentKind::View, "Orders")));
    }
}
