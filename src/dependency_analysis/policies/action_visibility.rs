use crate::dependency_analysis::domain::component::split_column_identity;
use crate::dependency_analysis::domain::record::LIST_DELIMITER;
use crate::dependency_analysis::domain::Component;
use serde_json::Value;

/// ActionVisibility policy deciding whether a view actually shows an action
///
/// A view's `available_actions` lists every action AppSheet could offer on
/// it. Whether one is displayed depends on the action's prominence and the
/// view type:
///
/// - `Do_Not_Display` is never shown
/// - detail views show primary, prominent and overlay actions, and inline
///   actions whose attached column is among the view's columns
/// - table views have no action bar: primary actions and inline actions on a
///   shown column only
/// - deck and gallery views show their action bar entries
/// - other view types show everything they list
pub struct ActionVisibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prominence {
    Hidden,
    Primary,
    Prominent,
    Overlay,
    Inline,
    Unspecified,
}

impl Prominence {
    fn of(action: &Component) -> Self {
        let value = action
            .field("action_prominence")
            .unwrap_or_default()
            .replace('_', " ")
            .to_lowercase();
        match value.trim() {
            "do not display" => Prominence::Hidden,
            "primary" => Prominence::Primary,
            "display prominently" => Prominence::Prominent,
            "display overlay" => Prominence::Overlay,
            "display inline" => Prominence::Inline,
            _ => Prominence::Unspecified,
        }
    }
}

impl ActionVisibility {
    /// Returns true if `view` displays `action`
    ///
    /// Only prominence and view type are checked here; whether the view
    /// lists the action at all is up to the caller.
    pub fn is_visible(action: &Component, view: &Component) -> bool {
        let prominence = Prominence::of(action);
        if prominence == Prominence::Hidden {
            return false;
        }

        let view_type = view.field("view_type").unwrap_or_default().to_lowercase();
        match view_type.as_str() {
            "detail" => match prominence {
                Prominence::Primary | Prominence::Prominent | Prominence::Overlay => true,
                Prominence::Inline => match action.field("attach_to_column") {
                    Some(column) => shows_column(view, column),
                    None => true,
                },
                _ => false,
            },
            "table" => match prominence {
                Prominence::Primary => true,
                Prominence::Inline => action
                    .field("attach_to_column")
                    .is_some_and(|column| shows_column(view, column)),
                _ => false,
            },
            "deck" | "gallery" => in_action_bar(action, view),
            _ => true,
        }
    }
}

fn listed(view: &Component, label: &str, name: &str) -> bool {
    view.field(label).is_some_and(|list| {
        list.split(LIST_DELIMITER)
            .any(|item| item.trim().eq_ignore_ascii_case(name))
    })
}

fn shows_column(view: &Component, column: &str) -> bool {
    let (_, local) = split_column_identity(column);
    listed(view, "view_columns", local)
}

fn in_action_bar(action: &Component, view: &Component) -> bool {
    let name = action.name();

    // An automatic action bar shows every displayable action
    let automatic = view.flag("show_action_bar")
        && !view
            .field("action_display_mode")
            .is_some_and(|mode| mode.eq_ignore_ascii_case("manual"));
    if automatic {
        return true;
    }

    let from_config = view
        .field("view_configuration")
        .and_then(|text| serde_json::from_str::<Value>(text).ok())
        .and_then(|json| {
            json.get("ActionBarEntries").and_then(Value::as_array).map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|entry| entry.trim().eq_ignore_ascii_case(name))
            })
        })
        .unwrap_or(false);

    from_config
        || (listed(view, "referenced_actions", name) && !listed(view, "event_actions", name))
}
