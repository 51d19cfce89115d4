use crate::dependency_analysis::domain::Mention;
use crate::shared::Result;
use regex::Regex;
use std::collections::HashSet;

/// Row tokens that look like columns but are not
const SPECIAL_TOKENS: &[&str] = &[
    "_THISROW",
    "_THISROW_BEFORE",
    "_THISROW_AFTER",
    "_THISUSER",
    "_ROWNUMBER",
];

/// Operator words that can sit between a value and a `[Column]`
const RESERVED_WORDS: &[&str] = &["AND", "OR", "NOT", "IN", "IS", "IF", "THEN", "ELSE"];

/// Mentions found in one formula, in textual order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaMentions {
    pub columns: Vec<Mention>,
    pub views: Vec<String>,
    /// `Qualifier` parts of `Qualifier[Column]`, each a table or a slice
    pub qualifiers: Vec<String>,
}

impl FormulaMentions {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.views.is_empty() && self.qualifiers.is_empty()
    }
}

/// FormulaScanner service for finding component mentions in AppSheet formulas
///
/// Formulas are not parsed; mentions are found by the bracket and
/// navigation-function conventions AppSheet uses. Patterns are compiled once
/// per scanner.
pub struct FormulaScanner {
    bracket: Regex,
    trailing_words: Regex,
    view_patterns: Vec<Regex>,
}

impl FormulaScanner {
    /// Compiles the scanner's patterns
    ///
    /// # Errors
    /// Returns an error if a pattern fails to compile
    pub fn new() -> Result<Self> {
        let view_patterns = [
            r#"(?i)LINKTOVIEW\s*\(\s*"([^"]+)""#,
            r#"(?i)LINKTOFILTEREDVIEW\s*\(\s*"([^"]+)""#,
            r#"(?i)LINKTOFORM\s*\(\s*"([^"]+)""#,
            r#"(?i)LINKTOROW\s*\([^,]+,\s*"([^"]+)""#,
            r#"#control=([^"&]+)"#,
        ]
        .iter()
        .map(|pattern| Regex::new(pattern))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            bracket: Regex::new(r"\[([^\[\]]+)\]")?,
            trailing_words: Regex::new(r"([A-Za-z0-9_]+(?:[ \t]+[A-Za-z0-9_]+)*)[ \t]*$")?,
            view_patterns,
        })
    }

    /// Scans a formula for column, view and table/slice mentions
    pub fn scan(&self, formula: &str) -> FormulaMentions {
        let text = normalize_quotes(formula);
        let mut mentions = FormulaMentions {
            views: self.view_targets(&text),
            ..FormulaMentions::default()
        };

        let masked = mask_string_literals(&text);
        let mut seen_columns = HashSet::new();
        let mut seen_qualifiers = HashSet::new();
        let mut previous: Option<(usize, String)> = None;

        for capture in self.bracket.captures_iter(&masked) {
            let (Some(whole), Some(inner)) = (capture.get(0), capture.get(1)) else {
                continue;
            };
            let name = inner.as_str().trim().to_string();
            let prefix = &masked[..whole.start()];

            let dereferenced_from = previous
                .as_ref()
                .filter(|(end, _)| masked[*end..whole.start()].trim() == ".")
                .map(|(_, column)| column.clone());
            previous = Some((whole.end(), name.clone()));

            if name.is_empty() || is_special_token(&name) {
                continue;
            }

            let mention = match dereferenced_from {
                Some(ref_column) if is_special_token(&ref_column) => Mention::plain(name),
                Some(ref_column) => Mention::dereferenced(ref_column, name),
                None => match self.qualifier(prefix) {
                    Some(qualifier) => {
                        if seen_qualifiers.insert(qualifier.clone()) {
                            mentions.qualifiers.push(qualifier.clone());
                        }
                        Mention::qualified(qualifier, name)
                    }
                    None => Mention::plain(name),
                },
            };

            if seen_columns.insert(mention.clone()) {
                mentions.columns.push(mention);
            }
        }

        mentions
    }

    /// Finds view names in navigation expressions, in textual order
    pub fn view_targets(&self, expression: &str) -> Vec<String> {
        let text = normalize_quotes(expression);
        let mut found: Vec<(usize, String)> = self
            .view_patterns
            .iter()
            .flat_map(|pattern| pattern.captures_iter(&text))
            .filter_map(|capture| {
                let target = capture.get(1)?;
                let name = target.as_str().trim();
                (!name.is_empty()).then(|| (target.start(), name.to_string()))
            })
            .collect();
        found.sort_by_key(|(position, _)| *position);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .map(|(_, name)| name)
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// True if the text uses any navigation function or deep link
    pub fn has_navigation(&self, expression: &str) -> bool {
        let text = normalize_quotes(expression);
        self.view_patterns.iter().any(|pattern| pattern.is_match(&text))
    }

    /// The `Table` in `Table[Column]`, with leading operator words dropped
    fn qualifier(&self, prefix: &str) -> Option<String> {
        let words = self.trailing_words.captures(prefix)?.get(1)?.as_str();
        let kept: Vec<&str> = words
            .split_whitespace()
            .rev()
            .take_while(|word| !RESERVED_WORDS.contains(&word.to_uppercase().as_str()))
            .collect();
        if kept.is_empty() || kept.iter().all(|w| w.chars().all(|c| c.is_ascii_digit())) {
            return None;
        }
        Some(kept.into_iter().rev().collect::<Vec<_>>().join(" "))
    }
}

fn is_special_token(name: &str) -> bool {
    SPECIAL_TOKENS.contains(&name.to_uppercase().as_str())
}

/// Replaces typographic quotes with ASCII quotes
pub fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Blanks out the contents of double-quoted literals, keeping byte offsets
fn mask_string_literals(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut in_string = false;
    for c in text.chars() {
        if c == '"' {
            in_string = !in_string;
            masked.push(c);
        } else if in_string {
            masked.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            masked.push(c);
        }
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> FormulaScanner {
        FormulaScanner::new().unwrap()
    }

    #[test]
    fn test_bare_and_qualified_columns() {
        let mentions = scanner().scan("[Qty] * Products[Unit Price]");
        assert_eq!(
            mentions.columns,
            vec![Mention::plain("Qty"), Mention::qualified("Products", "Unit Price")]
        );
        assert_eq!(mentions.qualifiers, vec!["Products"]);
    }

    #[test]
    fn test_qualifier_with_spaces_and_operator_words() {
        let mentions = scanner().scan("AND([Paid], NOT [Shipped]) OR Order Items[Qty] > 0");
        assert_eq!(
            mentions.columns,
            vec![
                Mention::plain("Paid"),
                Mention::plain("Shipped"),
                Mention::qualified("Order Items", "Qty"),
            ]
        );
    }

    #[test]
    fn test_function_call_is_not_a_qualifier() {
        let mentions = scanner().scan("SUM(SELECT(Orders[Total], [Status] = \"Open\"))");
        assert_eq!(
            mentions.columns,
            vec![Mention::qualified("Orders", "Total"), Mention::plain("Status")]
        );
    }

    #[test]
    fn test_dereference_and_thisrow() {
        let mentions = scanner().scan("[Customer].[Email] & [_THISROW].[Id] & [_THISUSER]");
        assert_eq!(
            mentions.columns,
            vec![
                Mention::plain("Customer"),
                Mention::dereferenced("Customer", "Email"),
                Mention::plain("Id"),
            ]
        );
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let mentions = scanner().scan("CONCATENATE(\"[not a column]\", [Name])");
        assert_eq!(mentions.columns, vec![Mention::plain("Name")]);
    }

    #[test]
    fn test_repeated_mentions_emitted_once() {
        let mentions = scanner().scan("[Price] * [Qty] + [Price]");
        assert_eq!(mentions.columns.len(), 2);
    }

    #[test]
    fn test_view_targets_in_textual_order() {
        let views = scanner().view_targets(
            "IF([Done], LINKTOROW([Id], \"Order_Detail\"), LINKTOVIEW(\u{201C}Orders\u{201D}))",
        );
        assert_eq!(views, vec!["Order_Detail", "Orders"]);
    }

    #[test]
    fn test_deep_link_control() {
        let views = scanner().view_targets("=\"#control=Inventory&row=\" & [Id]");
        assert_eq!(views, vec!["Inventory"]);
        assert!(scanner().has_navigation("\"#control=Inventory\""));
        assert!(!scanner().has_navigation("Inventory"));
    }

    #[test]
    fn test_plain_text_has_no_mentions() {
        assert!(scanner().scan("just some words").is_empty());
        assert!(scanner().scan("").is_empty());
    }
}
