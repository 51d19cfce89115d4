/// ConstantCondition policy for recognizing conditions with a fixed outcome
///
/// AppSheet conditions (Show_If, Only_If, row filters, format rule
/// conditions) are free formulas. This policy only recognizes the literal
/// forms authors use to switch something off or on permanently:
///
/// - boolean literals: `TRUE`, `FALSE()`, optionally prefixed with `=`
/// - negation of a literal: `NOT(TRUE)`
/// - comparisons of two literals: `1=2`, `"a"<>"a"`, `TRUE=FALSE`
///
/// Anything that mentions a column, a function other than `NOT`/`TRUE`/`FALSE`,
/// or a blank string literal is treated as data-dependent.
pub struct ConstantCondition;

impl ConstantCondition {
    /// Returns true if the condition always evaluates to false
    pub fn is_always_false(condition: &str) -> bool {
        Self::evaluate(condition) == Some(false)
    }

    /// Returns true if the condition is empty or always evaluates to true
    ///
    /// An absent condition means "unconditional", which behaves as true.
    pub fn is_unconditional(condition: Option<&str>) -> bool {
        match condition.map(str::trim) {
            None | Some("") => true,
            Some(text) => Self::evaluate(text) == Some(true),
        }
    }

    /// Evaluates a literal-only condition, or `None` when it depends on data
    pub fn evaluate(condition: &str) -> Option<bool> {
        let expr = condition.trim();
        let expr = expr.strip_prefix('=').unwrap_or(expr).trim();
        if expr.is_empty() {
            return None;
        }
        let expr = Self::strip_outer_parens(expr);

        if let Some(inner) = Self::call_argument(expr, "NOT") {
            return Self::evaluate(inner).map(|value| !value);
        }

        if let Some((lhs, op, rhs)) = Self::split_comparison(expr) {
            let lhs = Literal::parse(lhs)?;
            let rhs = Literal::parse(rhs)?;
            let equal = lhs.equals(&rhs)?;
            return Some(if op == "=" { equal } else { !equal });
        }

        match Literal::parse(expr)? {
            Literal::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn strip_outer_parens(mut expr: &str) -> &str {
        while expr.starts_with('(') && expr.ends_with(')') && Self::wraps_whole(expr) {
            expr = expr[1..expr.len() - 1].trim();
        }
        expr
    }

    /// True when the opening parenthesis closes at the very end
    fn wraps_whole(expr: &str) -> bool {
        let mut depth = 0i32;
        let mut in_string = false;
        for (i, c) in expr.char_indices() {
            match c {
                '"' => in_string = !in_string,
                '(' if !in_string => depth += 1,
                ')' if !in_string => {
                    depth -= 1;
                    if depth == 0 && i != expr.len() - 1 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    fn call_argument<'a>(expr: &'a str, function: &str) -> Option<&'a str> {
        let open = expr.find('(')?;
        if !expr[..open].trim().eq_ignore_ascii_case(function) || !expr.ends_with(')') {
            return None;
        }
        let call = &expr[open..];
        Self::wraps_whole(call).then(|| call[1..call.len() - 1].trim())
    }

    /// Splits `lhs op rhs` at a top-level `=` or `<>`
    fn split_comparison(expr: &str) -> Option<(&str, &'static str, &str)> {
        let mut depth = 0i32;
        let mut in_string = false;
        let bytes = expr.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'"' => in_string = !in_string,
                b'(' if !in_string => depth += 1,
                b')' if !in_string => depth -= 1,
                b'<' if !in_string && depth == 0 && bytes.get(i + 1) == Some(&b'>') => {
                    return Some((expr[..i].trim(), "<>", expr[i + 2..].trim()));
                }
                b'=' if !in_string && depth == 0 => {
                    let prev = i.checked_sub(1).map(|p| bytes[p]);
                    if matches!(prev, Some(b'<') | Some(b'>') | Some(b'!')) {
                        return None;
                    }
                    return Some((expr[..i].trim(), "=", expr[i + 1..].trim()));
                }
                b'>' | b'<' if !in_string && depth == 0 => return None,
                _ => {}
            }
        }
        None
    }
}

#[derive(Debug, PartialEq)]
enum Literal {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl Literal {
    fn parse(token: &str) -> Option<Self> {
        let token = ConstantCondition::strip_outer_parens(token.trim());
        match token.to_uppercase().as_str() {
            "TRUE" | "TRUE()" => return Some(Literal::Bool(true)),
            "FALSE" | "FALSE()" => return Some(Literal::Bool(false)),
            _ => {}
        }
        if let Ok(number) = token.parse::<i64>() {
            return Some(Literal::Number(number));
        }
        let text = token.strip_prefix('"')?.strip_suffix('"')?;
        // Blank comparisons have AppSheet-specific semantics; leave them alone
        if text.is_empty() || text.contains('"') {
            return None;
        }
        Some(Literal::Text(text.to_string()))
    }

    fn equals(&self, other: &Literal) -> Option<bool> {
        match (self, other) {
            (Literal::Bool(a), Literal::Bool(b)) => Some(a == b),
            (Literal::Number(a), Literal::Number(b)) => Some(a == b),
            (Literal::Text(a), Literal::Text(b)) => Some(a.eq_ignore_ascii_case(b)),
            _ => None,
        }
    }
}
