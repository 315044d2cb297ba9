//! SQL `LIKE` pattern construction.
//!
//! User input is escaped so that `%`, `_` and `\` match literally.
//! Postgres uses `\` as the default `LIKE` escape character.

/// Escapes `LIKE` metacharacters in `input`.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Pattern matching `input` anywhere in the column.
#[must_use]
pub fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

/// Pattern matching columns that start with `input`.
#[must_use]
pub fn prefix_pattern(input: &str) -> String {
    format!("{}%", escape_like(input))
}
