//! PHP literal helpers.

/// Single-quoted PHP string literal.
pub fn string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Short-syntax PHP array of string literals: `['a', 'b']`.
pub fn array<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|value| string(value.as_ref())).collect();
    format!("[{}]", items.join(", "))
}
