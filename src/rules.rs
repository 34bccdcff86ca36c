//! Validation rules and property types derived from column metadata.

use crate::{
    models::schema::{ColumnDescriptor, KeyKind},
    render::php,
};

pub const UNIQUE_IGNORING_CURRENT: &str = "Rule::unique($this->table)->ignore($this->id)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleToken {
    Plain(String),
    /// A `Rule::` builder expression, emitted verbatim as PHP code.
    Expr(String),
}

impl RuleToken {
    pub fn plain(rule: impl Into<String>) -> Self {
        RuleToken::Plain(rule.into())
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, RuleToken::Expr(_))
    }

    pub fn to_php(&self) -> String {
        match self {
            RuleToken::Plain(rule) => php::string(rule),
            RuleToken::Expr(expr) => expr.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    tokens: Vec<RuleToken>,
    list_mode: bool,
}

impl RuleSet {
    pub fn tokens(&self) -> &[RuleToken] {
        &self.tokens
    }

    pub fn is_list(&self) -> bool {
        self.list_mode
    }

    pub fn uses_rule_builder(&self) -> bool {
        self.tokens.iter().any(RuleToken::is_expr)
    }

    /// PHP literal for the rule set: `'a|b'` or `['a', Rule::in([...])]`.
    pub fn to_php(&self) -> String {
        if self.list_mode {
            let items: Vec<String> = self.tokens.iter().map(RuleToken::to_php).collect();
            format!("[{}]", items.join(", "))
        } else {
            let joined: Vec<&str> = self
                .tokens
                .iter()
                .filter_map(|token| match token {
                    RuleToken::Plain(rule) => Some(rule.as_str()),
                    RuleToken::Expr(_) => None,
                })
                .collect();
            php::string(&joined.join("|"))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOptions {
    pub prefer_array: bool,
}

pub fn derive_rules(column: &ColumnDescriptor, options: RuleOptions) -> RuleSet {
    let mut tokens: Vec<RuleToken> = match column.base_type.as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => {
            let mut rules = vec![RuleToken::plain("integer")];
            if let Some((min, max)) = integer_bounds(&column.base_type, column.unsigned) {
                rules.push(RuleToken::plain(min));
                rules.push(RuleToken::plain(max));
            }
            rules
        }
        "decimal" | "float" | "double" => vec![RuleToken::plain("numeric")],
        "varchar" | "char" => vec![
            RuleToken::plain("string"),
            RuleToken::Plain(format!(
                "max:{}",
                column
                    .character_maximum_length
                    .map(|len| len.to_string())
                    .unwrap_or_default()
            )),
        ],
        "text" => vec![RuleToken::plain("string")],
        "date" | "timestamp" => vec![RuleToken::plain("date")],
        "enum" => {
            let values = column.enum_values.clone().unwrap_or_default();
            vec![RuleToken::Expr(format!("Rule::in({})", php::array(&values)))]
        }
        _ => Vec::new(),
    };

    if column.key == KeyKind::Unique {
        tokens.insert(0, RuleToken::Expr(UNIQUE_IGNORING_CURRENT.to_string()));
    }
    if column.nullable {
        tokens.insert(0, RuleToken::plain("nullable"));
    } else if column.default.is_none() {
        tokens.insert(0, RuleToken::plain("required"));
    }

    if tokens.is_empty() {
        tokens.push(RuleToken::plain(""));
    }

    let list_mode = options.prefer_array || tokens.iter().any(RuleToken::is_expr);

    RuleSet { tokens, list_mode }
}

// Signed smallint and int bounds must stay byte-identical to earlier output.
fn integer_bounds(base_type: &str, unsigned: bool) -> Option<(&'static str, &'static str)> {
    match (base_type, unsigned) {
        ("tinyint", true) => Some(("min:0", "max:255")),
        ("tinyint", false) => Some(("min:-128", "max:127")),
        ("smallint", true) => Some(("min:0", "max:65535")),
        ("smallint", false) => Some(("min:32768", "max:-32767")),
        ("mediumint", true) => Some(("min:0", "max:16777215")),
        ("mediumint", false) => Some(("min:-8388608", "max:8388607")),
        ("int", true) => Some(("min:0", "max:4294967295")),
        ("int", false) => Some(("min:-2147683648", "max:2147683647")),
        _ => None,
    }
}

/// Type used in the `@property` docs of the contract.
pub fn display_type(base_type: &str) -> &str {
    match base_type {
        "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => "integer",
        "decimal" | "float" | "double" => "float",
        "char" | "varchar" | "text" | "mediumtext" | "longtext" | "enum" => "string",
        "date" | "datetime" | "time" | "timestamp" => "\\Carbon\\Carbon",
        other => other,
    }
}
