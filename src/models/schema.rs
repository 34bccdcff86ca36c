use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::GenError;

static COLUMN_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\((\d+(?:,?\d+)?)\))?(?: +(\w+))?").expect("column type pattern")
});

/// One row of `information_schema.COLUMNS`, restricted to the fields the
/// generator reads. Any other field is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub ordinal_position: Option<u64>,
    #[serde(default)]
    pub column_default: Option<String>,
    pub is_nullable: String,
    pub data_type: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub character_maximum_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub numeric_precision: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub numeric_scale: Option<u64>,
    pub column_type: String,
    #[serde(default)]
    pub column_key: String,
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub column_comment: String,
}

impl ColumnRow {
    /// Parses a JSON object produced from a database row.
    pub fn from_json(value: serde_json::Value) -> Result<Self, GenError> {
        serde_json::from_value(value).map_err(|e| GenError::SchemaRow(e.to_string()))
    }
}

// information_schema reports lengths as BIGINT UNSIGNED, some drivers hand them back as text.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KeyKind {
    Primary,
    Unique,
    Indexed,
    #[default]
    Plain,
}

impl KeyKind {
    pub fn from_column_key(column_key: &str) -> Self {
        match column_key {
            "PRI" => KeyKind::Primary,
            "UNI" => KeyKind::Unique,
            "MUL" => KeyKind::Indexed,
            _ => KeyKind::Plain,
        }
    }
}

/// Result of splitting a raw `COLUMN_TYPE` such as `int(11) unsigned`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedType {
    pub base: String,
    pub size: Option<String>,
    pub unsigned: bool,
    pub values: Option<Vec<String>>,
}

pub fn parse_column_type(raw: &str) -> ParsedType {
    let Some(captures) = COLUMN_TYPE.captures(raw) else {
        return ParsedType {
            base: raw.to_string(),
            ..ParsedType::default()
        };
    };

    let base = captures[1].to_string();
    let mut parsed = ParsedType {
        base: base.clone(),
        ..ParsedType::default()
    };

    if base.contains("int") || base == "decimal" || base == "float" {
        parsed.size = captures.get(2).map(|m| m.as_str().to_string());
        parsed.unsigned = captures.get(3).is_some_and(|m| m.as_str() == "unsigned");
    }

    if base == "enum" {
        parsed.values = Some(parse_enum_values(raw));
    }

    parsed
}

fn parse_enum_values(raw: &str) -> Vec<String> {
    let inner = raw
        .strip_prefix("enum(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or("");

    inner
        .split(',')
        .map(|value| value.trim_matches(|c| c == '\'' || c == '"').to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: String,
    pub base_type: String,
    pub size: Option<String>,
    pub unsigned: bool,
    pub nullable: bool,
    pub default: Option<String>,
    pub enum_values: Option<Vec<String>>,
    pub key: KeyKind,
    pub extra: String,
    pub comment: String,
    pub character_maximum_length: Option<u64>,
    pub numeric_precision: Option<u64>,
    pub numeric_scale: Option<u64>,
}

impl ColumnDescriptor {
    pub fn from_row(row: ColumnRow) -> Self {
        let parsed = parse_column_type(&row.column_type);

        Self {
            name: row.column_name,
            column_type: row.column_type,
            base_type: parsed.base,
            size: parsed.size,
            unsigned: parsed.unsigned,
            nullable: row.is_nullable == "YES",
            default: row.column_default,
            enum_values: parsed.values,
            key: KeyKind::from_column_key(&row.column_key),
            extra: row.extra,
            comment: row.column_comment,
            character_maximum_length: row.character_maximum_length,
            numeric_precision: row.numeric_precision,
            numeric_scale: row.numeric_scale,
        }
    }

    pub fn is_auto_increment(&self) -> bool {
        self.extra
            .split_whitespace()
            .any(|flag| flag.eq_ignore_ascii_case("auto_increment"))
    }

    /// Auto-increment primary keys never receive validation rules.
    pub fn is_generated_key(&self) -> bool {
        self.key == KeyKind::Primary && self.is_auto_increment()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub table_name: String,
    pub table_prefix: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(table_name: impl Into<String>, table_prefix: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            table_prefix: table_prefix.into(),
            columns: Vec::new(),
        }
    }

    pub fn from_rows(
        table_name: impl Into<String>,
        table_prefix: impl Into<String>,
        rows: Vec<ColumnRow>,
    ) -> Self {
        let mut table = Self::new(table_name, table_prefix);
        table.columns = rows.into_iter().map(ColumnDescriptor::from_row).collect();
        table
    }

    /// Table name without the configured prefix.
    pub fn bare_name(&self) -> &str {
        if self.table_prefix.is_empty() {
            return &self.table_name;
        }
        self.table_name
            .strip_prefix(&self.table_prefix)
            .unwrap_or(&self.table_name)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn uses_soft_deletes(&self) -> bool {
        self.column("deleted_at").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(column_name: &str, column_type: &str) -> serde_json::Value {
        json!({
            "TABLE_NAME": "users",
            "COLUMN_NAME": column_name,
            "ORDINAL_POSITION": 1,
            "COLUMN_DEFAULT": null,
            "IS_NULLABLE": "NO",
            "DATA_TYPE": column_type.split('(').next().unwrap(),
            "CHARACTER_MAXIMUM_LENGTH": null,
            "NUMERIC_PRECISION": null,
            "NUMERIC_SCALE": null,
            "COLUMN_TYPE": column_type,
            "COLUMN_KEY": "",
            "EXTRA": "",
            "COLUMN_COMMENT": ""
        })
    }

    #[test]
    fn test_parse_unsigned_int() {
        let parsed = parse_column_type("int(11) unsigned");
        assert_eq!(parsed.base, "int");
        assert_eq!(parsed.size.as_deref(), Some("11"));
        assert!(parsed.unsigned);
        assert_eq!(parsed.values, None);
    }

    #[test]
    fn test_parse_int_without_display_width() {
        let parsed = parse_column_type("bigint unsigned");
        assert_eq!(parsed.base, "bigint");
        assert_eq!(parsed.size, None);
        assert!(parsed.unsigned);
    }

    #[test]
    fn test_parse_decimal_precision() {
        let parsed = parse_column_type("decimal(10,2)");
        assert_eq!(parsed.base, "decimal");
        assert_eq!(parsed.size.as_deref(), Some("10,2"));
        assert!(!parsed.unsigned);
    }

    #[test]
    fn test_varchar_size_is_not_recorded() {
        let parsed = parse_column_type("varchar(255)");
        assert_eq!(parsed.base, "varchar");
        assert_eq!(parsed.size, None);
    }

    #[test]
    fn test_parse_enum_values() {
        let parsed = parse_column_type("enum('a','b',\"c\")");
        assert_eq!(parsed.base, "enum");
        assert_eq!(
            parsed.values,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_row_from_json_accepts_numeric_text() {
        let mut value = row("name", "varchar(255)");
        value["CHARACTER_MAXIMUM_LENGTH"] = json!("255");
        let row = ColumnRow::from_json(value).unwrap();
        assert_eq!(row.character_maximum_length, Some(255));
    }

    #[test]
    fn test_row_from_json_rejects_unknown_fields() {
        let mut value = row("name", "varchar(255)");
        value["PRIVILEGES"] = json!("select,insert");
        let result = ColumnRow::from_json(value);
        assert!(matches!(result, Err(GenError::SchemaRow(_))));
    }

    #[test]
    fn test_descriptor_from_row() {
        let mut value = row("id", "int(10) unsigned");
        value["COLUMN_KEY"] = json!("PRI");
        value["EXTRA"] = json!("auto_increment");
        let column = ColumnDescriptor::from_row(ColumnRow::from_json(value).unwrap());

        assert_eq!(column.name, "id");
        assert_eq!(column.base_type, "int");
        assert!(column.unsigned);
        assert!(!column.nullable);
        assert_eq!(column.key, KeyKind::Primary);
        assert!(column.is_generated_key());
    }

    #[test]
    fn test_bare_name_strips_prefix_only_when_present() {
        let prefixed = TableDescriptor::new("wp_users", "wp_");
        assert_eq!(prefixed.bare_name(), "users");

        let unprefixed = TableDescriptor::new("users", "wp_");
        assert_eq!(unprefixed.bare_name(), "users");
    }

    #[test]
    fn test_soft_deletes_detection() {
        let rows = vec![
            ColumnRow::from_json(row("id", "int(10) unsigned")).unwrap(),
            ColumnRow::from_json(row("deleted_at", "timestamp")).unwrap(),
        ];
        let table = TableDescriptor::from_rows("users", "", rows);
        assert!(table.uses_soft_deletes());
        assert_eq!(table.columns.len(), 2);
    }
}
