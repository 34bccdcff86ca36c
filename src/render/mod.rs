//! Typed templates for the generated PHP sources.
//!
//! Every template is a plain struct of bindings; [`render`] turns one into
//! source text. Rendering is pure string building with no I/O.

use std::collections::BTreeSet;

use crate::models::schema::ColumnDescriptor;

pub mod companions;
pub mod contract;
pub mod model;
pub mod php;

pub use companions::{ControllerBindings, FactoryBindings, MigrationBindings, SeederBindings};
pub use contract::ContractBindings;
pub use model::ModelBindings;

pub const RULE_CLASS: &str = "Illuminate\\Validation\\Rule";
pub const SOFT_DELETES_CLASS: &str = "Illuminate\\Database\\Eloquent\\SoftDeletes";
pub const HAS_FACTORY_CLASS: &str = "Illuminate\\Database\\Eloquent\\Factories\\HasFactory";

pub enum Template {
    Contract(ContractBindings),
    Model(ModelBindings),
    Factory(FactoryBindings),
    Migration(MigrationBindings),
    Seeder(SeederBindings),
    Controller(ControllerBindings),
}

pub fn render(template: &Template) -> String {
    match template {
        Template::Contract(bindings) => contract::render(bindings),
        Template::Model(bindings) => model::render(bindings),
        Template::Factory(bindings) => companions::render_factory(bindings),
        Template::Migration(bindings) => companions::render_migration(bindings),
        Template::Seeder(bindings) => companions::render_seeder(bindings),
        Template::Controller(bindings) => companions::render_controller(bindings),
    }
}

/// Sorted, de-duplicated `use` imports of one generated file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports(BTreeSet<String>);

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class: impl Into<String>) {
        self.0.insert(class.into());
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// One `use` line per import followed by a blank line, or nothing.
    pub fn to_php(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for class in &self.0 {
            out.push_str(&format!("use {};\n", class));
        }
        out.push('\n');
        out
    }
}

/// Translation call for one column in the `i18n()` label map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub column: String,
    pub key: String,
}

/// Columns listed in `global_keys` share a global translation key; the rest
/// are scoped to the kebab-cased model name.
pub fn labels(model: &str, columns: &[ColumnDescriptor], global_keys: &[String]) -> Vec<Label> {
    let scope = crate::naming::kebab(model);
    columns
        .iter()
        .map(|column| {
            let key = if global_keys.iter().any(|key| key == &column.name) {
                column.name.clone()
            } else {
                format!("{}.{}", scope, column.name)
            };
            Label {
                column: column.name.clone(),
                key,
            }
        })
        .collect()
}

fn i18n_method(labels: &[Label]) -> String {
    let mut out = String::new();
    out.push_str("    protected function i18n(): array\n");
    out.push_str("    {\n");
    out.push_str("        return [\n");
    for label in labels {
        out.push_str(&format!(
            "            {} => __({}),\n",
            php::string(&label.column),
            php::string(&label.key)
        ));
    }
    out.push_str("        ];\n");
    out.push_str("    }\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{ColumnRow, TableDescriptor};
    use serde_json::json;

    #[test]
    fn test_imports_are_sorted_and_unique() {
        let mut imports = Imports::new();
        imports.add(SOFT_DELETES_CLASS);
        imports.add(RULE_CLASS);
        imports.add(SOFT_DELETES_CLASS);

        assert_eq!(
            imports.to_php(),
            "use Illuminate\\Database\\Eloquent\\SoftDeletes;\nuse Illuminate\\Validation\\Rule;\n\n"
        );
        assert_eq!(Imports::new().to_php(), "");
    }

    #[test]
    fn test_labels_use_global_keys() {
        let rows = ["id", "display_name"]
            .iter()
            .map(|name| {
                ColumnRow::from_json(json!({
                    "TABLE_NAME": "user_profiles",
                    "COLUMN_NAME": name,
                    "IS_NULLABLE": "NO",
                    "DATA_TYPE": "int",
                    "COLUMN_TYPE": "int(11)"
                }))
                .unwrap()
            })
            .collect();
        let table = TableDescriptor::from_rows("user_profiles", "", rows);

        let labels = labels("UserProfiles", &table.columns, &["id".to_string()]);
        assert_eq!(labels[0].key, "id");
        assert_eq!(labels[1].key, "user-profiles.display_name");
    }
}
