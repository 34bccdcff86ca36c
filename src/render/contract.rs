use crate::{
    models::schema::ColumnDescriptor,
    rules::{display_type, RuleSet},
};

use super::{i18n_method, php, Imports, Label};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDoc {
    pub php_type: String,
    pub name: String,
    pub description: String,
}

impl PropertyDoc {
    pub fn from_column(column: &ColumnDescriptor) -> Self {
        let mut description = match &column.default {
            Some(default) => format!("[Default {}] ", php::string(default)),
            None => String::new(),
        };
        description.push_str(&column.comment);

        Self {
            php_type: display_type(&column.base_type).to_string(),
            name: column.name.clone(),
            description: description.trim_end().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContractBindings {
    pub namespace: String,
    pub class_name: String,
    pub base_model: String,
    pub full_table_name: String,
    pub table_name: String,
    pub properties: Vec<PropertyDoc>,
    pub rules: Vec<(String, RuleSet)>,
    pub labels: Vec<Label>,
    pub imports: Imports,
}

pub fn render(bindings: &ContractBindings) -> String {
    let mut out = String::new();

    out.push_str("<?php\n\n");
    out.push_str(&format!("namespace {};\n\n", bindings.namespace));
    out.push_str(&bindings.imports.to_php());

    out.push_str("/**\n");
    out.push_str(&format!(
        " * This is the contract class for table `{}`.\n",
        bindings.full_table_name
    ));
    if !bindings.properties.is_empty() {
        out.push_str(" *\n");
    }
    for property in &bindings.properties {
        let line = format!(
            " * @property {} ${} {}",
            property.php_type, property.name, property.description
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(" */\n");

    out.push_str(&format!(
        "abstract class {} extends {}\n",
        bindings.class_name, bindings.base_model
    ));
    out.push_str("{\n");

    out.push_str("    /**\n");
    out.push_str("     * The table associated with the model.\n");
    out.push_str("     *\n");
    out.push_str("     * @var string\n");
    out.push_str("     */\n");
    out.push_str(&format!(
        "    protected $table = {};\n\n",
        php::string(&bindings.table_name)
    ));

    out.push_str("    /**\n");
    out.push_str("     * Validation rules for the attributes of this model.\n");
    out.push_str("     *\n");
    out.push_str("     * @return array\n");
    out.push_str("     */\n");
    out.push_str("    public function rules(): array\n");
    out.push_str("    {\n");
    out.push_str("        return [\n");
    for (column, rules) in &bindings.rules {
        out.push_str(&format!(
            "            {} => {},\n",
            php::string(column),
            rules.to_php()
        ));
    }
    out.push_str("        ];\n");
    out.push_str("    }\n\n");

    out.push_str("    /**\n");
    out.push_str("     * Human-readable labels of the attributes, keyed by column name.\n");
    out.push_str("     *\n");
    out.push_str("     * @return array\n");
    out.push_str("     */\n");
    out.push_str(&i18n_method(&bindings.labels));
    out.push_str("}\n");

    out
}
