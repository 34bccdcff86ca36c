use super::{i18n_method, Imports, Label};

/// Bindings of the concrete model extending its contract.
#[derive(Debug, Clone)]
pub struct ModelBindings {
    pub namespace: String,
    pub class_name: String,
    pub imports: Imports,
    /// Short trait names mixed into the class body, e.g. `SoftDeletes`.
    pub traits: Vec<String>,
    pub labels: Vec<Label>,
}

pub fn render(bindings: &ModelBindings) -> String {
    let mut out = String::new();

    out.push_str("<?php\n\n");
    out.push_str(&format!("namespace {};\n\n", bindings.namespace));
    out.push_str(&bindings.imports.to_php());
    out.push_str(&format!(
        "class {} extends Contracts\\{}Contract\n",
        bindings.class_name, bindings.class_name
    ));
    out.push_str("{\n");
    if !bindings.traits.is_empty() {
        out.push_str(&format!("    use {};\n\n", bindings.traits.join(", ")));
    }
    out.push_str(&i18n_method(&bindings.labels));
    out.push_str("}\n");

    out
}
