//! Factory, migration, seeder and controller sources generated next to a model.

use crate::{
    models::schema::{ColumnDescriptor, KeyKind, TableDescriptor},
    naming,
};

use super::{php, Imports};

const TIMESTAMP_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryBindings {
    pub model_namespace: String,
    pub model_class: String,
    /// Column name and the PHP expression producing a fake value for it.
    pub fields: Vec<(String, String)>,
}

impl FactoryBindings {
    pub fn for_table(model_namespace: &str, model_class: &str, table: &TableDescriptor) -> Self {
        Self {
            model_namespace: model_namespace.to_string(),
            model_class: model_class.to_string(),
            fields: table
                .columns
                .iter()
                .filter_map(|column| {
                    faker_expression(column).map(|expr| (column.name.clone(), expr))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBindings {
    pub table_name: String,
    pub lines: Vec<String>,
}

impl MigrationBindings {
    pub fn for_table(table: &TableDescriptor) -> Self {
        Self {
            table_name: table.bare_name().to_string(),
            lines: blueprint_lines(table),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederBindings {
    pub model_namespace: String,
    pub model_class: String,
    pub with_factory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerBindings {
    pub model_namespace: String,
    pub model_class: String,
    pub resource: bool,
}

/// Faker call for a column, `None` for keys and framework-managed timestamps.
pub fn faker_expression(column: &ColumnDescriptor) -> Option<String> {
    if column.is_generated_key() || TIMESTAMP_COLUMNS.contains(&column.name.as_str()) {
        return None;
    }

    match column.name.as_str() {
        "email" if column.key == KeyKind::Unique => {
            return Some("fake()->unique()->safeEmail()".to_string())
        }
        "email" => return Some("fake()->safeEmail()".to_string()),
        "name" => return Some("fake()->name()".to_string()),
        _ => {}
    }

    let expr = match column.base_type.as_str() {
        "enum" => format!(
            "fake()->randomElement({})",
            php::array(column.enum_values.as_deref().unwrap_or_default())
        ),
        "tinyint" if column.size.as_deref() == Some("1") => "fake()->boolean()".to_string(),
        "tinyint" if column.unsigned => "fake()->numberBetween(0, 255)".to_string(),
        "tinyint" => "fake()->numberBetween(0, 127)".to_string(),
        "smallint" => "fake()->numberBetween(0, 32767)".to_string(),
        "mediumint" | "int" | "bigint" => "fake()->randomNumber()".to_string(),
        "decimal" | "float" | "double" => format!(
            "fake()->randomFloat({}, 0, 1000)",
            column.numeric_scale.unwrap_or(2)
        ),
        "varchar" | "char" => match column.character_maximum_length {
            Some(len) if len >= 5 => format!("fake()->text({})", len.min(200)),
            Some(len) => format!(
                "fake()->lexify({})",
                php::string(&"?".repeat(len as usize))
            ),
            None => "fake()->word()".to_string(),
        },
        "tinytext" | "text" | "mediumtext" | "longtext" => "fake()->paragraph()".to_string(),
        "date" => "fake()->date()".to_string(),
        "datetime" | "timestamp" => "fake()->dateTime()".to_string(),
        "time" => "fake()->time()".to_string(),
        "year" => "fake()->year()".to_string(),
        "json" => "[]".to_string(),
        _ => return None,
    };

    Some(expr)
}

fn is_time_column(column: &ColumnDescriptor) -> bool {
    matches!(column.base_type.as_str(), "timestamp" | "datetime")
}

/// Blueprint statements rebuilding the table, one per line.
pub fn blueprint_lines(table: &TableDescriptor) -> Vec<String> {
    if table.is_empty() {
        return vec!["$table->id();".to_string(), "$table->timestamps();".to_string()];
    }

    let has_timestamps = ["created_at", "updated_at"]
        .iter()
        .all(|name| table.column(name).is_some_and(is_time_column));

    let mut lines = Vec::new();
    for column in &table.columns {
        match column.name.as_str() {
            "created_at" if has_timestamps => lines.push("$table->timestamps();".to_string()),
            "updated_at" if has_timestamps => {}
            "deleted_at" if is_time_column(column) && column.nullable => {
                lines.push("$table->softDeletes();".to_string())
            }
            _ => lines.push(blueprint_column(column)),
        }
    }
    lines
}

pub fn blueprint_column(column: &ColumnDescriptor) -> String {
    let name = php::string(&column.name);

    if column.is_generated_key() {
        return match column.base_type.as_str() {
            "bigint" if column.unsigned && column.name == "id" => "$table->id();".to_string(),
            "bigint" => format!("$table->bigIncrements({});", name),
            "mediumint" => format!("$table->mediumIncrements({});", name),
            "smallint" => format!("$table->smallIncrements({});", name),
            "tinyint" => format!("$table->tinyIncrements({});", name),
            _ => format!("$table->increments({});", name),
        };
    }

    let call = match column.base_type.as_str() {
        "tinyint" if column.size.as_deref() == Some("1") => format!("boolean({})", name),
        "tinyint" => integer_call("tinyInteger", column.unsigned, &name),
        "smallint" => integer_call("smallInteger", column.unsigned, &name),
        "mediumint" => integer_call("mediumInteger", column.unsigned, &name),
        "int" => integer_call("integer", column.unsigned, &name),
        "bigint" => integer_call("bigInteger", column.unsigned, &name),
        "decimal" => format!(
            "decimal({}, {}, {})",
            name,
            column.numeric_precision.unwrap_or(8),
            column.numeric_scale.unwrap_or(2)
        ),
        "float" => format!("float({})", name),
        "double" => format!("double({})", name),
        "varchar" => match column.character_maximum_length {
            Some(len) if len != 255 => format!("string({}, {})", name, len),
            _ => format!("string({})", name),
        },
        "char" => match column.character_maximum_length {
            Some(len) => format!("char({}, {})", name, len),
            None => format!("char({})", name),
        },
        "tinytext" => format!("tinyText({})", name),
        "text" => format!("text({})", name),
        "mediumtext" => format!("mediumText({})", name),
        "longtext" => format!("longText({})", name),
        "json" => format!("json({})", name),
        "date" => format!("date({})", name),
        "datetime" => format!("dateTime({})", name),
        "time" => format!("time({})", name),
        "timestamp" => format!("timestamp({})", name),
        "year" => format!("year({})", name),
        "enum" => format!(
            "enum({}, {})",
            name,
            php::array(column.enum_values.as_deref().unwrap_or_default())
        ),
        "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" => {
            format!("binary({})", name)
        }
        other => format!("addColumn({}, {})", php::string(other), name),
    };

    let mut line = format!("$table->{}", call);
    if column.nullable {
        line.push_str("->nullable()");
    }
    if let Some(default) = &column.default {
        let lower = default.to_ascii_lowercase();
        if lower.starts_with("current_timestamp") {
            line.push_str("->useCurrent()");
        } else if !(lower == "null" && column.nullable) {
            let unquoted = default
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap_or(default);
            line.push_str(&format!("->default({})", php::string(unquoted)));
        }
    }
    match column.key {
        KeyKind::Primary => line.push_str("->primary()"),
        KeyKind::Unique => line.push_str("->unique()"),
        KeyKind::Indexed => line.push_str("->index()"),
        KeyKind::Plain => {}
    }
    if !column.comment.is_empty() {
        line.push_str(&format!("->comment({})", php::string(&column.comment)));
    }
    line.push(';');
    line
}

fn integer_call(method: &str, unsigned: bool, name: &str) -> String {
    if unsigned {
        let mut chars = method.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("unsigned{}({})", capitalized, name)
    } else {
        format!("{}({})", method, name)
    }
}

pub fn render_factory(bindings: &FactoryBindings) -> String {
    let mut imports = Imports::new();
    imports.add(format!(
        "{}\\{}",
        bindings.model_namespace, bindings.model_class
    ));
    imports.add("Illuminate\\Database\\Eloquent\\Factories\\Factory");

    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str("namespace Database\\Factories;\n\n");
    out.push_str(&imports.to_php());
    out.push_str("/**\n");
    out.push_str(&format!(" * @extends Factory<{}>\n", bindings.model_class));
    out.push_str(" */\n");
    out.push_str(&format!(
        "class {}Factory extends Factory\n",
        bindings.model_class
    ));
    out.push_str("{\n");
    out.push_str(&format!(
        "    protected $model = {}::class;\n\n",
        bindings.model_class
    ));
    out.push_str("    /**\n");
    out.push_str("     * Define the model's default state.\n");
    out.push_str("     *\n");
    out.push_str("     * @return array<string, mixed>\n");
    out.push_str("     */\n");
    out.push_str("    public function definition(): array\n");
    out.push_str("    {\n");
    out.push_str("        return [\n");
    for (column, expr) in &bindings.fields {
        out.push_str(&format!("            {} => {},\n", php::string(column), expr));
    }
    out.push_str("        ];\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

pub fn render_migration(bindings: &MigrationBindings) -> String {
    let table = php::string(&bindings.table_name);

    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str("use Illuminate\\Database\\Migrations\\Migration;\n");
    out.push_str("use Illuminate\\Database\\Schema\\Blueprint;\n");
    out.push_str("use Illuminate\\Support\\Facades\\Schema;\n\n");
    out.push_str("return new class extends Migration\n");
    out.push_str("{\n");
    out.push_str("    /**\n");
    out.push_str("     * Run the migrations.\n");
    out.push_str("     */\n");
    out.push_str("    public function up(): void\n");
    out.push_str("    {\n");
    out.push_str(&format!(
        "        Schema::create({}, function (Blueprint $table) {{\n",
        table
    ));
    for line in &bindings.lines {
        out.push_str(&format!("            {}\n", line));
    }
    out.push_str("        });\n");
    out.push_str("    }\n\n");
    out.push_str("    /**\n");
    out.push_str("     * Reverse the migrations.\n");
    out.push_str("     */\n");
    out.push_str("    public function down(): void\n");
    out.push_str("    {\n");
    out.push_str(&format!("        Schema::dropIfExists({});\n", table));
    out.push_str("    }\n");
    out.push_str("};\n");
    out
}

pub fn render_seeder(bindings: &SeederBindings) -> String {
    let mut imports = Imports::new();
    if bindings.with_factory {
        imports.add(format!(
            "{}\\{}",
            bindings.model_namespace, bindings.model_class
        ));
    }
    imports.add("Illuminate\\Database\\Seeder");

    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str("namespace Database\\Seeders;\n\n");
    out.push_str(&imports.to_php());
    out.push_str(&format!("class {}Seeder extends Seeder\n", bindings.model_class));
    out.push_str("{\n");
    out.push_str("    /**\n");
    out.push_str("     * Run the database seeds.\n");
    out.push_str("     */\n");
    out.push_str("    public function run(): void\n");
    out.push_str("    {\n");
    if bindings.with_factory {
        out.push_str(&format!(
            "        {}::factory()->count(10)->create();\n",
            bindings.model_class
        ));
    } else {
        out.push_str("        //\n");
    }
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

pub fn render_controller(bindings: &ControllerBindings) -> String {
    let model = &bindings.model_class;
    let var = format!("${}", naming::camel(model));

    let mut imports = Imports::new();
    if bindings.resource {
        imports.add(format!("{}\\{}", bindings.model_namespace, model));
    }
    imports.add("Illuminate\\Http\\Request");

    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str("namespace App\\Http\\Controllers;\n\n");
    out.push_str(&imports.to_php());
    out.push_str(&format!("class {}Controller extends Controller\n", model));
    out.push_str("{\n");

    if !bindings.resource {
        out.push_str("    //\n");
        out.push_str("}\n");
        return out;
    }

    let actions = [
        ("Display a listing of the resource.", "index()".to_string(), "//".to_string()),
        (
            "Show the form for creating a new resource.",
            "create()".to_string(),
            "//".to_string(),
        ),
        (
            "Store a newly created resource in storage.",
            "store(Request $request)".to_string(),
            format!(
                "$validated = $request->validate((new {})->rules());\n\n        return {}::create($validated);",
                model, model
            ),
        ),
        (
            "Display the specified resource.",
            format!("show({} {})", model, var),
            format!("return {};", var),
        ),
        (
            "Show the form for editing the specified resource.",
            format!("edit({} {})", model, var),
            "//".to_string(),
        ),
        (
            "Update the specified resource in storage.",
            format!("update(Request $request, {} {})", model, var),
            format!(
                "{var}->update($request->validate({var}->rules()));\n\n        return {var};",
                var = var
            ),
        ),
        (
            "Remove the specified resource from storage.",
            format!("destroy({} {})", model, var),
            format!("{}->delete();\n\n        return response()->noContent();", var),
        ),
    ];

    let methods: Vec<String> = actions
        .iter()
        .map(|(doc, signature, body)| {
            format!(
                "    /**\n     * {}\n     */\n    public function {}\n    {{\n        {}\n    }}\n",
                doc, signature, body
            )
        })
        .collect();
    out.push_str(&methods.join("\n"));
    out.push_str("}\n");
    out
}
