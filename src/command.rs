//! The `make model` command: resolve each requested table and generate its
//! contract, model and optional companion files.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;

use crate::{
    config::GeneratorConfig,
    db::{self, DbClient},
    errors::GenError,
    models::schema::TableDescriptor,
    naming,
    prompt::Prompt,
    render::{
        self, contract::PropertyDoc, ContractBindings, ControllerBindings, FactoryBindings,
        Imports, MigrationBindings, ModelBindings, SeederBindings, Template, HAS_FACTORY_CLASS,
        RULE_CLASS, SOFT_DELETES_CLASS,
    },
    rules::{derive_rules, RuleOptions},
    writer::{write_or_skip, WriteMode, WriteOutcome, WriteRequest},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanionOptions {
    pub factory: bool,
    pub migration: bool,
    pub seeder: bool,
    pub controller: bool,
    pub resource: bool,
}

impl CompanionOptions {
    pub fn all() -> Self {
        Self {
            factory: true,
            migration: true,
            seeder: true,
            controller: true,
            resource: true,
        }
    }

    fn wants_controller(&self) -> bool {
        self.controller || self.resource
    }
}

#[derive(Debug, Clone)]
pub struct MakeModelOptions {
    pub names: Vec<String>,
    pub base_path: PathBuf,
    /// Overrides the configured models directory.
    pub dir: Option<String>,
    pub raw: bool,
    pub overwrite: bool,
    pub force: bool,
    pub prefer_array_rules: bool,
    pub companions: CompanionOptions,
    /// Prefix of generated migration file names.
    pub timestamp: NaiveDateTime,
}

/// State of one requested name, rebuilt from scratch for every name.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub model: String,
    pub table: TableDescriptor,
    pub imports: Imports,
}

impl GenerationContext {
    pub fn new(table: TableDescriptor) -> Self {
        Self {
            model: naming::studly(table.bare_name()),
            table,
            imports: Imports::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub label: String,
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

#[derive(Debug)]
pub struct NameReport {
    pub name: String,
    pub result: Result<Vec<Written>, GenError>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<NameReport>,
}

impl RunSummary {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &GenError)> {
        self.reports.iter().filter_map(|report| match &report.result {
            Ok(_) => None,
            Err(e) => Some((report.name.as_str(), e)),
        })
    }

    pub fn count(&self, outcome: WriteOutcome) -> usize {
        self.reports
            .iter()
            .filter_map(|report| report.result.as_ref().ok())
            .flatten()
            .filter(|written| written.outcome == outcome)
            .count()
    }
}

pub struct MakeModelCommand<'a> {
    client: &'a dyn DbClient,
    config: &'a GeneratorConfig,
    options: MakeModelOptions,
    prompt: &'a mut dyn Prompt,
    out: &'a mut dyn Write,
}

impl<'a> MakeModelCommand<'a> {
    pub fn new(
        client: &'a dyn DbClient,
        config: &'a GeneratorConfig,
        options: MakeModelOptions,
        prompt: &'a mut dyn Prompt,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            client,
            config,
            options,
            prompt,
            out,
        }
    }

    /// Generates every requested name. A failing name is logged and recorded,
    /// the remaining names are still processed.
    pub async fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        for name in self.options.names.clone() {
            let result = self.generate(&name).await;
            if let Err(e) = &result {
                log::error!("{}: {}", name, e);
            }
            summary.reports.push(NameReport { name, result });
        }

        summary
    }

    async fn generate(&mut self, name: &str) -> Result<Vec<Written>, GenError> {
        let table = db::resolve_table(self.client, name, &self.config.table_prefix).await?;

        if table.is_empty() {
            let similar = db::suggest_tables(self.client, name).await?;
            if !similar.is_empty() {
                log::warn!("Tables with a similar name: {}", similar.join(", "));
            }
            if !self.options.force {
                return Err(GenError::TableNotFound(name.to_string()));
            }
            log::warn!(
                "No column found for `{}`, generating `{}` anyway",
                name,
                table.table_name
            );
        }

        let mut ctx = GenerationContext::new(table);
        let mut written = Vec::new();

        written.push(self.generate_contract(&mut ctx)?);
        written.push(self.generate_model(&ctx)?);
        written.extend(self.generate_companions(&ctx)?);

        Ok(written)
    }

    fn models_dir(&self) -> PathBuf {
        match &self.options.dir {
            Some(dir) => self.options.base_path.join(naming::dir_to_path(dir)),
            None => self.config.models_dir(&self.options.base_path),
        }
    }

    fn mode(&self, overwrite: bool) -> WriteMode {
        if self.options.raw {
            WriteMode::Raw
        } else {
            WriteMode::Normal { overwrite }
        }
    }

    fn write(
        &mut self,
        label: &str,
        path: PathBuf,
        name: &str,
        template: Template,
        overwrite: bool,
    ) -> Result<Written, GenError> {
        let request = WriteRequest {
            path,
            content: render::render(&template),
            label: label.to_string(),
            name: name.to_string(),
        };
        let mode = self.mode(overwrite);
        let outcome = write_or_skip(&request, mode, &mut *self.prompt, &mut *self.out)?;

        Ok(Written {
            label: request.label,
            path: request.path,
            outcome,
        })
    }

    fn generate_contract(&mut self, ctx: &mut GenerationContext) -> Result<Written, GenError> {
        let namespace = format!("{}\\Contracts", self.config.namespace);
        let (base_model, base_import) = naming::relative_class(&namespace, &self.config.base_model);
        if let Some(import) = base_import {
            ctx.imports.add(import);
        }

        let options = RuleOptions {
            prefer_array: self.options.prefer_array_rules || self.config.prefer_array_rules,
        };
        let rules: Vec<_> = ctx
            .table
            .columns
            .iter()
            .filter(|column| !column.is_generated_key())
            .map(|column| (column.name.clone(), derive_rules(column, options)))
            .collect();
        if rules.iter().any(|(_, set)| set.uses_rule_builder()) {
            ctx.imports.add(RULE_CLASS);
        }

        let bindings = ContractBindings {
            namespace,
            class_name: format!("{}Contract", ctx.model),
            base_model,
            full_table_name: ctx.table.table_name.clone(),
            table_name: ctx.table.bare_name().to_string(),
            properties: ctx.table.columns.iter().map(PropertyDoc::from_column).collect(),
            rules,
            labels: render::labels(&ctx.model, &ctx.table.columns, &self.config.global_trans_keys),
            imports: ctx.imports.clone(),
        };

        let path = self
            .models_dir()
            .join("Contracts")
            .join(format!("{}Contract.php", ctx.model));
        let model = ctx.model.clone();
        let overwrite = self.options.overwrite;
        let written = self.write(
            "Contract",
            path,
            &model,
            Template::Contract(bindings),
            overwrite,
        )?;
        if written.outcome == WriteOutcome::Aborted {
            log::warn!("Contract for `{}` not written, continuing with the model", model);
        }
        Ok(written)
    }

    fn generate_model(&mut self, ctx: &GenerationContext) -> Result<Written, GenError> {
        let path = self.models_dir().join(format!("{}.php", ctx.model));
        if !self.options.raw && path.exists() {
            log::warn!("Model [{}] already exists, skipped", path.display());
            return Ok(Written {
                label: "Model".to_string(),
                path,
                outcome: WriteOutcome::Skipped,
            });
        }

        let mut imports = Imports::new();
        let mut traits = Vec::new();
        if self.options.companions.factory {
            imports.add(HAS_FACTORY_CLASS);
            traits.push("HasFactory".to_string());
        }
        if ctx.table.uses_soft_deletes() {
            imports.add(SOFT_DELETES_CLASS);
            traits.push("SoftDeletes".to_string());
        }

        let bindings = ModelBindings {
            namespace: self.config.namespace.clone(),
            class_name: ctx.model.clone(),
            imports,
            traits,
            labels: render::labels(&ctx.model, &ctx.table.columns, &self.config.global_trans_keys),
        };

        self.write("Model", path, &ctx.model, Template::Model(bindings), false)
    }

    fn generate_companions(&mut self, ctx: &GenerationContext) -> Result<Vec<Written>, GenError> {
        let companions = self.options.companions;
        let base = self.options.base_path.clone();
        let namespace = self.config.namespace.clone();
        let model = ctx.model.clone();
        let mut written = Vec::new();

        if companions.factory {
            let bindings = FactoryBindings::for_table(&namespace, &model, &ctx.table);
            let path = base
                .join("database/factories")
                .join(format!("{}Factory.php", model));
            written.push(self.write("Factory", path, &model, Template::Factory(bindings), false)?);
        }

        if companions.migration {
            let dir = base.join("database/migrations");
            let table = ctx.table.bare_name();
            if !self.options.raw && has_create_migration(&dir, table)? {
                log::warn!("A create migration for `{}` already exists, skipped", table);
            } else {
                let file = format!(
                    "{}_create_{}_table.php",
                    self.options.timestamp.format("%Y_%m_%d_%H%M%S"),
                    table
                );
                let bindings = MigrationBindings::for_table(&ctx.table);
                written.push(self.write(
                    "Migration",
                    dir.join(file),
                    &model,
                    Template::Migration(bindings),
                    false,
                )?);
            }
        }

        if companions.seeder {
            let bindings = SeederBindings {
                model_namespace: namespace.clone(),
                model_class: model.clone(),
                with_factory: companions.factory,
            };
            let path = base
                .join("database/seeders")
                .join(format!("{}Seeder.php", model));
            written.push(self.write("Seeder", path, &model, Template::Seeder(bindings), false)?);
        }

        if companions.wants_controller() {
            let bindings = ControllerBindings {
                model_namespace: namespace,
                model_class: model.clone(),
                resource: companions.resource,
            };
            let path = base
                .join("app/Http/Controllers")
                .join(format!("{}Controller.php", model));
            written.push(self.write(
                "Controller",
                path,
                &model,
                Template::Controller(bindings),
                false,
            )?);
        }

        Ok(written)
    }
}

fn has_create_migration(dir: &Path, table: &str) -> Result<bool, GenError> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let suffix = format!("_create_{}_table.php", table);
    for entry in fs::read_dir(dir)? {
        if entry?.file_name().to_string_lossy().ends_with(&suffix) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_context_model_name_keeps_plural() {
        let ctx = GenerationContext::new(TableDescriptor::new("wp_user_profiles", "wp_"));
        assert_eq!(ctx.model, "UserProfiles");
        assert!(ctx.imports.is_empty());
    }

    #[test]
    fn test_has_create_migration() {
        let dir = tempdir().unwrap();
        assert!(!has_create_migration(&dir.path().join("missing"), "users").unwrap());

        fs::write(
            dir.path().join("2024_01_01_000000_create_users_table.php"),
            "<?php",
        )
        .unwrap();
        assert!(has_create_migration(dir.path(), "users").unwrap());
        assert!(!has_create_migration(dir.path(), "posts").unwrap());
    }

    #[test]
    fn test_companion_all_wants_controller() {
        assert!(CompanionOptions::all().wants_controller());
        assert!(!CompanionOptions::default().wants_controller());
    }
}
