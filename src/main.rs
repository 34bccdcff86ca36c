use std::{io, path::PathBuf};

use clap::Parser;
use eloquent_forge::{
    command::{CompanionOptions, MakeModelCommand, MakeModelOptions},
    config::GeneratorConfig,
    db::mysql::MySqlClient,
    models::connections::ConnectionConfig,
    prompt::{ConsolePrompt, PolicyPrompt, Prompt},
    writer::WriteOutcome,
};

/// Generate Eloquent model and contract classes from MySQL tables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Table or class names to generate
    #[arg(required = true)]
    names: Vec<String>,

    /// Models directory, relative to the base path
    #[arg(short, long)]
    dir: Option<String>,

    /// Print the generated sources instead of writing files
    #[arg(long)]
    raw: bool,

    /// Overwrite existing contracts after confirmation
    #[arg(long)]
    overwrite: bool,

    /// Generate even when the table has no columns
    #[arg(long)]
    force: bool,

    /// Render every rule set as a PHP array
    #[arg(long)]
    prefer_array_rules: bool,

    /// Also generate a factory
    #[arg(short, long)]
    factory: bool,

    /// Also generate a create-table migration
    #[arg(short, long)]
    migration: bool,

    /// Also generate a seeder
    #[arg(short, long)]
    seed: bool,

    /// Also generate a controller
    #[arg(short, long)]
    controller: bool,

    /// Also generate a resource controller
    #[arg(short, long)]
    resource: bool,

    /// Generate every companion file
    #[arg(short, long)]
    all: bool,

    /// Answer yes to every confirmation
    #[arg(short, long, conflicts_with = "no_interaction")]
    yes: bool,

    /// Take the default answer of every question
    #[arg(short, long)]
    no_interaction: bool,

    /// Generator configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project root
    #[arg(long, default_value = ".")]
    base_path: PathBuf,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[arg(long, env = "DB_TABLE_PREFIX")]
    table_prefix: Option<String>,
}

impl Cli {
    fn companions(&self) -> CompanionOptions {
        if self.all {
            return CompanionOptions::all();
        }
        CompanionOptions {
            factory: self.factory,
            migration: self.migration,
            seeder: self.seed,
            controller: self.controller,
            resource: self.resource,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut config = GeneratorConfig::load(&cli.base_path, cli.config.as_deref())?;
    if let Some(prefix) = &cli.table_prefix {
        config.table_prefix = prefix.clone();
    }

    let connection = ConnectionConfig::resolve(cli.database_url.clone())?;
    let client = MySqlClient::connect(&connection).await?;

    let options = MakeModelOptions {
        names: cli.names.clone(),
        base_path: cli.base_path.clone(),
        dir: cli.dir.clone(),
        raw: cli.raw,
        overwrite: cli.overwrite,
        force: cli.force,
        prefer_array_rules: cli.prefer_array_rules,
        companions: cli.companions(),
        timestamp: chrono::Local::now().naive_local(),
    };

    let mut prompt: Box<dyn Prompt> = if cli.yes || cli.no_interaction {
        Box::new(PolicyPrompt {
            answer_yes: cli.yes,
        })
    } else {
        Box::new(ConsolePrompt::stdio())
    };
    let mut stdout = io::stdout();

    let summary = MakeModelCommand::new(&client, &config, options, prompt.as_mut(), &mut stdout)
        .run()
        .await;

    let failed = summary.failures().count();
    log::info!(
        "Done: {} created, {} updated, {} skipped, {} failed",
        summary.count(WriteOutcome::Created),
        summary.count(WriteOutcome::Updated),
        summary.count(WriteOutcome::Skipped),
        failed
    );

    Ok(())
}
