pub mod commands;
pub mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kibble_core::config::LoadOptions;
use kibble_core::AppConfig;
use tracing::info_span;
use uuid::Uuid;

use crate::commands::catalog::CatalogArgs;
use crate::commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "kibble",
    about = "Kibble dog food recommendation CLI",
    long_about = "Score a food catalog against a dog's profile, browse the catalog, and inspect effective configuration.",
    after_help = "Examples:\n  kibble recommend --name Daisy --breed Beagle --age 3 --weight 12\n  kibble recommend --profile daisy.json --max 5 --no-explanations\n  kibble catalog --age-range puppy --indicator grain_free\n  kibble config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to kibble.toml or config/kibble.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank catalog foods for a pet profile with reasons and explanations")]
    Recommend(RecommendArgs),
    #[command(about = "List catalog products matching every given filter")]
    Catalog(CatalogArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    init_logging_for(config_path);

    let correlation_id = Uuid::new_v4().simple().to_string();
    let span = info_span!("kibble", correlation_id = %correlation_id);
    let _entered = span.enter();

    let result = match &cli.command {
        Command::Recommend(args) => commands::recommend::run(args, config_path),
        Command::Catalog(args) => commands::catalog::run(args, config_path),
        Command::Config => commands::config::run(config_path),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Bad config still gets default logging; the command itself reports the error.
fn init_logging_for(config_path: Option<&Path>) {
    let config = AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    })
    .unwrap_or_default();
    logging::init_logging(&config);
}
