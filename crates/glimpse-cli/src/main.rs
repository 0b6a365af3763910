//! Glimpse CLI - Describe photos with a generative vision model
//!
//! Usage:
//!   glimpse analyze photo.jpg         Describe a photo and list its key features
//!   glimpse parse reply.txt           Normalize a saved model reply offline
//!   glimpse check                     Check the vision backend is reachable
//!   glimpse config set-language ko    Save the preferred language

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let settings = cli.settings.as_deref();

    match cli.command {
        Commands::Analyze {
            image,
            lang,
            backend,
            model,
            hint,
            json,
            yes,
        } => {
            commands::cmd_analyze(
                settings,
                commands::AnalyzeOptions {
                    image: &image,
                    language: lang,
                    backend: backend.as_deref(),
                    model: model.as_deref(),
                    hint: hint.as_deref(),
                    json,
                    yes,
                },
            )
            .await
        }
        Commands::Parse { file, lang, json } => {
            commands::cmd_parse(settings, file.as_deref(), lang, json)
        }
        Commands::Check { backend } => commands::cmd_check(settings, backend.as_deref()).await,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::cmd_config_show(settings),
            ConfigAction::SetLanguage { language } => {
                commands::cmd_config_set_language(settings, language)
            }
            ConfigAction::SetBackend { backend } => {
                commands::cmd_config_set_backend(settings, &backend)
            }
            ConfigAction::Path => commands::cmd_config_path(settings),
        },
        Commands::Prompts { action } => match action {
            Some(PromptsAction::Show { lang }) => commands::cmd_prompts_show(lang),
            Some(PromptsAction::Path) | None => commands::cmd_prompts_path(),
        },
    }
}
