//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glimpse_core::Language;

/// Glimpse - Describe photos with a generative vision model
#[derive(Parser)]
#[command(name = "glimpse")]
#[command(about = "Describe photos and list their key features using AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to ~/.config/glimpse/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an image with the configured vision backend
    Analyze {
        /// Image file (JPEG, PNG, GIF or WEBP)
        image: PathBuf,

        /// Reply language: en, ko (defaults to the saved preference)
        #[arg(short, long)]
        lang: Option<Language>,

        /// Vision backend: gemini, openai_compatible, mock
        /// (defaults to the saved preference, then AI_BACKEND)
        #[arg(short, long)]
        backend: Option<String>,

        /// Override the backend's model name
        #[arg(long)]
        model: Option<String>,

        /// Short hint about what the photo shows
        #[arg(long)]
        hint: Option<String>,

        /// Print the analysis report as JSON
        #[arg(long)]
        json: bool,

        /// Retry failed attempts without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Normalize a raw model reply (from a file or stdin) without calling any service
    Parse {
        /// File containing the raw reply (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Heading language for text output (defaults to the saved preference)
        #[arg(short, long)]
        lang: Option<Language>,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the vision backend is reachable
    Check {
        /// Vision backend to check (defaults to the configured one)
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Inspect the prompt sent to the vision model
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current settings
    Show,

    /// Set the reply and message language
    SetLanguage {
        /// Language code: en, ko
        language: Language,
    },

    /// Set the preferred vision backend
    SetBackend {
        /// Backend name: gemini, openai_compatible, mock
        backend: String,
    },

    /// Show the settings file path
    Path,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// Show the rendered image-description prompt
    Show {
        /// Language to render the prompt for
        #[arg(short, long, default_value = "en")]
        lang: Language,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
