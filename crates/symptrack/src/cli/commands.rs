//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::navigation::SymptomScreenParams;

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Symptom selection commands.
#[derive(Debug, Subcommand)]
pub enum SymptomsCommand {
    /// Show the symptom selection screen
    Show {
        /// Include the onboarding hint
        #[arg(long)]
        explain: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Track or stop tracking a category, then save
    Toggle {
        /// Category id (built-in or custom)
        category: String,

        /// New state of the checkbox
        #[arg(value_enum, default_value = "on")]
        state: ToggleState,
    },

    /// Create a custom symptom, track it, then save
    Add {
        /// Name of the new symptom
        name: String,
    },

    /// Save the current selection and print where the app navigates
    Submit(SubmitArgs),
}

/// Arguments of `symptoms submit`.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Open a survey question after saving (`0` for no survey context)
    #[arg(short, long)]
    pub redirect: Option<String>,

    /// Day the started survey is for (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

impl SubmitArgs {
    /// Route parameters for the symptom screen.
    #[must_use]
    pub fn params(&self) -> SymptomScreenParams {
        SymptomScreenParams {
            redirect: self.redirect.clone(),
            date: self.date,
            ..SymptomScreenParams::default()
        }
    }
}

/// Checkbox state argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleState {
    /// Track the category
    On,
    /// Stop tracking the category
    Off,
}

impl From<ToggleState> for bool {
    fn from(state: ToggleState) -> Self {
        state == ToggleState::On
    }
}

/// Survey commands.
#[derive(Debug, Subcommand)]
pub enum SurveyCommand {
    /// List the questions of the active survey
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Show one question of the active survey
    Question {
        /// Position in the active survey
        index: usize,

        /// Show the whole explanation
        #[arg(long)]
        full: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Device flag commands.
#[derive(Debug, Subcommand)]
pub enum FlagsCommand {
    /// Show the stored flags
    Show,

    /// Set the first-launch flag
    FirstLaunch {
        /// New value
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },

    /// Set the supported-device flag
    Supported {
        /// New value
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
