//! Command-line interface for symptrack.
//!
//! This module provides the CLI structure for the `symptrack` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FlagsCommand, OutputFormat, StatusCommand, SubmitArgs, SurveyCommand,
    SymptomsCommand, ToggleState,
};

use crate::logging::Verbosity;

/// symptrack - Track the symptoms you care about
///
/// Choose which symptom categories to follow, add your own, and walk the
/// daily survey built from that selection.
#[derive(Debug, Parser)]
#[command(name = "symptrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show storage and selection status
    Status(StatusCommand),

    /// View or change the tracked symptoms
    #[command(subcommand)]
    Symptoms(SymptomsCommand),

    /// Inspect the active survey
    #[command(subcommand)]
    Survey(SurveyCommand),

    /// List the registered navigation routes
    Routes,

    /// View or set the stored device flags
    #[command(subcommand)]
    Flags(FlagsCommand),

    /// Delete every stored record
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "symptrack");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["symptrack", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_symptoms_toggle() {
        let cli = Cli::try_parse_from(["symptrack", "symptoms", "toggle", "pain", "off"]).unwrap();
        match cli.command {
            Command::Symptoms(SymptomsCommand::Toggle { category, state }) => {
                assert_eq!(category, "pain");
                assert_eq!(state, ToggleState::Off);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["symptrack", "symptoms", "toggle", "sleep"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Symptoms(SymptomsCommand::Toggle {
                state: ToggleState::On,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_symptoms_add() {
        let cli = Cli::try_parse_from(["symptrack", "symptoms", "add", "migraine"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Symptoms(SymptomsCommand::Add { ref name }) if name == "migraine"
        ));
    }

    #[test]
    fn test_parse_symptoms_submit_with_date() {
        let cli = Cli::try_parse_from([
            "symptrack",
            "symptoms",
            "submit",
            "--redirect",
            "survey",
            "--date",
            "2024-05-17",
        ])
        .unwrap();
        match cli.command {
            Command::Symptoms(SymptomsCommand::Submit(args)) => {
                assert_eq!(args.redirect.as_deref(), Some("survey"));
                assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2024, 5, 17));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_date_rejected() {
        assert!(
            Cli::try_parse_from(["symptrack", "symptoms", "submit", "--date", "17/05"]).is_err()
        );
    }

    #[test]
    fn test_parse_survey_question() {
        let cli = Cli::try_parse_from(["symptrack", "survey", "question", "2", "--full"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Survey(SurveyCommand::Question {
                index: 2,
                full: true,
                json: false
            })
        ));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["symptrack", "flags", "supported", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Flags(FlagsCommand::Supported { value: false })
        ));
    }

    #[test]
    fn test_parse_reset() {
        let cli = Cli::try_parse_from(["symptrack", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Reset { yes: true }));
    }

    #[test]
    fn test_parse_routes() {
        let cli = Cli::try_parse_from(["symptrack", "routes"]).unwrap();
        assert!(matches!(cli.command, Command::Routes));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["symptrack", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["symptrack", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["symptrack", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
