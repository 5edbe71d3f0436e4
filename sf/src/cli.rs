//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Skillfolio - terminal skills portfolio
#[derive(Parser)]
#[command(
    name = "sf",
    about = "Terminal skills portfolio with a cursor glow, parallax and a live skill index",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Directory holding the store and logs (overrides config)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute; the TUI runs when none is given
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the skill list
    Skills {
        #[command(subcommand)]
        command: SkillsCommand,
    },

    /// Inspect or change the slider index
    Gauge {
        #[command(subcommand)]
        command: GaugeCommand,
    },
}

/// Skill list subcommands
#[derive(Debug, Subcommand)]
pub enum SkillsCommand {
    /// List all skills
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a skill, prompting for anything not given
    Add {
        /// Skill title
        #[arg(short, long)]
        title: Option<String>,

        /// Skill description
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Slider index subcommands
#[derive(Debug, Subcommand)]
pub enum GaugeCommand {
    /// Show every slider, the average and the level
    Show {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Set a slider value (0-100)
    Set {
        /// Slider id
        id: String,

        /// New value
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
}

/// Output format for listing commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["sf"]);
        assert!(cli.command.is_none());
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_cli_parse_skills_add() {
        let cli = Cli::parse_from(["sf", "skills", "add", "--title", "Go", "-d", "Goroutines"]);
        if let Some(Command::Skills {
            command: SkillsCommand::Add { title, description },
        }) = cli.command
        {
            assert_eq!(title.as_deref(), Some("Go"));
            assert_eq!(description.as_deref(), Some("Goroutines"));
        } else {
            panic!("Expected Skills Add command");
        }
    }

    #[test]
    fn test_cli_parse_skills_list_json() {
        let cli = Cli::parse_from(["sf", "skills", "list", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Some(Command::Skills {
                command: SkillsCommand::List {
                    format: OutputFormat::Json
                }
            })
        ));
    }

    #[test]
    fn test_cli_parse_gauge_set() {
        let cli = Cli::parse_from(["sf", "gauge", "set", "rust", "80"]);
        if let Some(Command::Gauge {
            command: GaugeCommand::Set { id, value },
        }) = cli.command
        {
            assert_eq!(id, "rust");
            assert_eq!(value, 80);
        } else {
            panic!("Expected Gauge Set command");
        }
    }

    #[test]
    fn test_cli_rejects_out_of_range_value() {
        assert!(Cli::try_parse_from(["sf", "gauge", "set", "rust", "101"]).is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sf", "gauge", "show", "--data-dir", "/tmp/sf", "-c", "/tmp/sf.yml"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/sf")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sf.yml")));
    }
}
