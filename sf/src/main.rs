use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use keystore::{FileStore, Storage};
use skillfolio::cli::{Cli, Command, GaugeCommand, OutputFormat, SkillsCommand};
use skillfolio::gauge::Gauge;
use skillfolio::skills::{AddOutcome, SkillsStore};
use skillfolio::{Config, tui};

fn setup_logging(log_dir: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("skillfolio.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging so the data dir decides where logs go
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }

    setup_logging(&config.log_dir(), cli.log_level.as_deref(), config.log_level.as_deref())
        .context("Failed to setup logging")?;
    info!(data_dir = %config.data_dir.display(), "Skillfolio loaded config");

    let store_path = config.store_path();
    let mut store =
        FileStore::open(&store_path).context(format!("Failed to open store at {}", store_path.display()))?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => tui::run(&config, Box::new(store)).await,
        Some(Command::Skills { command }) => match command {
            SkillsCommand::List { format } => cmd_skills_list(&mut store, format),
            SkillsCommand::Add { title, description } => cmd_skills_add(&mut store, title, description),
        },
        Some(Command::Gauge { command }) => match command {
            GaugeCommand::Show { format } => cmd_gauge_show(&config, &store, format),
            GaugeCommand::Set { id, value } => cmd_gauge_set(&config, &mut store, &id, value),
        },
    }
}

fn cmd_skills_list(store: &mut dyn Storage, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_skills_list: called");
    let skills = SkillsStore::load(store)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(skills.skills())?),
        OutputFormat::Text => {
            for (i, skill) in skills.skills().iter().enumerate() {
                println!("{} {}", format!("{:>2}.", i + 1).dimmed(), skill.title.bright_cyan().bold());
                println!("    {}", skill.description);
            }
        }
    }
    Ok(())
}

fn cmd_skills_add(store: &mut dyn Storage, title: Option<String>, description: Option<String>) -> Result<()> {
    debug!(?title, ?description, "cmd_skills_add: called");
    let mut skills = SkillsStore::load(store)?;

    let mut editor: Option<DefaultEditor> = None;
    let Some(title) = prompt_if_missing(&mut editor, title, "Skill title")? else {
        return Ok(());
    };
    let Some(description) = prompt_if_missing(&mut editor, description, "Description")? else {
        return Ok(());
    };

    match skills.add(store, &title, &description)? {
        AddOutcome::Added(index) => {
            println!("{} Added skill #{}: {}", "✓".green(), index + 1, title.trim().cyan());
        }
        AddOutcome::Blank => debug!("cmd_skills_add: blank input, nothing added"),
    }
    Ok(())
}

/// Use `value` if given, otherwise read a line
///
/// Returns None when the prompt is interrupted or closed.
fn prompt_if_missing(editor: &mut Option<DefaultEditor>, value: Option<String>, label: &str) -> Result<Option<String>> {
    if let Some(value) = value {
        return Ok(Some(value));
    }

    if editor.is_none() {
        *editor = Some(DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?);
    }
    let Some(rl) = editor.as_mut() else {
        return Ok(None);
    };

    match rl.readline(&format!("{} ", format!("{}:", label).bright_green())) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            debug!(label, "prompt_if_missing: prompt dismissed");
            Ok(None)
        }
        Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
    }
}

fn cmd_gauge_show(config: &Config, store: &dyn Storage, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_gauge_show: called");
    let gauge = Gauge::load(&config.sliders, store)?;
    let readout = gauge.readout();

    match format {
        OutputFormat::Json => {
            let sliders: serde_json::Map<String, serde_json::Value> = gauge
                .sliders()
                .iter()
                .map(|s| (s.id.clone(), serde_json::Value::from(s.value)))
                .collect();
            let json = serde_json::json!({
                "sliders": sliders,
                "average": readout.average,
                "fill-width": readout.fill_width,
                "level": readout.level,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for slider in gauge.sliders() {
                println!("  {:<14} {:>4}  {}", slider.label, slider.output(), slider.id.dimmed());
            }
            println!();
            println!("  {:<14} {:>4}", "Average".bold(), readout.fill_width.green().bold());
            println!("  {}", readout.level.yellow());
        }
    }
    Ok(())
}

fn cmd_gauge_set(config: &Config, store: &mut dyn Storage, id: &str, value: u8) -> Result<()> {
    debug!(id, value, "cmd_gauge_set: called");
    let mut gauge = Gauge::load(&config.sliders, store)?;

    match gauge.set(store, id, value)? {
        Some(readout) => {
            println!(
                "{} {} = {}%  (average {}, {})",
                "✓".green(),
                id.cyan(),
                value,
                readout.fill_width,
                readout.level
            );
            Ok(())
        }
        None => {
            let known: Vec<&str> = gauge.sliders().iter().map(|s| s.id.as_str()).collect();
            eprintln!("{} Unknown slider: {} (known: {})", "✗".red(), id.yellow(), known.join(", "));
            std::process::exit(1);
        }
    }
}
