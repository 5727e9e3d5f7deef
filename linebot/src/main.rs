use std::{fs::File, io, path::PathBuf, sync::Mutex};

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LinebotConfig;
use crate::display::{PanelDisplay, TerminalDisplay};
use crate::plain::LoopOptions;
use crate::sim::{ScenarioFile, build_robot};

mod config;
mod display;
mod plain;
mod replay;
mod sim;
mod tui;

const DEFAULT_LOG_FILTER: &str = "linebot=info,linebot_core=info";

#[derive(Debug, Parser)]
#[command(author, version, about = "Line-following robot controller on simulated hardware")]
struct Cli {
    /// Config file. Defaults to the per-user config when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scenario file played by the simulated sensors.
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the control loop until interrupted.
    Run {
        /// Print the report to stdout instead of drawing the TUI.
        #[arg(long)]
        plain: bool,
        #[arg(long)]
        cycles: Option<u64>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Decide once per scenario frame, without pacing, and print a table.
    Replay,
    /// Print the effective configuration.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = LinebotConfig::discover(cli.config.as_deref())?;
    if let Some(scenario) = cli.scenario {
        config.scenario = Some(scenario);
    }

    match cli.command {
        Commands::Run {
            plain,
            cycles,
            interval_ms,
        } => {
            if let Some(interval_ms) = interval_ms {
                config.run.interval_ms = interval_ms;
            }
            let options = LoopOptions {
                interval: config.run.interval(),
                cycles,
            };
            let feed = load_scenario(&config)?.into_feed(config.line_sensor.threshold);

            if plain {
                color_eyre::install()?;
                init_tracing_stderr();
                let robot = build_robot(&feed, config.motors, TerminalDisplay::new(io::stdout()));
                plain::run(robot, feed, options)
            } else {
                init_tracing_file(&config)?;
                let robot = build_robot(&feed, config.motors, PanelDisplay::default());
                tui::run(robot, feed, options)
            }
        }
        Commands::Replay => {
            color_eyre::install()?;
            init_tracing_stderr();
            let scenario = load_scenario(&config)?;
            replay::replay(
                &scenario,
                config.motors,
                config.line_sensor.threshold,
                &mut io::stdout().lock(),
            )
        }
        Commands::Config => {
            color_eyre::install()?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_scenario(config: &LinebotConfig) -> Result<ScenarioFile> {
    match &config.scenario {
        Some(path) => ScenarioFile::load(path),
        None => ScenarioFile::load_builtin(),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to a file instead.
fn init_tracing_file(config: &LinebotConfig) -> Result<()> {
    let path = &config.run.log_file;
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    info!(log_file = %path.display(), "logging to file");
    Ok(())
}
