//! mapwidgets - keyboard-driven list, pile and command line widgets
//!
//! The binary hosts the demo application and a couple of maintenance
//! subcommands:
//! - `run` (default): the demo, a titled pile of entries under a command frame
//! - `config path|show`: locate or print the effective configuration
//! - `completions <shell>`: shell completion scripts

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use mapwidgets_tui::config::{WidgetsConfig, CONFIG_ENV};
use mapwidgets_tui::terminal;
use mapwidgets_tui::tracing_setup::{self, LogTarget, TracingConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "mapwidgets",
    author,
    version,
    about = "Keyboard-driven list, pile and command line widgets for the terminal"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.mapwidgets/config.toml)
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file while the demo runs
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the demo (default)
    Run,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let config_path = cli.config.unwrap_or_else(WidgetsConfig::config_path);

    match command {
        Commands::Run => {
            let config = WidgetsConfig::load_from(&config_path)?;
            let target = match cli.log_file.or_else(|| config.logging.file.clone()) {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Discard,
            };
            tracing_setup::init(&TracingConfig {
                debug: cli.debug,
                level: config.logging.level.clone(),
                target,
            })?;
            info!(config = %config_path.display(), "starting demo");
            terminal::run(&config)?;
        }
        Commands::Config { action } => {
            tracing_setup::init(&TracingConfig {
                debug: cli.debug,
                level: None,
                target: LogTarget::Stderr,
            })?;
            match action {
                ConfigAction::Path => println!("{}", config_path.display()),
                ConfigAction::Show => {
                    let config = WidgetsConfig::load_from(&config_path)?;
                    print!("{}", config.to_toml()?);
                }
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
        }
    }

    Ok(())
}
