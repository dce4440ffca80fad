//! Command-line interface definition and dispatch for freechat.
//!
//! Uses [`clap`] for argument parsing with derive macros. Running without a
//! subcommand starts the chat REPL.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::chat::{self, ChatOverrides};
use crate::config::{Config, ConfigPaths, Loaded};
use crate::provider;

/// Top-level CLI structure for freechat.
#[derive(Parser)]
#[command(
    name = "freechat",
    version,
    about = "A multi-provider AI chat client for the terminal"
)]
pub struct Cli {
    /// Use this config directory instead of the default location
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Model to start with, as provider/model (overrides config)
    #[arg(short, long, global = true, value_name = "ID")]
    pub model: Option<String>,

    /// System prompt to start with (overrides config)
    #[arg(short, long, global = true, value_name = "NAME")]
    pub prompt: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the freechat CLI.
///
/// The `///` doc comments on variants double as `--help` text.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// List available models of every configured provider
    Models,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show file locations and settings, with API keys masked
    Show,
    /// Print the config directory
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
///
/// Missing config files are created first; in that case the user is told to
/// add credentials and nothing else runs.
pub async fn run(cli: Cli) -> Result<()> {
    let paths = ConfigPaths::resolve(cli.config_dir.as_deref())?;
    tracing::debug!(dir = %paths.dir.display(), portable = paths.portable, "config directory");

    if let Some(Commands::Config {
        action: ConfigAction::Path,
    }) = cli.command
    {
        println!("{}", paths.dir.display());
        return Ok(());
    }

    if paths.portable {
        println!(
            "{} using config directory {}",
            "Portable mode:".bold(),
            paths.dir.display()
        );
    }

    let config = match Config::load(paths)? {
        Loaded::Ready(config) => config,
        Loaded::FirstRun(created) => {
            for path in created {
                println!("{} {}", "Created".green().bold(), path.display());
            }
            println!("Please add API keys to config.toml and restart.");
            return Ok(());
        }
    };

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let overrides = ChatOverrides {
                model: cli.model,
                prompt: cli.prompt,
            };
            chat::run_chat(config, overrides).await
        }
        Commands::Models => provider::list_models(&config).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => show_config(&config),
            ConfigAction::Path => Ok(()),
        },
    }
}

fn show_config(config: &Config) -> Result<()> {
    let paths = &config.paths;
    println!("{} {}", "Config dir:".bold(), paths.dir.display());
    println!("{} {}", "Settings:".bold(), paths.config.display());
    println!("{} {}", "Prompts:".bold(), paths.prompts.display());
    println!("{} {}", "History:".bold(), paths.history.display());
    println!("{} {}", "Exports:".bold(), paths.sessions.display());
    println!();
    println!("{}", toml::to_string_pretty(&config.settings.masked())?);

    let names: Vec<&str> = config.prompts.names().collect();
    println!("{} {}", "Prompts:".bold(), names.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_chat() {
        let cli = Cli::try_parse_from(["freechat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "freechat",
            "-m",
            "gemini/gemini-pro",
            "--prompt",
            "coder",
            "--config-dir",
            "/tmp/fc",
            "chat",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Chat)));
        assert_eq!(cli.model.as_deref(), Some("gemini/gemini-pro"));
        assert_eq!(cli.prompt.as_deref(), Some("coder"));
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/fc")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["freechat", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Show
            })
        ));
        assert!(Cli::try_parse_from(["freechat", "config"]).is_err());
    }

    #[tokio::test]
    async fn test_first_run_bootstraps_and_returns() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "freechat",
            "--config-dir",
            dir.path().to_str().unwrap(),
            "models",
        ])
        .unwrap();
        run(cli).await.unwrap();
        assert!(dir.path().join("config.toml").is_file());
        assert!(dir.path().join("prompts.toml").is_file());
    }
}
