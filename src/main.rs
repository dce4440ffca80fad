//! Entry point for freechat, a multi-provider AI chat client for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! installs the log subscriber and dispatches to the chosen subcommand.

mod chat;
mod cli;
mod config;
mod constants;
mod export;
mod format;
mod message;
mod models;
mod output;
mod prompts;
mod provider;
mod session;
mod tokens;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the freechat CLI.
///
/// Loads `.env` files (silently ignored if absent). Logs go to stderr and
/// follow `RUST_LOG` when set; otherwise only warnings, or everything at
/// debug level with `--verbose`.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    init_tracing(cli.verbose);
    cli::run(cli).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
