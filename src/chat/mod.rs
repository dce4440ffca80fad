//! Interactive chat REPL for freechat.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, completion, hints). The full conversation history is
//! sent with each request so the model keeps context across turns.

mod commands;
mod history;
mod turn;

use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::config::Config;
use crate::constants::APP_VERSION;
use crate::format;
use crate::models::ModelCatalog;
use crate::output::{Console, Tone};
use crate::prompts::PromptLibrary;
use crate::provider::ProviderFactory;
use crate::session::Session;
use crate::tokens;

use commands::{Command, CommandAction};
use turn::{TurnError, TurnReport};

/// Everything the REPL and its commands operate on.
pub(crate) struct ChatContext {
    pub session: Session,
    /// Active `provider/model` identifier.
    pub model: String,
    pub factory: ProviderFactory,
    pub prompts: PromptLibrary,
    pub default_prompt: String,
    pub sessions_dir: PathBuf,
    pub console: Console,
}

impl ChatContext {
    /// A new session seeded with the default prompt, or none if it is missing.
    pub fn fresh_session(&self) -> Session {
        Session::from_library(&self.prompts, &self.default_prompt).unwrap_or_else(Session::empty)
    }
}

/// Command-line choices that override the config for this run.
#[derive(Debug, Clone, Default)]
pub struct ChatOverrides {
    pub model: Option<String>,
    pub prompt: Option<String>,
}

/// Tab completion and history hints for the input line.
struct ChatHelper {
    models: Vec<String>,
    prompts: Vec<String>,
    hinter: HistoryHinter,
}

impl ChatHelper {
    fn new(catalog: &ModelCatalog, prompts: &PromptLibrary) -> Self {
        Self {
            models: catalog.qualified_ids(),
            prompts: prompts.names().map(str::to_string).collect(),
            hinter: HistoryHinter::new(),
        }
    }

    /// Candidates for the word being typed, given the words before it.
    fn candidates(&self, preceding: &[&str]) -> Vec<String> {
        match preceding {
            [] => Command::ALL.iter().map(|c| c.name().to_string()).collect(),
            [first] => match Command::from_name(first) {
                Some(Command::Model) => self.models.clone(),
                Some(command @ Command::Prompt) => command
                    .arguments()
                    .iter()
                    .map(|a| a.to_string())
                    .chain(self.prompts.iter().cloned())
                    .collect(),
                Some(command) => command.arguments().iter().map(|a| a.to_string()).collect(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = word_start(before);
        let word = before[start..].to_lowercase();
        let preceding: Vec<&str> = before[..start].split_whitespace().collect();

        let matches = self
            .candidates(&preceding)
            .into_iter()
            .filter(|c| c.to_lowercase().starts_with(&word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((start, matches))
    }
}

/// Byte offset where the last whitespace-separated word of `text` begins.
fn word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ChatHelper {}

impl Helper for ChatHelper {}

/// Runs the interactive chat REPL.
///
/// Builds providers from the configured credentials, lists their models
/// concurrently, then enters a readline loop. Each input line is either a
/// slash command or a prompt sent with the whole session history.
///
/// # Readline behavior
///
/// - **Ctrl+C** / **Ctrl+D**: exit with "Goodbye!", also while a reply is
///   streaming (the unfinished turn is discarded)
/// - History is appended to `history.txt` in the config directory after
///   every submitted line, one raw entry per line
pub async fn run_chat(config: Config, overrides: ChatOverrides) -> Result<()> {
    let mut factory = ProviderFactory::from_credentials(&config.settings.providers)?;
    let mut console = Console::stdout();

    console.line(Tone::Heading, &format!("FreeChat v{APP_VERSION}"));
    console.line(Tone::Dim, "Type /help for commands, /exit to quit.");

    if factory.is_empty() {
        console.warn(&format!(
            "No providers configured. Add API keys to {}",
            config.paths.config.display()
        ));
    }

    console.line(Tone::Dim, "Fetching available models...");
    let Some(catalog) = until_interrupted(factory.fetch_models(), tokio::signal::ctrl_c()).await
    else {
        console.newline();
        console.line(Tone::Heading, "Goodbye!");
        return Ok(());
    };
    console.line(
        Tone::Dim,
        &format!(
            "Found {} models across {} providers.",
            catalog.total(),
            factory.provider_names().len()
        ),
    );

    if !tokens::tokenizer_available() {
        console.warn("Tokenizer unavailable. Costs will be underestimated.");
    }

    let model = overrides
        .model
        .unwrap_or_else(|| config.settings.general.default_model.clone());
    if factory.resolve(&model).is_none() {
        console.warn(&format!(
            "Model '{model}' has no configured provider. Use /model to pick another."
        ));
    }

    let default_prompt = overrides
        .prompt
        .unwrap_or_else(|| config.settings.general.default_prompt.clone());
    if config.prompts.get(&default_prompt).is_none() {
        console.warn(&format!(
            "Prompt '{default_prompt}' not found. Starting without a system prompt."
        ));
    }

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new(&catalog, &config.prompts)));
    match history::load(&config.paths.history) {
        Ok(entries) => {
            for entry in entries {
                let _ = rl.add_history_entry(entry);
            }
        }
        Err(e) => tracing::debug!("no readline history loaded: {e:#}"),
    }

    let mut ctx = ChatContext {
        session: Session::empty(),
        model,
        factory,
        prompts: config.prompts,
        default_prompt,
        sessions_dir: config.paths.sessions.clone(),
        console,
    };
    ctx.session = ctx.fresh_session();

    loop {
        ctx.console.newline();
        ctx.console.line(
            Tone::Dim,
            &format::format_status_line(&ctx.session.prompt_name, &ctx.model, ctx.session.cost),
        );

        let line = match rl.readline(&format!("{} ", "You:".cyan().bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                ctx.console.error(&e.to_string());
                break;
            }
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        ctx.console.record(Tone::User, "You: ");
        ctx.console.record(Tone::Plain, &format!("{line}\n"));
        let _ = rl.add_history_entry(line.as_str());
        if let Err(e) = history::append(&config.paths.history, &line) {
            tracing::warn!("failed to append history: {e:#}");
        }

        if line.starts_with('/') {
            match commands::handle_slash_command(&line, &mut ctx)? {
                CommandAction::Continue => continue,
                CommandAction::Exit => break,
                CommandAction::Unknown(cmd) => {
                    ctx.console
                        .warn(&format!("Unknown command: {cmd}. Type /help."));
                    continue;
                }
            }
        }

        ctx.console.write(Tone::Assistant, "AI: ");
        match interruptible_turn(&mut ctx, &line, tokio::signal::ctrl_c()).await {
            Some(Ok(report)) => ctx.console.line(
                Tone::Dim,
                &format::format_turn_footer(report.elapsed, report.cost),
            ),
            Some(Err(e)) => {
                // The error itself was already rendered by the turn.
                if let Some(hint) = auth_hint(&e, &config.paths.config) {
                    ctx.console.warn(&hint);
                }
            }
            None => {
                ctx.console.newline();
                break;
            }
        }
    }

    ctx.console.line(Tone::Heading, "Goodbye!");
    Ok(())
}

/// Drives `work` to completion, or returns `None` once `interrupt` resolves.
async fn until_interrupted<F: Future, I: Future>(work: F, interrupt: I) -> Option<F::Output> {
    tokio::select! {
        output = work => Some(output),
        _ = interrupt => None,
    }
}

/// Runs one turn unless `interrupt` resolves first.
///
/// An interrupted turn returns `None` and leaves the session at its pre-turn
/// length.
async fn interruptible_turn<I: Future>(
    ctx: &mut ChatContext,
    prompt: &str,
    interrupt: I,
) -> Option<Result<TurnReport, TurnError>> {
    let before = ctx.session.len();
    let turn = turn::run_turn(
        &mut ctx.session,
        &ctx.factory,
        &ctx.model,
        prompt,
        &mut ctx.console,
    );
    let outcome = until_interrupted(turn, interrupt).await;
    if outcome.is_none() {
        tracing::debug!("turn interrupted");
        ctx.session.rollback_to(before);
    }
    outcome
}

/// Extra guidance when a provider rejected the credentials.
fn auth_hint(err: &TurnError, config_path: &Path) -> Option<String> {
    match err {
        TurnError::Provider(e) if matches!(e.status(), Some(401 | 403)) => Some(format!(
            "Check the API key for this provider in {}",
            config_path.display()
        )),
        _ => None,
    }
}
