//! Slash command handlers for the chat REPL.
//!
//! Parses `/help`, `/model`, `/prompt`, `/session`, `/export`, `/clear` and
//! `/exit`. Returns a [`CommandAction`] so the REPL loop can decide how to
//! proceed.

use anyhow::Result;

use crate::export::{self, ExportFormat};
use crate::format;
use crate::output::Tone;
use crate::session::Session;

use super::ChatContext;

/// Every command the REPL understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Model,
    Prompt,
    Session,
    Export,
    Clear,
    Exit,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Help,
        Command::Model,
        Command::Prompt,
        Command::Session,
        Command::Export,
        Command::Clear,
        Command::Exit,
    ];

    pub fn from_name(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == word)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "/help",
            Command::Model => "/model",
            Command::Prompt => "/prompt",
            Command::Session => "/session",
            Command::Export => "/export",
            Command::Clear => "/clear",
            Command::Exit => "/exit",
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            Command::Help => "/help",
            Command::Model => "/model <provider/model>",
            Command::Prompt => "/prompt [view|list|<name>]",
            Command::Session => "/session [new|name <name>]",
            Command::Export => "/export <md|json|html|md-rendered>",
            Command::Clear => "/clear",
            Command::Exit => "/exit",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Command::Help => "show this help",
            Command::Model => "show or switch the active model",
            Command::Prompt => "view, list or apply a system prompt",
            Command::Session => "start over or name the session",
            Command::Export => "save the session to the sessions directory",
            Command::Clear => "clear the screen",
            Command::Exit => "exit (also Ctrl+C / Ctrl+D)",
        }
    }

    /// Words accepted as this command's first argument, for completion.
    pub fn arguments(&self) -> &'static [&'static str] {
        match self {
            Command::Prompt => &["view", "list"],
            Command::Session => &["new", "name"],
            Command::Export => &["md", "json", "html", "md-rendered"],
            _ => &[],
        }
    }
}

/// Action returned by slash command handling.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CommandAction {
    /// Command was handled; continue the REPL loop.
    Continue,
    /// The user asked to leave.
    Exit,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command line.
///
/// Failures the user can fix (bad model id, unknown prompt, export IO) are
/// printed and leave state untouched; they never end the REPL.
pub(crate) fn handle_slash_command(line: &str, ctx: &mut ChatContext) -> Result<CommandAction> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(CommandAction::Continue);
    };
    let args: Vec<&str> = words.collect();

    let Some(command) = Command::from_name(first) else {
        return Ok(CommandAction::Unknown(first.to_string()));
    };

    match command {
        Command::Help => show_help(ctx),
        Command::Model => switch_model(ctx, &args),
        Command::Prompt => prompt_command(ctx, &args),
        Command::Session => session_command(ctx, &args),
        Command::Export => export_command(ctx, &args),
        Command::Clear => ctx.console.clear_screen()?,
        Command::Exit => return Ok(CommandAction::Exit),
    }
    Ok(CommandAction::Continue)
}

fn show_help(ctx: &mut ChatContext) {
    ctx.console.line(Tone::Heading, "Commands:");
    for command in Command::ALL {
        ctx.console.write(Tone::Plain, "  ");
        ctx.console
            .write(Tone::Accent, &format::pad(command.usage(), 38));
        ctx.console.line(Tone::Plain, command.description());
    }
}

fn switch_model(ctx: &mut ChatContext, args: &[&str]) {
    let Some(id) = args.first() else {
        ctx.console
            .line(Tone::Plain, &format!("Current model: {}", ctx.model));
        ctx.console
            .line(Tone::Dim, &format!("Usage: {}", Command::Model.usage()));
        return;
    };

    if ctx.factory.resolve(id).is_none() {
        ctx.console.error(&format!(
            "Invalid model '{id}'. Use provider/model with one of: {}",
            ctx.factory.provider_names().join(", ")
        ));
        return;
    }
    ctx.model = id.to_string();
    tracing::debug!(model = %ctx.model, "switched model");
    ctx.console.success(&format!("Model switched to: {id}"));
}

fn prompt_command(ctx: &mut ChatContext, args: &[&str]) {
    match args.first().copied() {
        None | Some("view") => match ctx.session.system_prompt() {
            Some(content) => {
                let header = format!("Active prompt: {}", ctx.session.prompt_name);
                let content = content.to_string();
                ctx.console.line(Tone::Heading, &header);
                ctx.console.line(Tone::Plain, &content);
            }
            None => ctx.console.line(Tone::Dim, "No system prompt active."),
        },
        Some("list") => {
            let previews: Vec<(String, String)> = ctx
                .prompts
                .previews()
                .into_iter()
                .map(|(n, p)| (n.to_string(), p.to_string()))
                .collect();
            if previews.is_empty() {
                ctx.console.line(Tone::Dim, "No prompts defined.");
            }
            for (name, preview) in previews {
                ctx.console.write(Tone::Accent, &format::pad(&name, 16));
                ctx.console.line(Tone::Dim, &preview);
            }
        }
        Some(name) => match Session::from_library(&ctx.prompts, name) {
            Some(session) => {
                ctx.session = session;
                ctx.console.success(&format!(
                    "Switched to prompt '{name}'. New session started."
                ));
            }
            None => ctx.console.error(&format!("Prompt '{name}' not found.")),
        },
    }
}

fn session_command(ctx: &mut ChatContext, args: &[&str]) {
    match args {
        ["new"] => {
            ctx.session = ctx.fresh_session();
            ctx.console.success("New session started.");
        }
        ["name", rest @ ..] if !rest.is_empty() => {
            let name = rest.join(" ");
            ctx.console
                .success(&format!("Session name set to: {name}"));
            ctx.session.name = Some(name);
        }
        _ => ctx
            .console
            .line(Tone::Dim, &format!("Usage: {}", Command::Session.usage())),
    }
}

fn export_command(ctx: &mut ChatContext, args: &[&str]) {
    let Some(format) = args.first().and_then(|a| ExportFormat::from_name(a)) else {
        ctx.console.error(&format!(
            "Usage: /export <{}>",
            ExportFormat::USAGE
        ));
        return;
    };
    match export::write_export(
        &ctx.sessions_dir,
        format,
        &ctx.session,
        ctx.console.transcript(),
    ) {
        Ok(path) => ctx
            .console
            .success(&format!("Session exported to {}", path.display())),
        Err(e) => ctx.console.error(&format!("Export failed: {e:#}")),
    }
}
