//! Session transcript export.
//!
//! Four formats are supported: plain markdown, the raw JSON message array,
//! an HTML capture of the terminal transcript, and an HTML document with
//! each message's markdown rendered.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pulldown_cmark::{html, CowStr, Event, Options, Parser};

use crate::constants::EXPORT_FILE_PREFIX;
use crate::message::Role;
use crate::output::{Tone, Transcript};
use crate::session::Session;

/// Export format accepted by `/export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Html,
    MarkdownRendered,
}

impl ExportFormat {
    /// Usage string listing every format name.
    pub const USAGE: &'static str = "md|json|html|md-rendered";

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "html" => Some(Self::Html),
            "md-rendered" => Some(Self::MarkdownRendered),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Html | Self::MarkdownRendered => "html",
        }
    }
}

/// Renders the export document for `format`.
pub fn render(format: ExportFormat, session: &Session, transcript: &Transcript) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(session)),
        ExportFormat::Json => serde_json::to_string_pretty(&session.messages)
            .context("Failed to serialize session"),
        ExportFormat::Html => Ok(render_transcript_html(transcript)),
        ExportFormat::MarkdownRendered => Ok(render_markdown_html(session)),
    }
}

/// `freechat_session_<name or timestamp>.<ext>`.
pub fn export_filename(format: ExportFormat, session_name: Option<&str>, timestamp: i64) -> String {
    let stem = session_name
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| timestamp.to_string());
    format!("{EXPORT_FILE_PREFIX}{stem}.{}", format.extension())
}

/// Renders and writes an export into `dir`, returning the file path.
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    session: &Session,
    transcript: &Transcript,
) -> Result<PathBuf> {
    let contents = render(format, session, transcript)?;
    let name = export_filename(format, session.name.as_deref(), chrono::Utc::now().timestamp());
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!(path = %path.display(), ?format, "exported session");
    Ok(path)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn render_markdown(session: &Session) -> String {
    let mut out = String::new();
    for msg in session.conversation() {
        let _ = write!(
            out,
            "**{}:**\n\n{}\n\n---\n\n",
            msg.role.speaker(),
            msg.text()
        );
    }
    out
}

fn tone_style(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Plain => None,
        Tone::Dim => Some("color:#808080"),
        Tone::Heading => Some("font-weight:bold"),
        Tone::Accent => Some("color:#00aaaa"),
        Tone::Success => Some("color:#00aa00;font-weight:bold"),
        Tone::Warning => Some("color:#aaaa00"),
        Tone::Error => Some("color:#cc0000;font-weight:bold"),
        Tone::User => Some("color:#00aaaa;font-weight:bold"),
        Tone::Assistant => Some("color:#aa00aa;font-weight:bold"),
    }
}

fn render_transcript_html(transcript: &Transcript) -> String {
    let mut body = String::new();
    for segment in transcript.segments() {
        let text = html_escape::encode_text(&segment.text);
        match tone_style(segment.tone) {
            Some(style) => {
                let _ = write!(body, "<span style=\"{style}\">{text}</span>");
            }
            None => body.push_str(&text),
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>FreeChat Terminal Transcript</title>
<style>
body {{ background-color: #1e1e1e; color: #d4d4d4; margin: 0; padding: 20px; }}
pre {{ font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace; white-space: pre-wrap; line-height: 1.4; }}
</style>
</head>
<body>
<pre>{body}</pre>
</body>
</html>
"#
    )
}

/// Markdown to HTML with raw HTML escaped instead of passed through.
fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(CowStr::from(raw.into_string())),
            other => other,
        });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn render_markdown_html(session: &Session) -> String {
    let mut doc = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>FreeChat Session</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif, 'Apple Color Emoji', 'Segoe UI Emoji'; max-width: 800px; margin: 0 auto; padding: 20px; }
        .message { margin-bottom: 20px; }
        .user { background-color: #f0f0f0; padding: 15px; border-radius: 5px; }
        .ai { background-color: #e3f2fd; padding: 15px; border-radius: 5px; }
        .role { font-weight: bold; margin-bottom: 5px; }
        hr { border: 0; border-top: 1px solid #eee; margin: 20px 0; }
        pre { background-color: #f5f5f5; padding: 10px; border-radius: 3px; overflow-x: auto; }
        code { font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace; }
    </style>
</head>
<body>
"#,
    );

    for msg in session.conversation() {
        let class = if msg.role == Role::User { "user" } else { "ai" };
        let _ = write!(
            doc,
            "<div class=\"message {class}\">\n<div class=\"role\">{}:</div>\n<div class=\"rendered-md\">{}</div>\n</div>\n<hr>\n",
            msg.role.speaker(),
            markdown_to_html(msg.text())
        );
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::output::Console;

    fn two_turns() -> Session {
        let mut s = Session::with_prompt("default", "You are helpful.");
        s.push(Message::user("What is **Rust**?"));
        s.push(Message::assistant("A language. <script>alert(1)</script> & more"));
        s.push(Message::user("Danke schön"));
        s.push(Message::assistant("Bitte."));
        s
    }

    #[test]
    fn test_json_mirrors_session() {
        let session = two_turns();
        let json = render(ExportFormat::Json, &session, &Transcript::default()).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session.messages);
        assert_eq!(parsed[0], Message::system("You are helpful."));
        assert!(json.contains("schön"));
    }

    #[test]
    fn test_markdown_skips_system() {
        let mut session = Session::with_prompt("default", "secret sys");
        session.push(Message::user("hi"));
        session.push(Message::assistant("hello"));
        let md = render(ExportFormat::Markdown, &session, &Transcript::default()).unwrap();
        assert_eq!(md, "**You:**\n\nhi\n\n---\n\n**AI:**\n\nhello\n\n---\n\n");
    }

    #[test]
    fn test_markdown_rendered_escapes_raw_html() {
        let doc = render(
            ExportFormat::MarkdownRendered,
            &two_turns(),
            &Transcript::default(),
        )
        .unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<strong>Rust</strong>"));
        assert!(doc.contains("&lt;script&gt;"));
        assert!(!doc.contains("<script>"));
        assert!(doc.contains("&amp; more"));
        assert!(doc.contains("<div class=\"message ai\">"));
        assert!(!doc.contains("You are helpful."));
    }

    #[test]
    fn test_transcript_html_escapes_and_styles() {
        let mut console = Console::quiet();
        console.line(crate::output::Tone::User, "You: <b>");
        console.error("a & b");
        let doc = render(ExportFormat::Html, &Session::empty(), console.transcript()).unwrap();
        assert!(doc.contains("You: &lt;b&gt;"));
        assert!(doc.contains("a &amp; b"));
        assert!(doc.contains("style=\"color:#cc0000;font-weight:bold\""));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(ExportFormat::MarkdownRendered, None, 1700000000),
            "freechat_session_1700000000.html"
        );
        assert_eq!(
            export_filename(ExportFormat::Json, Some("../my chat"), 1),
            "freechat_session____my_chat.json"
        );
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = two_turns();
        session.name = Some("demo".to_string());
        let path = write_export(
            dir.path(),
            ExportFormat::Markdown,
            &session,
            &Transcript::default(),
        )
        .unwrap();
        assert_eq!(path, dir.path().join("freechat_session_demo.md"));
        assert!(fs::read_to_string(path).unwrap().contains("**AI:**"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::from_name("MD"), Some(ExportFormat::Markdown));
        assert_eq!(
            ExportFormat::from_name("md-rendered"),
            Some(ExportFormat::MarkdownRendered)
        );
        assert_eq!(ExportFormat::from_name("pdf"), None);
    }
}
