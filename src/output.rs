//! Output rendering abstraction for freechat.
//!
//! Defines the [`Renderer`] trait that decouples streamed LLM output from
//! the display layer, and [`Console`], the terminal implementation. Console
//! also records everything it prints as a [`Transcript`] so the session can
//! be exported as HTML exactly as it appeared on screen.

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Trait for rendering streamed LLM output.
pub trait Renderer {
    /// Render a single fragment as it arrives.
    fn render_token(&mut self, token: &str);

    /// Called when the full response is complete.
    fn render_done(&mut self);

    /// Called when an error occurs during streaming.
    fn render_error(&mut self, err: &str);
}

/// Visual category of a piece of console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Dim,
    Heading,
    Accent,
    Success,
    Warning,
    Error,
    User,
    Assistant,
}

impl Tone {
    fn paint(&self, text: &str) -> String {
        match self {
            Tone::Plain => text.to_string(),
            Tone::Dim => text.dimmed().to_string(),
            Tone::Heading => text.bold().to_string(),
            Tone::Accent => text.cyan().to_string(),
            Tone::Success => text.green().bold().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Error => text.red().bold().to_string(),
            Tone::User => text.cyan().bold().to_string(),
            Tone::Assistant => text.magenta().bold().to_string(),
        }
    }
}

/// One recorded piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tone: Tone,
    pub text: String,
}

/// Everything a [`Console`] has printed, in order, without ANSI codes.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    segments: Vec<Segment>,
}

impl Transcript {
    fn push(&mut self, tone: Tone, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.tone == tone => last.text.push_str(text),
            _ => self.segments.push(Segment {
                tone,
                text: text.to_string(),
            }),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The transcript as plain text.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Terminal output that records a transcript.
pub struct Console {
    out: Box<dyn Write>,
    transcript: Transcript,
}

impl Console {
    /// Console printing to stdout.
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Console that records but prints nothing.
    #[cfg(test)]
    pub fn quiet() -> Self {
        Self::with_writer(Box::new(io::sink()))
    }

    pub fn with_writer(out: Box<dyn Write>) -> Self {
        Self {
            out,
            transcript: Transcript::default(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Prints `text` without a trailing newline and flushes immediately.
    pub fn write(&mut self, tone: Tone, text: &str) {
        self.transcript.push(tone, text);
        write!(self.out, "{}", tone.paint(text)).ok();
        self.out.flush().ok();
    }

    /// Prints `text` followed by a newline.
    pub fn line(&mut self, tone: Tone, text: &str) {
        self.write(tone, text);
        self.newline();
    }

    /// Adds text the terminal already shows, such as echoed input, to the
    /// transcript without printing it again.
    pub fn record(&mut self, tone: Tone, text: &str) {
        self.transcript.push(tone, text);
    }

    /// Clears the screen and homes the cursor. Not recorded.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        crossterm::execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn newline(&mut self) {
        self.write(Tone::Plain, "\n");
    }

    /// Prints `error: <msg>` with a red label.
    pub fn error(&mut self, msg: &str) {
        self.write(Tone::Error, "error: ");
        self.line(Tone::Plain, msg);
    }

    pub fn warn(&mut self, msg: &str) {
        self.line(Tone::Warning, msg);
    }

    pub fn success(&mut self, msg: &str) {
        self.line(Tone::Success, &format!("✓ {msg}"));
    }
}

impl Renderer for Console {
    fn render_token(&mut self, token: &str) {
        self.write(Tone::Plain, token);
    }

    fn render_done(&mut self) {
        self.newline();
    }

    fn render_error(&mut self, err: &str) {
        self.newline();
        self.line(Tone::Error, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_merges_adjacent_tones() {
        let mut console = Console::quiet();
        console.write(Tone::Assistant, "AI: ");
        console.render_token("Hel");
        console.render_token("lo");
        console.render_done();
        console.warn("careful");

        let segments = console.transcript().segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1].text, "Hello\n");
        assert_eq!(console.transcript().plain_text(), "AI: Hello\ncareful\n");
    }

    #[test]
    fn test_error_label() {
        let mut console = Console::quiet();
        console.error("boom");
        console.render_error("API Error 500: down");
        assert_eq!(
            console.transcript().plain_text(),
            "error: boom\n\nAPI Error 500: down\n"
        );
    }
}
