//! Console reporting for CLI commands.
//!
//! All lines go to stderr so generated output can be piped.

use console::{Style, Term};

/// Kind of a reported line.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Step,
    Done,
    Skipped,
    Failed,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Step => Style::new().cyan().bold(),
            Self::Done => Style::new().green(),
            Self::Skipped => Style::new().yellow(),
            Self::Failed => Style::new().red(),
        }
    }
}

/// Styled line reporter on stderr.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    /// Start of a command's main work.
    pub(crate) fn step(&self, msg: &str) {
        self.line(Tone::Step, &format!("==> {msg}"));
    }

    /// Indented detail line under a step, e.g. one written file.
    pub(crate) fn item(&self, msg: &str) {
        self.line(Tone::Plain, &format!("  {msg}"));
    }

    /// Indented detail line for something left out.
    pub(crate) fn skipped(&self, msg: &str) {
        self.line(Tone::Skipped, &format!("  {msg}"));
    }

    /// Indented detail line for a failed item.
    pub(crate) fn failed(&self, msg: &str) {
        self.line(Tone::Failed, &format!("  {msg}"));
    }

    /// Final summary of a successful command.
    pub(crate) fn done(&self, msg: &str) {
        self.line(Tone::Done, msg);
    }

    /// Fatal error, printed before exiting.
    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Failed, msg);
    }

    fn line(&self, tone: Tone, msg: &str) {
        let _ = self.term.write_line(&tone.style().apply_to(msg).to_string());
    }
}
