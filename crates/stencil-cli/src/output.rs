//! Output management and formatting.
//!
//! [`OutputManager`] writes the user-facing lines of every command.
//! [`ConsoleReporter`] lends it to the expansion engine as its
//! [`Reporter`].

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use stencil_core::application::ports::Reporter;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// User-facing lines on stdout, honouring `--quiet` and colour settings.
#[derive(Clone)]
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    /// Plain line; suppressed in quiet mode like every other writer.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(|| msg.to_owned())
    }

    /// `✓ <msg>` in green.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Success, msg)
    }

    /// `⚠ <msg>` in yellow.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Warning, msg)
    }

    /// `ℹ <msg>` in blue.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.emit(|| {
            if self.no_color {
                text.to_owned()
            } else {
                text.cyan().bold().to_string()
            }
        })
    }

    fn marked(&self, mark: Mark, msg: &str) -> io::Result<()> {
        self.emit(|| {
            let glyph = mark.glyph();
            if self.no_color {
                return format!("{glyph} {msg}");
            }
            match mark {
                Mark::Success => format!("{} {}", glyph.green().bold(), msg.green()),
                Mark::Warning => format!("{} {}", glyph.yellow().bold(), msg.yellow()),
                Mark::Info => format!("{} {}", glyph.blue().bold(), msg.blue()),
            }
        })
    }

    fn emit(&self, line: impl FnOnce() -> String) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&line())
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Never [`OutputFormat::Auto`].
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[derive(Clone, Copy)]
enum Mark {
    Success,
    Warning,
    Info,
}

impl Mark {
    fn glyph(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }
}

// ── engine reporting ──────────────────────────────────────────────────────────

/// Engine messages (conflict listings, backups, aborts) on the console.
pub struct ConsoleReporter {
    output: OutputManager,
}

impl ConsoleReporter {
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        if let Err(e) = self.output.info(message) {
            tracing::debug!(error = %e, "console write failed");
        }
    }

    fn warn(&self, message: &str) {
        if let Err(e) = self.output.warning(message.trim_end()) {
            tracing::debug!(error = %e, "console write failed");
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
