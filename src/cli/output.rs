//! Colored terminal output for user-facing messages.
//!
//! Diagnostics go through `log`; this is what the user reads while a build
//! runs. Errors and warnings go to stderr, everything else to stdout.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal output with verbosity control
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool) -> Self {
        let choice = |is_tty: bool| if is_tty { ColorChoice::Auto } else { ColorChoice::Never };
        Self {
            verbose,
            stdout_color: choice(io::stdout().is_terminal()),
            stderr_color: choice(io::stderr().is_terminal()),
        }
    }

    /// Whether `verbose` lines are printed
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn write_line(
        &self,
        to_stderr: bool,
        color: Option<Color>,
        prefix: &str,
        message: &str,
    ) -> io::Result<()> {
        let mut stream = if to_stderr {
            StandardStream::stderr(self.stderr_color)
        } else {
            StandardStream::stdout(self.stdout_color)
        };

        if !prefix.is_empty() {
            stream.set_color(ColorSpec::new().set_fg(color).set_bold(true))?;
            write!(stream, "{prefix} ")?;
            stream.reset()?;
        } else if color.is_some() {
            stream.set_color(ColorSpec::new().set_fg(color))?;
        }
        writeln!(stream, "{message}")?;
        stream.reset()
    }

    /// Only shown with --verbose
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.write_line(false, Some(Color::Cyan), "", message)
    }

    /// Progress of a long running step
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.write_line(false, Some(Color::Blue), "→", message)
    }

    /// Step finished successfully
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.write_line(false, Some(Color::Green), "✓", message)
    }

    /// Something the user should look at
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.write_line(true, Some(Color::Yellow), "warning:", message)
    }

    /// Failure message
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_line(true, Some(Color::Red), "error:", message)
    }

    /// Section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.write_line(false, Some(Color::Magenta), "", title)
    }

    /// Indented detail line
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.write_line(false, None, "", &format!("  {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_follows_flag() {
        assert!(OutputManager::new(true).is_verbose());

        let quiet = OutputManager::new(false);
        assert!(!quiet.is_verbose());
        // Suppressed lines never touch the stream
        assert!(quiet.verbose("resolved options").is_ok());
    }
}
