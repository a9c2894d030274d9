//! ui::output
//!
//! Console output.
//!
//! # Design
//!
//! Verbs never print directly. Everything goes through a [`Console`] so
//! that `--quiet`, the `verbose` switch, and tests capturing output all
//! behave the same way. Errors are always shown; everything else is
//! suppressed in quiet mode.
//!
//! Write failures (a closed pipe, say) are ignored.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    Normal,
    /// Normal output plus verbose notes
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Destination for console output.
pub struct Console {
    verbosity: Verbosity,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Console writing to stdout and stderr.
    pub fn stdio(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Console writing into an in-memory buffer, for tests and embedding.
    pub fn buffered(verbosity: Verbosity) -> (Self, Captured) {
        let captured = Captured::default();
        let console = Self {
            verbosity,
            out: Box::new(captured.out.clone()),
            err: Box::new(captured.err.clone()),
        };
        (console, captured)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Turn verbose notes on or off. No effect in quiet mode.
    pub fn set_verbose(&mut self, on: bool) {
        if self.verbosity != Verbosity::Quiet {
            self.verbosity = if on {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a line to stdout (respects quiet mode).
    pub fn print(&mut self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            let _ = writeln!(self.out, "{}", message);
        }
    }

    /// Print a verbose note to stderr (verbose mode only).
    pub fn verbose(&mut self, message: impl Display) {
        if self.verbosity == Verbosity::Verbose {
            let _ = writeln!(self.err, "{}", message);
        }
    }

    /// Print a warning to stderr (respects quiet mode).
    pub fn warn(&mut self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            let _ = writeln!(self.err, "warning: {}", message);
        }
    }

    /// Print an error to stderr (always shown).
    pub fn error(&mut self, message: impl Display) {
        let _ = writeln!(self.err, "error: {}", message);
    }

    /// Raw stdout writer, for generated content such as completion scripts.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}

/// Output captured by a buffered [`Console`].
#[derive(Debug, Clone, Default)]
pub struct Captured {
    out: SharedBuffer,
    err: SharedBuffer,
}

impl Captured {
    pub fn stdout(&self) -> String {
        self.out.contents()
    }

    pub fn stderr(&self) -> String {
        self.err.contents()
    }
}

#[derive(Debug, Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Format `(label, value)` rows with labels right-aligned on the colon.
///
/// # Example
///
/// ```
/// use lets::ui::output::format_aligned;
///
/// let rows = vec![
///     ("lets.verbose".to_string(), "off".to_string()),
///     ("build.flavor".to_string(), "debug".to_string()),
/// ];
/// assert_eq!(
///     format_aligned(&rows),
///     "lets.verbose: off\nbuild.flavor: debug"
/// );
/// ```
pub fn format_aligned(rows: &[(String, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{:>width$}: {}", label, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a list of items, one per line.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn normal_console() {
        let (mut console, captured) = Console::buffered(Verbosity::Normal);
        console.print("hello");
        console.verbose("hidden");
        console.warn("careful");
        console.error("broken");

        assert_eq!(captured.stdout(), "hello\n");
        assert_eq!(captured.stderr(), "warning: careful\nerror: broken\n");
    }

    #[test]
    fn quiet_console_only_shows_errors() {
        let (mut console, captured) = Console::buffered(Verbosity::Quiet);
        console.set_verbose(true);
        console.print("hello");
        console.verbose("note");
        console.warn("careful");
        console.error("broken");

        assert!(captured.stdout().is_empty());
        assert_eq!(captured.stderr(), "error: broken\n");
    }

    #[test]
    fn verbose_switch() {
        let (mut console, captured) = Console::buffered(Verbosity::Normal);
        console.set_verbose(true);
        assert!(console.is_verbose());
        console.verbose("note");
        console.set_verbose(false);
        console.verbose("dropped");
        assert_eq!(captured.stderr(), "note\n");
    }

    #[test]
    fn aligned_rows() {
        let rows = vec![
            ("a.x".to_string(), "1".to_string()),
            ("long.name".to_string(), "2".to_string()),
        ];
        assert_eq!(format_aligned(&rows), "      a.x: 1\nlong.name: 2");
        assert_eq!(format_aligned(&[]), "");
    }

    #[test]
    fn list() {
        assert_eq!(format_list(&["a", "b"], "  "), "  a\n  b");
    }
}
