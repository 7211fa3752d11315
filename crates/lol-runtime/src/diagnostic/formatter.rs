//! Color-aware diagnostic formatter
//!
//! Formats diagnostics with source snippets, caret indicators, and optional
//! terminal colors. Respects the NO_COLOR environment variable.

use crate::diagnostic::Diagnostic;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Color mode for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Never use colors
    Never,
    /// Auto-detect terminal capabilities
    Auto,
}

impl ColorMode {
    /// Resolve to a termcolor ColorChoice
    pub fn to_color_choice(self) -> ColorChoice {
        // https://no-color.org
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

/// Diagnostic formatter with color support
pub struct DiagnosticFormatter {
    color_mode: ColorMode,
}

impl DiagnosticFormatter {
    /// Create a new formatter with the given color mode
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    /// Create a formatter that auto-detects color support
    pub fn auto() -> Self {
        Self::new(ColorMode::Auto)
    }

    /// Create a plain (no color) formatter
    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }

    /// Write a diagnostic to stderr
    pub fn emit(&self, diag: &Diagnostic) -> std::io::Result<()> {
        let mut stream = StandardStream::stderr(self.color_mode.to_color_choice());
        self.write_diagnostic(&mut stream, diag)
    }

    /// Format a diagnostic with colors to a WriteColor sink
    pub fn write_diagnostic(
        &self,
        w: &mut impl WriteColor,
        diag: &Diagnostic,
    ) -> std::io::Result<()> {
        self.write_header(w, diag)?;
        self.write_location(w, diag)?;

        if !diag.snippet.is_empty() {
            self.write_snippet(w, diag)?;
        }

        for note in &diag.notes {
            self.write_trailer(w, "note", Color::Cyan, note)?;
        }

        if let Some(help) = &diag.help {
            self.write_trailer(w, "help", Color::Green, help)?;
        }

        Ok(())
    }

    fn write_header(&self, w: &mut impl WriteColor, diag: &Diagnostic) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(w, "error[{}]", diag.code)?;
        w.reset()?;

        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, ": {}", diag.message)?;
        w.reset()?;
        writeln!(w)
    }

    fn write_location(&self, w: &mut impl WriteColor, diag: &Diagnostic) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(w, "  --> ")?;
        w.reset()?;
        writeln!(w, "{}:{}:{}", diag.file, diag.line, diag.column)
    }

    fn write_snippet(&self, w: &mut impl WriteColor, diag: &Diagnostic) -> std::io::Result<()> {
        let gutter = ColorSpec::new()
            .set_fg(Some(Color::Cyan))
            .set_bold(true)
            .clone();

        w.set_color(&gutter)?;
        write!(w, "   |")?;
        w.reset()?;
        writeln!(w)?;

        w.set_color(&gutter)?;
        write!(w, "{:>2} | ", diag.line)?;
        w.reset()?;
        writeln!(w, "{}", diag.snippet)?;

        w.set_color(&gutter)?;
        write!(w, "   | ")?;
        w.reset()?;
        write!(w, "{}", " ".repeat(diag.column.saturating_sub(1)))?;

        w.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(w, "{}", "^".repeat(diag.caret_len()))?;
        if !diag.label.is_empty() {
            write!(w, " {}", diag.label)?;
        }
        w.reset()?;
        writeln!(w)
    }

    fn write_trailer(
        &self,
        w: &mut impl WriteColor,
        kind: &str,
        color: Color,
        text: &str,
    ) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(w, "   = ")?;
        w.reset()?;

        w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(w, "{}", kind)?;
        w.reset()?;

        writeln!(w, ": {}", text)
    }

    /// Format a diagnostic to a buffer without colors
    pub fn format_to_buffer(&self, diag: &Diagnostic) -> Vec<u8> {
        let mut buf = termcolor::Buffer::no_color();
        let _ = self.write_diagnostic(&mut buf, diag);
        buf.into_inner()
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::auto()
    }
}

/// Source line `line` (1-based), if it exists
pub fn extract_snippet(source: &str, line: usize) -> Option<String> {
    source
        .lines()
        .nth(line.checked_sub(1)?)
        .map(|l| l.trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::error_codes;
    use crate::span::Span;

    fn sample() -> Diagnostic {
        Diagnostic::error_with_code("LOL0004", "Division by zero", Span::new(14, 31, 2, 9))
            .with_file("test.lol")
            .with_snippet("VISIBLE QUOSHUNT OF 1 AN 0")
            .with_label("divisor is zero")
            .with_help("check the divisor first")
    }

    #[test]
    fn test_plain_buffer_matches_human_string() {
        let diag = sample();
        let output = String::from_utf8(DiagnosticFormatter::plain().format_to_buffer(&diag)).unwrap();
        assert_eq!(output, diag.to_human_string());
    }

    #[test]
    fn test_no_snippet() {
        let diag = Diagnostic::error_with_code(error_codes::GENERIC_ERROR, "some error", Span::new(0, 1, 1, 1)).with_file("test.lol");
        let output = String::from_utf8(DiagnosticFormatter::plain().format_to_buffer(&diag)).unwrap();
        assert!(output.contains("error[LOL9999]"));
        assert!(!output.contains('^'));
    }

    #[test]
    fn test_notes_and_help() {
        let diag = Diagnostic::error_with_code("LOL0003", "test", Span::new(0, 1, 1, 1))
            .with_note("first note")
            .with_help("try again");
        let output = String::from_utf8(DiagnosticFormatter::plain().format_to_buffer(&diag)).unwrap();
        assert!(output.contains("   = note: first note\n"));
        assert!(output.contains("   = help: try again\n"));
    }

    #[test]
    fn test_color_mode_never() {
        assert_eq!(ColorMode::Never.to_color_choice(), ColorChoice::Never);
    }

    #[test]
    fn test_extract_snippet() {
        let source = "line one\r\nline two\nline three";
        assert_eq!(extract_snippet(source, 1).as_deref(), Some("line one"));
        assert_eq!(extract_snippet(source, 3).as_deref(), Some("line three"));
        assert_eq!(extract_snippet(source, 4), None);
        assert_eq!(extract_snippet(source, 0), None);
    }
}
