//! Shared output layer: plain text for humans and pipes, or stable JSON.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

/// Output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Indented plain text.
    Text,
    /// Machine-readable JSON, one document per command.
    Json,
}

impl OutputMode {
    /// Parse a mode name, case-insensitively. `None` for unknown names.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render `value` to stdout as pretty JSON or through `text`.
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn render<T, F>(mode: OutputMode, value: &T, text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        text(value, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OutputMode::parse(" JSON "), Some(OutputMode::Json));
        assert_eq!(OutputMode::parse("Text"), Some(OutputMode::Text));
        assert_eq!(OutputMode::parse("pretty"), None);
    }
}
