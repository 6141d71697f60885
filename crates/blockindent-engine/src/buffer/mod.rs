pub mod lines;
pub mod span;

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use xi_rope::delta::Builder;
use xi_rope::{Rope, RopeInfo};

use crate::error::ReindentError;
use crate::reindent::prefix::extract_indentation;

pub use lines::{LineRef, lines_with_spans};
pub use span::Span;

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

fn next_buffer_id() -> u64 {
    NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Width a tab advances to when measuring indentation columns.
pub const TAB_WIDTH: usize = 8;

/// Indentation style detected in the buffer
#[derive(Debug, Clone, PartialEq)]
pub enum IndentStyle {
    Spaces(usize), // Number of spaces per indent level
    Tabs,          // Tab characters
}

impl IndentStyle {
    /// The whitespace that makes up one indentation level
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces(n) => " ".repeat(*n),
        }
    }

    /// Build an indentation string covering `columns` display columns
    pub fn indentation_for_columns(&self, columns: usize) -> String {
        match self {
            IndentStyle::Tabs => {
                let mut out = "\t".repeat(columns / TAB_WIDTH);
                out.push_str(&" ".repeat(columns % TAB_WIDTH));
                out
            }
            IndentStyle::Spaces(_) => " ".repeat(columns),
        }
    }
}

/// Display width of an indentation string, with tabs advancing to the next tab stop.
pub fn indentation_width(indentation: &str) -> usize {
    indentation.chars().fold(0, |col, c| match c {
        '\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
        _ => col + 1,
    })
}

/// Line-addressable text buffer.
///
/// The whole text lives in one `xi_rope::Rope`; every edit is compiled to a
/// `Delta` and applied to it, so bytes outside the edited spans round-trip
/// exactly. The version counter changes on every effective edit and lets
/// callers (cycle detection, classifier caches) notice foreign changes.
pub struct Buffer {
    /// Distinguishes buffer instances; clones get a fresh id
    id: u64,
    rope: Rope,
    version: u64,
}

impl Buffer {
    /// Create a buffer from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReindentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from(text))
    }

    /// Get the buffer's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.rope.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Identity of this buffer instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of lines. A trailing terminator does not open another line.
    pub fn line_count(&self) -> usize {
        let len = self.rope.len();
        if len == 0 {
            return 0;
        }
        let newlines = self.rope.line_of_offset(len);
        if self.rope.slice_to_cow(len - 1..len) == "\n" {
            newlines
        } else {
            newlines + 1
        }
    }

    /// Byte span of a line, terminator included
    pub fn line_span(&self, line: usize) -> Result<Span, ReindentError> {
        self.check_line(line)?;
        Ok(Span {
            start: self.rope.offset_of_line(line),
            end: self.rope.offset_of_line(line + 1),
        })
    }

    /// Text of a line without its terminator
    pub fn line(&self, line: usize) -> Result<Cow<'_, str>, ReindentError> {
        let span = self.line_span(line)?;
        Ok(match self.rope.slice_to_cow(span.range()) {
            Cow::Borrowed(s) => Cow::Borrowed(lines::strip_terminator(s)),
            Cow::Owned(s) => Cow::Owned(lines::strip_terminator(&s).to_string()),
        })
    }

    /// Leading whitespace of a line
    pub fn indentation(&self, line: usize) -> Result<String, ReindentError> {
        Ok(extract_indentation(&self.line(line)?).to_string())
    }

    pub fn is_blank(&self, line: usize) -> Result<bool, ReindentError> {
        Ok(lines::is_blank_text(&self.line(line)?))
    }

    /// Iterate over all lines with their spans
    pub fn lines(&self) -> impl Iterator<Item = LineRef> + '_ {
        lines_with_spans(&self.rope)
    }

    /// Replace the leading whitespace of `line` with `indentation`.
    ///
    /// Only the indentation span is touched; the rest of the line keeps its
    /// bytes. Returns whether the text changed.
    pub fn set_indentation(&mut self, line: usize, indentation: &str) -> Result<bool, ReindentError> {
        let span = self.line_span(line)?;
        let current_len = extract_indentation(&self.line(line)?).len();
        let current = self.rope.slice_to_cow(span.start..span.start + current_len);
        if current == indentation {
            return Ok(false);
        }

        let mut builder: Builder<RopeInfo> = Builder::new(self.rope.len());
        builder.replace(span.start..span.start + current_len, Rope::from(indentation));
        let delta = builder.build();

        self.rope = delta.apply(&self.rope);
        self.version += 1;
        Ok(true)
    }

    /// Detect the indent style by finding the first non-zero indentation
    pub fn indent_style(&self) -> IndentStyle {
        detect_indent_style(&self.rope)
    }

    fn check_line(&self, line: usize) -> Result<(), ReindentError> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(ReindentError::LineOutOfRange { line, line_count });
        }
        Ok(())
    }
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        Self {
            id: next_buffer_id(),
            rope: self.rope.clone(),
            version: self.version,
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("text", &self.rope.to_string())
            .field("version", &self.version)
            .finish()
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        // Compare text, not identity; rope node layout may differ
        self.rope.to_string() == other.rope.to_string() && self.version == other.version
    }
}

impl From<&str> for Buffer {
    fn from(text: &str) -> Self {
        Self {
            id: next_buffer_id(),
            rope: Rope::from(text),
            version: 0,
        }
    }
}

fn detect_indent_style(rope: &Rope) -> IndentStyle {
    for line in lines_with_spans(rope) {
        if line.is_blank() {
            continue;
        }

        if line.text.starts_with('\t') {
            return IndentStyle::Tabs;
        }

        let spaces = line.text.chars().take_while(|&c| c == ' ').count();
        if spaces > 0 {
            return IndentStyle::Spaces(spaces);
        }
    }

    // Default to 4 spaces if we couldn't detect
    IndentStyle::Spaces(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("a", 1)]
    #[case("a\n", 1)]
    #[case("a\nb", 2)]
    #[case("a\n\n", 2)]
    #[case("\n", 1)]
    #[case("a\r\nb\r\n", 2)]
    fn test_line_count(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(Buffer::from(text).line_count(), expected);
    }

    #[test]
    fn test_line_text_strips_terminators() {
        let buffer = Buffer::from("def f():\r\n    x = 1\n\n");
        assert_eq!(buffer.line(0).unwrap(), "def f():");
        assert_eq!(buffer.line(1).unwrap(), "    x = 1");
        assert_eq!(buffer.line(2).unwrap(), "");
        assert_eq!(buffer.indentation(1).unwrap(), "    ");
        assert!(buffer.is_blank(2).unwrap());
    }

    #[test]
    fn test_out_of_range_line() {
        let buffer = Buffer::from("a\nb\n");
        let err = buffer.line(2).unwrap_err();
        assert!(matches!(
            err,
            ReindentError::LineOutOfRange {
                line: 2,
                line_count: 2
            }
        ));
    }

    #[test]
    fn test_from_bytes_invalid_utf8() {
        let result = Buffer::from_bytes(&[0xFF, 0xFE, 0xFD]);
        assert!(matches!(result, Err(ReindentError::InvalidUtf8(_))));
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        let text = "if x:\r\n\ty = 1\n  # 世界 🦀\n";
        let buffer = Buffer::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(buffer.to_bytes(), text.as_bytes());
    }

    #[test]
    fn test_set_indentation_touches_only_prefix() {
        let mut buffer = Buffer::from("if x:\n    y = 1  \nz\n");
        let changed = buffer.set_indentation(1, "  ").unwrap();

        assert!(changed);
        assert_eq!(buffer.text(), "if x:\n  y = 1  \nz\n");
        assert_eq!(buffer.version(), 1);
    }

    #[test]
    fn test_clone_gets_fresh_id() {
        let buffer = Buffer::from("x\n");
        let copy = buffer.clone();

        assert_ne!(buffer.id(), copy.id());
        assert_eq!(buffer, copy);
    }

    #[test]
    fn test_set_indentation_keeps_id() {
        let mut buffer = Buffer::from("x\n");
        let id = buffer.id();

        buffer.set_indentation(0, "\t").unwrap();

        assert_eq!(buffer.id(), id);
        assert_eq!(buffer.version(), 1);
    }

    #[test]
    fn test_set_indentation_noop_keeps_version() {
        let mut buffer = Buffer::from("    y\n");
        let changed = buffer.set_indentation(0, "    ").unwrap();

        assert!(!changed);
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_set_indentation_last_line_without_terminator() {
        let mut buffer = Buffer::from("a\nb");
        buffer.set_indentation(1, "\t").unwrap();
        assert_eq!(buffer.text(), "a\n\tb");
    }

    #[rstest]
    #[case("def f():\n    x\n", IndentStyle::Spaces(4))]
    #[case("def f():\n  x\n", IndentStyle::Spaces(2))]
    #[case("def f():\n\tx\n", IndentStyle::Tabs)]
    #[case("x = 1\ny = 2\n", IndentStyle::Spaces(4))]
    #[case("\n   \nif a:\n   b\n", IndentStyle::Spaces(3))]
    fn test_detect_indent_style(#[case] text: &str, #[case] expected: IndentStyle) {
        assert_eq!(Buffer::from(text).indent_style(), expected);
    }

    #[rstest]
    #[case("", 0)]
    #[case("    ", 4)]
    #[case("\t", 8)]
    #[case("  \t", 8)]
    #[case("\t  ", 10)]
    fn test_indentation_width(#[case] indentation: &str, #[case] expected: usize) {
        assert_eq!(indentation_width(indentation), expected);
    }

    #[test]
    fn test_indentation_for_columns() {
        assert_eq!(IndentStyle::Spaces(2).indentation_for_columns(6), "      ");
        assert_eq!(IndentStyle::Tabs.indentation_for_columns(10), "\t  ");
        assert_eq!(IndentStyle::Tabs.unit(), "\t");
        assert_eq!(IndentStyle::Spaces(3).unit(), "   ");
    }
}
