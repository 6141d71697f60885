use xi_rope::Rope;

use super::span::Span;

/// A single line of the buffer with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes the terminator if present).
    pub span: Span,
    /// The line text with its terminator stripped.
    pub text: String,
}

impl LineRef {
    /// The leading whitespace run of the line.
    pub fn indentation(&self) -> &str {
        crate::reindent::prefix::extract_indentation(&self.text)
    }

    /// A line is blank when nothing but whitespace follows its indentation.
    pub fn is_blank(&self) -> bool {
        is_blank_text(&self.text)
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so that spans cover the terminators, keeping
/// offsets exact for later delta construction.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: strip_terminator(&line).to_string(),
        }
    })
}

pub(crate) fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

pub(crate) fn is_blank_text(line: &str) -> bool {
    strip_terminator(line).trim().is_empty()
}
