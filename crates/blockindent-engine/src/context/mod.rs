//! Capabilities the engine consumes from its host.
//!
//! The engine never looks at language syntax itself. It asks a
//! [`LineContextClassifier`] what kind of line it is looking at, asks a
//! [`LineIndenter`] to fix the indentation of the cursor line, and hands the
//! final range to a [`Presenter`]. [`python`] carries heuristic
//! implementations for Python source so the engine works end to end.

pub mod python;

use std::time::Duration;

use crate::buffer::Buffer;
use crate::error::ReindentError;
use crate::reindent::AffectedRange;

pub use python::{PythonIndenter, PythonLineClassifier};

/// Coarse syntactic tag for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineContext {
    StatementStart,
    BlockStart,
    /// Generic continuation after a finished line
    BlockEnd,
    /// Clause attaching to an earlier block while opening a new one (`else:`)
    DedenterStart,
    /// Continuation of an expression or string literal
    InsideMultilineConstruct,
    Blank,
    /// Non-blank line with no indentation context at all
    NoContext,
}

impl LineContext {
    /// Whether the line may have its indentation rewritten
    pub fn is_indentable(self) -> bool {
        matches!(
            self,
            LineContext::StatementStart
                | LineContext::BlockStart
                | LineContext::BlockEnd
                | LineContext::DedenterStart
                | LineContext::NoContext
        )
    }

    /// Indentable lines that stand on their own; dedenters attach to a prior block
    pub fn is_independent(self) -> bool {
        self.is_indentable() && self != LineContext::DedenterStart
    }
}

/// Classifies buffer lines for the block scanner
pub trait LineContextClassifier {
    fn classify(&self, buffer: &Buffer, line: usize) -> LineContext;
}

/// Computes and applies the indentation of a single line.
///
/// With `cycling` set on consecutive calls (and no other edits in between)
/// the indenter must move to a different candidate than the previous call.
pub trait LineIndenter {
    fn indent_line(
        &mut self,
        buffer: &mut Buffer,
        line: usize,
        cycling: bool,
    ) -> Result<(), ReindentError>;
}

/// Fire-and-forget feedback over the lines an invocation touched
pub trait Presenter {
    fn present(&mut self, range: &AffectedRange, duration: Duration);
}

/// Presenter that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn present(&mut self, _range: &AffectedRange, _duration: Duration) {}
}

/// Indenter that always sets one given indentation
#[derive(Debug, Clone, PartialEq)]
pub struct FixedIndenter {
    indentation: String,
}

impl FixedIndenter {
    pub fn new(indentation: impl Into<String>) -> Self {
        Self {
            indentation: indentation.into(),
        }
    }
}

impl LineIndenter for FixedIndenter {
    fn indent_line(
        &mut self,
        buffer: &mut Buffer,
        line: usize,
        _cycling: bool,
    ) -> Result<(), ReindentError> {
        buffer.set_indentation(line, &self.indentation)?;
        Ok(())
    }
}
