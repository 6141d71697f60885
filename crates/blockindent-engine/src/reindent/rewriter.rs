use crate::buffer::Buffer;
use crate::context::LineContext;
use crate::error::ReindentError;
use crate::reindent::prefix::replace_prefix;

/// Outcome of handing one line to the rewriter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// The old prefix was swapped for the new one
    Rewritten,
    /// The line does not start with the old prefix
    PrefixMismatch,
    /// Continuation of a multi-line expression or string; left alone
    NotIndentable,
}

impl Rewrite {
    pub fn is_rewritten(self) -> bool {
        self == Rewrite::Rewritten
    }
}

/// Shifts accepted lines from the block's old indentation to the new one
#[derive(Debug, Clone, Copy)]
pub struct IndentationRewriter<'a> {
    old: &'a str,
    new: &'a str,
}

impl<'a> IndentationRewriter<'a> {
    pub fn new(old: &'a str, new: &'a str) -> Self {
        Self { old, new }
    }

    /// Rewrite the indentation of `line` in place.
    ///
    /// Everything after the `old` part of the indentation, including the
    /// line's content, keeps its bytes.
    pub fn apply(
        &self,
        buffer: &mut Buffer,
        line: usize,
        context: LineContext,
    ) -> Result<Rewrite, ReindentError> {
        if !context.is_indentable() {
            return Ok(Rewrite::NotIndentable);
        }

        let indentation = buffer.indentation(line)?;
        let Some(replaced) = replace_prefix(self.old, self.new, &indentation) else {
            return Ok(Rewrite::PrefixMismatch);
        };

        buffer.set_indentation(line, &replaced)?;
        Ok(Rewrite::Rewritten)
    }
}
