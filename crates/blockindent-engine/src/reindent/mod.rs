/*!
 * # Block Reindentation
 *
 * Changing the indentation of one line usually means the lines it governs
 * have to move with it. This module reindents the cursor line through a
 * host-supplied [`LineIndenter`](crate::context::LineIndenter) and then
 * carries the same prefix change forward over the block below it.
 *
 * ## How a block is found
 *
 * The indentation of the cursor line before the change is the *old* prefix,
 * the one after is the *new* prefix. Walking forward, every content line
 * that still starts with the old prefix belongs to the block, as long as:
 *
 * - the run of blank lines in front of it is no longer than `max_blank_lines`;
 * - if it sits at exactly the old indentation and stands on its own (a
 *   sibling statement rather than a dedenter such as `else:`), the blank run
 *   is no longer than `max_sibling_blank_lines` (`-1` keeps siblings out
 *   entirely).
 *
 * Accepted lines get `new + rest` where `rest` is whatever followed the old
 * prefix, so nested depth survives the move. Blank lines are stepped over and
 * never rewritten, and continuation lines of multi-line constructs are never
 * rewritten either.
 *
 * ## Invocation modes
 *
 * - [`Argument::Absent`]: automatic block detection (only when the cursor line is indentable);
 * - [`Argument::Count`]: exactly that many lines starting at the cursor line;
 * - [`Argument::Unbounded`]: automatic detection with both blank limits lifted;
 * - a direct repeat without argument cycles the cursor line through the
 *   indenter's candidates and reuses the previous affected line count.
 *
 * ## Module Structure
 *
 * - **`prefix`**: prefix test, prefix replacement, indentation extraction
 * - **`limits`**: blank-run thresholds and [`ReindentConfig`]
 * - **`scanner`**: [`BlockBoundaryScanner`], the forward block walk
 * - **`rewriter`**: [`IndentationRewriter`], applies the prefix swap to one line
 * - **`cycle`**: [`CycleState`], repeat detection across invocations
 * - **`orchestrator`**: [`indent_and_extend`], the top-level operation
 */

pub mod cycle;
pub mod limits;
pub mod orchestrator;
pub mod prefix;
pub mod rewriter;
pub mod scanner;

use serde::Serialize;

use crate::context::{LineContextClassifier, LineIndenter, Presenter};

pub use cycle::{CommandId, CycleMode, CycleState};
pub use limits::{BlankLimit, ReindentConfig, SiblingBlankLimit};
pub use orchestrator::indent_and_extend;
pub use prefix::{extract_indentation, has_prefix, replace_prefix};
pub use rewriter::{IndentationRewriter, Rewrite};
pub use scanner::{AcceptedLine, BlockBoundaryScanner, ScanStep, StopReason};

/// Optional argument given to one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Argument {
    #[default]
    Absent,
    /// Visit this many lines starting at the cursor line; negatives visit none
    Count(i64),
    /// Scan with both blank-line limits lifted
    Unbounded,
}

/// One press of the reindent command
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: CommandId,
    pub cursor_line: usize,
    pub argument: Argument,
}

/// Half-open line range `[start, end)` an invocation rewrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffectedRange {
    pub start: usize,
    pub end: usize,
}

impl AffectedRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..self.end).contains(&line)
    }
}

/// Capabilities borrowed from the surrounding editor for one invocation
pub struct Host<'h> {
    pub classifier: &'h dyn LineContextClassifier,
    pub indenter: &'h mut dyn LineIndenter,
    pub presenter: &'h mut dyn Presenter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(AffectedRange { start: 2, end: 5 }, 3, false)]
    #[case(AffectedRange { start: 4, end: 4 }, 0, true)]
    #[case(AffectedRange { start: 6, end: 3 }, 0, true)]
    fn test_affected_range_len(
        #[case] range: AffectedRange,
        #[case] len: usize,
        #[case] is_empty: bool,
    ) {
        assert_eq!(range.len(), len);
        assert_eq!(range.is_empty(), is_empty);
    }

    #[test]
    fn test_affected_range_is_half_open() {
        let range = AffectedRange { start: 2, end: 5 };

        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }
}
