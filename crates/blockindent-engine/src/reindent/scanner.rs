use crate::buffer::Buffer;
use crate::context::{LineContext, LineContextClassifier};
use crate::error::ReindentError;
use crate::reindent::limits::{BlankLimit, ReindentConfig, SiblingBlankLimit};
use crate::reindent::prefix::has_prefix;

/// Why a forward scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ran out of lines; any blank run just counted is trailing
    EndOfBuffer,
    /// The next content line does not start with the block's old indentation
    PrefixMismatch,
    /// The blank run before the next line is longer than `max_blank_lines`
    BlankRunTooLong,
    /// An exact-indentation sibling sits behind too many blank lines
    SiblingSeparated,
}

/// A content line the scan admitted into the block
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedLine {
    pub line: usize,
    /// Blank lines skipped right before this one
    pub blank_lines: usize,
    pub indentation: String,
    pub context: LineContext,
}

impl AcceptedLine {
    /// Lines this step consumed, blanks included
    pub fn consumed(&self) -> usize {
        self.blank_lines + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanStep {
    Accept(AcceptedLine),
    Stop {
        reason: StopReason,
        /// Blank lines probed before stopping; never part of the block
        trailing_blanks: usize,
    },
}

/// Forward-only walk deciding which lines belong to the block being reindented.
///
/// The scanner is anchored on the cursor line's indentation *before* it was
/// changed (`old`). Each step skips a run of blank lines and then judges the
/// next content line against three rules: it must carry `old` as a prefix,
/// the blank run must fit `max_blank_lines`, and a line at exactly `old` that
/// stands on its own (a sibling statement) must also fit
/// `max_sibling_blank_lines`. Deeper lines and dedenters are only held to the
/// general limit.
#[derive(Debug, Clone)]
pub struct BlockBoundaryScanner<'a> {
    old: &'a str,
    max_blank_lines: BlankLimit,
    max_sibling_blank_lines: SiblingBlankLimit,
    position: usize,
}

impl<'a> BlockBoundaryScanner<'a> {
    /// Start scanning at line `start` (the line after the cursor)
    pub fn new(old: &'a str, config: &ReindentConfig, start: usize) -> Self {
        Self {
            old,
            max_blank_lines: config.max_blank_lines,
            max_sibling_blank_lines: config.max_sibling_blank_lines,
            position: start,
        }
    }

    /// First line not yet consumed
    pub fn position(&self) -> usize {
        self.position
    }

    /// Judge the next content line. On `Accept` the scanner moves past it;
    /// on `Stop` the position stays in front of the probed blank run.
    pub fn next_step<C>(&mut self, buffer: &Buffer, classifier: &C) -> Result<ScanStep, ReindentError>
    where
        C: LineContextClassifier + ?Sized,
    {
        let line_count = buffer.line_count();

        let mut candidate = self.position;
        while candidate < line_count && buffer.is_blank(candidate)? {
            candidate += 1;
        }
        let blank_lines = candidate - self.position;

        if candidate >= line_count {
            return Ok(self.stop(StopReason::EndOfBuffer, blank_lines));
        }

        let indentation = buffer.indentation(candidate)?;
        let context = classifier.classify(buffer, candidate);

        if !has_prefix(self.old, &indentation) {
            return Ok(self.stop(StopReason::PrefixMismatch, blank_lines));
        }

        if self.max_blank_lines.exceeded_by(blank_lines) {
            return Ok(self.stop(StopReason::BlankRunTooLong, blank_lines));
        }

        let is_sibling = indentation == self.old && context.is_independent();
        if is_sibling && self.max_sibling_blank_lines.exceeded_by(blank_lines) {
            return Ok(self.stop(StopReason::SiblingSeparated, blank_lines));
        }

        log::trace!("accepting line {candidate} ({context:?}) after {blank_lines} blank line(s)");
        self.position = candidate + 1;
        Ok(ScanStep::Accept(AcceptedLine {
            line: candidate,
            blank_lines,
            indentation,
            context,
        }))
    }

    fn stop(&self, reason: StopReason, trailing_blanks: usize) -> ScanStep {
        log::debug!(
            "block scan stopped at line {} ({reason:?}, {trailing_blanks} blank line(s) probed)",
            self.position + trailing_blanks
        );
        ScanStep::Stop {
            reason,
            trailing_blanks,
        }
    }
}
