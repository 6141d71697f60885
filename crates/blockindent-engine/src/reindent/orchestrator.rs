use crate::buffer::Buffer;
use crate::context::LineContextClassifier;
use crate::error::ReindentError;
use crate::reindent::{
    AffectedRange, Argument, BlockBoundaryScanner, CycleState, Host, IndentationRewriter,
    Invocation, ReindentConfig, ScanStep,
};

/// Reindent the cursor line and carry the change over its block.
///
/// ## Steps
///
/// 1. **Repeat detection**: a direct repeat without argument switches to
///    cycling, reusing the previous affected line count as an explicit count
/// 2. **Capture old**: the cursor line's indentation before any change
/// 3. **Classify**: only indentable cursor lines propagate automatically
/// 4. **Indent**: the host indenter fixes the cursor line (cycling when repeating);
///    its result is the new indentation
/// 5. **Propagate**: automatic scan, explicit count or unbounded scan
/// 6. **Finish**: the affected range runs from the cursor line through the
///    last rewritten line, is stored in `cycle` and handed to the presenter
///
/// `config` is only read; the unbounded mode works on a copy.
pub fn indent_and_extend(
    buffer: &mut Buffer,
    invocation: &Invocation,
    config: &ReindentConfig,
    cycle: &mut CycleState,
    host: &mut Host<'_>,
) -> Result<AffectedRange, ReindentError> {
    let cursor = invocation.cursor_line;
    let old = buffer.indentation(cursor)?;

    let repeat = cycle.is_repeat(&invocation.command, &invocation.argument, buffer.version());
    let limit = repeat.then(|| cycle.last_affected_line_count());

    let indentable = host.classifier.classify(buffer, cursor).is_indentable();

    host.indenter.indent_line(buffer, cursor, repeat)?;
    let new = buffer.indentation(cursor)?;
    log::debug!(
        "{} at line {cursor}: {old:?} -> {new:?} ({:?}, repeat: {repeat})",
        invocation.command,
        invocation.argument
    );

    let rewriter = IndentationRewriter::new(&old, &new);
    let last_rewritten = match (invocation.argument, limit) {
        (Argument::Absent, Some(limit)) => {
            let count = i64::try_from(limit).unwrap_or(i64::MAX);
            extend_count(buffer, cursor, count, host.classifier, &rewriter)?
        }
        (Argument::Count(count), _) => {
            extend_count(buffer, cursor, count, host.classifier, &rewriter)?
        }
        (Argument::Absent, None) if indentable => {
            extend_block(buffer, cursor, &old, config, host.classifier, &rewriter)?
        }
        (Argument::Unbounded, _) if indentable => {
            let unbounded = config.unbounded();
            extend_block(buffer, cursor, &old, &unbounded, host.classifier, &rewriter)?
        }
        _ => {
            log::debug!("line {cursor} is not indentable, not extending");
            None
        }
    };

    let range = AffectedRange {
        start: cursor,
        end: last_rewritten.map_or(cursor + 1, |line| line + 1),
    };

    cycle.finish(&invocation.command, repeat, range.len(), buffer.version());
    host.presenter.present(&range, config.highlight_duration());

    Ok(range)
}

/// Scan forward from the line after `cursor` until the scanner stops.
/// Returns the last line that was rewritten.
fn extend_block(
    buffer: &mut Buffer,
    cursor: usize,
    old: &str,
    config: &ReindentConfig,
    classifier: &dyn LineContextClassifier,
    rewriter: &IndentationRewriter<'_>,
) -> Result<Option<usize>, ReindentError> {
    let mut scanner = BlockBoundaryScanner::new(old, config, cursor + 1);
    let mut last_rewritten = None;

    while let ScanStep::Accept(accepted) = scanner.next_step(buffer, classifier)? {
        if rewriter
            .apply(buffer, accepted.line, accepted.context)?
            .is_rewritten()
        {
            last_rewritten = Some(accepted.line);
        }
    }

    Ok(last_rewritten)
}

/// Visit `count` lines starting at `cursor` (which the indenter already
/// handled), rewriting each later one that carries the old prefix.
/// Blank-line limits play no part here.
fn extend_count(
    buffer: &mut Buffer,
    cursor: usize,
    count: i64,
    classifier: &dyn LineContextClassifier,
    rewriter: &IndentationRewriter<'_>,
) -> Result<Option<usize>, ReindentError> {
    let count = usize::try_from(count).unwrap_or(0);
    let end = cursor.saturating_add(count).min(buffer.line_count());
    let mut last_rewritten = None;

    for line in (cursor + 1)..end {
        if buffer.is_blank(line)? {
            continue;
        }
        let context = classifier.classify(buffer, line);
        if rewriter.apply(buffer, line, context)?.is_rewritten() {
            last_rewritten = Some(line);
        }
    }

    Ok(last_rewritten)
}
