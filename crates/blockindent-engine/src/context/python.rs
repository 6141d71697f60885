//! Heuristic line classification and indentation for Python source.
//!
//! This is not a parser. A small byte-level lexer tracks open brackets,
//! open string literals and backslash continuations from the top of the
//! buffer; that is enough to tell multi-line constructs apart from lines
//! that start a statement, which is all the block scanner needs.

use std::cell::{Cell, RefCell};
use std::sync::OnceLock;

use regex::Regex;

use crate::buffer::{Buffer, indentation_width};
use crate::context::{LineContext, LineContextClassifier, LineIndenter};
use crate::error::ReindentError;

/// Clauses that continue a compound statement opened further up
fn dedenter() -> &'static Regex {
    static DEDENTER: OnceLock<Regex> = OnceLock::new();
    DEDENTER.get_or_init(|| {
        Regex::new(r"^(?:else|elif|except|finally)\b").expect("Invalid dedenter regex")
    })
}

/// Statements after which the next line leaves the current block
fn block_ender() -> &'static Regex {
    static BLOCK_ENDER: OnceLock<Regex> = OnceLock::new();
    BLOCK_ENDER.get_or_init(|| {
        Regex::new(r"^(?:return|pass|raise|break|continue)\b").expect("Invalid block ender regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenString {
    quote: u8,
    triple: bool,
}

/// Lexer state at a line boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LexState {
    depth: usize,
    string: Option<OpenString>,
    continued: bool,
}

impl LexState {
    fn inside_construct(self) -> bool {
        self.depth > 0 || self.string.is_some() || self.continued
    }

    /// Lex one line (terminator stripped). Returns the state at the start of
    /// the next line and the byte offset where a trailing comment begins.
    fn scan(self, line: &str) -> (LexState, usize) {
        let bytes = line.as_bytes();
        let mut depth = self.depth;
        let mut string = self.string;
        let mut escaped_eol = false;
        let mut code_end = bytes.len();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if let Some(open) = string {
                match b {
                    b'\\' => {
                        escaped_eol = i + 1 == bytes.len();
                        i += 2;
                    }
                    _ if b == open.quote && !open.triple => {
                        string = None;
                        i += 1;
                    }
                    _ if b == open.quote && bytes[i..].starts_with(&[b, b, b]) => {
                        string = None;
                        i += 3;
                    }
                    _ => i += 1,
                }
                continue;
            }

            match b {
                b'#' => {
                    code_end = i;
                    break;
                }
                b'\'' | b'"' => {
                    let triple = bytes[i..].starts_with(&[b, b, b]);
                    string = Some(OpenString { quote: b, triple });
                    i += if triple { 3 } else { 1 };
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b'\\' if i + 1 == bytes.len() => escaped_eol = true,
                _ => {}
            }
            i += 1;
        }

        // A single-quoted string only survives the line end through a backslash
        if let Some(open) = string
            && !open.triple
            && !escaped_eol
        {
            string = None;
        }

        let next = LexState {
            depth,
            string,
            continued: escaped_eol && string.is_none(),
        };
        (next, code_end)
    }
}

/// Lexer states at the start of every line of one buffer instance.
///
/// Buffer edits only ever replace leading whitespace, and the state at a
/// line start does not depend on it: brackets, quotes and a trailing
/// backslash sit after the indentation, and whitespace at the head of a
/// string line stays inside the string. The states therefore stay valid
/// across every edit of the same buffer.
#[derive(Debug)]
struct LexCache {
    buffer_id: u64,
    starts: Vec<LexState>,
}

impl LexCache {
    fn build(buffer: &Buffer) -> Self {
        let mut starts = Vec::with_capacity(buffer.line_count() + 1);
        let mut state = LexState::default();
        for line in buffer.lines() {
            starts.push(state);
            state = state.scan(&line.text).0;
        }
        starts.push(state);

        Self {
            buffer_id: buffer.id(),
            starts,
        }
    }

    fn is_current(&self, buffer: &Buffer) -> bool {
        self.buffer_id == buffer.id()
    }
}

/// View over one buffer with its lexer states
struct Lines<'a> {
    buffer: &'a Buffer,
    starts: &'a [LexState],
}

impl Lines<'_> {
    fn state(&self, line: usize) -> LexState {
        self.starts.get(line).copied().unwrap_or_default()
    }

    fn inside_construct(&self, line: usize) -> bool {
        self.state(line).inside_construct()
    }

    /// Code part of a line: comment dropped, surrounding whitespace trimmed
    fn code(&self, line: usize) -> Result<String, ReindentError> {
        let text = self.buffer.line(line)?;
        let (_, code_end) = self.state(line).scan(&text);
        Ok(text[..code_end].trim().to_string())
    }

    /// Non-blank, non-comment line that starts a logical line
    fn is_statement(&self, line: usize) -> Result<bool, ReindentError> {
        Ok(!self.inside_construct(line) && !self.code(line)?.is_empty())
    }

    fn previous_statement(&self, line: usize) -> Result<Option<usize>, ReindentError> {
        for candidate in (0..line).rev() {
            if self.is_statement(candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Whether the logical line starting at `line` ends with a colon
    fn opens_block(&self, line: usize) -> Result<bool, ReindentError> {
        let line_count = self.buffer.line_count();
        let mut end = line;
        while end + 1 < line_count && self.inside_construct(end + 1) {
            end += 1;
        }
        Ok(self.code(end)?.ends_with(':'))
    }

    fn classify(&self, line: usize) -> Result<LineContext, ReindentError> {
        if self.inside_construct(line) {
            return Ok(LineContext::InsideMultilineConstruct);
        }
        if self.buffer.is_blank(line)? {
            return Ok(LineContext::Blank);
        }
        if self.previous_statement(line)?.is_none() {
            return Ok(LineContext::NoContext);
        }

        let code = self.code(line)?;
        if dedenter().is_match(&code) {
            Ok(LineContext::DedenterStart)
        } else if self.opens_block(line)? {
            Ok(LineContext::BlockStart)
        } else if block_ender().is_match(&code) {
            Ok(LineContext::BlockEnd)
        } else {
            Ok(LineContext::StatementStart)
        }
    }
}

/// Classifies Python lines for the block scanner.
///
/// Lexer states are cached per buffer instance, so a whole reindent, with
/// every rewrite it makes, lexes the buffer once.
#[derive(Debug, Default)]
pub struct PythonLineClassifier {
    cache: RefCell<Option<LexCache>>,
    builds: Cell<usize>,
}

impl PythonLineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a buffer had to be lexed from the top
    pub fn cache_builds(&self) -> usize {
        self.builds.get()
    }

    fn with_lines<R>(&self, buffer: &Buffer, f: impl FnOnce(&Lines<'_>) -> R) -> R {
        let mut slot = self.cache.borrow_mut();
        let cache = match slot.take() {
            Some(cache) if cache.is_current(buffer) => cache,
            _ => {
                self.builds.set(self.builds.get() + 1);
                log::debug!("lexing buffer {} ({} lines)", buffer.id(), buffer.line_count());
                LexCache::build(buffer)
            }
        };
        let result = f(&Lines {
            buffer,
            starts: &cache.starts,
        });
        *slot = Some(cache);
        result
    }
}

impl LineContextClassifier for PythonLineClassifier {
    fn classify(&self, buffer: &Buffer, line: usize) -> LineContext {
        // Lines that cannot be read are simply not indentable
        self.with_lines(buffer, |lines| lines.classify(line))
            .unwrap_or(LineContext::Blank)
    }
}

/// Indentation levels a line may take, shallowest first
#[derive(Debug, Clone, PartialEq)]
struct Candidates {
    levels: Vec<String>,
    default: String,
}

impl Candidates {
    fn single(indentation: String) -> Self {
        Self {
            levels: vec![indentation.clone()],
            default: indentation,
        }
    }

    /// Next level to the left of `current`, wrapping around to the deepest
    fn cycle_from(&self, current: &str) -> String {
        let width = indentation_width(current);
        self.levels
            .iter()
            .rev()
            .find(|level| indentation_width(level) < width)
            .or_else(|| self.levels.last())
            .cloned()
            .unwrap_or_default()
    }

    /// Deepest level strictly shallower than `indentation`, if any
    fn shallower_than(&self, indentation: &str) -> Option<String> {
        let width = indentation_width(indentation);
        self.levels
            .iter()
            .rev()
            .find(|level| indentation_width(level) < width)
            .cloned()
    }
}

/// Candidate levels for `line`, read off the statements above it.
///
/// The levels are column 0, the previous statement's indentation, the
/// indentation of every block enclosing it, and one unit deeper when the
/// previous statement opens a block. Continuation lines only get their own
/// indentation, and a line with no statement above it only gets column 0.
///
/// The default level is chosen by the first rule that matches:
///
/// - after a block opener, one unit deeper, unless `line` is a dedenter;
/// - for a dedenter (`else:`, `except ...:`) or after a block ender
///   (`return`, `pass`, `raise` ...), the deepest level shallower than the
///   previous statement;
/// - otherwise the previous statement's indentation.
///
/// Cycling walks the levels leftwards from the current indentation and wraps
/// to the deepest one.
fn candidates(lines: &Lines<'_>, line: usize) -> Result<Candidates, ReindentError> {
    let current = lines.buffer.indentation(line)?;
    if lines.inside_construct(line) {
        return Ok(Candidates::single(current));
    }
    let Some(previous) = lines.previous_statement(line)? else {
        return Ok(Candidates::single(String::new()));
    };

    let previous_indentation = lines.buffer.indentation(previous)?;
    let mut levels = vec![String::new(), previous_indentation.clone()];

    // Indentation of every enclosing block above the previous statement
    let mut limit = indentation_width(&previous_indentation);
    for above in (0..previous).rev() {
        if limit == 0 {
            break;
        }
        if !lines.is_statement(above)? {
            continue;
        }
        let indentation = lines.buffer.indentation(above)?;
        let width = indentation_width(&indentation);
        if width < limit {
            levels.push(indentation);
            limit = width;
        }
    }

    let opens_block = lines.opens_block(previous)?;
    let deeper = format!("{previous_indentation}{}", lines.buffer.indent_style().unit());
    if opens_block {
        levels.push(deeper.clone());
    }

    levels.sort_by_key(|level| indentation_width(level));
    levels.dedup_by_key(|level| indentation_width(level));

    let mut candidates = Candidates {
        levels,
        default: previous_indentation.clone(),
    };

    let is_dedenter = dedenter().is_match(&lines.code(line)?);
    let after_block_end = block_ender().is_match(&lines.code(previous)?);
    if opens_block && !is_dedenter {
        // First line of the opener's body
        candidates.default = deeper;
    } else if (is_dedenter || after_block_end)
        && let Some(shallower) = candidates.shallower_than(&previous_indentation)
    {
        // Clause of the enclosing block, or the code after a finished body
        candidates.default = shallower;
    }

    Ok(candidates)
}

/// Indents Python lines to the level implied by the lines above.
///
/// The default answer is the deepest plausible level (one step in after a
/// block opener, one step out for `else:`-style clauses or after `return`).
/// With `cycling`, each call moves one candidate level to the left of the
/// current indentation, wrapping back to the deepest.
#[derive(Debug, Default)]
pub struct PythonIndenter {
    classifier: PythonLineClassifier,
}

impl PythonIndenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineIndenter for PythonIndenter {
    fn indent_line(
        &mut self,
        buffer: &mut Buffer,
        line: usize,
        cycling: bool,
    ) -> Result<(), ReindentError> {
        let current = buffer.indentation(line)?;
        let candidates = self
            .classifier
            .with_lines(buffer, |lines| candidates(lines, line))?;

        let target = if cycling {
            candidates.cycle_from(&current)
        } else {
            candidates.default
        };
        log::trace!("line {line}: indentation {current:?} -> {target:?}");

        buffer.set_indentation(line, &target)?;
        Ok(())
    }
}
