/// Errors raised by the engine.
///
/// Scan terminations are never errors; these only cover callers asking
/// for lines that do not exist or handing over bytes that are not text.
#[derive(Debug, thiserror::Error)]
pub enum ReindentError {
    #[error("Line {line} is out of range (buffer has {line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("Buffer is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
