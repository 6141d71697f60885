pub mod buffer;
pub mod context;
pub mod error;
pub mod io;
pub mod reindent;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use buffer::{Buffer, IndentStyle, LineRef, Span};
pub use context::{
    FixedIndenter, LineContext, LineContextClassifier, LineIndenter, NoopPresenter, Presenter,
    PythonIndenter, PythonLineClassifier,
};
pub use error::ReindentError;
pub use reindent::*;
pub use session::Session;
