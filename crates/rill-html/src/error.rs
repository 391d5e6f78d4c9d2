//! Errors reported by the parser and tree builder.
//!
//! Malformed markup is never an error: it is recovered from silently.
//! These variants cover misuse of the streaming API and close events that
//! do not line up with the tree under construction.

use thiserror::Error;

/// A fatal condition reported through [`Handler::on_error`](crate::Handler::on_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was written after the end of the stream was signalled.
    #[error("write() called after end()")]
    WriteAfterEnd,
    /// A close event arrived while nothing was open.
    #[error("close of `{name}` with no open node")]
    UnbalancedClose {
        /// Name of the node the event tried to close.
        name: String,
    },
    /// A close event named a different node than the innermost open one.
    #[error("close of `{found}` while `{expected}` is the innermost open node")]
    TagMismatch {
        /// Name of the innermost open node.
        expected: String,
        /// Name carried by the close event.
        found: String,
    },
}
