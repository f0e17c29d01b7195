//! Error types for lightlink.

use thiserror::Error;

/// Main error type for all link operations.
///
/// Protocol-level problems (malformed frames, unknown mode tokens, wrong
/// indicator counts) are deliberately *not* represented here: they are
/// dropped at the parser with a debug log and never surface as failures.
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error on the transport (open, read or write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link closed while a send was pending.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using LinkError.
pub type Result<T> = std::result::Result<T, LinkError>;
