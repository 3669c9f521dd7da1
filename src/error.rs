//! Error types for invoice composition and delivery.
//!
//! Every failure is terminal for the request that produced it; nothing in
//! this crate retries. The boundary layer translates these into user-facing
//! success/failure envelopes.

/// Result type alias for invoice_press operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while composing, storing, or delivering an
/// invoice document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The invoice record could not be rendered, or the document encoder
    /// failed while assembling the output bytes.
    #[error("Composition failed: {0}")]
    Composition(String),

    /// The storage sink could not be created or written.
    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    /// A download was requested but no document exists at the resolved
    /// destination.
    #[error("Invoice not found: {0}")]
    NotFound(String),

    /// The bounded wait for write completion elapsed.
    #[error("Write did not complete within {0} ms")]
    WriteTimeout(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
