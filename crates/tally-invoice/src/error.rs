//! Error types for invoice rendering

use thiserror::Error;

/// Invoice error types
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The PDF library rejected the document
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    /// Writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for InvoiceError {
    fn from(err: printpdf::Error) -> Self {
        InvoiceError::Pdf(err.to_string())
    }
}

/// Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
