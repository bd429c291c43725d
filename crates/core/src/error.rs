//! Error types for the opstream library.

use thiserror::Error;

use crate::interp::MAX_OPERANDS;

/// Primary error type for content stream processing.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("invalid token at position {pos}: {msg}")]
    TokenError { pos: usize, msg: String },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    /// More than [`MAX_OPERANDS`] operands accumulated before an operator.
    ///
    /// This is the only fatal condition in the preprocessor: no operator in
    /// the content stream language can legally take more operands, so the
    /// stream is structurally broken and evaluation aborts.
    #[error("too many operands before operator (limit {MAX_OPERANDS})")]
    TooManyOperands,

    #[error("unknown color space: {0}")]
    UnknownColorSpace(String),

    #[error("PDF syntax error: {0}")]
    SyntaxError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
