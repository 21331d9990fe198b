//! Error types for Huffman compression.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Huffman operations.
pub type Result<T> = core::result::Result<T, HuffmanError>;

/// Every failure the codec can report. Each variant aborts the operation
/// that produced it.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Input path does not exist.
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// I/O error from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to compress.
    #[error("empty input: no symbols to build a code from")]
    EmptyInput,

    /// A bit was requested past the end of the available data.
    #[error("end of bit stream after {bits_read} bits")]
    EndOfStream { bits_read: u64 },

    /// The bit stream cannot be decoded with the current tree.
    #[error("corrupt stream: {message}")]
    CorruptStream { message: String },

    /// Encode met a symbol that has no code in the table.
    #[error("symbol 0x{symbol:02x} has no code in the table")]
    UnknownSymbol { symbol: u8 },

    /// Symbol counts whose sum, or weighted code length, exceeds `u64`.
    #[error("weight overflow: {message}")]
    WeightOverflow { message: String },

    /// The artifact header is malformed.
    #[error("invalid header: {message}")]
    InvalidHeader { message: String },

    /// Configuration file could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl HuffmanError {
    pub fn corrupt(message: impl Into<String>) -> Self {
        HuffmanError::CorruptStream {
            message: message.into(),
        }
    }

    pub fn invalid_header(message: impl Into<String>) -> Self {
        HuffmanError::InvalidHeader {
            message: message.into(),
        }
    }

    pub fn weight_overflow(message: impl Into<String>) -> Self {
        HuffmanError::WeightOverflow {
            message: message.into(),
        }
    }

    /// Stable short label, for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            HuffmanError::NotFound { .. } => "not_found",
            HuffmanError::Io(_) => "io_failure",
            HuffmanError::EmptyInput => "empty_input",
            HuffmanError::EndOfStream { .. } => "end_of_stream",
            HuffmanError::CorruptStream { .. } => "corrupt_stream",
            HuffmanError::UnknownSymbol { .. } => "unknown_symbol",
            HuffmanError::WeightOverflow { .. } => "weight_overflow",
            HuffmanError::InvalidHeader { .. } => "invalid_header",
            HuffmanError::Config(_) => "invalid_config",
        }
    }
}
