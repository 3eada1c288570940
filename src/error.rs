//! Error types for compression and decompression.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

/// Everything that can go wrong while packing or unpacking a container.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// I/O error from the underlying file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container is malformed: bad header, truncated or oversized tree.
    #[error("corrupt container: {message}")]
    CorruptContainer { message: String },

    /// The payload ended in the middle of a code.
    #[error("truncated payload: {dangling_bits} bits do not complete a code")]
    TruncatedPayload { dangling_bits: usize },

    /// The serialized tree does not fit in the header's length field.
    #[error("serialized tree is {len} bytes, header allows at most {max}")]
    TreeTooLarge { len: usize, max: usize },

    /// A byte showed up during encoding that the code table does not cover.
    #[error("byte 0x{symbol:02x} has no code; input changed between passes?")]
    MissingSymbol { symbol: u8 },

    /// Input and output paths name the same file.
    #[error("input and output are the same file: {}", .path.display())]
    SameFile { path: PathBuf },
}

impl HuffmanError {
    /// Create a corrupt container error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        HuffmanError::CorruptContainer {
            message: message.into(),
        }
    }

    /// Create a corrupt container error with offset context.
    pub fn corrupted_at(message: impl Into<String>, offset: usize) -> Self {
        HuffmanError::CorruptContainer {
            message: format!("{} at offset {}", message.into(), offset),
        }
    }

    /// Short machine-friendly name, used as a log field.
    pub fn category(&self) -> &'static str {
        match self {
            HuffmanError::Io(_) => "io_error",
            HuffmanError::CorruptContainer { .. } => "corrupt_container",
            HuffmanError::TruncatedPayload { .. } => "truncated_payload",
            HuffmanError::TreeTooLarge { .. } => "tree_too_large",
            HuffmanError::MissingSymbol { .. } => "missing_symbol",
            HuffmanError::SameFile { .. } => "same_file",
        }
    }

    /// True when the input data itself is bad, as opposed to the environment.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            HuffmanError::CorruptContainer { .. } | HuffmanError::TruncatedPayload { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupted_at_includes_offset() {
        let err = HuffmanError::corrupted_at("escape byte without symbol", 7);
        assert_eq!(
            err.to_string(),
            "corrupt container: escape byte without symbol at offset 7"
        );
        assert_eq!(err.category(), "corrupt_container");
        assert!(err.is_format_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HuffmanError = io.into();
        assert_eq!(err.category(), "io_error");
        assert!(!err.is_format_error());
    }
}
