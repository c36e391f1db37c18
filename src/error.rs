//! Error types for UtxoChain

use std::fmt;

#[derive(Debug, Clone)]
pub enum ChainError {
    InvalidTransaction(String),
    DoubleSpendDetected(String),
    InvalidBlock(String),
    OrphanBlock,
    BlockAlreadyExists,
    UnknownBlock(String),
    CryptoError(String),
    MempoolFull,
    SerializationError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            ChainError::DoubleSpendDetected(msg) => write!(f, "Double spend detected: {}", msg),
            ChainError::InvalidBlock(msg) => write!(f, "Invalid block: {}", msg),
            ChainError::OrphanBlock => write!(f, "Orphan block"),
            ChainError::BlockAlreadyExists => write!(f, "Block already exists"),
            ChainError::UnknownBlock(msg) => write!(f, "Unknown block: {}", msg),
            ChainError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            ChainError::MempoolFull => write!(f, "Mempool is full"),
            ChainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<Box<bincode::ErrorKind>> for ChainError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bincode_errors_convert_to_serialization_error() {
        let err: ChainError = Box::new(bincode::ErrorKind::SizeLimit).into();
        assert!(matches!(err, ChainError::SerializationError(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
