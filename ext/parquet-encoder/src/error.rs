use thiserror::Error;

/// Core error type for Parquet encoding
#[derive(Error, Debug)]
pub enum ParquetError {
    /// IO errors from the output stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the thrift compact serializer
    #[error("Thrift error: {0}")]
    Thrift(#[from] thrift::Error),

    /// Errors from the block compressor
    #[error("Compression error: {0}")]
    Compression(#[from] snap::Error),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed encoded data
    #[error("Data validation error: {0}")]
    DataValidation(String),

    /// Internal errors that shouldn't happen
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Parquet operations
pub type Result<T> = std::result::Result<T, ParquetError>;

impl ParquetError {
    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        ParquetError::Schema(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ParquetError::InvalidArgument(msg.into())
    }

    /// Create a new data validation error
    pub fn data_validation<S: Into<String>>(msg: S) -> Self {
        ParquetError::DataValidation(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        ParquetError::Internal(msg.into())
    }
}
