use thiserror::Error;

/// The error type for `depth-layers` operations.
///
/// Tensor arithmetic itself does not return errors; these variants cover
/// configuration checks and the shape checks done before a forward pass.
#[derive(Error, Debug)]
pub enum DepthLayersError {
    /// Error for when an invalid configuration is provided.
    /// This can happen if configuration parameters are logically inconsistent.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// Error for when an input tensor has an invalid shape.
    #[error("Invalid input tensor shape: expected {expected}, got {actual}")]
    InvalidTensorShape {
        /// The expected tensor shape.
        expected: String,
        /// The actual tensor shape.
        actual: String,
    },
}

/// A specialized `Result` type for `depth-layers` operations.
pub type DepthLayersResult<T> = Result<T, DepthLayersError>;
