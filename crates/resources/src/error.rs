//! Error types for resource loading.

use thiserror::Error;

use crate::provider::Capability;

/// Error type for resource operations.
///
/// "Not found" is deliberately absent: a URL that no provider claims, or a
/// built-in name that does not exist, is reported as `Ok(None)` by the
/// factory-style getters.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A provider claimed the URL but does not support the operation.
    #[error("Provider for protocol '{protocol}' does not implement {capability}")]
    NotImplemented {
        /// Protocol of the provider that was selected.
        protocol: String,
        /// Operation that was requested.
        capability: Capability,
    },

    /// The URL was routed to a provider that cannot make sense of it.
    #[error("Malformed resource request '{url}': {reason}")]
    MalformedRequest {
        /// Requested URL.
        url: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Pixel buffer does not match the declared dimensions.
    #[error("Image data has {actual} bytes, expected {expected}")]
    InvalidImageData {
        /// Byte count implied by width * height * 4.
        expected: usize,
        /// Byte count supplied.
        actual: usize,
    },

    /// Shader data is incomplete.
    #[error("Invalid shader: {0}")]
    InvalidShader(String),

    /// The host failed to fetch or decode an image.
    #[error("Failed to decode image '{url}': {message}")]
    ImageDecode {
        /// Image URL.
        url: String,
        /// Decoder message.
        message: String,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image loading error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ResourceError {
    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRequest {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
