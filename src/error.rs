/// Crate-level error type for the driftprobe comparison engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Raw buffer could not be interpreted as the expected array shape.
    #[error("decode failed: {reason}")]
    Decode { reason: String },

    /// A required dimension is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// PNG artifact encoding errors.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Convenience alias used by all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
