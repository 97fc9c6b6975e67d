use thiserror::Error;

/// Errors surfaced by the imaging core
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Invalid phase '{0}'. Must be 'arterial' or 'venous'.")]
    UnsupportedPhase(String),
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Unsupported image format '{0}'")]
    UnsupportedFormat(String),
    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImagingError>;
