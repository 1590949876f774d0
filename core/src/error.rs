use thiserror::Error;

/// Result type for elastokit operations
pub type Result<T> = std::result::Result<T, ElastokitError>;

/// Error types for elastokit operations
#[derive(Error, Debug)]
pub enum ElastokitError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Digest path is missing, not a file, or has the wrong extension
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// A directory the operation needs is missing or not a directory
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// No recombination of a recorded image path exists on disk
    #[error("Unable to find existing location for DICOM file {0} listed in digest {1}")]
    CompositeNotFound(String, String),

    /// None of the files in an image stack could be decoded
    #[error("No readable images: {0}")]
    NoReadableImages(String),

    /// Inversion tool invocation failure
    #[error("Inversion error: {0}")]
    InversionError(String),

    /// JSON serialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    JsonError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for ElastokitError {
    fn from(e: dicom_object::ReadError) -> Self {
        ElastokitError::DicomError(format!("{}", e))
    }
}
