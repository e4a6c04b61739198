//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, JsonError, LibraryError, NarrationError};

/// Every error the bedtime crates can raise.
///
/// # Examples
///
/// ```
/// use bedtime_error::{BedtimeError, NarrationError, NarrationErrorKind};
///
/// let err: BedtimeError = NarrationError::new(NarrationErrorKind::EmptyText).into();
/// assert!(format!("{}", err).contains("Narration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BedtimeErrorKind {
    /// Story generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Narration error
    #[from(NarrationError)]
    Narration(NarrationError),
    /// Story library error
    #[from(LibraryError)]
    Library(LibraryError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Bedtime error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bedtime Error: {}", _0)]
pub struct BedtimeError(Box<BedtimeErrorKind>);

impl BedtimeError {
    /// Create a new error from a kind.
    pub fn new(kind: BedtimeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BedtimeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BedtimeErrorKind
impl<T> From<T> for BedtimeError
where
    T: Into<BedtimeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for bedtime operations.
pub type BedtimeResult<T> = std::result::Result<T, BedtimeError>;
