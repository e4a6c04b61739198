//! Narration error types.

/// Specific error conditions raised while narrating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NarrationErrorKind {
    /// The engine refused the given text or voice.
    #[display("Narration engine refused request: {}", _0)]
    EngineRefused(String),
    /// There was nothing to narrate.
    #[display("Nothing to narrate: title and content are empty")]
    EmptyText,
    /// A control call arrived with no session to act on.
    #[display("No active narration session")]
    NoActiveSession,
}

/// Narration error with source location tracking.
///
/// # Examples
///
/// ```
/// use bedtime_error::{NarrationError, NarrationErrorKind};
///
/// let err = NarrationError::new(NarrationErrorKind::EmptyText);
/// assert!(format!("{}", err).contains("Nothing to narrate"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Narration Error: {} at line {} in {}", kind, line, file)]
pub struct NarrationError {
    /// The specific error condition
    pub kind: NarrationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrationError {
    /// Create a new NarrationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for narration operations.
pub type NarrationResult<T> = Result<T, NarrationError>;
