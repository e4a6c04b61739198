//! Story generation error types.

/// Why the generative capability cannot serve a request right now.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UnavailableReason {
    /// The device does not meet the model's hardware requirements.
    #[display("device not eligible")]
    DeviceNotEligible,
    /// The capability is switched off by the user or by policy.
    #[display("capability disabled")]
    CapabilityDisabled,
    /// The model assets are still downloading or loading.
    #[display("model not ready")]
    ModelNotReady,
    /// Any other reason reported by the provider.
    #[display("{}", _0)]
    Other(String),
}

/// Specific error conditions for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The generative capability reported itself unavailable before any stream opened.
    #[display("Model unavailable: {}", _0)]
    ModelUnavailable(UnavailableReason),
    /// An item did not conform to the story schema.
    #[display("Schema violation: {}", _0)]
    SchemaViolation(String),
    /// The transport broke before the stream finished.
    #[display("Stream interrupted: {}", _0)]
    StreamInterrupted(String),
    /// Anything the provider reports that fits no other category.
    #[display("Unknown generation error: {}", _0)]
    Unknown(String),
}

impl GenerationErrorKind {
    /// True when the failure cannot be cleared without user action (settings, device, download).
    pub fn requires_user_action(&self) -> bool {
        matches!(self, GenerationErrorKind::ModelUnavailable(_))
    }

    /// True when the failure concerns a single streamed item rather than the whole run.
    pub fn is_item_level(&self) -> bool {
        matches!(self, GenerationErrorKind::SchemaViolation(_))
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use bedtime_error::{GenerationError, GenerationErrorKind, UnavailableReason};
///
/// let err = GenerationError::new(GenerationErrorKind::ModelUnavailable(
///     UnavailableReason::DeviceNotEligible,
/// ));
/// assert!(format!("{}", err).contains("device not eligible"));
/// assert!(err.kind.requires_user_action());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a schema violation.
    #[track_caller]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::SchemaViolation(message.into()))
    }
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
