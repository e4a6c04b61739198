//! Story library (persistence boundary) error types.

/// Specific library error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LibraryErrorKind {
    /// No story stored under the given id
    #[display("Story not found: {}", _0)]
    NotFound(String),
    /// The backing store failed
    #[display("Storage failure: {}", _0)]
    Storage(String),
}

/// Library error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Library Error: {} at line {} in {}", kind, line, file)]
pub struct LibraryError {
    kind: LibraryErrorKind,
    line: u32,
    file: &'static str,
}

impl LibraryError {
    /// Create a new library error with caller location tracking.
    #[track_caller]
    pub fn new(kind: LibraryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LibraryErrorKind {
        &self.kind
    }
}
