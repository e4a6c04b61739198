//! Error types for the bedtime library.
//!
//! This crate provides the foundation error types used throughout the bedtime workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use bedtime_error::{BedtimeResult, GenerationError, GenerationErrorKind};
//!
//! fn open() -> BedtimeResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::StreamInterrupted(
//!         "connection reset".to_string(),
//!     )))?
//! }
//!
//! match open() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod library;
mod narration;

pub use config::ConfigError;
pub use error::{BedtimeError, BedtimeErrorKind, BedtimeResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult, UnavailableReason};
pub use json::JsonError;
pub use library::{LibraryError, LibraryErrorKind};
pub use narration::{NarrationError, NarrationErrorKind, NarrationResult};
