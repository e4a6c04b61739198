//! Configuration for the bedtime story library.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from bedtime.toml)
//! - User overrides (./bedtime.toml or ~/.config/bedtime/bedtime.toml)
//! - Automatic merging with user values taking precedence

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::{BedtimeConfig, GenerationSettings, NarrationSettings, StorySettings, WordTargets};
