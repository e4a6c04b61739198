//! Configuration structures.

use bedtime_core::{StoryLength, Tone, VoiceTable};
use bedtime_error::{BedtimeError, BedtimeResult, ConfigError};
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bedtime.toml");

/// Word counts the prompt asks for, per requested length.
///
/// ```toml
/// [story.word_targets]
/// short = 300
/// medium = 600
/// long = 1000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct WordTargets {
    /// Target for short stories
    short: u32,
    /// Target for medium stories
    medium: u32,
    /// Target for long stories
    long: u32,
}

impl WordTargets {
    /// Create a target table.
    pub fn new(short: u32, medium: u32, long: u32) -> Self {
        Self { short, medium, long }
    }

    /// Target word count for a length.
    pub fn for_length(&self, length: StoryLength) -> u32 {
        match length {
            StoryLength::Short => self.short,
            StoryLength::Medium => self.medium,
            StoryLength::Long => self.long,
        }
    }
}

impl Default for WordTargets {
    fn default() -> Self {
        Self::new(300, 600, 1000)
    }
}

/// Story content settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct StorySettings {
    /// Tone used when the caller does not pick one
    #[serde(default)]
    default_tone: Tone,
    /// Word targets per length
    #[serde(default)]
    word_targets: WordTargets,
}

/// Settings forwarded to the story model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct GenerationSettings {
    /// Model identifier, provider default when absent
    #[serde(default)]
    model: Option<String>,
    /// Sampling temperature
    #[serde(default)]
    temperature: Option<f32>,
}

/// Narration pacing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct NarrationSettings {
    /// Base speaking pace of the paced engine at rate 1.0
    #[serde(default = "default_words_per_minute")]
    words_per_minute: u32,
    /// Silence inserted between the title and body phases
    #[serde(default)]
    phase_gap_ms: u64,
}

fn default_words_per_minute() -> u32 {
    150
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            words_per_minute: default_words_per_minute(),
            phase_gap_ms: 0,
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```toml
/// [narration]
/// words_per_minute = 120
///
/// [voices.toddler]
/// rate_multiplier = 0.7
/// pitch_offset = 0.15
/// voice_id = "grandma"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct BedtimeConfig {
    /// Story content settings
    #[serde(default)]
    story: StorySettings,
    /// Model settings
    #[serde(default)]
    generation: GenerationSettings,
    /// Narration settings
    #[serde(default)]
    narration: NarrationSettings,
    /// Age bracket voice table
    #[serde(default)]
    voices: VoiceTable,
}

impl BedtimeConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BedtimeResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// The bundled defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> BedtimeResult<Self> {
        Self::from_str_toml(DEFAULT_CONFIG)
    }

    /// Parse configuration from TOML text layered over nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_str_toml(text: &str) -> BedtimeResult<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (bedtime.toml shipped with the library)
    /// 2. User config in home directory (~/.config/bedtime/bedtime.toml)
    /// 3. User config in current directory (./bedtime.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bedtime_config::BedtimeConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = BedtimeConfig::load()?;
    /// println!("{} wpm", config.narration().words_per_minute());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> BedtimeResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bedtime/bedtime.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bedtime").required(false));

        builder
            .build()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BedtimeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
