//! Voice selection: age bracket to rate, pitch and voice id.

use crate::AgeBracket;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// The concrete voice handed to a narration engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Engine-specific voice identifier
    pub voice_id: String,
    /// Speaking rate multiplier, 1.0 is the engine default
    pub rate: f32,
    /// Pitch multiplier, 1.0 is the engine default
    pub pitch: f32,
}

/// Voice defaults for one age bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct VoiceSettings {
    /// Multiplier applied to the engine's default speaking rate
    rate_multiplier: f32,
    /// Offset added to the engine's default pitch of 1.0
    pitch_offset: f32,
    /// Voice used unless the caller overrides it
    voice_id: String,
}

impl VoiceSettings {
    /// Create settings for one bracket.
    pub fn new(rate_multiplier: f32, pitch_offset: f32, voice_id: impl Into<String>) -> Self {
        Self {
            rate_multiplier,
            pitch_offset,
            voice_id: voice_id.into(),
        }
    }

    /// The voice profile these settings describe.
    pub fn profile(&self) -> VoiceProfile {
        VoiceProfile {
            voice_id: self.voice_id.clone(),
            rate: self.rate_multiplier,
            pitch: 1.0 + self.pitch_offset,
        }
    }
}

/// Static age bracket lookup table.
///
/// Younger listeners get a slower, slightly higher voice.
///
/// # Examples
///
/// ```
/// use bedtime_core::{AgeBracket, VoiceProfile, VoiceTable};
///
/// let table = VoiceTable::default();
/// let toddler = table.profile_for(AgeBracket::Toddler, None);
/// let preteen = table.profile_for(AgeBracket::Preteen, None);
/// assert!(toddler.rate < preteen.rate);
///
/// let custom = VoiceProfile { voice_id: "grandma".into(), rate: 0.7, pitch: 0.9 };
/// assert_eq!(table.profile_for(AgeBracket::Toddler, Some(&custom)), custom);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceTable {
    /// Ages 2 to 4
    #[serde(default = "default_toddler")]
    pub toddler: VoiceSettings,
    /// Ages 5 to 7
    #[serde(default = "default_early_reader")]
    pub early_reader: VoiceSettings,
    /// Ages 8 to 10
    #[serde(default = "default_middle_grade")]
    pub middle_grade: VoiceSettings,
    /// Ages 11 to 13
    #[serde(default = "default_preteen")]
    pub preteen: VoiceSettings,
}

fn default_toddler() -> VoiceSettings {
    VoiceSettings::new(0.8, 0.10, "storyteller-soft")
}

fn default_early_reader() -> VoiceSettings {
    VoiceSettings::new(0.9, 0.05, "storyteller-warm")
}

fn default_middle_grade() -> VoiceSettings {
    VoiceSettings::new(1.0, 0.0, "storyteller")
}

fn default_preteen() -> VoiceSettings {
    VoiceSettings::new(1.05, -0.05, "storyteller-bright")
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self {
            toddler: default_toddler(),
            early_reader: default_early_reader(),
            middle_grade: default_middle_grade(),
            preteen: default_preteen(),
        }
    }
}

impl VoiceTable {
    /// Settings for a bracket.
    pub fn settings(&self, age: AgeBracket) -> &VoiceSettings {
        match age {
            AgeBracket::Toddler => &self.toddler,
            AgeBracket::EarlyReader => &self.early_reader,
            AgeBracket::MiddleGrade => &self.middle_grade,
            AgeBracket::Preteen => &self.preteen,
        }
    }

    /// Voice for a bracket; an explicit caller voice wins outright.
    pub fn profile_for(&self, age: AgeBracket, explicit: Option<&VoiceProfile>) -> VoiceProfile {
        match explicit {
            Some(voice) => voice.clone(),
            None => self.settings(age).profile(),
        }
    }
}
