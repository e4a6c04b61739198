//! Tests for configuration loading.

use bedtime_config::BedtimeConfig;
use bedtime_core::{AgeBracket, StoryLength, Tone, VoiceTable};
use std::io::Write;

#[test]
fn test_bundled_matches_builtin_voice_table() -> anyhow::Result<()> {
    let config = BedtimeConfig::bundled()?;

    assert_eq!(config.voices(), &VoiceTable::default());
    assert_eq!(config.story().word_targets().for_length(StoryLength::Medium), 600);
    assert_eq!(*config.narration().words_per_minute(), 150);
    assert_eq!(*config.story().default_tone(), Tone::Gentle);
    Ok(())
}

#[test]
fn test_from_file_with_partial_sections() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[narration]
words_per_minute = 90

[voices.toddler]
rate_multiplier = 0.6
pitch_offset = 0.2
voice_id = "grandma"
"#
    )?;

    let config = BedtimeConfig::from_file(file.path())?;

    assert_eq!(*config.narration().words_per_minute(), 90);
    assert_eq!(*config.narration().phase_gap_ms(), 0);
    let toddler = config.voices().profile_for(AgeBracket::Toddler, None);
    assert_eq!(toddler.voice_id, "grandma");
    // Brackets the file does not mention keep their defaults.
    assert_eq!(
        config.voices().settings(AgeBracket::Preteen),
        VoiceTable::default().settings(AgeBracket::Preteen)
    );
    Ok(())
}

#[test]
fn test_invalid_config_is_config_error() {
    let result = BedtimeConfig::from_str_toml("[narration]\nwords_per_minute = \"fast\"\n");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}
