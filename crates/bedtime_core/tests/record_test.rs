//! Tests for story records and their decode-time sanitization.

use bedtime_core::{contains_markup, FinalizedStory, PartialStoryRecord, StoryField};
use bedtime_error::GenerationErrorKind;

#[test]
fn test_finalized_decode_sanitizes_legacy_content() -> anyhow::Result<()> {
    // Stories saved before content was kept plain may still carry markup.
    let legacy = r#"{
        "title": "The Fox",
        "emoji": "🦊",
        "content": "<speak>Once upon a time <break time=\"1s\"/> there was a fox.</speak>",
        "markupContent": "<speak>Once upon a time <break time=\"1s\"/> there was a fox.</speak>"
    }"#;

    let story: FinalizedStory = serde_json::from_str(legacy)?;

    assert_eq!(story.content(), "Once upon a time there was a fox.");
    assert!(!contains_markup(story.content()));
    // The narration variant keeps its markup on purpose.
    assert!(contains_markup(story.narration_text()));
    assert!(story.illustration_description().is_none());
    Ok(())
}

#[test]
fn test_title_markup_stripped_on_decode_and_finalize() -> anyhow::Result<()> {
    let legacy = r#"{
        "title": "<emphasis>The Fox</emphasis>",
        "emoji": "🦊",
        "content": "Once upon a time."
    }"#;
    let story: FinalizedStory = serde_json::from_str(legacy)?;
    assert_eq!(story.title(), "The Fox");

    let partial = PartialStoryRecord {
        title: Some("The <break/>Fox".to_string()),
        emoji: Some("🦊".to_string()),
        content: Some("Once upon a time.".to_string()),
        ..Default::default()
    };
    assert_eq!(FinalizedStory::try_from(&partial)?.title(), "The Fox");
    Ok(())
}

#[test]
fn test_finalize_requires_title_emoji_content() {
    let partial = PartialStoryRecord {
        title: Some("The Fox".to_string()),
        content: Some("   ".to_string()),
        ..Default::default()
    };

    let err = FinalizedStory::try_from(&partial).unwrap_err();
    match err.kind {
        GenerationErrorKind::SchemaViolation(message) => {
            assert!(message.contains("emoji"));
            assert!(message.contains("content"));
            assert!(!message.contains("title"));
        }
        other => panic!("unexpected kind: {}", other),
    }
}

#[test]
fn test_newly_populated_ignores_blank_values() {
    let previous = PartialStoryRecord {
        title: Some("The Fox".to_string()),
        ..Default::default()
    };
    let next = PartialStoryRecord {
        title: Some("The Fox".to_string()),
        emoji: Some("🦊".to_string()),
        content: Some("".to_string()),
        ..Default::default()
    };

    assert_eq!(next.newly_populated(&previous), vec![StoryField::Emoji]);
    assert!(!next.is_populated(StoryField::Content));
}

#[test]
fn test_round_trip_through_partial_keeps_optional_fields() {
    let partial = PartialStoryRecord {
        title: Some("Moon Boat".to_string()),
        emoji: Some("🌙".to_string()),
        content: Some("They sailed.".to_string()),
        markup_content: None,
        illustration_description: Some("A paper boat on a silver lake".to_string()),
    };

    let story = FinalizedStory::try_from(&partial).unwrap();
    assert_eq!(story.narration_text(), "They sailed.");
    assert_eq!(PartialStoryRecord::from(&story), partial);
}

#[test]
fn test_field_wire_names_round_trip() {
    for name in ["title", "emoji", "content", "markupContent", "illustrationDescription"] {
        let field = StoryField::from_wire_name(name).unwrap();
        assert_eq!(field.wire_name(), name);
        assert_eq!(field.to_string(), name);
    }
    assert!(StoryField::from_wire_name("moral").is_none());
}
