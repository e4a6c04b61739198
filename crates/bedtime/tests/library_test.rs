//! Integration tests for the in-memory story library.

use bedtime::{
    AgeBracket, FinalizedStory, InMemoryStoryLibrary, PartialStoryRecord, StoredStory,
    StoryLibrary, StoryRequestParameters, contains_markup,
};

fn params() -> StoryRequestParameters {
    StoryRequestParameters::builder()
        .child_name("Ada")
        .age(AgeBracket::Preteen)
        .setting("a lighthouse")
        .build()
        .unwrap()
}

fn story(title: &str) -> FinalizedStory {
    FinalizedStory::try_from(&PartialStoryRecord {
        title: Some(title.to_string()),
        emoji: Some("🌊".to_string()),
        content: Some("The waves rolled in.".to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_save_list_delete() -> anyhow::Result<()> {
    let library = InMemoryStoryLibrary::new();
    assert!(library.is_empty().await);

    let first = library.save(&story("First"), &params()).await?;
    let second = library.save(&story("Second"), &params()).await?;
    assert_ne!(first, second);

    let stored = library.get(&second).await?;
    assert_eq!(stored.story().title(), "Second");
    assert_eq!(stored.parameters(), &params());

    let listed = library.list().await?;
    assert_eq!(listed.len(), 2);
    assert!(listed[0].saved_at() >= listed[1].saved_at());

    library.delete(&first).await?;
    assert_eq!(library.len().await, 1);
    assert!(library.get(&first).await.is_err());
    Ok(())
}

#[test]
fn test_legacy_stored_story_is_sanitized() -> anyhow::Result<()> {
    // Saved before content was kept plain.
    let saved = serde_json::json!({
        "id": "5f0e8a34-8c1b-4f3e-9a52-0d3c7b7f2a11",
        "story": {
            "title": "The Lighthouse",
            "emoji": "🌊",
            "content": "The waves <break time=\"1s\"/> rolled <emphasis>in</emphasis>.",
            "markupContent": null,
            "illustrationDescription": null
        },
        "parameters": {
            "child_name": "Ada",
            "age": "preteen",
            "pronouns": "unspecified",
            "tone": "gentle",
            "setting": "a lighthouse",
            "length": "medium",
            "notes": null
        },
        "saved_at": "2024-05-01T20:00:00Z"
    });

    let stored: StoredStory = serde_json::from_value(saved)?;
    assert_eq!(stored.story().content(), "The waves rolled in.");
    assert!(!contains_markup(stored.story().content()));
    Ok(())
}
