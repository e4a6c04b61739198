//! Integration tests for the story screen.

use bedtime::{
    AgeBracket, BedtimeErrorKind, GenerationController, InMemoryStoryLibrary, LibraryErrorKind,
    NarrationPhase, NarrationSequencer, PacedNarrationEngine, RegeneratePolicy, ReplayStoryModel,
    SequencerEvent, StoryLibrary, StoryRequestParameters, StoryScreen, UnavailableReason,
};
use serde_json::json;
use std::sync::Arc;

fn params() -> StoryRequestParameters {
    StoryRequestParameters::builder()
        .child_name("Pip")
        .age(AgeBracket::Toddler)
        .setting("a starry hill")
        .build()
        .unwrap()
}

fn model() -> ReplayStoryModel {
    ReplayStoryModel::new(vec![
        json!({"title": "The Fox"}),
        json!({"title": "The Fox", "emoji": "🦊"}),
        json!({
            "title": "The Fox",
            "emoji": "🦊",
            "content": "Pip counted stars.",
            "markupContent": "Pip <emphasis>counted</emphasis> stars."
        }),
    ])
}

fn new_screen(model: ReplayStoryModel) -> StoryScreen<ReplayStoryModel, PacedNarrationEngine> {
    StoryScreen::new(
        GenerationController::new(model),
        NarrationSequencer::new(PacedNarrationEngine::new(600)),
        params(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_generate_then_narrate() -> anyhow::Result<()> {
    let mut screen = new_screen(model());
    let story = screen.generate().await?.expect("completed");
    assert_eq!(screen.current(), Some(&story));

    screen.narrate_current(None)?;
    assert_eq!(
        screen.sequencer().voice().map(|v| v.voice_id.as_str()),
        Some("storyteller-soft")
    );

    let mut words = Vec::new();
    while let Some(event) = screen.sequencer_mut().next_event().await {
        if let SequencerEvent::Highlight {
            phase: NarrationPhase::Body,
            range,
            ..
        } = event
        {
            words.push(range.slice(story.content()).unwrap().to_string());
        }
    }
    assert_eq!(words, vec!["Pip", "counted", "stars"]);
    assert_eq!(screen.sequencer().session().progress, 1.0);
    Ok(())
}

#[tokio::test]
async fn test_unavailable_model_surfaces_error() {
    let mut screen = new_screen(model().unavailable(UnavailableReason::ModelNotReady));
    let err = screen.generate().await.unwrap_err();
    assert!(matches!(err.kind(), BedtimeErrorKind::Generation(_)));
    assert!(screen.current().is_none());
}

#[tokio::test]
async fn test_regenerate_stops_narration_by_default() -> anyhow::Result<()> {
    let mut screen = new_screen(model());
    screen.generate().await?;
    screen.narrate_current(None)?;
    assert!(screen.sequencer().session().is_active());

    screen.regenerate("add an owl").await?;
    assert!(!screen.sequencer().session().is_active());
    Ok(())
}

#[tokio::test]
async fn test_regenerate_can_restart_narration() -> anyhow::Result<()> {
    let mut screen = new_screen(model()).with_regenerate_policy(RegeneratePolicy::RestartNarration);
    screen.generate().await?;

    screen.regenerate("add an owl").await?;
    assert!(screen.sequencer().session().is_active());
    assert_eq!(screen.sequencer().session().phase, NarrationPhase::Title);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_manually_stepped_story_can_be_narrated_and_saved() -> anyhow::Result<()> {
    let library = InMemoryStoryLibrary::new();
    let mut screen = new_screen(model()).with_library(Arc::new(library.clone()));

    screen.start().await?;
    while screen.controller_mut().next_event().await.is_some() {}

    let story = screen.current().cloned().expect("finalized by stepping");
    assert_eq!(story.title(), "The Fox");

    screen.narrate_current(None)?;
    assert_eq!(
        screen.sequencer_mut().next_event().await,
        Some(SequencerEvent::PhaseStarted(NarrationPhase::Title))
    );

    screen.save_current().await?;
    assert_eq!(library.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_narrate_without_story_fails() {
    let mut screen = new_screen(model());
    assert!(screen.narrate_current(None).is_err());
}

#[tokio::test]
async fn test_save_and_reopen() -> anyhow::Result<()> {
    let library = InMemoryStoryLibrary::new();
    let mut screen = new_screen(model()).with_library(Arc::new(library.clone()));
    let story = screen.generate().await?.expect("completed");

    let id = screen.save_current().await?;
    assert_eq!(library.len().await, 1);

    let mut other = new_screen(model()).with_library(Arc::new(library.clone()));
    let stored = other.open_saved(&id).await?;
    assert_eq!(stored.story(), &story);
    assert_eq!(other.current(), Some(&story));
    assert_eq!(other.parameters(), &params());

    // A reopened story can be regenerated.
    other.regenerate("make it shorter").await?;
    assert!(other.current().is_some());
    Ok(())
}

#[tokio::test]
async fn test_save_without_library_fails() -> anyhow::Result<()> {
    let mut screen = new_screen(model());
    screen.generate().await?;
    let err = screen.save_current().await.unwrap_err();
    match err.kind() {
        BedtimeErrorKind::Library(library) => {
            assert!(matches!(library.kind(), LibraryErrorKind::Storage(_)));
        }
        other => panic!("expected library error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_library_returns_not_found() {
    let library = InMemoryStoryLibrary::new();
    let err = library.get(&bedtime::StoryId::new()).await.unwrap_err();
    assert!(matches!(err.kind(), BedtimeErrorKind::Library(_)));
    assert!(library.delete(&bedtime::StoryId::new()).await.is_err());
}
