//! Tests for illustration requests and replay scripts.

use async_trait::async_trait;
use bedtime_core::{FinalizedStory, PartialStoryRecord};
use bedtime_error::BedtimeResult;
use bedtime_generation::{request_illustration, ReplayStoryModel};
use bedtime_interface::{Illustration, IllustrationProvider, StoryModel, StoryPrompt, StorySchema};
use futures_util::StreamExt;
use std::io::Write;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingProvider {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl IllustrationProvider for RecordingProvider {
    async fn illustrate(&self, prompt: &str) -> BedtimeResult<Option<Illustration>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(Some(Illustration {
            mime: "image/png".to_string(),
            data: vec![0x89, b'P', b'N', b'G'],
        }))
    }
}

fn story(description: Option<&str>) -> FinalizedStory {
    FinalizedStory::try_from(&PartialStoryRecord {
        title: Some("The Fox".to_string()),
        emoji: Some("🦊".to_string()),
        content: Some("Once upon a time...".to_string()),
        illustration_description: description.map(str::to_string),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_description_is_passed_through() -> anyhow::Result<()> {
    let provider = RecordingProvider::default();
    let image = request_illustration(&provider, &story(Some(" A fox on a hill ")))
        .await?
        .expect("image");

    assert_eq!(image.mime, "image/png");
    assert_eq!(*provider.prompts.lock().unwrap(), vec!["A fox on a hill"]);
    Ok(())
}

#[tokio::test]
async fn test_missing_description_skips_provider() -> anyhow::Result<()> {
    let provider = RecordingProvider::default();
    assert!(request_illustration(&provider, &story(None)).await?.is_none());
    assert!(request_illustration(&provider, &story(Some("  "))).await?.is_none());
    assert!(provider.prompts.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_jsonl_script_replays_in_order() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile()?;
    writeln!(file, "{{\"title\": \"The Fox\"}}")?;
    writeln!(file)?;
    writeln!(file, "not json")?;
    writeln!(file, "{{\"emoji\": \"🦊\"}}")?;

    let model = ReplayStoryModel::from_jsonl(file.path())?;
    let prompt = StoryPrompt {
        instructions: String::new(),
        prompt: "tell".to_string(),
        temperature: None,
    };
    let items: Vec<_> = model
        .open_stream(&prompt, &StorySchema::story())
        .await?
        .collect()
        .await;

    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    assert!(items[1].as_ref().unwrap_err().kind.is_item_level());
    assert!(items[2].is_ok());
    assert_eq!(model.prompts(), vec![prompt]);
    Ok(())
}

#[tokio::test]
async fn test_missing_script_is_an_error() {
    assert!(ReplayStoryModel::from_jsonl("/nonexistent/story.jsonl").is_err());
}
