//! Prompt and configuration inspection handlers.

use super::commands::StoryArgs;
use bedtime::{BedtimeConfig, FinalizedStory, PartialStoryRecord, PromptBuilder};

/// Print the prompt a request would send.
///
/// With `revise`, prints the regeneration prompt against a placeholder story.
pub fn show_prompt(
    story: StoryArgs,
    revise: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BedtimeConfig::load()?;
    let params = story.parameters(&config)?;
    let builder = PromptBuilder::from_config(&config);

    let prompt = match revise {
        Some(instruction) => {
            let placeholder = FinalizedStory::try_from(&PartialStoryRecord {
                title: Some("(previous title)".to_string()),
                emoji: Some("📖".to_string()),
                content: Some("(previous story)".to_string()),
                ..Default::default()
            })?;
            builder.regeneration_prompt(&params, &placeholder, instruction)
        }
        None => builder.story_prompt(&params),
    };

    println!("# Instructions\n\n{}\n", prompt.instructions);
    println!("# Prompt\n\n{}", prompt.prompt);
    if let Some(temperature) = prompt.temperature {
        println!("\n(temperature {})", temperature);
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn show_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = BedtimeConfig::load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
