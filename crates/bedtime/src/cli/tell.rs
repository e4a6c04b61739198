//! Story telling command handler.

use super::commands::TellArgs;
use bedtime::{
    BedtimeConfig, GenerationController, GenerationEvent, NarrationPhase, NarrationSequencer,
    PacedNarrationEngine, PromptBuilder, ReplayStoryModel, SequencerEvent, StoryScreen,
};
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Generate a story from a recorded stream and optionally narrate it.
pub async fn tell_story(args: TellArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = BedtimeConfig::load()?;
    let params = args.story.parameters(&config)?;

    let mut model = ReplayStoryModel::from_jsonl(&args.script)?
        .with_item_delay(Duration::from_millis(args.item_delay_ms));
    if let Some(name) = config.generation().model() {
        model = model.named(name.clone());
    }
    let controller = GenerationController::with_prompts(model, PromptBuilder::from_config(&config));

    let words_per_minute = args
        .wpm
        .unwrap_or(*config.narration().words_per_minute());
    let sequencer = NarrationSequencer::with_voices(
        PacedNarrationEngine::new(words_per_minute),
        config.voices().clone(),
    )
    .with_phase_gap(Duration::from_millis(*config.narration().phase_gap_ms()));

    let mut screen = StoryScreen::new(controller, sequencer, params);
    info!(script = %args.script.display(), "Telling story");

    let mut updates = screen.controller_mut().subscribe();
    screen.start().await?;
    loop {
        while let Ok(event) = updates.try_recv() {
            print_generation(&event);
        }
        if screen.controller_mut().next_event().await.is_none() {
            break;
        }
    }
    let Some(story) = screen.finish().await? else {
        warn!("Generation was cancelled");
        return Ok(());
    };

    println!("\n{} {}\n", story.emoji(), story.title());
    println!("{}\n", story.content());

    if args.narrate {
        screen.narrate_current(None)?;
        while let Some(event) = screen.sequencer_mut().next_event().await {
            print_narration(&event, story.title(), story.content());
        }
        println!();
    }
    Ok(())
}

fn print_generation(event: &GenerationEvent) {
    match event {
        GenerationEvent::Snapshot {
            record,
            newly_populated,
        } => {
            for field in newly_populated {
                let value = record.field(*field).unwrap_or_default();
                println!("[{}] {}", field, first_line(value));
            }
        }
        GenerationEvent::ItemRejected(err) => println!("[skipped] {}", err.kind),
        GenerationEvent::Failed(err) => println!("[failed] {}", err.kind),
        GenerationEvent::Cancelled => println!("[cancelled]"),
        GenerationEvent::Completed(_) => {}
    }
}

fn print_narration(event: &SequencerEvent, title: &str, content: &str) {
    match event {
        SequencerEvent::PhaseStarted(NarrationPhase::Title) => print!("🔊 "),
        SequencerEvent::PhaseStarted(NarrationPhase::Body) => println!(),
        SequencerEvent::Highlight { phase, range, .. } => {
            let text = match phase {
                NarrationPhase::Title => title,
                _ => content,
            };
            if let Some(word) = range.slice(text) {
                print!("{} ", word);
                let _ = std::io::stdout().flush();
            }
        }
        SequencerEvent::PhaseCompleted {
            phase: NarrationPhase::Body,
            progress,
        } => print!("\n({:.0}%)", progress * 100.0),
        SequencerEvent::Failed(err) => println!("\n[narration failed] {}", err.kind),
        _ => {}
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
