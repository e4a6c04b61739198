//! A narration engine that paces word boundaries on a clock.
//!
//! It produces no audio. Word boundaries are emitted at the pace a narrator
//! would reach them, which is enough to drive highlighting in a terminal and
//! to exercise the sequencer without a speech backend.

use bedtime_core::{tag_spans, TextRange, VoiceProfile, WordBoundaryEvent};
use bedtime_error::{NarrationError, NarrationErrorKind, NarrationResult};
use bedtime_interface::{NarrationEngine, NarrationEvent, NarrationEvents};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, instrument};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Control {
    utterance: u64,
    playback: Playback,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Word(TextRange),
    Pause(Duration),
}

/// Clock-driven [`NarrationEngine`].
///
/// Speaks at `words_per_minute` scaled by the voice rate. Markup tags are not
/// vocalized; a `<break time="...">` adds its pause. Pausing takes effect at
/// the next word and resumes from there.
#[derive(Debug)]
pub struct PacedNarrationEngine {
    words_per_minute: u32,
    control: watch::Sender<Control>,
    utterances: AtomicU64,
}

impl PacedNarrationEngine {
    /// Create an engine speaking `words_per_minute` at rate 1.0.
    pub fn new(words_per_minute: u32) -> Self {
        let (control, _) = watch::channel(Control {
            utterance: 0,
            playback: Playback::Stopped,
        });
        Self {
            words_per_minute,
            control,
            utterances: AtomicU64::new(0),
        }
    }

    fn word_delay(&self, voice: &VoiceProfile) -> Duration {
        let words_per_second = f64::from(self.words_per_minute) * f64::from(voice.rate) / 60.0;
        Duration::from_secs_f64(1.0 / words_per_second)
    }

    fn set_playback(&self, from: Playback, to: Playback) {
        self.control.send_modify(|control| {
            if control.playback == from {
                control.playback = to;
            }
        });
    }
}

impl Default for PacedNarrationEngine {
    fn default() -> Self {
        Self::new(150)
    }
}

/// Words and pauses of `text`, in speaking order, skipping markup.
fn steps(text: &str) -> Vec<Step> {
    fn push_words(segment: &str, base: usize, steps: &mut Vec<Step>) {
        for (offset, word) in segment.split_word_bound_indices() {
            if word.chars().any(char::is_alphanumeric) {
                steps.push(Step::Word(TextRange::new(base + offset, word.len())));
            }
        }
    }

    let mut steps = Vec::new();
    let mut position = 0;
    for tag in tag_spans(text) {
        push_words(&text[position..tag.range.start], position, &mut steps);
        if let Some(pause) = tag.break_time() {
            steps.push(Step::Pause(pause));
        }
        position = tag.range.end;
    }
    push_words(&text[position..], position, &mut steps);
    steps
}

impl NarrationEngine for PacedNarrationEngine {
    #[instrument(skip(self, text), fields(chars = text.len(), voice = %voice.voice_id))]
    fn speak(&self, text: &str, voice: &VoiceProfile) -> NarrationResult<NarrationEvents> {
        if self.words_per_minute == 0 || !voice.rate.is_finite() || voice.rate <= 0.0 {
            return Err(NarrationError::new(NarrationErrorKind::EngineRefused(format!(
                "cannot speak at {} wpm with rate {}",
                self.words_per_minute, voice.rate
            ))));
        }
        let steps = steps(text);
        if steps.is_empty() {
            return Err(NarrationError::new(NarrationErrorKind::EngineRefused(
                "no speakable words".to_string(),
            )));
        }

        let utterance = self.utterances.fetch_add(1, Ordering::SeqCst) + 1;
        self.control.send_replace(Control {
            utterance,
            playback: Playback::Playing,
        });
        let mut control = self.control.subscribe();
        let delay = self.word_delay(voice);
        debug!(utterance, words = steps.len(), ?delay, "Speaking");

        let events = async_stream::stream! {
            let mut sequence = 0u64;
            let mut interrupted = false;
            'steps: for step in steps {
                loop {
                    let current = *control.borrow_and_update();
                    if current.utterance != utterance || current.playback == Playback::Stopped {
                        interrupted = true;
                        break 'steps;
                    }
                    if current.playback == Playback::Playing {
                        break;
                    }
                    if control.changed().await.is_err() {
                        interrupted = true;
                        break 'steps;
                    }
                }
                match step {
                    Step::Word(range) => {
                        yield NarrationEvent::WordBoundary(WordBoundaryEvent { sequence, range });
                        sequence += 1;
                        tokio::time::sleep(delay).await;
                    }
                    Step::Pause(pause) => tokio::time::sleep(pause).await,
                }
            }
            if !interrupted {
                yield NarrationEvent::PhaseComplete;
            }
        };
        Ok(Box::pin(events))
    }

    fn pause(&self) {
        self.set_playback(Playback::Playing, Playback::Paused);
    }

    fn resume(&self) {
        self.set_playback(Playback::Paused, Playback::Playing);
    }

    fn stop(&self) {
        self.control.send_modify(|control| control.playback = Playback::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_skip_markup_and_keep_pauses() {
        let text = "<emphasis>Hi</emphasis> Sam, <break time=\"1s\"/> hello!";
        let steps = steps(text);
        assert_eq!(
            steps,
            vec![
                Step::Word(TextRange::new(10, 2)),
                Step::Word(TextRange::new(24, 3)),
                Step::Pause(Duration::from_secs(1)),
                Step::Word(TextRange::new(text.find("hello").unwrap(), 5)),
            ]
        );
    }

    #[test]
    fn test_faster_voice_shortens_delay() {
        let engine = PacedNarrationEngine::new(120);
        let slow = VoiceProfile { voice_id: "a".into(), rate: 0.5, pitch: 1.0 };
        let fast = VoiceProfile { voice_id: "a".into(), rate: 2.0, pitch: 1.0 };
        assert_eq!(engine.word_delay(&slow), Duration::from_secs(1));
        assert_eq!(engine.word_delay(&fast), Duration::from_millis(250));
    }

    #[test]
    fn test_refuses_invalid_rate() {
        let engine = PacedNarrationEngine::default();
        let voice = VoiceProfile { voice_id: "a".into(), rate: 0.0, pitch: 1.0 };
        assert!(engine.speak("Hello", &voice).is_err());
    }
}
