//! Narration phase sequencing: title, then body, then idle.

use crate::WordBoundaryMapper;
use bedtime_core::{
    AgeBracket, FinalizedStory, NarrationPhase, NarrationSession, PlaybackState, TextRange,
    VoiceProfile, VoiceTable, WordBoundaryEvent,
};
use bedtime_error::{NarrationError, NarrationErrorKind, NarrationResult};
use bedtime_interface::{NarrationEngine, NarrationEvent, NarrationEvents};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

/// A change published by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// The engine started reading a phase
    PhaseStarted(NarrationPhase),
    /// A word is being spoken
    Highlight {
        /// Phase the word belongs to
        phase: NarrationPhase,
        /// Word span in the displayed text
        range: TextRange,
        /// Body progress in `[0, 1]`; always 0 during the title
        progress: f64,
    },
    /// A phase finished naturally
    PhaseCompleted {
        /// The finished phase
        phase: NarrationPhase,
        /// Body progress after the phase; exactly 1.0 after the body
        progress: f64,
    },
    /// The whole story has been read
    Finished,
    /// Playback paused
    Paused,
    /// Playback resumed
    Resumed,
    /// The session was stopped by the caller
    Stopped,
    /// The engine failed; the sequencer is idle again
    Failed(NarrationError),
}

#[derive(Debug, Clone)]
struct PhaseText {
    engine: String,
    display: String,
}

struct ActivePhase {
    phase: NarrationPhase,
    display: String,
    display_chars: usize,
    mapper: WordBoundaryMapper,
    events: NarrationEvents,
    last_sequence: Option<u64>,
}

/// Reads a story aloud: the title, then the body without pause, then idle.
///
/// Pull-driven like the generation controller: [`speak`](Self::speak) starts
/// the engine without blocking, and [`next_event`](Self::next_event) consumes
/// engine events, mapping word boundaries onto the displayed text. Only one
/// session is ever active; speaking again stops the previous one first.
pub struct NarrationSequencer<E: NarrationEngine> {
    engine: E,
    voices: VoiceTable,
    phase_gap: Duration,
    session: NarrationSession,
    voice: Option<VoiceProfile>,
    active: Option<ActivePhase>,
    pending_body: Option<PhaseText>,
    cancel: CancellationToken,
    outbox: VecDeque<SequencerEvent>,
    subscribers: Vec<mpsc::UnboundedSender<SequencerEvent>>,
}

impl<E: NarrationEngine> NarrationSequencer<E> {
    /// Create a sequencer with the default voice table.
    pub fn new(engine: E) -> Self {
        Self::with_voices(engine, VoiceTable::default())
    }

    /// Create a sequencer with a configured voice table.
    pub fn with_voices(engine: E, voices: VoiceTable) -> Self {
        Self {
            engine,
            voices,
            phase_gap: Duration::ZERO,
            session: NarrationSession::default(),
            voice: None,
            active: None,
            pending_body: None,
            cancel: CancellationToken::new(),
            outbox: VecDeque::new(),
            subscribers: Vec::new(),
        }
    }

    /// Wait this long between title and body.
    pub fn with_phase_gap(mut self, gap: Duration) -> Self {
        self.phase_gap = gap;
        self
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Current session state.
    pub fn session(&self) -> &NarrationSession {
        &self.session
    }

    /// Voice the current session speaks with.
    pub fn voice(&self) -> Option<&VoiceProfile> {
        self.voice.as_ref()
    }

    /// Voice for an age bracket, unless the caller names one.
    pub fn voice_for(&self, age: AgeBracket, explicit: Option<&VoiceProfile>) -> VoiceProfile {
        self.voices.profile_for(age, explicit)
    }

    /// Token of the current session.
    ///
    /// Cancelling it from any task stops the session at the next await inside
    /// [`next_event`](Self::next_event), which then yields
    /// [`SequencerEvent::Stopped`]. Each call to [`speak`](Self::speak) starts
    /// a fresh token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive every event published from now on, in order.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SequencerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start reading `title` and then `content`.
    ///
    /// The body is spoken from `markup` when it is present and non-blank,
    /// and highlights are always mapped onto `content`. Does not block.
    ///
    /// # Errors
    ///
    /// Fails when both texts are empty, or when the engine refuses the text
    /// or voice; the sequencer is idle afterwards.
    #[instrument(skip_all, fields(voice = %voice.voice_id, has_markup = markup.is_some()))]
    pub fn speak(
        &mut self,
        title: &str,
        content: &str,
        markup: Option<&str>,
        voice: &VoiceProfile,
    ) -> NarrationResult<()> {
        self.stop();

        let title = title.trim();
        let content = content.trim();
        if title.is_empty() && content.is_empty() {
            return Err(NarrationError::new(NarrationErrorKind::EmptyText));
        }

        self.cancel = CancellationToken::new();
        self.voice = Some(voice.clone());
        self.session = NarrationSession::default();
        self.pending_body = (!content.is_empty()).then(|| PhaseText {
            engine: markup
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(content)
                .to_string(),
            display: content.to_string(),
        });

        let started = if title.is_empty() {
            let body = self.pending_body.take();
            self.begin_body(body)
        } else {
            self.begin_phase(
                NarrationPhase::Title,
                PhaseText {
                    engine: title.to_string(),
                    display: title.to_string(),
                },
            )
        };

        started.map_err(|err| {
            self.fail(err.clone());
            err
        })
    }

    /// Read a finalized story with the voice for `age`, or `explicit` when given.
    ///
    /// # Errors
    ///
    /// See [`speak`](Self::speak).
    pub fn speak_story(
        &mut self,
        story: &FinalizedStory,
        age: AgeBracket,
        explicit: Option<&VoiceProfile>,
    ) -> NarrationResult<()> {
        let voice = self.voice_for(age, explicit);
        self.speak(
            story.title(),
            story.content(),
            story.markup_content().as_deref(),
            &voice,
        )
    }

    fn begin_body(&mut self, body: Option<PhaseText>) -> NarrationResult<()> {
        match body {
            Some(body) => self.begin_phase(NarrationPhase::Body, body),
            None => Err(NarrationError::new(NarrationErrorKind::EmptyText)),
        }
    }

    fn begin_phase(&mut self, phase: NarrationPhase, text: PhaseText) -> NarrationResult<()> {
        let voice = self
            .voice
            .clone()
            .ok_or_else(|| NarrationError::new(NarrationErrorKind::NoActiveSession))?;
        // A pause taken before the handoff carries over into the body.
        let held = self.session.playback == PlaybackState::Paused;
        let events = self.engine.speak(&text.engine, &voice)?;
        if held {
            self.engine.pause();
        }

        info!(%phase, chars = text.display.len(), held, "Narration phase started");
        self.active = Some(ActivePhase {
            phase,
            display_chars: text.display.chars().count(),
            mapper: WordBoundaryMapper::new(&text.engine, &text.display),
            display: text.display,
            events,
            last_sequence: None,
        });
        self.session.phase = phase;
        if !held {
            self.session.playback = PlaybackState::Playing;
        }
        self.session.highlight = None;
        self.publish(SequencerEvent::PhaseStarted(phase));
        Ok(())
    }

    /// Consume engine events until something observable happens.
    ///
    /// Returns `None` when no session is active and nothing is queued.
    pub async fn next_event(&mut self) -> Option<SequencerEvent> {
        loop {
            if let Some(event) = self.outbox.pop_front() {
                return Some(event);
            }
            let cancel = self.cancel.clone();
            let next = {
                let active = self.active.as_mut()?;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    event = active.events.next() => Some(event),
                }
            };

            match next {
                None => self.stop(),
                Some(Some(NarrationEvent::WordBoundary(event))) => self.on_boundary(event),
                Some(Some(NarrationEvent::PhaseComplete)) | Some(None) => {
                    self.on_phase_complete().await
                }
                Some(Some(NarrationEvent::Failed(err))) => self.fail(err),
            }
        }
    }

    /// Play until the story is finished, stopped or failed.
    ///
    /// # Errors
    ///
    /// Returns the engine failure that ended the session.
    pub async fn run_to_completion(&mut self) -> NarrationResult<()> {
        while let Some(event) = self.next_event().await {
            if let SequencerEvent::Failed(err) = event {
                return Err(err);
            }
        }
        Ok(())
    }

    fn on_boundary(&mut self, event: WordBoundaryEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.last_sequence.is_some_and(|last| event.sequence <= last) {
            trace!(sequence = event.sequence, "Ignoring stale word boundary");
            return;
        }
        active.last_sequence = Some(event.sequence);

        let range = active.mapper.map(event.range);
        let phase = active.phase;
        if phase == NarrationPhase::Body && active.display_chars > 0 {
            let spoken = active
                .display
                .get(..range.start)
                .map_or(0, |before| before.chars().count());
            let fraction = (spoken as f64 / active.display_chars as f64).clamp(0.0, 1.0);
            self.session.progress = self.session.progress.max(fraction);
        }
        self.session.highlight = Some(range);
        let progress = self.session.progress;
        self.publish(SequencerEvent::Highlight {
            phase,
            range,
            progress,
        });
    }

    async fn on_phase_complete(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        debug!(phase = %active.phase, "Narration phase complete");

        if active.phase == NarrationPhase::Body {
            self.session.progress = 1.0;
        }
        self.publish(SequencerEvent::PhaseCompleted {
            phase: active.phase,
            progress: self.session.progress,
        });

        if active.phase == NarrationPhase::Title
            && let Some(body) = self.pending_body.take()
        {
            if !self.phase_gap.is_zero() {
                tokio::time::sleep(self.phase_gap).await;
            }
            if let Err(err) = self.begin_phase(NarrationPhase::Body, body) {
                self.fail(err);
            }
            return;
        }

        info!("Narration finished");
        self.session.phase = NarrationPhase::Idle;
        self.session.playback = PlaybackState::Stopped;
        self.session.highlight = None;
        self.publish(SequencerEvent::Finished);
    }

    /// Hold the current word position.
    ///
    /// # Errors
    ///
    /// Fails when nothing is being narrated.
    pub fn pause(&mut self) -> NarrationResult<()> {
        if !self.session.is_active() {
            return Err(NarrationError::new(NarrationErrorKind::NoActiveSession));
        }
        if self.session.playback == PlaybackState::Playing {
            self.engine.pause();
            self.session.playback = PlaybackState::Paused;
            self.publish(SequencerEvent::Paused);
        }
        Ok(())
    }

    /// Continue from the held position.
    ///
    /// # Errors
    ///
    /// Fails when nothing is being narrated.
    pub fn resume(&mut self) -> NarrationResult<()> {
        if !self.session.is_active() {
            return Err(NarrationError::new(NarrationErrorKind::NoActiveSession));
        }
        if self.session.playback == PlaybackState::Paused {
            self.engine.resume();
            self.session.playback = PlaybackState::Playing;
            self.publish(SequencerEvent::Resumed);
        }
        Ok(())
    }

    /// Silence the engine, tear down the active phase and clear the highlight.
    ///
    /// Calling it with nothing active does nothing.
    pub fn stop(&mut self) {
        if self.active.is_none() && !self.session.is_active() {
            return;
        }
        info!(phase = %self.session.phase, "Narration stopped");
        self.engine.stop();
        self.cancel.cancel();
        self.active = None;
        self.pending_body = None;
        self.session.phase = NarrationPhase::Idle;
        self.session.playback = PlaybackState::Stopped;
        self.session.highlight = None;
        self.publish(SequencerEvent::Stopped);
    }

    fn fail(&mut self, err: NarrationError) {
        warn!(error = %err, "Narration failed");
        if self.active.is_some() {
            self.engine.stop();
        }
        self.cancel.cancel();
        self.active = None;
        self.pending_body = None;
        self.session = NarrationSession::default();
        self.publish(SequencerEvent::Failed(err));
    }

    fn publish(&mut self, event: SequencerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        self.outbox.push_back(event);
    }
}

impl<E: NarrationEngine> Drop for NarrationSequencer<E> {
    fn drop(&mut self) {
        if self.active.is_some() {
            self.engine.stop();
        }
        self.cancel.cancel();
    }
}
