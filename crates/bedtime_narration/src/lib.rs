//! Story narration for bedtime.
//!
//! Reads a finished story aloud through a [`NarrationEngine`], title first and
//! then the body, and turns the engine's word-boundary reports into highlight
//! ranges on the plain text the listener sees.
//!
//! [`NarrationEngine`]: bedtime_interface::NarrationEngine

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mapper;
mod paced;
mod sequencer;

pub use mapper::{map_range, WordBoundaryMapper};
pub use paced::PacedNarrationEngine;
pub use sequencer::{NarrationSequencer, SequencerEvent};
