//! Streaming-service simulator
//!
//! Reads a library file and a timestamped command stream, replays the
//! commands through [`airwaves_playback`] and renders one JSON object per
//! command.

pub mod dispatch;
pub mod input;
pub mod output;

pub use dispatch::Simulator;
pub use input::{CommandInput, LibraryInput};
