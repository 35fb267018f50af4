//! The media playback element: the player's only route to actual sound.
//!
//! `MediaElement` is the seam the player programs against. `AudioElement`
//! implements it with a dedicated `rodio` audio thread that reports back
//! through a channel of generation-stamped `MediaUpdate`s.

mod element;
mod player;
mod sink;
mod source;
mod thread;
mod types;

pub use element::MediaElement;
pub use player::AudioElement;
pub use types::*;
