//! The player controller and the view model it keeps in sync.
//!
//! `Player` owns the playback state (current index, playing flag), drives a
//! `MediaElement`, and mirrors every change into a `View` that the UI draws.

mod controller;
mod time;
mod view;

pub use controller::*;
pub use time::format_time;
pub use view::*;

#[cfg(test)]
mod tests;
