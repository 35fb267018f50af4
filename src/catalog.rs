//! The fixed, ordered list of playable tracks.
//!
//! A `Catalog` is built once at startup (from the config file or the
//! builtin list) and shared read-only with the player for the whole session.

mod load;
mod model;

pub use model::*;
