/// The operations the player needs from a media playback primitive.
///
/// Commands are fire-and-forget: outcomes come back as `MediaUpdate`s on the
/// channel the element was created with.
pub trait MediaElement {
    /// Replace the current source. Does not start playback.
    fn set_source(&mut self, uri: &str);
    /// Load generation of the current source. Every `set_source` bumps it.
    fn generation(&self) -> u64;
    fn play(&mut self);
    fn pause(&mut self);
    /// Current position in seconds.
    fn current_time(&self) -> f64;
    /// Move the position to `seconds`.
    fn set_current_time(&mut self, seconds: f64);
    /// Length of the current source in seconds, `None` until metadata is known.
    fn duration(&self) -> Option<f64>;
    /// Output level in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}
