//! Boundary to the component that decodes and renders media.

pub mod simulated;

pub use simulated::SimulatedPlayer;

/// Notification raised by a media component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Loading/buffering started (`true`) or finished (`false`).
    LoadingChanged(bool),
    /// Playback failed.
    Error(String),
}

/// A media player the playback screen drives.
///
/// Buffering and decoding happen inside the component; the screen only sees
/// their effects through [`MediaComponent::poll_event`]. Positions and
/// durations are in milliseconds.
pub trait MediaComponent {
    fn load_source(&mut self, uri: &str);

    fn prepare(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    fn seek_to(&mut self, position_ms: u64);

    fn current_position(&self) -> u64;

    /// Media duration, `None` while unknown.
    fn duration(&self) -> Option<u64>;

    /// Free decoder resources. Called exactly once per instance.
    fn release(&mut self);

    /// Next pending notification, oldest first.
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

/// Receiver of media component notifications.
pub trait PlayerListener {
    fn on_loading_changed(&mut self, loading: bool);

    fn on_error(&mut self, message: &str);
}

/// Deliver `event` to `listener`.
pub fn dispatch(listener: &mut impl PlayerListener, event: MediaEvent) {
    match event {
        MediaEvent::LoadingChanged(loading) => listener.on_loading_changed(loading),
        MediaEvent::Error(message) => listener.on_error(&message),
    }
}
