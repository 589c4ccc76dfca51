/// Notifications published to `Coordinator::subscribe` receivers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The leader's observed playing state changed; followers were told to match.
    PlayingChanged(bool),
    /// The leader's duration became known (or changed).
    DurationKnown(f64),
    /// A track's source failed. The rest of the session keeps going.
    TrackFailed {
        index: usize,
        id: String,
        reason: String,
    },
    /// The session was torn down; no further events follow.
    Disposed,
}
