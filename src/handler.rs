//! Robot handler seam
//!
//! The channel decodes and sequences commands; what a move physically means
//! belongs to the application. One `RobotHandlers` implementation is
//! injected when the channel is built and invoked from the channel's
//! processing context, so implementations may block briefly (servo bus
//! writes) but must not wait on the channel itself.

/// Capability set the application registers with the channel.
///
/// Handlers are infallible at this layer: the servo driver owns retry and
/// range clamping, and the channel has no wire form for handler failure.
pub trait RobotHandlers {
    /// Move all four legs.
    ///
    /// Angles are unified degrees; right-side reversal is the driver's
    /// business. Any post-move delay is applied by the channel after this
    /// returns, not by the handler.
    fn on_move(&mut self, fr: f32, fl: f32, br: f32, bl: f32, speed: u16);

    /// Move a single servo (keyed grammar). Default: ignore.
    fn on_move_single(&mut self, id: u8, angle: f32, speed: u16) {
        let _ = (id, angle, speed);
    }

    /// Return to the neutral stance.
    fn on_stance(&mut self);

    /// The client connected (`true`) or the connection ended (`false`).
    fn on_connection_change(&mut self, connected: bool);
}
