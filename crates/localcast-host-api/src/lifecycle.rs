//! Application lifecycle hooks

/// The two inbound calls the backend supervisor needs from its host.
///
/// Any front-end — a desktop shell, a service manager, a test harness —
/// drives the supervisor through these hooks. Each is invoked exactly once,
/// on the host's main control thread: `on_launched` before the host becomes
/// interactive, `on_will_terminate` during shutdown. Implementations must
/// not panic; a missing or unstartable backend degrades functionality but
/// never takes the host down.
pub trait AppLifecycle {
    /// Host has finished launching: locate the backend and start it.
    fn on_launched(&self);

    /// Host is about to exit: stop the backend and release its handle.
    fn on_will_terminate(&self);
}
