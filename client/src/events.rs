//! In-process account event fan-out.
//!
//! Components that cache account state (the navigation bar's profile
//! badge, dashboards) subscribe here instead of listening for ambient
//! window events. Publishing is fire-and-forget: events sent with no
//! subscribers are dropped.

use tokio::sync::broadcast;

/// Events that invalidate cached account state elsewhere in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEvent {
    /// A user finished registration; profile data must be refetched.
    RegistrationCompleted,
    /// Profile fields changed.
    ProfileUpdated,
}

/// Broadcast channel for [`AccountEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AccountEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: AccountEvent) {
        // An Err here only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
