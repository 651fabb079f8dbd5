//! Session lifecycle events
//!
//! The client never navigates anywhere itself. When credentials are lost it
//! emits [`SessionEvent::Invalidated`] and the application decides where the
//! user goes next (typically the login screen).

use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Why the stored session was purged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// A 401 arrived and there was no refresh token to exchange
    MissingRefreshToken,
    /// The refresh endpoint answered with an error or an unreadable body
    RefreshRejected,
    /// The refresh endpoint could not be reached
    RefreshUnreachable,
    /// The request was still unauthorized after a successful refresh
    RetryUnauthorized,
    /// The refresh token could not be read from the session store
    StoreUnreadable,
}

/// Session lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    TokenRefreshed,
    LoggedOut,
    Invalidated(InvalidationReason),
}

/// Broadcast hub for session events
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribe to every event emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        if self.sender.send(event.clone()).is_err() {
            trace!(?event, "No session event subscribers");
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
