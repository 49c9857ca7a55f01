//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A trait that abstracts the sending of user events.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

/// Implement the trait for a tokio channel sender, which the binary and the
/// tests use to collect events.
impl EventProxy for UnboundedSender<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        if let Err(e) = self.send(event) {
            tracing::warn!("Failed to send event, receiver dropped: {}", e);
        }
    }
}
