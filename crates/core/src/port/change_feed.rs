// Change Notification Port

use crate::domain::TicketId;
use tokio::sync::broadcast;

/// Buffered notifications per subscriber before it starts lagging.
/// Lagging is harmless: projections recompute from the full ticket set.
const CHANGE_BUFFER_SIZE: usize = 256;

/// A committed change to the ticket collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Created(TicketId),
    Updated(TicketId),
    /// Every ticket was deleted
    Cleared,
}

/// Receiving side of a store's change notifications
pub type ChangeFeed = broadcast::Receiver<ChangeEvent>;

/// Fan-out of change notifications, owned by a store adapter
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_BUFFER_SIZE);
        Self { tx }
    }

    /// Publish a committed change; a store with no subscribers drops it
    pub fn notify(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }

    /// Publish several changes in commit order
    pub fn notify_all(&self, events: impl IntoIterator<Item = ChangeEvent>) {
        for event in events {
            self.notify(event);
        }
    }

    pub fn subscribe(&self) -> ChangeFeed {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let notifier = ChangeNotifier::new();
        let mut feed = notifier.subscribe();

        notifier.notify_all([
            ChangeEvent::Created("a".to_string()),
            ChangeEvent::Updated("a".to_string()),
            ChangeEvent::Cleared,
        ]);

        assert_eq!(feed.recv().await.unwrap(), ChangeEvent::Created("a".to_string()));
        assert_eq!(feed.recv().await.unwrap(), ChangeEvent::Updated("a".to_string()));
        assert_eq!(feed.recv().await.unwrap(), ChangeEvent::Cleared);
    }

    #[test]
    fn test_notify_without_subscribers_is_noop() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.notify(ChangeEvent::Cleared);
    }
}
