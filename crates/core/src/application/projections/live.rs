// Live projections kept current from the store's change feed

use crate::application::projections::QueueSnapshot;
use crate::application::shutdown::ShutdownToken;
use crate::domain::Ticket;
use crate::error::Result;
use crate::port::TicketStore;
use std::sync::Arc;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Last computed projections, republished whenever the ticket set changes.
///
/// Every notification triggers a full recomputation from `list_all`; the only
/// state held here is the last published value of each view.
pub struct LiveProjections {
    store: Arc<dyn TicketStore>,
    current: watch::Sender<Option<Ticket>>,
    waiting: watch::Sender<Vec<Ticket>>,
    all: watch::Sender<Vec<Ticket>>,
}

impl LiveProjections {
    pub fn new(store: Arc<dyn TicketStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            current: watch::Sender::new(None),
            waiting: watch::Sender::new(Vec::new()),
            all: watch::Sender::new(Vec::new()),
        })
    }

    /// Create and start the refresh loop in the background
    pub fn start(store: Arc<dyn TicketStore>, shutdown: ShutdownToken) -> (Arc<Self>, JoinHandle<()>) {
        let projections = Self::new(store);
        let handle = tokio::spawn(Arc::clone(&projections).run(shutdown));
        (projections, handle)
    }

    /// Recompute all views from the store and publish the ones that changed
    pub async fn refresh(&self) -> Result<()> {
        let tickets = self.store.list_all().await?;
        let snapshot = QueueSnapshot::from_tickets(&tickets);

        publish(&self.current, snapshot.current);
        publish(&self.waiting, snapshot.waiting);
        publish(&self.all, snapshot.all);
        Ok(())
    }

    /// Refresh loop: runs until shutdown or until the store's feed closes
    pub async fn run(self: Arc<Self>, mut shutdown: ShutdownToken) {
        // Subscribe before the first read so no change slips in between
        let mut feed = self.store.changes();
        self.refresh_logged().await;
        info!("Live projections started");

        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    info!("Live projections stopping");
                    break;
                }
                event = feed.recv() => match event {
                    Ok(event) => {
                        debug!(?event, "Ticket set changed");
                        drain(&mut feed);
                        self.refresh_logged().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Change feed lagged, recomputing");
                        drain(&mut feed);
                        self.refresh_logged().await;
                    }
                    Err(RecvError::Closed) => {
                        info!("Change feed closed, live projections stopping");
                        break;
                    }
                }
            }
        }
    }

    async fn refresh_logged(&self) {
        if let Err(e) = self.refresh().await {
            // Keep serving the last good views until the next notification
            error!(error = %e, "Failed to refresh live projections");
        }
    }

    /// Last computed views in one value
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current: self.current.borrow().clone(),
            waiting: self.waiting.borrow().clone(),
            all: self.all.borrow().clone(),
        }
    }

    pub fn watch_current(&self) -> watch::Receiver<Option<Ticket>> {
        self.current.subscribe()
    }

    pub fn watch_waiting(&self) -> watch::Receiver<Vec<Ticket>> {
        self.waiting.subscribe()
    }

    pub fn watch_all(&self) -> watch::Receiver<Vec<Ticket>> {
        self.all.subscribe()
    }

    /// Invoke `callback` with the serving ticket now and whenever it changes
    pub fn subscribe_current<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Option<Ticket>) + Send + 'static,
    {
        Subscription::spawn(self.watch_current(), callback)
    }

    /// Invoke `callback` with the ordered waiting list now and whenever it changes
    pub fn subscribe_waiting<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<Ticket>) + Send + 'static,
    {
        Subscription::spawn(self.watch_waiting(), callback)
    }

    /// Invoke `callback` with every ticket (newest first) now and whenever it changes
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<Ticket>) + Send + 'static,
    {
        Subscription::spawn(self.watch_all(), callback)
    }
}

fn publish<T: PartialEq>(sender: &watch::Sender<T>, value: T) {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

/// Collapse a burst of notifications into one recomputation
fn drain(feed: &mut crate::port::ChangeFeed) {
    loop {
        match feed.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

/// Handle to a callback subscription; delivery stops on `unsubscribe` or drop
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    fn spawn<T, F>(mut rx: watch::Receiver<T>, mut callback: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let initial = rx.borrow_and_update().clone();
            callback(initial);
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                callback(value);
            }
        });
        Self { handle }
    }

    /// Stop delivering updates
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
