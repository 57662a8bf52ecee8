/// Broadcast publisher and typed subscriptions

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::changes::{Change, ChangeEvent, Collection, CollectionRecord};

/// Events buffered per receiver before it starts lagging
const FEED_CAPACITY: usize = 256;

type SubscriberCounts = Arc<[AtomicUsize; Collection::COUNT]>;

/// Cloneable publisher of change events
///
/// All clones share one channel. Publishing with no live subscriber is not
/// an error; the event is simply dropped.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    subscribers: SubscriberCounts,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, subscribers: Arc::new(Default::default()) }
    }

    pub fn publish(&self, event: ChangeEvent) {
        let collection = event.collection;
        match self.sender.send(event) {
            Ok(receivers) => tracing::trace!("Published {} change to {} receivers", collection, receivers),
            Err(_) => tracing::trace!("Dropped {} change, no receivers", collection),
        }
    }

    /// Subscribe to changes of `T`'s collection
    pub fn subscribe<T: CollectionRecord>(&self) -> Subscription<T> {
        self.subscribers[T::COLLECTION.index()].fetch_add(1, Ordering::SeqCst);
        Subscription {
            receiver: self.sender.subscribe(),
            subscribers: Arc::clone(&self.subscribers),
            _record: PhantomData,
        }
    }

    /// Live subscriptions for a collection
    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.subscribers[collection.index()].load(Ordering::SeqCst)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver of typed changes for one collection
///
/// Dropping the subscription unsubscribes it.
pub struct Subscription<T: CollectionRecord> {
    receiver: broadcast::Receiver<ChangeEvent>,
    subscribers: SubscriberCounts,
    _record: PhantomData<fn() -> T>,
}

impl<T: CollectionRecord> Subscription<T> {
    /// Wait for the next change to this collection
    ///
    /// Returns `None` once every publisher is gone.
    pub async fn next(&mut self) -> Option<Change<T>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(change) = event.typed::<T>() {
                        return Some(change);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(collection = %T::COLLECTION, skipped, "Change subscription lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Turn the subscription into a lazy stream of changes
    pub fn into_stream(self) -> impl Stream<Item = Change<T>> {
        stream::unfold(self, |mut subscription| async move {
            subscription.next().await.map(|change| (change, subscription))
        })
    }

    /// Feed every change into `handlers` until the feed closes
    pub async fn dispatch(mut self, mut handlers: ChangeHandlers<T>) {
        while let Some(change) = self.next().await {
            handlers.handle(&change);
        }
        tracing::debug!(collection = %T::COLLECTION, "Change feed closed");
    }
}

impl<T: CollectionRecord> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.subscribers[T::COLLECTION.index()].fetch_sub(1, Ordering::SeqCst);
    }
}

type InsertHandler<T> = Box<dyn FnMut(&T) + Send>;
type UpdateHandler<T> = Box<dyn FnMut(&T, &T) + Send>;
type DeleteHandler<T> = Box<dyn FnMut(&T) + Send>;

/// Callbacks for each kind of change; registering a kind twice replaces it
pub struct ChangeHandlers<T> {
    on_insert: Option<InsertHandler<T>>,
    on_update: Option<UpdateHandler<T>>,
    on_delete: Option<DeleteHandler<T>>,
}

impl<T> ChangeHandlers<T> {
    pub fn new() -> Self {
        Self { on_insert: None, on_update: None, on_delete: None }
    }

    pub fn on_insert(mut self, handler: impl FnMut(&T) + Send + 'static) -> Self {
        self.on_insert = Some(Box::new(handler));
        self
    }

    /// Called with the old row first, then the new one
    pub fn on_update(mut self, handler: impl FnMut(&T, &T) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(handler));
        self
    }

    pub fn on_delete(mut self, handler: impl FnMut(&T) + Send + 'static) -> Self {
        self.on_delete = Some(Box::new(handler));
        self
    }

    pub fn handle(&mut self, change: &Change<T>) {
        match change {
            Change::Insert(new) => {
                if let Some(handler) = self.on_insert.as_mut() {
                    handler(new);
                }
            }
            Change::Update { old, new } => {
                if let Some(handler) = self.on_update.as_mut() {
                    handler(old, new);
                }
            }
            Change::Delete(old) => {
                if let Some(handler) = self.on_delete.as_mut() {
                    handler(old);
                }
            }
        }
    }
}

impl<T> Default for ChangeHandlers<T> {
    fn default() -> Self {
        Self::new()
    }
}
