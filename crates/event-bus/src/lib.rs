use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::trace;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

/// Publishing never blocks and never fails the caller; a notification nobody
/// listens to is simply dropped.
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    /// Returns the number of subscribers the event reached.
    fn publish(&self, event: E) -> usize;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// In-memory broadcast bus.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> usize {
        match self.sender.send(event) {
            Ok(reached) => reached,
            Err(err) => {
                trace!(event = ?err.0, "no subscribers; notification dropped");
                0
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

/// Bus that discards everything. Useful when no UI is attached.
pub struct NoopBus<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> NoopBus<E>
where
    E: Event,
{
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            _marker: PhantomData,
        })
    }
}

impl<E> EventBus<E> for NoopBus<E>
where
    E: Event,
{
    fn publish(&self, _event: E) -> usize {
        0
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        let (_sender, receiver) = broadcast::channel(1);
        receiver
    }
}

/// Helper to materialise an mpsc receiver from the bus subscription
/// so callers can await events without handling broadcast semantics directly.
pub fn to_mpsc<E>(bus: Arc<InMemoryBus<E>>, capacity: usize) -> mpsc::Receiver<E>
where
    E: Event,
{
    let mut rx = bus.subscribe();
    let (tx, out_rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    if tx.send(ev).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(skipped, "bus subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
    out_rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Ping {
        Hello(u32),
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = InMemoryBus::<Ping>::new(4);
        assert_eq!(bus.publish(Ping::Hello(1)), 0);
    }

    #[tokio::test]
    async fn to_mpsc_forwards_events() {
        let bus = InMemoryBus::<Ping>::new(4);
        let mut rx = to_mpsc(Arc::clone(&bus), 4);
        while bus.subscriber_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(bus.publish(Ping::Hello(7)), 1);
        assert_eq!(rx.recv().await, Some(Ping::Hello(7)));
    }

    #[test]
    fn noop_bus_reaches_nobody() {
        let bus = NoopBus::<Ping>::new();
        assert_eq!(bus.publish(Ping::Hello(3)), 0);
    }
}
