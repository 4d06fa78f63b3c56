// HealthNode - Bounded Inter-Task Queues
//
// Fixed-capacity FIFO channels between tasks.  A full queue blocks the
// sender and an empty queue blocks the receiver, forever by default.  Each
// call site may opt into a bounded wait instead.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use crate::error::NodeError;

/// How long a queue operation may block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Wait {
    #[default]
    Forever,
    For(Duration),
}

/// Create a queue holding at most `capacity` items.
pub fn queue<T>(capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = bounded(capacity);
    (QueueSender { tx }, QueueReceiver { rx })
}

/// Producer end.  Clone it to give a queue several producers.
#[derive(Debug)]
pub struct QueueSender<T> {
    tx: Sender<T>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> QueueSender<T> {
    /// Enqueue, blocking until there is room.
    pub fn send(&self, item: T) -> Result<(), NodeError> {
        self.send_with(item, Wait::Forever)
    }

    /// Enqueue with an explicit wait.  On [`NodeError::QueueFull`] the item is
    /// dropped.
    pub fn send_with(&self, item: T, wait: Wait) -> Result<(), NodeError> {
        match wait {
            Wait::Forever => self.tx.send(item).map_err(|_| NodeError::QueueClosed),
            Wait::For(timeout) => self.tx.send_timeout(item, timeout).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => NodeError::QueueFull,
                SendTimeoutError::Disconnected(_) => NodeError::QueueClosed,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        // Always `Some` for a bounded channel.
        self.tx.capacity().unwrap_or(0)
    }
}

/// Consumer end.
#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: Receiver<T>,
}

impl<T> QueueReceiver<T> {
    /// Dequeue, blocking until an item arrives.
    pub fn recv(&self) -> Result<T, NodeError> {
        self.recv_with(Wait::Forever)
    }

    pub fn recv_with(&self, wait: Wait) -> Result<T, NodeError> {
        match wait {
            Wait::Forever => self.rx.recv().map_err(|_| NodeError::QueueClosed),
            Wait::For(timeout) => self.rx.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => NodeError::QueueEmpty,
                RecvTimeoutError::Disconnected => NodeError::QueueClosed,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const SHORT: Wait = Wait::For(Duration::from_millis(20));

    #[test]
    fn test_single_producer_order_is_preserved() {
        let (tx, rx) = queue::<u32>(10);
        let producer = thread::spawn(move || {
            for i in 0..100 {
                tx.send(i).unwrap();
            }
        });

        let received: Vec<u32> = (0..100).map(|_| rx.recv().unwrap()).collect();
        producer.join().unwrap();
        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_bounded_send_on_full_queue_reports_full() {
        let (tx, rx) = queue::<u8>(10);
        assert_eq!(tx.capacity(), 10);
        for i in 0..10 {
            tx.send_with(i, SHORT).unwrap();
        }
        assert_eq!(tx.send_with(10, SHORT), Err(NodeError::QueueFull));

        // The rejected item was dropped, the queued ones are intact.
        assert_eq!(rx.len(), 10);
        assert_eq!(rx.recv().unwrap(), 0);
    }

    #[test]
    fn test_bounded_recv_on_empty_queue_reports_empty() {
        let (_tx, rx) = queue::<u8>(10);
        assert_eq!(rx.recv_with(SHORT), Err(NodeError::QueueEmpty));
    }

    #[test]
    fn test_full_queue_blocks_sender_until_consumer_drains() {
        let (tx, rx) = queue::<u8>(1);
        tx.send(1).unwrap();

        let producer = thread::spawn(move || tx.send(2));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(rx.recv().unwrap(), 1);
        assert_eq!(rx.recv().unwrap(), 2);
        assert_eq!(producer.join().unwrap(), Ok(()));
    }

    #[test]
    fn test_dropped_peer_closes_queue() {
        let (tx, rx) = queue::<u8>(2);
        drop(rx);
        assert_eq!(tx.send(1), Err(NodeError::QueueClosed));

        let (tx, rx) = queue::<u8>(2);
        drop(tx);
        assert_eq!(rx.recv(), Err(NodeError::QueueClosed));
        assert_eq!(rx.recv_with(SHORT), Err(NodeError::QueueClosed));
    }
}
