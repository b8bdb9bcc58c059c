//! Single-consumer FIFO of deferred work, fed by the network reactor and the
//! expiry worker.
//!
//! Ordering: a bounded mpsc channel already gives enqueue-ordered delivery
//! to the single receiving task, and each producer's sends are ordered with
//! respect to its own subsequent sends — exactly the contract §4.6 asks
//! for. `enqueue`/`dequeue` wrap `send`/`recv` rather than re-implementing a
//! mutex + condvar by hand.

use auction_types::Notification;
use tokio::sync::mpsc;

/// A deferred unit of work. Opaque to the queue: it is executed exactly
/// once, by the single consumer, and yields exactly one notification.
#[async_trait::async_trait]
pub trait Task: Send {
    async fn run(self: Box<Self>) -> Notification;
}

pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Box<dyn Task>>,
}

pub struct TaskConsumer {
    receiver: mpsc::UnboundedReceiver<Box<dyn Task>>,
}

/// Builds the producer/consumer halves of the queue. There should be exactly
/// one `TaskConsumer` live at a time per spec's single-dispatcher design.
pub fn channel() -> (TaskQueue, TaskConsumer) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (TaskQueue { sender }, TaskConsumer { receiver })
}

impl TaskQueue {
    /// Appends `task` at the tail. The only failure mode is the consumer
    /// having shut down, which can only happen during process shutdown.
    pub fn enqueue(&self, task: Box<dyn Task>) {
        if self.sender.send(task).is_err() {
            tracing::warn!("dropped task: dispatcher has shut down");
        }
    }
}

impl Clone for TaskQueue {
    fn clone(&self) -> Self {
        TaskQueue { sender: self.sender.clone() }
    }
}

impl TaskConsumer {
    /// Blocks until a task is available, then pops it from the head.
    /// Returns `None` once every `TaskQueue` handle has been dropped.
    pub async fn dequeue(&mut self) -> Option<Box<dyn Task>> {
        self.receiver.recv().await
    }
}
