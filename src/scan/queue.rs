//! Bounded handoff between scanners and the consumer.
//!
//! The queue is the only shared mutable state between a producing scanner
//! and the consumer draining discovered projects. It is bounded: a full
//! queue blocks the producer, which is what keeps a fast scanner from
//! buffering an unbounded backlog ahead of a slow indexer.
//!
//! Cancellation is modeled the mpsc way: dropping the [`ProjectReceiver`]
//! disconnects the channel, and the next blocked or attempted push fails
//! with [`Error::ScanInterrupted`]. Scanners propagate that error rather
//! than swallowing it, so a caller can abort a long-running scan by simply
//! letting the receiver go.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::error::{Error, Result};
use crate::scan::project::ProjectRoot;

/// Producer half of the discovery queue. Cheap to clone; one per scanner.
#[derive(Clone)]
pub struct ProjectQueue {
    tx: SyncSender<ProjectRoot>,
}

/// Consumer half of the discovery queue.
pub struct ProjectReceiver {
    rx: Receiver<ProjectRoot>,
}

/// Create a queue holding at most `capacity` in-flight project roots.
pub fn bounded(capacity: usize) -> (ProjectQueue, ProjectReceiver) {
    let (tx, rx) = sync_channel(capacity);
    (ProjectQueue { tx }, ProjectReceiver { rx })
}

impl ProjectQueue {
    /// Enqueue a discovered project root, blocking while the queue is full.
    ///
    /// Ownership passes to the consumer; the record must not be retained or
    /// mutated by the producer afterwards.
    pub fn push(&self, root: ProjectRoot) -> Result<()> {
        log::debug!("enqueueing project root {}", root.origin);
        self.tx.send(root).map_err(|_| Error::ScanInterrupted)
    }
}

impl ProjectReceiver {
    /// Receive the next project root, or `None` once every producer is done.
    pub fn recv(&self) -> Option<ProjectRoot> {
        self.rx.recv().ok()
    }

    /// Iterate until every producer handle has been dropped.
    pub fn iter(&self) -> impl Iterator<Item = ProjectRoot> + '_ {
        self.rx.iter()
    }

    /// Drain everything that will ever arrive into a vector. Only returns
    /// once all producers are gone.
    pub fn drain(self) -> Vec<ProjectRoot> {
        self.rx.into_iter().collect()
    }
}
