//! Per-metric reading chain.
//!
//! Readings live in an append-only arena owned by the chain; links between
//! them are arena handles, never references. Each node records the handle of
//! the reading that was latest when it was appended (`prev`) and, once a
//! newer reading arrives, the handle of that reading (`next`).
//!
//! ## Thread Safety
//! Appends to one chain are serialized by `append_lock`, which covers the
//! whole relink: read the latest handle, push the new node with `prev` set,
//! link the old latest forward, publish the new handle. Readers never take
//! `append_lock`; they only take short read locks on the arena and the
//! latest handle, and every node they can observe is already fully linked.

use errors::StorageError;
use nm_core::{
    ChainEntry, MetricId, MetricReading, ReadingChain, ReadingHandle, ReadingId, TimestampMs,
};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

#[derive(Debug)]
struct ReadingNode {
    reading: MetricReading,
    prev: Option<ReadingHandle>,
    next: Option<ReadingHandle>,
}

pub struct MetricChain {
    metric_id: MetricId,
    nodes: RwLock<Vec<ReadingNode>>,
    latest: RwLock<Option<ReadingHandle>>,
    append_lock: Mutex<()>,
}

impl MetricChain {
    pub fn new(metric_id: MetricId) -> Self {
        Self {
            metric_id,
            nodes: RwLock::new(Vec::new()),
            latest: RwLock::new(None),
            append_lock: Mutex::new(()),
        }
    }

    pub fn metric_id(&self) -> &MetricId {
        &self.metric_id
    }

    /// Number of readings ever appended.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.read().is_none()
    }

    /// Append a reading and make it the latest.
    ///
    /// The previous latest reading keeps its value and timestamp; only its
    /// forward link is set.
    pub fn append(&self, value: f64, timestamp: TimestampMs) -> Result<ChainEntry, StorageError> {
        let _guard = self.append_lock.lock();

        let old = *self.latest.read();
        let reading = MetricReading {
            id: ReadingId::generate(),
            value,
            timestamp,
        };

        let handle = {
            let mut nodes = self.nodes.write();
            let index = u32::try_from(nodes.len()).map_err(|_| StorageError::Unavailable {
                backend: "memory".to_string(),
                reason: format!("reading chain for metric {} is full", self.metric_id),
            })?;
            let handle = ReadingHandle::new(index);
            nodes.push(ReadingNode {
                reading,
                prev: old,
                next: None,
            });
            if let Some(old) = old {
                nodes[old.index()].next = Some(handle);
            }
            handle
        };

        *self.latest.write() = Some(handle);

        debug!(
            metric_id = %self.metric_id,
            handle = handle.index(),
            timestamp = timestamp.as_millis(),
            "Appended reading"
        );
        Ok(ChainEntry { handle, reading })
    }

    fn entry_at(nodes: &[ReadingNode], handle: ReadingHandle) -> Option<ChainEntry> {
        nodes.get(handle.index()).map(|node| ChainEntry {
            handle,
            reading: node.reading,
        })
    }
}

impl ReadingChain for MetricChain {
    fn latest(&self) -> Option<ChainEntry> {
        let handle = (*self.latest.read())?;
        Self::entry_at(&self.nodes.read(), handle)
    }

    fn predecessor(&self, entry: &ChainEntry) -> Option<ChainEntry> {
        let nodes = self.nodes.read();
        let prev = nodes.get(entry.handle.index())?.prev?;
        Self::entry_at(&nodes, prev)
    }

    fn successor(&self, entry: &ChainEntry) -> Option<ChainEntry> {
        let nodes = self.nodes.read();
        let next = nodes.get(entry.handle.index())?.next?;
        Self::entry_at(&nodes, next)
    }
}
