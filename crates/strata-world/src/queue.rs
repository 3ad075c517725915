use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::IVec3;
use parking_lot::Mutex;

/// One pending mesh job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshTask {
    pub chunk_pos: IVec3,
    /// Lower is more urgent.
    pub priority: i32,
    /// Regenerations bypass the `Ready` short-circuit in the dispatcher and
    /// may supersede an in-flight job.
    pub is_regeneration: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueuedTask {
    task: MeshTask,
    /// Insertion sequence; breaks priority ties FIFO.
    seq: u64,
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the lowest (priority, seq)
        // pops first.
        (other.task.priority, other.seq).cmp(&(self.task.priority, self.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority work queue shared between producers and the dispatcher. The
/// mutex is held only for O(log n) heap operations; never across dispatch.
#[derive(Debug, Default)]
pub struct MeshQueue {
    inner: Mutex<QueueInner>,
}

#[derive(Debug, Default)]
struct QueueInner {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

impl MeshQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: MeshTask) {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.heap.push(QueuedTask { task, seq });
    }

    pub fn pop(&self) -> Option<MeshTask> {
        self.inner.lock().heap.pop().map(|q| q.task)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().heap.is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().heap.clear();
    }
}
