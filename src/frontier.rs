use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct ScoredEntry<N, C> {
    score: C,
    sequence: u64,
    node: N,
}

impl<N, C: PartialEq> Eq for ScoredEntry<N, C> {}

impl<N, C: PartialEq> PartialEq for ScoredEntry<N, C> {
    fn eq(&self, other: &Self) -> bool {
        self.score.eq(&other.score) && self.sequence == other.sequence
    }
}

impl<N, C: Ord> PartialOrd for ScoredEntry<N, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N, C: Ord> Ord for ScoredEntry<N, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest score compares greatest, and among equal
        // scores the earliest insertion does
        match other.score.cmp(&self.score) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Min-oriented priority queue of `(node, score)` pairs.
///
/// There is no decrease-key. A node whose score improves is pushed again and the older entry
/// stays in the queue; consumers are expected to recognise and skip such stale entries when they
/// are popped. Entries with equal scores pop in the order they were pushed.
pub struct PriorityFrontier<N, C> {
    heap: BinaryHeap<ScoredEntry<N, C>>,
    sequence: u64,
}

impl<N, C: Ord + Copy> Default for PriorityFrontier<N, C> {
    fn default() -> Self {
        PriorityFrontier::new()
    }
}

impl<N, C: Ord + Copy> PriorityFrontier<N, C> {
    pub fn new() -> PriorityFrontier<N, C> {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }
    pub fn with_capacity(capacity: usize) -> PriorityFrontier<N, C> {
        PriorityFrontier {
            heap: BinaryHeap::with_capacity(capacity),
            sequence: 0,
        }
    }

    pub fn push(&mut self, node: N, score: C) {
        self.heap.push(ScoredEntry {
            score,
            sequence: self.sequence,
            node,
        });
        self.sequence += 1;
    }

    /// Removes the entry with the lowest score, or returns [None] if the frontier is empty.
    pub fn pop_min(&mut self) -> Option<(N, C)> {
        self.heap.pop().map(|entry| (entry.node, entry.score))
    }

    pub fn peek_min(&self) -> Option<(&N, C)> {
        self.heap.peek().map(|entry| (&entry.node, entry.score))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    pub fn clear(&mut self) {
        self.heap.clear();
        self.sequence = 0;
    }
}
