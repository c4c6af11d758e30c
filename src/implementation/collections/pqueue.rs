// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of a simple priority queue which
//! always pops the item having the smallest priority first.

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use ordered_float::OrderedFloat;

/// An item along with the priority it has been pushed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prioritized<T> {
    pub priority: OrderedFloat<f64>,
    pub item: T,
}

/// This comparator ranks the entries of the queue so that the one with the
/// smallest priority is the greatest (hence popped first from the max-heap).
/// Ties are broken by the natural order of the items (the smallest first)
/// which makes the pop order fully deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinPriority;
impl <T: Ord> Compare<Prioritized<T>> for MinPriority {
    fn compare(&self, l: &Prioritized<T>, r: &Prioritized<T>) -> Ordering {
        r.priority.cmp(&l.priority)
            .then_with(|| r.item.cmp(&l.item))
    }
}

/// A binary min-heap keyed by a numeric priority.
///
/// # Note
/// There is no decrease-key operation: the shortest path computations of this
/// crate simply push an item again with its improved priority and skip the
/// stale entries when they are popped.
///
/// # Example
/// ```
/// # use steiner_dp::PrioQueue;
/// let mut queue = PrioQueue::new();
/// queue.push('c', 3.0);
/// queue.push('a', 1.0);
/// queue.push('b', 1.0);
///
/// assert_eq!(Some(('a', 1.0)), queue.pop());
/// assert_eq!(Some(('b', 1.0)), queue.pop());
/// assert_eq!(Some(('c', 3.0)), queue.pop());
/// assert_eq!(None, queue.pop());
/// ```
pub struct PrioQueue<T: Ord> {
    heap: BinaryHeap<Prioritized<T>, MinPriority>
}
impl <T: Ord> Default for PrioQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl <T: Ord> PrioQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self{ heap: BinaryHeap::from_vec_cmp(Vec::with_capacity(capacity), MinPriority) }
    }
    pub fn push(&mut self, item: T, priority: f64) {
        self.heap.push(Prioritized { priority: OrderedFloat(priority), item })
    }
    /// Removes the item with the smallest priority
    pub fn pop(&mut self) -> Option<(T, f64)> {
        self.heap.pop().map(|p| (p.item, p.priority.into_inner()))
    }
    /// The smallest priority in the queue
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|p| p.priority.into_inner())
    }
    pub fn clear(&mut self) {
        self.heap.clear()
    }
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod test_pqueue {
    use crate::PrioQueue;

    #[test]
    fn by_default_it_is_empty() {
        let queue = PrioQueue::<usize>::default();
        assert!(queue.is_empty());
        assert_eq!(0, queue.len());
        assert_eq!(None, queue.peek_priority());
    }
    #[test]
    fn when_i_push_an_item_the_length_increases() {
        let mut queue = PrioQueue::new();
        queue.push(1_usize, 10.0);
        queue.push(2_usize, 20.0);
        assert_eq!(2, queue.len());
        assert!(!queue.is_empty());
    }
    #[test]
    fn when_i_pop_an_item_it_is_always_the_one_with_the_smallest_priority() {
        let mut queue = PrioQueue::new();
        for (item, prio) in [(5_usize, 0.5), (1, 7.0), (2, -1.0), (3, 3.25), (4, 0.5)] {
            queue.push(item, prio);
        }
        assert_eq!(Some(-1.0), queue.peek_priority());
        let order: Vec<usize> = std::iter::from_fn(|| queue.pop().map(|x| x.0)).collect();
        assert_eq!(vec![2, 4, 5, 3, 1], order);
    }
    #[test]
    fn when_i_clear_the_queue_it_becomes_empty() {
        let mut queue = PrioQueue::with_capacity(4);
        queue.push(1_usize, 1.0);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(None, queue.pop());
    }
}
