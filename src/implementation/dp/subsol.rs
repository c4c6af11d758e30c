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

//! This module defines the partial solutions of the dynamic program and the
//! traces which allow the reconstruction of the optimal tree once the dynamic
//! program is over.

use fxhash::FxHashMap;

use crate::{Bitset, NodeId, EdgeId};

/// Identifies a trace: the `ext`-th extension of the `subsol`-th partial
/// solution of the dynamic program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceRef {
    pub subsol: usize,
    pub ext: usize,
}

/// How a trace was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ancestors {
    /// A single terminal rooted at itself: nothing to reconstruct
    Empty,
    /// A partial solution covering the same terminals, rooted at a neighbor
    /// node and extended along an edge
    Single(TraceRef),
    /// Two partial solutions covering disjoint sets of terminals, merged at a
    /// common root
    Pair(TraceRef, TraceRef),
}
impl Ancestors {
    /// Iterates over the traces this one has been built from
    pub fn iter(&self) -> impl Iterator<Item = TraceRef> {
        let (a, b) = match *self {
            Ancestors::Empty      => (None, None),
            Ancestors::Single(a)  => (Some(a), None),
            Ancestors::Pair(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b)
    }
}

/// The cheapest tree spanning the terminals of a partial solution that has
/// been found for a given root node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolTrace {
    pub prevs: Ancestors,
    /// The edge used to extend a `Single` ancestor up to the root
    pub edge: Option<EdgeId>,
    pub cost: f64,
    pub root: NodeId,
}

/// A seed is a tree spanning the terminals of a partial solution which has
/// been obtained by merging two smaller partial solutions. The seeds are the
/// starting points of the expansion of a partial solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub cost: f64,
    pub prevs: Ancestors,
}

/// A partial solution of the dynamic program: it covers the subset of the
/// terminals given by its `bitkey`. Before its expansion, it only has seeds.
/// After it, it has one trace (extension) per node where it can be rooted.
#[derive(Debug, Clone)]
pub struct SubSolution {
    pub bitkey: Bitset,
    pub extensions: Vec<SolTrace>,
    roots: FxHashMap<NodeId, usize>,
    seeds: FxHashMap<NodeId, Seed>,
    best_seed: f64,
    expanded: bool,
}

impl SubSolution {
    pub fn new(bitkey: Bitset) -> Self {
        SubSolution {
            bitkey,
            extensions: vec![],
            roots: FxHashMap::default(),
            seeds: FxHashMap::default(),
            best_seed: f64::INFINITY,
            expanded: false,
        }
    }
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
    /// The cost of the cheapest seed (infinite when there is none)
    pub fn best_seed_cost(&self) -> f64 {
        self.best_seed
    }
    /// Records a seed rooted at v unless a seed at least as cheap is already
    /// known for that root. Returns true iff the seed was recorded.
    pub fn offer_seed(&mut self, root: NodeId, seed: Seed) -> bool {
        debug_assert!(!self.expanded, "seeding an expanded sub-solution");
        let better = self.seeds.get(&root).map_or(true, |s| seed.cost < s.cost);
        if better {
            self.seeds.insert(root, seed);
            self.best_seed = self.best_seed.min(seed.cost);
        }
        better
    }
    /// The seeds sorted by root
    pub fn seeds(&self) -> Vec<(NodeId, Seed)> {
        let mut seeds: Vec<(NodeId, Seed)> = self.seeds.iter().map(|(r, s)| (*r, *s)).collect();
        seeds.sort_unstable_by_key(|(r, _)| *r);
        seeds
    }
    /// The cheapest seed (ties are broken in favor of the smallest root)
    pub fn best_seed(&self) -> Option<(NodeId, Seed)> {
        self.seeds().into_iter().min_by(|a, b| a.1.cost.total_cmp(&b.1.cost))
    }
    /// Stores the traces computed by the expansion of this partial solution.
    /// The seeds are no longer needed afterwards.
    pub fn set_expanded(&mut self, traces: Vec<SolTrace>) {
        self.roots = traces.iter().enumerate().map(|(i, t)| (t.root, i)).collect();
        self.extensions = traces;
        self.seeds = FxHashMap::default();
        self.expanded = true;
    }
    /// Appends one trace. There is at most one trace per root.
    pub fn push_trace(&mut self, trace: SolTrace) -> usize {
        debug_assert!(!self.roots.contains_key(&trace.root));
        let id = self.extensions.len();
        self.roots.insert(trace.root, id);
        self.extensions.push(trace);
        id
    }
    /// The index of the trace rooted at v
    pub fn ext_at(&self, v: NodeId) -> Option<usize> {
        self.roots.get(&v).copied()
    }
    pub fn trace_at(&self, v: NodeId) -> Option<&SolTrace> {
        self.ext_at(v).map(|i| &self.extensions[i])
    }
}

#[cfg(test)]
mod test_subsol {
    use crate::*;

    fn trace(root: NodeId, cost: f64) -> SolTrace {
        SolTrace { prevs: Ancestors::Empty, edge: None, cost, root }
    }

    #[test]
    fn only_improving_seeds_are_recorded() {
        let mut s = SubSolution::new(Bitset::new(3));
        assert!(s.offer_seed(4, Seed { cost: 5.0, prevs: Ancestors::Empty }));
        assert!(!s.offer_seed(4, Seed { cost: 5.0, prevs: Ancestors::Empty }));
        assert!(s.offer_seed(4, Seed { cost: 3.0, prevs: Ancestors::Empty }));
        assert!(s.offer_seed(2, Seed { cost: 3.0, prevs: Ancestors::Empty }));
        assert_eq!(3.0, s.best_seed_cost());
        assert_eq!(Some(2), s.best_seed().map(|x| x.0));
        assert_eq!(vec![2, 4], s.seeds().iter().map(|x| x.0).collect::<Vec<_>>());
    }
    #[test]
    fn expansion_replaces_seeds_by_traces() {
        let mut s = SubSolution::new(Bitset::new(3));
        s.offer_seed(1, Seed { cost: 1.0, prevs: Ancestors::Empty });
        s.set_expanded(vec![trace(1, 1.0), trace(0, 2.0)]);
        assert!(s.is_expanded());
        assert!(s.seeds().is_empty());
        assert_eq!(Some(1), s.ext_at(0));
        assert_eq!(Some(&trace(1, 1.0)), s.trace_at(1));
        assert_eq!(None, s.trace_at(2));
        assert_eq!(2, s.push_trace(trace(2, 4.0)));
        assert_eq!(Some(2), s.ext_at(2));
    }
    #[test]
    fn ancestors_iterate_over_their_references() {
        let a = TraceRef { subsol: 0, ext: 1 };
        let b = TraceRef { subsol: 2, ext: 3 };
        assert_eq!(0, Ancestors::Empty.iter().count());
        assert_eq!(vec![a], Ancestors::Single(a).iter().collect::<Vec<_>>());
        assert_eq!(vec![a, b], Ancestors::Pair(a, b).iter().collect::<Vec<_>>());
    }
}
