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

//! This module provides the iterator which expands a partial solution of the
//! dynamic program: starting from its seeds, it grows the cheapest trees along
//! the edges of the graph (label setting, Dijkstra style).

use crate::{DpGraph, NodeId, EdgeId, Seed, SolTrace, Ancestors, TraceRef, PrioQueue};

/// How the label of a node was last improved
#[derive(Debug, Clone, Copy)]
enum Pred {
    /// The node is the root of a seed
    Seed(Ancestors),
    /// The node was reached from an other node along an edge
    Edge { from: NodeId, edge: EdgeId },
}

/// The scratch data used to expand the partial solutions. It is allocated once
/// per dynamic program and reset after each expansion (only the touched
/// entries are reset).
pub struct DpIterator {
    /// The nodes touched by the current expansion
    stack: Vec<NodeId>,
    touched: Vec<bool>,
    dist: Vec<f64>,
    /// The cost above which a label is useless (depends on the node)
    ub: Vec<f64>,
    pred: Vec<Option<Pred>>,
    /// The position of the trace of a settled node (valid roots only)
    position: Vec<Option<usize>>,
    queue: PrioQueue<NodeId>,
}

impl DpIterator {
    pub fn new(nnodes: usize) -> Self {
        DpIterator {
            stack: vec![],
            touched: vec![false; nnodes],
            dist: vec![f64::INFINITY; nnodes],
            ub: vec![f64::INFINITY; nnodes],
            pred: vec![None; nnodes],
            position: vec![None; nnodes],
            queue: PrioQueue::with_capacity(nnodes),
        }
    }

    fn touch(&mut self, v: NodeId, bound: &dyn Fn(NodeId) -> f64) {
        if !self.touched[v] {
            self.touched[v] = true;
            self.stack.push(v);
            self.ub[v] = bound(v);
        }
    }

    /// Expands the partial solution `subsol` from its seeds. A label is only
    /// kept when its cost does not exceed the bound of its node. Returns one
    /// trace per settled node, in the order in which they were settled; the
    /// `Single` ancestors of these traces refer to traces of `subsol` itself.
    pub fn expand(&mut self, graph: &DpGraph, subsol: usize, seeds: &[(NodeId, Seed)], bound: &dyn Fn(NodeId) -> f64) -> Vec<SolTrace> {
        for (root, seed) in seeds.iter() {
            self.touch(*root, bound);
            if seed.cost <= self.ub[*root] && seed.cost < self.dist[*root] {
                self.dist[*root] = seed.cost;
                self.pred[*root] = Some(Pred::Seed(seed.prevs));
                self.queue.push(*root, seed.cost);
            }
        }

        let mut traces = vec![];
        while let Some((v, d)) = self.queue.pop() {
            if self.position[v].is_some() || d > self.dist[v] {
                continue;
            }
            let trace = match self.pred[v] {
                Some(Pred::Seed(prevs)) => SolTrace { prevs, edge: None, cost: d, root: v },
                Some(Pred::Edge { from, edge }) => {
                    // `from` is always settled before v
                    let ext = self.position[from].unwrap_or_default();
                    SolTrace { prevs: Ancestors::Single(TraceRef { subsol, ext }), edge: Some(edge), cost: d, root: v }
                },
                None => continue,
            };
            self.position[v] = Some(traces.len());
            traces.push(trace);

            for (w, c, e) in graph.neighbors(v) {
                if self.position[w].is_some() {
                    continue;
                }
                self.touch(w, bound);
                let nd = d + c;
                if nd <= self.ub[w] && nd < self.dist[w] {
                    self.dist[w] = nd;
                    self.pred[w] = Some(Pred::Edge { from: v, edge: e });
                    self.queue.push(w, nd);
                }
            }
        }
        self.reset();
        traces
    }

    fn reset(&mut self) {
        for v in self.stack.drain(..) {
            self.touched[v]  = false;
            self.dist[v]     = f64::INFINITY;
            self.ub[v]       = f64::INFINITY;
            self.pred[v]     = None;
            self.position[v] = None;
        }
        self.queue.clear();
    }
}

#[cfg(test)]
mod test_dp_iterator {
    use crate::*;

    // 0 -1- 1 -1- 2 -5- 3
    fn line() -> DpGraph {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 5.0);
        g.set_terminal(0);
        DpGraph::new(&g)
    }
    fn seed(cost: f64) -> Seed {
        Seed { cost, prevs: Ancestors::Empty }
    }

    #[test]
    fn a_single_seed_reaches_every_node_in_order_of_distance() {
        let graph = line();
        let mut it = DpIterator::new(4);
        let traces = it.expand(&graph, 7, &[(0, seed(0.0))], &|_| f64::INFINITY);
        assert_eq!(vec![0, 1, 2, 3], traces.iter().map(|t| t.root).collect::<Vec<_>>());
        assert_eq!(vec![0.0, 1.0, 2.0, 7.0], traces.iter().map(|t| t.cost).collect::<Vec<_>>());
        assert_eq!(Ancestors::Empty, traces[0].prevs);
        assert_eq!(Ancestors::Single(TraceRef { subsol: 7, ext: 1 }), traces[2].prevs);
        assert_eq!(Some(1), traces[2].edge);
    }
    #[test]
    fn several_seeds_compete_for_the_nodes() {
        let graph = line();
        let mut it = DpIterator::new(4);
        let traces = it.expand(&graph, 0, &[(0, seed(0.0)), (3, seed(0.5))], &|_| f64::INFINITY);
        let cost_of = |v: NodeId| traces.iter().find(|t| t.root == v).map(|t| t.cost);
        assert_eq!(Some(2.0), cost_of(2));
        assert_eq!(Some(0.5), cost_of(3));
    }
    #[test]
    fn labels_above_the_bound_are_dropped() {
        let graph = line();
        let mut it = DpIterator::new(4);
        let traces = it.expand(&graph, 0, &[(0, seed(0.0))], &|_| 1.5);
        assert_eq!(vec![0, 1], traces.iter().map(|t| t.root).collect::<Vec<_>>());
    }
    #[test]
    fn the_iterator_can_be_reused_after_an_expansion() {
        let graph = line();
        let mut it = DpIterator::new(4);
        it.expand(&graph, 0, &[(0, seed(0.0))], &|_| f64::INFINITY);
        let traces = it.expand(&graph, 1, &[(3, seed(0.0))], &|_| f64::INFINITY);
        assert_eq!(vec![3, 2, 1, 0], traces.iter().map(|t| t.root).collect::<Vec<_>>());
        assert_eq!(7.0, traces[3].cost);
    }
}
