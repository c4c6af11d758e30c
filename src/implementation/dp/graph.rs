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

//! This module provides the compact, read-only view of a graph which is
//! traversed by the dynamic program.

use crate::{Graph, NodeId, EdgeId, PrioQueue};

/// A compressed (adjacency arrays) copy of the alive part of a graph along
/// with the mapping between the terminals and the bits of the subsets the
/// dynamic program works with. It is never modified once built.
#[derive(Debug, Clone)]
pub struct DpGraph {
    terminals: Vec<NodeId>,
    term_id: Vec<Option<usize>>,
    adj_start: Vec<usize>,
    adj_head: Vec<NodeId>,
    adj_cost: Vec<f64>,
    adj_edge: Vec<EdgeId>,
    nedges: usize,
}

impl DpGraph {
    pub fn new(graph: &Graph) -> Self {
        let n = graph.nb_nodes();
        let terminals = graph.terminals();
        let mut term_id = vec![None; n];
        for (i, t) in terminals.iter().enumerate() {
            term_id[*t] = Some(i);
        }

        let mut adj_start = Vec::with_capacity(n + 1);
        let mut adj_head  = Vec::with_capacity(2 * graph.nb_edges());
        let mut adj_cost  = Vec::with_capacity(2 * graph.nb_edges());
        let mut adj_edge  = Vec::with_capacity(2 * graph.nb_edges());
        for v in 0..n {
            adj_start.push(adj_head.len());
            for e in graph.incident(v).iter().copied() {
                adj_head.push(graph.opposite(e, v));
                adj_cost.push(graph.cost_from(e, v));
                adj_edge.push(e);
            }
        }
        adj_start.push(adj_head.len());

        DpGraph { terminals, term_id, adj_start, adj_head, adj_cost, adj_edge, nedges: graph.nb_edges() }
    }

    pub fn nb_nodes(&self) -> usize {
        self.term_id.len()
    }
    pub fn nb_edges(&self) -> usize {
        self.nedges
    }
    pub fn nb_terminals(&self) -> usize {
        self.terminals.len()
    }
    /// The node standing for the i-th bit of the terminal subsets
    pub fn terminal(&self, i: usize) -> NodeId {
        self.terminals[i]
    }
    /// The bit of the terminal subsets standing for v (if v is a terminal)
    pub fn term_id(&self, v: NodeId) -> Option<usize> {
        self.term_id[v]
    }
    /// Iterates over the (neighbor, cost, edge) triples of v
    pub fn neighbors(&self, v: NodeId) -> impl Iterator<Item = (NodeId, f64, EdgeId)> + '_ {
        let range = self.adj_start[v]..self.adj_start[v + 1];
        range.map(move |i| (self.adj_head[i], self.adj_cost[i], self.adj_edge[i]))
    }
    /// The length of a shortest path from `src` to every node
    pub fn distances_from(&self, src: NodeId) -> Vec<f64> {
        let mut dist  = vec![f64::INFINITY; self.nb_nodes()];
        let mut queue = PrioQueue::with_capacity(self.nb_nodes());
        dist[src] = 0.0;
        queue.push(src, 0.0);
        while let Some((v, d)) = queue.pop() {
            if d > dist[v] {
                continue;
            }
            for (w, c, _) in self.neighbors(v) {
                if d + c < dist[w] {
                    dist[w] = d + c;
                    queue.push(w, d + c);
                }
            }
        }
        dist
    }
}

#[cfg(test)]
mod test_dpgraph {
    use crate::*;

    #[test]
    fn terminals_are_mapped_onto_consecutive_bits() {
        let mut g = Graph::new(5, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 4, 2.0);
        g.set_terminal(4);
        g.set_terminal(1);
        let dp = DpGraph::new(&g);
        assert_eq!(2, dp.nb_terminals());
        assert_eq!(1, dp.terminal(0));
        assert_eq!(4, dp.terminal(1));
        assert_eq!(Some(1), dp.term_id(4));
        assert_eq!(None, dp.term_id(0));
    }
    #[test]
    fn only_alive_edges_are_kept() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        let dead = g.add_edge(1, 2, 2.0);
        g.add_edge(0, 2, 5.0);
        g.delete_edge(dead);
        let dp = DpGraph::new(&g);
        assert_eq!(2, dp.nb_edges());
        let mut around_1: Vec<_> = dp.neighbors(1).collect();
        around_1.sort_by_key(|x| x.0);
        assert_eq!(vec![(0, 1.0, 0)], around_1);
        assert_eq!(vec![0.0, 1.0, 5.0], dp.distances_from(0));
    }
}
