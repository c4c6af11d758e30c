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

//! This module maps the solutions of a reduced graph back onto the edges of
//! the original graph.

use ordered_float::OrderedFloat;

use crate::{Graph, NodeId, EdgeId, NodeKind, DisjointSets, OriginalEdge};

impl Graph {
    /// The number of edges of the original instance
    pub fn nb_original_edges(&self) -> usize {
        self.original.len()
    }
    pub fn original_edge(&self, e: EdgeId) -> OriginalEdge {
        self.original[e]
    }
    /// The kind a node had in the original instance
    pub fn original_kind(&self, v: NodeId) -> NodeKind {
        self.original_kind[v]
    }
    /// The total cost of a set of original edges
    pub fn original_cost(&self, edges: &[EdgeId]) -> f64 {
        edges.iter().map(|e| self.original[*e].cost).sum()
    }

    /// Maps a tree of this (reduced) graph onto the original graph. The result
    /// comprises the ancestors of the given edges, and everything that has been
    /// merged into the nodes of the tree and into the terminals. It is cleaned
    /// up into a tree whose leaves are original terminals (or potential nodes)
    /// and it is returned sorted.
    pub fn original_solution(&self, solution: &[EdgeId]) -> Vec<EdgeId> {
        let mut nodes: Vec<NodeId> = solution.iter()
            .flat_map(|e| { let (t, h) = self.endpoints(*e); [t, h] })
            .chain(self.terminals())
            .collect();
        nodes.sort_unstable();
        nodes.dedup();

        let mut edges: Vec<EdgeId> = solution.iter()
            .flat_map(|e| self.ancestors(*e).iter().copied())
            .chain(nodes.iter().flat_map(|v| self.merged_into(*v).iter().copied()))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        self.prune_original(edges)
    }

    /// Turns a connected set of original edges into a tree (minimum spanning
    /// tree of the set) and iteratively removes the leaves that are original
    /// Steiner nodes.
    fn prune_original(&self, edges: Vec<EdgeId>) -> Vec<EdgeId> {
        let edges: Vec<(EdgeId, NodeId, NodeId, f64)> = edges.into_iter()
            .map(|e| { let o = self.original[e]; (e, o.tail, o.head, o.cost) })
            .collect();
        pruned_tree(self.nb_nodes(), edges, |v| self.original_kind[v] != NodeKind::Steiner)
    }
    /// Turns a connected set of edges of this graph into a tree (minimum
    /// spanning tree of the set) and iteratively removes the leaves that are
    /// Steiner nodes. The result is sorted.
    pub fn prune_solution(&self, edges: &[EdgeId]) -> Vec<EdgeId> {
        let edges: Vec<(EdgeId, NodeId, NodeId, f64)> = edges.iter()
            .map(|e| { let (t, h) = self.endpoints(*e); (*e, t, h, self.cost(*e)) })
            .collect();
        pruned_tree(self.nb_nodes(), edges, |v| self.kind(v) != NodeKind::Steiner)
    }
}

/// Kruskal over the given edges followed by the iterated removal of the
/// leaves for which `keep` does not hold.
fn pruned_tree<F>(nnodes: usize, mut edges: Vec<(EdgeId, NodeId, NodeId, f64)>, keep: F) -> Vec<EdgeId>
where F: Fn(NodeId) -> bool
{
    edges.sort_by_key(|(e, _, _, c)| (OrderedFloat(*c), *e));

    let mut sets = DisjointSets::new(nnodes);
    let mut tree = vec![];
    for (e, t, h, _) in edges {
        if sets.union(t, h) {
            tree.push((e, t, h));
        }
    }

    let mut degree = vec![0_usize; nnodes];
    for (_, t, h) in tree.iter() {
        degree[*t] += 1;
        degree[*h] += 1;
    }
    let mut kept = vec![true; tree.len()];
    loop {
        let mut changed = false;
        for (i, (_, t, h)) in tree.iter().enumerate() {
            if !kept[i] {
                continue;
            }
            let leaf = [*t, *h].into_iter().any(|v| degree[v] == 1 && !keep(v));
            if leaf {
                kept[i] = false;
                degree[*t] -= 1;
                degree[*h] -= 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let mut out: Vec<EdgeId> = tree.into_iter().zip(kept).filter(|(_, k)| *k).map(|((e, _, _), _)| e).collect();
    out.sort_unstable();
    out
}
