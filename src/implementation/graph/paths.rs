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

//! This module provides the shortest path computations (plain, multi-source,
//! nearest terminals) which most of the reductions are built upon.

use crate::{Graph, NodeId, EdgeId, PrioQueue};

/// The outcome of a (multi-source) shortest path computation
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// The distance from the closest source (infinite when unreached)
    pub dist: Vec<f64>,
    /// The last edge on a shortest path from the closest source
    pub pred: Vec<Option<EdgeId>>,
    /// The closest source (the base of the voronoi region of the node)
    pub base: Vec<Option<NodeId>>,
}
impl ShortestPaths {
    pub fn is_reached(&self, v: NodeId) -> bool {
        self.dist[v].is_finite()
    }
    /// The edges of a shortest path from the base of v to v (from v backwards)
    pub fn path_to(&self, graph: &Graph, mut v: NodeId) -> Vec<EdgeId> {
        let mut path = vec![];
        while let Some(e) = self.pred[v] {
            path.push(e);
            v = graph.opposite(e, v);
        }
        path
    }
}

/// Computes the shortest paths from the given sources. Only the edges for which
/// `allowed` holds are traversed (in the direction away from the sources) and
/// the nodes whose distance would exceed `limit` are left unreached.
pub fn dijkstra<F>(graph: &Graph, sources: &[NodeId], limit: f64, allowed: F) -> ShortestPaths
where F: Fn(EdgeId) -> bool
{
    let n = graph.nb_nodes();
    let mut dist  = vec![f64::INFINITY; n];
    let mut pred  = vec![None; n];
    let mut base  = vec![None; n];
    let mut done  = vec![false; n];
    let mut queue = PrioQueue::with_capacity(n);

    for s in sources.iter().copied() {
        dist[s] = 0.0;
        base[s] = Some(s);
        queue.push(s, 0.0);
    }
    while let Some((v, d)) = queue.pop() {
        if done[v] {
            continue;
        }
        done[v] = true;
        for e in graph.incident(v).iter().copied() {
            if !allowed(e) {
                continue;
            }
            let w  = graph.opposite(e, v);
            let nd = d + graph.cost_from(e, v);
            if nd <= limit && nd < dist[w] {
                dist[w] = nd;
                pred[w] = Some(e);
                base[w] = base[v];
                queue.push(w, nd);
            }
        }
    }
    ShortestPaths { dist, pred, base }
}

/// Partitions the nodes in voronoi regions around the terminals
pub fn voronoi(graph: &Graph) -> ShortestPaths {
    dijkstra(graph, &graph.terminals(), f64::INFINITY, |_| true)
}

/// For each node, the two closest terminals (along with their distance) in
/// increasing order of distance. A terminal is its own closest terminal.
pub type NearestTerminals = Vec<[Option<(NodeId, f64)>; 2]>;

/// Computes the two closest (distinct) terminals of each node
pub fn two_nearest_terminals(graph: &Graph) -> NearestTerminals {
    let n = graph.nb_nodes();
    let mut labels: NearestTerminals = vec![[None, None]; n];
    let mut queue = PrioQueue::with_capacity(n);
    for t in graph.terminals() {
        queue.push((t, t), 0.0);
    }

    let accepts = |label: &[Option<(NodeId, f64)>; 2], base: NodeId| {
        label[1].is_none() && label[0].map_or(true, |(b, _)| b != base)
    };
    while let Some(((v, base), d)) = queue.pop() {
        if !accepts(&labels[v], base) {
            continue;
        }
        if labels[v][0].is_none() {
            labels[v][0] = Some((base, d));
        } else {
            labels[v][1] = Some((base, d));
        }
        for e in graph.incident(v).iter().copied() {
            let w = graph.opposite(e, v);
            let c = graph.cost_from(e, v);
            if c.is_finite() && accepts(&labels[w], base) {
                queue.push((w, base), d + c);
            }
        }
    }
    labels
}

/// Marks the nodes that can be reached from the given node. In the directed
/// variants, arcs are only traversed along their direction.
pub fn reachable_from(graph: &Graph, from: NodeId) -> Vec<bool> {
    let mut marked = vec![false; graph.nb_nodes()];
    let mut stack  = vec![from];
    marked[from] = true;
    while let Some(v) = stack.pop() {
        for e in graph.incident(v).iter().copied() {
            let w = graph.opposite(e, v);
            if !marked[w] && graph.cost_from(e, v).is_finite() {
                marked[w] = true;
                stack.push(w);
            }
        }
    }
    marked
}
