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

//! This module provides the distance based edge elimination tests: an edge is
//! useless as soon as its endpoints can be connected in a way that is never
//! worse than the edge itself.

use fxhash::FxHashMap;

use crate::{Graph, NodeId, EdgeId, Reduced, Reduction, StpError, Technique, Variant, PrioQueue,
    DisjointSets, voronoi, two_nearest_terminals, is_le, is_gt};

/// Looks for a path from `from` to `to` that does not use the edge `avoid` and
/// whose cost is at most `limit`. The search gives up (and returns false) after
/// having scanned `max_visits` edges.
pub(crate) fn has_shorter_path(graph: &Graph, from: NodeId, to: NodeId, avoid: EdgeId, limit: f64, max_visits: usize) -> bool {
    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut queue  = PrioQueue::new();
    let mut visits = 0;
    dist.insert(from, 0.0);
    queue.push(from, 0.0);
    while let Some((v, d)) = queue.pop() {
        if v == to {
            return true;
        }
        if d > dist.get(&v).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        for e in graph.incident(v).iter().copied() {
            if e == avoid {
                continue;
            }
            visits += 1;
            if visits > max_visits {
                return false;
            }
            let w  = graph.opposite(e, v);
            let nd = d + graph.cost_from(e, v);
            if is_le(nd, limit) && nd < dist.get(&w).copied().unwrap_or(f64::INFINITY) {
                dist.insert(w, nd);
                queue.push(w, nd);
            }
        }
    }
    false
}

// ----------------------------------------------------------------------------
// --- LONG EDGES -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Deletes every edge (u, v) for which a path from u to v not longer than the
/// edge exists.
#[derive(Debug, Clone, Copy)]
pub struct LongEdgeTest {
    /// The maximum number of edges scanned per tested edge
    pub limit: usize,
}

impl Reduction for LongEdgeTest {
    fn technique(&self) -> Technique {
        Technique::LongEdge
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if !matches!(graph.variant(), Variant::Stp | Variant::Pc | Variant::Rpc) {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        for e in 0..graph.edge_capacity() {
            if !graph.is_alive(e) {
                continue;
            }
            let (u, v) = graph.endpoints(e);
            if has_shorter_path(graph, u, v, e, graph.cost(e), self.limit) {
                graph.delete_edge(e);
                reduced.nelims += 1;
            }
        }
        Ok(reduced)
    }
}

// ----------------------------------------------------------------------------
// --- SPECIAL DISTANCE -------------------------------------------------------
// ----------------------------------------------------------------------------
/// The special distance test. The bottleneck Steiner distance between the
/// endpoints of each edge is bounded from above with the help of the voronoi
/// regions of the terminals: a path goes from one endpoint to one of its two
/// closest terminals, then follows the minimum spanning tree of the terminals
/// (in the distance network induced by the boundary edges of the voronoi
/// regions) and reaches the other endpoint from one of its two closest
/// terminals. An edge that is strictly longer than that bound is deleted.
///
/// All the bounds are computed on the graph as it is when the test starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdTest;

/// The minimum spanning tree of the terminals, rooted so that the longest
/// edge on the path between any two terminals can be found.
struct TerminalTree {
    parent: Vec<Option<(NodeId, f64)>>,
    depth: Vec<usize>,
    component: Vec<usize>,
}
impl TerminalTree {
    fn new(graph: &Graph) -> Self {
        let n  = graph.nb_nodes();
        let vo = voronoi(graph);

        let mut links = vec![];
        for e in graph.edges() {
            let (x, y) = graph.endpoints(e);
            if let (Some(bx), Some(by)) = (vo.base[x], vo.base[y]) {
                if bx != by {
                    links.push((vo.dist[x] + graph.cost(e) + vo.dist[y], bx, by));
                }
            }
        }
        links.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut sets = DisjointSets::new(n);
        let mut adj: Vec<Vec<(NodeId, f64)>> = vec![vec![]; n];
        for (w, a, b) in links {
            if sets.union(a, b) {
                adj[a].push((b, w));
                adj[b].push((a, w));
            }
        }

        let mut parent    = vec![None; n];
        let mut depth     = vec![0; n];
        let mut component = vec![usize::MAX; n];
        for root in graph.terminals() {
            if component[root] != usize::MAX {
                continue;
            }
            component[root] = root;
            let mut stack = vec![root];
            while let Some(v) = stack.pop() {
                for (w, c) in adj[v].iter().copied() {
                    if component[w] == usize::MAX {
                        component[w] = root;
                        parent[w]    = Some((v, c));
                        depth[w]     = depth[v] + 1;
                        stack.push(w);
                    }
                }
            }
        }
        TerminalTree { parent, depth, component }
    }

    /// The longest edge on the tree path between the terminals a and b
    fn bottleneck(&self, mut a: NodeId, mut b: NodeId) -> f64 {
        if self.component[a] != self.component[b] {
            return f64::INFINITY;
        }
        let mut longest = 0.0_f64;
        while a != b {
            let x = if self.depth[a] >= self.depth[b] { &mut a } else { &mut b };
            match self.parent[*x] {
                Some((p, c)) => { longest = longest.max(c); *x = p; },
                None => return f64::INFINITY,
            }
        }
        longest
    }
}

impl Reduction for SdTest {
    fn technique(&self) -> Technique {
        Technique::Sd
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Stp {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let tree = TerminalTree::new(graph);
        let near = two_nearest_terminals(graph);

        let mut useless = vec![];
        for e in graph.edges() {
            let (u, v) = graph.endpoints(e);
            let mut bound = f64::INFINITY;
            for (t1, d1) in near[u].iter().flatten().copied() {
                for (t2, d2) in near[v].iter().flatten().copied() {
                    bound = bound.min(d1.max(d2).max(tree.bottleneck(t1, t2)));
                }
            }
            if is_gt(graph.cost(e), bound) {
                useless.push(e);
            }
        }
        useless.iter().for_each(|e| graph.delete_edge(*e));
        Ok(Reduced { nelims: useless.len(), ..Reduced::default() })
    }
}

// ----------------------------------------------------------------------------
// --- SPECIAL DISTANCE ALONG PATHS -------------------------------------------
// ----------------------------------------------------------------------------
/// The special distance path test. For each edge (u, v), it searches a path
/// from u to v avoiding the edge, where each portion of the path between two
/// consecutive terminals is not longer than the edge. Such a path makes the
/// edge useless.
#[derive(Debug, Clone, Copy)]
pub struct SdspTest {
    /// The maximum number of edges scanned per tested edge
    pub limit: usize,
}

impl SdspTest {
    /// Searches the path: the label of a node is the length of the portion of
    /// the path since the last terminal. Since labels drop back to zero at the
    /// terminals, a node may be scanned several times.
    fn has_path(&self, graph: &Graph, from: NodeId, to: NodeId, avoid: EdgeId, limit: f64) -> bool {
        let mut label: FxHashMap<NodeId, f64> = FxHashMap::default();
        let mut queue  = PrioQueue::new();
        let mut visits = 0;
        label.insert(from, 0.0);
        queue.push(from, 0.0);
        while let Some((v, d)) = queue.pop() {
            if v == to {
                return true;
            }
            if d > label.get(&v).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            for e in graph.incident(v).iter().copied() {
                if e == avoid {
                    continue;
                }
                visits += 1;
                if visits > self.limit {
                    return false;
                }
                let w  = graph.opposite(e, v);
                let nd = d + graph.cost_from(e, v);
                if !is_le(nd, limit) {
                    continue;
                }
                let nd = if graph.is_terminal(w) && w != to { 0.0 } else { nd };
                if nd < label.get(&w).copied().unwrap_or(f64::INFINITY) {
                    label.insert(w, nd);
                    queue.push(w, nd);
                }
            }
        }
        false
    }
}

impl Reduction for SdspTest {
    fn technique(&self) -> Technique {
        Technique::Sdsp
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if !matches!(graph.variant(), Variant::Stp | Variant::Rpc) {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        for e in 0..graph.edge_capacity() {
            if !graph.is_alive(e) {
                continue;
            }
            let (u, v) = graph.endpoints(e);
            if self.has_path(graph, u, v, e, graph.cost(e)) {
                graph.delete_edge(e);
                reduced.nelims += 1;
            }
        }
        Ok(reduced)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
