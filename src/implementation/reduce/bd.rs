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

//! This module provides the bottleneck degree 3 test which replaces Steiner
//! nodes of degree three by edges between their neighbors.

use fxhash::FxHashMap;

use crate::{Graph, NodeId, EdgeId, NodeKind, Reduced, Reduction, StpError, Technique, Variant, PrioQueue, is_le};

/// A Steiner node v of degree three can be dropped when its neighbors can
/// always be connected without v at no greater cost than the star centered at
/// v. Shortest paths avoiding v are used to establish it. When v is dropped,
/// each pair of neighbors which can not be connected more cheaply without v
/// gets an edge standing for the path through v.
#[derive(Debug, Clone, Copy)]
pub struct Bd3Test {
    /// The maximum number of edges scanned per shortest path computation
    pub limit: usize,
}

impl Bd3Test {
    /// The length of a shortest path from `from` to `to` that does not go
    /// through `avoid` (infinite when none is found within the limits)
    fn distance(&self, graph: &Graph, from: NodeId, to: NodeId, avoid: NodeId, bound: f64) -> f64 {
        let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
        let mut queue  = PrioQueue::new();
        let mut visits = 0;
        dist.insert(from, 0.0);
        queue.push(from, 0.0);
        while let Some((v, d)) = queue.pop() {
            if v == to {
                return d;
            }
            if d > dist.get(&v).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            for e in graph.incident(v).iter().copied() {
                let w = graph.opposite(e, v);
                if w == avoid {
                    continue;
                }
                visits += 1;
                if visits > self.limit {
                    return f64::INFINITY;
                }
                let nd = d + graph.cost_from(e, v);
                if is_le(nd, bound) && nd < dist.get(&w).copied().unwrap_or(f64::INFINITY) {
                    dist.insert(w, nd);
                    queue.push(w, nd);
                }
            }
        }
        f64::INFINITY
    }

    /// Tries to drop v. Returns true iff it was dropped.
    fn try_replace(&self, graph: &mut Graph, v: NodeId) -> bool {
        let edges: [EdgeId; 3] = [graph.incident(v)[0], graph.incident(v)[1], graph.incident(v)[2]];
        let nbrs = edges.map(|e| graph.opposite(e, v));
        let cost = edges.map(|e| graph.cost(e));
        if nbrs[0] == nbrs[1] || nbrs[0] == nbrs[2] || nbrs[1] == nbrs[2] {
            return false;
        }

        let pairs = [(0, 1), (0, 2), (1, 2)];
        let mut shorter = [false; 3];
        let mut dist    = [0.0; 3];
        for (k, (i, j)) in pairs.iter().copied().enumerate() {
            let through = cost[i] + cost[j];
            let around  = self.distance(graph, nbrs[i], nbrs[j], v, through);
            shorter[k]  = is_le(around, through);
            dist[k]     = around.min(through);
        }
        let star = cost.iter().sum::<f64>();
        let mut sorted = dist;
        sorted.sort_by(|a, b| a.total_cmp(b));
        if !is_le(sorted[0] + sorted[1], star) {
            return false;
        }

        let replacements: Vec<(NodeId, NodeId, f64, Vec<EdgeId>)> = pairs.iter().copied().enumerate()
            .filter(|(k, _)| !shorter[*k])
            .map(|(_, (i, j))| (nbrs[i], nbrs[j], cost[i] + cost[j], graph.path_ancestors(&[edges[i], edges[j]], v)))
            .collect();
        graph.delete_node(v);
        for (a, b, c, ancestors) in replacements {
            graph.add_or_tighten(a, b, c, ancestors);
        }
        true
    }
}

impl Reduction for Bd3Test {
    fn technique(&self) -> Technique {
        Technique::Bd3
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if !matches!(graph.variant(), Variant::Stp | Variant::Pc | Variant::Rpc) {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        for v in 0..graph.nb_nodes() {
            if graph.degree(v) == 3 && graph.kind(v) == NodeKind::Steiner && self.try_replace(graph, v) {
                reduced.nelims += 1;
            }
        }
        Ok(reduced)
    }
}

#[cfg(test)]
mod test_bd3 {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::*;
    use crate::test_utils::*;

    #[test]
    fn a_star_whose_leaves_are_close_is_replaced() {
        // star at 3 with cost 2 per branch, 0 and 1 are also directly linked
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 3, 2.0);
        g.add_edge(1, 3, 2.0);
        g.add_edge(2, 3, 2.0);
        g.add_edge(0, 1, 1.0);
        g.set_terminal(0);
        g.set_terminal(1);
        g.set_terminal(2);
        let r = Bd3Test { limit: 100 }.apply(&mut g).unwrap();
        assert_eq!(1, r.nelims);
        assert_eq!(0, g.degree(3));
        // 2 can only be reached through 3
        assert_eq!(3, g.nb_edges());
        assert_eq!(4.0, g.cost(g.find_edge(1, 2).unwrap()));
        let e = g.find_edge(0, 2).unwrap();
        assert_eq!(4.0, g.cost(e));
        assert_eq!(vec![0, 2], g.ancestors(e));
    }
    #[test]
    fn a_cheap_star_is_kept() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 3, 1.0);
        g.add_edge(1, 3, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(0, 1, 5.0);
        g.add_edge(1, 2, 5.0);
        g.set_terminal(0);
        g.set_terminal(1);
        g.set_terminal(2);
        assert_eq!(0, Bd3Test { limit: 100 }.apply(&mut g).unwrap().nelims);
        assert_eq!(3, g.degree(3));
    }
    #[test]
    fn the_bd3_test_is_sound_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..30 {
            for g in [random_stp(&mut rng, 10, 6, 4), random_pc(&mut rng, 9, 5, 4)] {
                let mut reduced = g.clone();
                let r = Bd3Test { limit: 1000 }.apply(&mut reduced).unwrap();
                reduced.validate().unwrap();
                let expected = brute_force(&g).unwrap();
                let actual   = brute_force(&reduced).unwrap() + r.fixed;
                assert!((expected - actual).abs() < 1e-6, "expected {expected} got {actual}");
            }
        }
    }
}
