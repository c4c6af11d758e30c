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

//! This module provides the shortest path heuristic (Takahashi & Matsuyama)
//! which is used to compute the upper bounds needed by the bound based
//! reductions and to seed the dynamic program with a primal solution.

use rand::{Rng, seq::SliceRandom};

use crate::{Graph, NodeId, EdgeId, NodeKind, PrioQueue};

/// The number of roots the heuristic is started from when an upper bound
/// is needed
pub const HEURISTIC_STARTS: usize = 10;

/// A Steiner tree found by a heuristic
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicTree {
    pub cost: f64,
    pub edges: Vec<EdgeId>,
}

/// The shortest path heuristic grows a tree from a root node and iteratively
/// connects the target node which is the closest to the tree (along a shortest
/// path) until all targets are connected.
pub struct ShortestPathHeuristic<'a> {
    graph: &'a Graph,
}
impl <'a> ShortestPathHeuristic<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// Grows a tree from the given root. Returns None when some target can
    /// not be reached from the root.
    pub fn from_root(&self, root: NodeId, targets: &[bool]) -> Option<HeuristicTree> {
        let g = self.graph;
        let n = g.nb_nodes();
        let mut in_tree   = vec![false; n];
        let mut remaining = (0..n).filter(|v| targets[*v] && *v != root).count();
        let mut tree      = HeuristicTree { cost: 0.0, edges: vec![] };
        in_tree[root] = true;

        let mut dist  = vec![f64::INFINITY; n];
        let mut pred  = vec![None; n];
        let mut done  = vec![false; n];
        let mut queue = PrioQueue::with_capacity(n);
        while remaining > 0 {
            dist.iter_mut().for_each(|d| *d = f64::INFINITY);
            pred.iter_mut().for_each(|p| *p = None);
            done.iter_mut().for_each(|d| *d = false);
            queue.clear();
            for v in (0..n).filter(|v| in_tree[*v]) {
                dist[v] = 0.0;
                queue.push(v, 0.0);
            }

            let mut reached = None;
            while let Some((v, d)) = queue.pop() {
                if done[v] {
                    continue;
                }
                done[v] = true;
                if targets[v] && !in_tree[v] {
                    reached = Some(v);
                    break;
                }
                for e in g.incident(v).iter().copied() {
                    let w  = g.opposite(e, v);
                    let nd = d + g.cost_from(e, v);
                    if nd < dist[w] {
                        dist[w] = nd;
                        pred[w] = Some(e);
                        queue.push(w, nd);
                    }
                }
            }

            let mut v = reached?;
            while !in_tree[v] {
                in_tree[v] = true;
                if targets[v] {
                    remaining -= 1;
                }
                // every node outside the tree on the path has a predecessor
                let e = pred[v]?;
                let u = g.opposite(e, v);
                tree.cost += g.cost_from(e, u);
                tree.edges.push(e);
                v = u;
            }
        }
        Some(tree)
    }

    /// Returns the cheapest of the trees grown from the given roots
    pub fn best_of(&self, roots: &[NodeId], targets: &[bool]) -> Option<HeuristicTree> {
        roots.iter()
            .filter_map(|r| self.from_root(*r, targets))
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }

    /// Computes a Steiner tree spanning all the terminals of the graph. The
    /// tree is grown from the source and from `nstarts - 1` other randomly
    /// chosen terminals; the cheapest tree is returned.
    pub fn run<R: Rng>(&self, nstarts: usize, rng: &mut R) -> Option<HeuristicTree> {
        let g = self.graph;
        let terminals = g.terminals();
        let first = g.source().or_else(|| terminals.first().copied())?;

        let mut roots = vec![first];
        let others: Vec<NodeId> = terminals.into_iter().filter(|t| *t != first).collect();
        roots.extend(others.choose_multiple(rng, nstarts.saturating_sub(1)).copied());

        let targets: Vec<bool> = (0..g.nb_nodes()).map(|v| g.kind(v) == NodeKind::Terminal).collect();
        self.best_of(&roots, &targets)
    }
}

#[cfg(test)]
mod test_shortest_path_heuristic {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::*;

    #[test]
    fn it_finds_the_optimal_tree_on_a_star() {
        // center 0 with three terminal leaves, and an expensive outer cycle
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 2, 1.0);
        g.add_edge(0, 3, 1.0);
        g.add_edge(1, 2, 3.0);
        g.add_edge(2, 3, 3.0);
        g.set_terminal(1);
        g.set_terminal(2);
        g.set_terminal(3);
        let mut rng = StdRng::seed_from_u64(0);
        let tree = ShortestPathHeuristic::new(&g).run(3, &mut rng).unwrap();
        assert_eq!(3.0, tree.cost);
        let mut edges = tree.edges.clone();
        edges.sort_unstable();
        assert_eq!(vec![0, 1, 2], edges);
    }
    #[test]
    fn a_single_terminal_yields_an_empty_tree() {
        let mut g = Graph::new(2, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.set_terminal(1);
        let mut rng = StdRng::seed_from_u64(0);
        let tree = ShortestPathHeuristic::new(&g).run(1, &mut rng).unwrap();
        assert_eq!(0.0, tree.cost);
        assert!(tree.edges.is_empty());
    }
    #[test]
    fn unreachable_terminals_yield_no_tree() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.set_terminal(0);
        g.set_terminal(2);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(None, ShortestPathHeuristic::new(&g).run(2, &mut rng));
    }
}
