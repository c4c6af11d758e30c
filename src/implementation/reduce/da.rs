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

//! This module provides the dual ascent based tests. A dual ascent computes a
//! lower bound on the cost of any arborescence rooted at a given terminal,
//! along with the reduced costs of all arcs. Any node (or edge) whose
//! inclusion pushes the reduced cost based bound above the cost of a known
//! solution can be removed from the graph.
//!
//! The rooted prize-collecting variant is handled through an equivalent
//! arborescence instance, where each potential node p gets a terminal copy
//! which is reached either from p for free or from the source by paying the
//! prize of p.
//!
//! The arcs of a graph are numbered after its edges: the arc `2e` traverses
//! the edge e from its tail to its head and the arc `2e + 1` goes the other
//! way around.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{Graph, NodeId, EdgeId, NodeKind, PrioQueue, Reduced, Reduction, ShortestPathHeuristic,
    StpError, Technique, Variant, HEURISTIC_STARTS, is_gt, is_zero, pc_upper_bound};

/// The lower bound and reduced costs computed by a dual ascent
#[derive(Debug, Clone)]
pub struct DualSolution {
    pub root: NodeId,
    pub lower_bound: f64,
    /// The reduced cost of each arc (infinite when the arc can not be used)
    pub reduced_costs: Vec<f64>,
}

#[inline]
fn arc(graph: &Graph, e: EdgeId, from: NodeId) -> usize {
    let (t, _) = graph.endpoints(e);
    if t == from { 2 * e } else { 2 * e + 1 }
}
#[inline]
fn arc_cost(graph: &Graph, a: usize) -> f64 {
    let (t, h) = graph.endpoints(a / 2);
    graph.cost_from(a / 2, if a % 2 == 0 { t } else { h })
}

/// Runs a dual ascent from the given root (Wong). For every terminal which can
/// not yet be reached from the root through arcs of null reduced cost, the
/// nodes that reach it through such arcs form a cut; the cheapest reduced cost
/// of the arcs entering that cut is added to the lower bound and subtracted
/// from all of them.
///
/// Returns None when some terminal can not be reached from the root at all.
pub fn dual_ascent(graph: &Graph, root: NodeId) -> Option<DualSolution> {
    let n = graph.nb_nodes();
    let mut rc = vec![f64::INFINITY; 2 * graph.edge_capacity()];
    for e in graph.edges() {
        rc[2 * e]     = arc_cost(graph, 2 * e);
        rc[2 * e + 1] = arc_cost(graph, 2 * e + 1);
    }

    let mut lower_bound = 0.0;
    let mut inside = vec![false; n];
    let mut cut    = vec![];
    let mut stack  = vec![];
    for t in graph.terminals() {
        if t == root {
            continue;
        }
        loop {
            // nodes reaching t through arcs of null reduced cost
            inside.iter_mut().for_each(|x| *x = false);
            let mut members = vec![t];
            inside[t] = true;
            stack.clear();
            stack.push(t);
            while let Some(v) = stack.pop() {
                for e in graph.incident(v).iter().copied() {
                    let w = graph.opposite(e, v);
                    if !inside[w] && is_zero(rc[arc(graph, e, w)]) {
                        inside[w] = true;
                        members.push(w);
                        stack.push(w);
                    }
                }
            }
            if inside[root] {
                break;
            }

            cut.clear();
            let mut delta = f64::INFINITY;
            for v in members.iter().copied() {
                for e in graph.incident(v).iter().copied() {
                    let w = graph.opposite(e, v);
                    let a = arc(graph, e, w);
                    if !inside[w] && rc[a].is_finite() {
                        delta = delta.min(rc[a]);
                        cut.push(a);
                    }
                }
            }
            if cut.is_empty() {
                return None;
            }
            lower_bound += delta;
            for a in cut.iter().copied() {
                rc[a] -= delta;
                if is_zero(rc[a]) {
                    rc[a] = 0.0;
                }
            }
        }
    }
    Some(DualSolution { root, lower_bound, reduced_costs: rc })
}

/// Shortest reduced cost distances. Going `forward`, these are the distances
/// from the sources; otherwise these are the distances towards the sources.
fn reduced_distances(graph: &Graph, rc: &[f64], sources: &[NodeId], forward: bool) -> Vec<f64> {
    let n = graph.nb_nodes();
    let mut dist  = vec![f64::INFINITY; n];
    let mut done  = vec![false; n];
    let mut queue = PrioQueue::with_capacity(n);
    for s in sources.iter().copied() {
        dist[s] = 0.0;
        queue.push(s, 0.0);
    }
    while let Some((v, d)) = queue.pop() {
        if done[v] {
            continue;
        }
        done[v] = true;
        for e in graph.incident(v).iter().copied() {
            let w = graph.opposite(e, v);
            let a = if forward { arc(graph, e, v) } else { arc(graph, e, w) };
            let nd = d + rc[a];
            if nd < dist[w] {
                dist[w] = nd;
                queue.push(w, nd);
            }
        }
    }
    dist
}

/// The cost of some solution of the graph (if one is found)
fn upper_bound(graph: &Graph, seed: u64) -> Option<f64> {
    let heuristic = ShortestPathHeuristic::new(graph);
    if graph.variant().is_directed() {
        let targets: Vec<bool> = (0..graph.nb_nodes()).map(|v| graph.kind(v) == NodeKind::Terminal).collect();
        heuristic.from_root(graph.source()?, &targets).map(|t| t.cost)
    } else {
        let mut rng = StdRng::seed_from_u64(seed);
        heuristic.run(HEURISTIC_STARTS, &mut rng).map(|t| t.cost)
    }
}

/// The nodes and edges which can only be part of solutions costing more than
/// `upper`, given the outcome of a dual ascent. The edges incident to one of
/// the returned nodes are left out.
fn doomed(graph: &Graph, dual: &DualSolution, upper: f64) -> (Vec<NodeId>, Vec<EdgeId>) {
    let rc = &dual.reduced_costs;
    let others: Vec<NodeId> = graph.terminals().into_iter().filter(|t| *t != dual.root).collect();
    let from_root = reduced_distances(graph, rc, &[dual.root], true);
    let to_terms  = reduced_distances(graph, rc, &others, false);
    let lb = dual.lower_bound;

    let nodes: Vec<NodeId> = (0..graph.nb_nodes())
        .filter(|v| !graph.is_terminal(*v) && graph.degree(*v) > 0)
        .filter(|v| is_gt(lb + from_root[*v] + to_terms[*v], upper))
        .collect();
    let mut gone = vec![false; graph.nb_nodes()];
    nodes.iter().for_each(|v| gone[*v] = true);

    let edges: Vec<EdgeId> = graph.edges()
        .filter(|e| {
            let (t, h) = graph.endpoints(*e);
            let forth = lb + from_root[t] + rc[2 * e]     + to_terms[h];
            let back  = lb + from_root[h] + rc[2 * e + 1] + to_terms[t];
            !gone[t] && !gone[h] && is_gt(forth, upper) && is_gt(back, upper)
        })
        .collect();
    (nodes, edges)
}

/// Deletes the nodes and edges which can only be part of solutions costing
/// more than `upper`, given the outcome of a dual ascent.
fn eliminate(graph: &mut Graph, dual: &DualSolution, upper: f64) -> usize {
    let (nodes, edges) = doomed(graph, dual, upper);
    for v in nodes.iter().copied() {
        graph.delete_node(v);
    }
    for e in edges.iter().copied() {
        graph.delete_edge(e);
    }
    nodes.len() + edges.len()
}

/// The arborescence instance equivalent to a rooted prize-collecting one. Its
/// first nodes are those of the graph, followed by one terminal copy per
/// potential node. Also returns the edge of the graph each of the first edges
/// of the arborescence instance stands for.
fn prize_arborescence(graph: &Graph, root: NodeId) -> (Graph, Vec<EdgeId>) {
    let n = graph.nb_nodes();
    let potentials: Vec<NodeId> = (0..n).filter(|v| graph.kind(*v) == NodeKind::Potential).collect();

    let mut arbo   = Graph::new(n + potentials.len(), Variant::Sap);
    let mut origin = vec![];
    for e in graph.edges() {
        let (t, h) = graph.endpoints(e);
        arbo.add_arc_pair(t, h, graph.cost_from(e, t), graph.cost_from(e, h));
        origin.push(e);
    }
    arbo.set_terminal(root);
    arbo.set_source(root);
    for t in graph.terminals() {
        arbo.set_terminal(t);
    }
    for (i, p) in potentials.iter().copied().enumerate() {
        let copy = n + i;
        arbo.add_arc_pair(p, copy, 0.0, f64::INFINITY);
        arbo.add_arc_pair(root, copy, graph.prize(p), f64::INFINITY);
        arbo.set_terminal(copy);
    }
    (arbo, origin)
}

/// The dual ascent test of the rooted prize-collecting variant
fn reduce_rooted_pc(graph: &mut Graph) -> Result<Reduced, StpError> {
    let mut reduced = Reduced::default();
    let Some(root) = graph.source().filter(|s| graph.is_terminal(*s)) else {
        return Ok(reduced);
    };
    let (arbo, origin) = prize_arborescence(graph, root);
    let Some(dual) = dual_ascent(&arbo, root) else {
        reduced.infeasible = true;
        return Ok(reduced);
    };
    let Some(upper) = pc_upper_bound(graph)? else {
        return Ok(reduced);
    };

    // the copies are terminals, hence never doomed
    let (nodes, edges) = doomed(&arbo, &dual, upper);
    for v in nodes.iter().copied() {
        graph.delete_node(v);
        reduced.nelims += 1;
    }
    for e in edges.into_iter().filter(|e| *e < origin.len()).map(|e| origin[e]) {
        if graph.is_alive(e) {
            graph.delete_edge(e);
            reduced.nelims += 1;
        }
    }
    Ok(reduced)
}

/// The root of a dual ascent when none is chosen: the source if it is a
/// terminal, the first terminal otherwise
fn default_root(graph: &Graph) -> Option<NodeId> {
    graph.source()
        .filter(|s| graph.is_terminal(*s))
        .or_else(|| graph.terminals().first().copied())
}

// ----------------------------------------------------------------------------
// --- DUAL ASCENT ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The dual ascent test, rooted at the source. It applies to the Steiner tree,
/// the Steiner arborescence and the rooted prize-collecting problems.
#[derive(Debug, Clone, Copy)]
pub struct DualAscent {
    /// Seeds the heuristic computing the upper bound
    pub seed: u64,
}

impl Reduction for DualAscent {
    fn technique(&self) -> Technique {
        Technique::DualAscent
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        match graph.variant() {
            Variant::Stp | Variant::Sap => {},
            Variant::Rpc => return reduce_rooted_pc(graph),
            other        => return Err(StpError::UnsupportedVariant(other)),
        }
        let mut reduced = Reduced::default();
        if graph.nb_terminals() < 2 {
            return Ok(reduced);
        }
        let Some(root) = default_root(graph) else {
            return Ok(reduced);
        };
        let Some(dual) = dual_ascent(graph, root) else {
            reduced.infeasible = true;
            return Ok(reduced);
        };
        if let Some(upper) = upper_bound(graph, self.seed) {
            reduced.nelims = eliminate(graph, &dual, upper);
        }
        Ok(reduced)
    }
}

// ----------------------------------------------------------------------------
// --- EXTENDED DUAL ASCENT ---------------------------------------------------
// ----------------------------------------------------------------------------
/// The dual ascent test of the Steiner tree problem, repeated from several
/// randomly chosen terminal roots.
#[derive(Debug, Clone, Copy)]
pub struct DualAscentExt {
    /// The number of roots to start a dual ascent from
    pub roots: usize,
    pub seed: u64,
}

impl Reduction for DualAscentExt {
    fn technique(&self) -> Technique {
        Technique::DualAscentExt
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Stp {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        if graph.nb_terminals() < 2 {
            return Ok(reduced);
        }
        let Some(upper) = upper_bound(graph, self.seed) else {
            return Ok(reduced);
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let terminals = graph.terminals();
        let roots: Vec<NodeId> = terminals.choose_multiple(&mut rng, self.roots).copied().collect();
        for root in roots {
            match dual_ascent(graph, root) {
                None       => {
                    reduced.infeasible = true;
                    break;
                },
                Some(dual) => reduced.nelims += eliminate(graph, &dual, upper),
            }
        }
        Ok(reduced)
    }
}
