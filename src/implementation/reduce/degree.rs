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

//! This module provides the degree based tests. These are the cheapest
//! reductions: they only look at the immediate neighborhood of each node.

use crate::{Graph, NodeId, EdgeId, NodeKind, Reduced, Reduction, StpError, Technique, Variant, is_zero};

/// Returns the cheapest and the second cheapest edge incident to v
pub(crate) fn two_cheapest(graph: &Graph, v: NodeId) -> (Option<EdgeId>, f64) {
    let mut best = None;
    let mut c1   = f64::INFINITY;
    let mut c2   = f64::INFINITY;
    for e in graph.incident(v).iter().copied() {
        let c = graph.cost(e);
        if c < c1 {
            c2   = c1;
            c1   = c;
            best = Some(e);
        } else if c < c2 {
            c2 = c;
        }
    }
    (best, c2)
}

// ----------------------------------------------------------------------------
// --- STEINER TREE -----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The degree test of the Steiner tree problem. Until nothing changes:
///
/// * a non terminal leaf is deleted;
/// * a non terminal node of degree two is replaced by an edge;
/// * a terminal leaf is merged with its neighbor (the edge belongs to every
///   solution);
/// * when the cheapest edge incident to a terminal leads to an other terminal,
///   that edge is contracted.
///
/// When at most one terminal is left, all edges are deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeTest;

impl Reduction for DegreeTest {
    fn technique(&self) -> Technique {
        Technique::Degree
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Stp {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        loop {
            let before = reduced.nelims;
            if graph.nb_terminals() <= 1 {
                let edges: Vec<EdgeId> = graph.edges().collect();
                reduced.nelims += edges.len();
                edges.into_iter().for_each(|e| graph.delete_edge(e));
                return Ok(reduced);
            }
            for v in 0..graph.nb_nodes() {
                let degree = graph.degree(v);
                if degree == 0 {
                    continue;
                }
                if !graph.is_terminal(v) {
                    match degree {
                        1 => { graph.delete_edge(graph.incident(v)[0]); reduced.nelims += 1; },
                        2 => { graph.replace_by_edge(v); reduced.nelims += 1; },
                        _ => {},
                    }
                    continue;
                }
                if graph.nb_terminals() <= 1 {
                    break;
                }
                let (cheapest, _) = two_cheapest(graph, v);
                let Some(e) = cheapest else { continue; };
                let w = graph.opposite(e, v);
                if degree == 1 {
                    reduced.fixed  += graph.cost(e);
                    reduced.nelims += 1;
                    graph.contract_edge(e, w);
                } else if graph.is_terminal(w) {
                    reduced.fixed  += graph.cost(e);
                    reduced.nelims += 1;
                    graph.contract_edge(e, v);
                }
            }
            if reduced.nelims == before {
                return Ok(reduced);
            }
        }
    }
}

/// Contracts all the edges that have no cost
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEdgeContraction;

impl Reduction for ZeroEdgeContraction {
    fn technique(&self) -> Technique {
        Technique::ZeroEdge
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant().is_directed() {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        for e in 0..graph.edge_capacity() {
            if !graph.is_alive(e) || !is_zero(graph.cost(e)) {
                continue;
            }
            let (t, h) = graph.endpoints(e);
            let keep = if graph.kind(h) > graph.kind(t) { h } else { t };
            graph.contract_edge(e, keep);
            reduced.nelims += 1;
        }
        Ok(reduced)
    }
}

// ----------------------------------------------------------------------------
// --- PRIZE COLLECTING -------------------------------------------------------
// ----------------------------------------------------------------------------
/// The degree test of the prize-collecting variants:
///
/// * a Steiner leaf is deleted and a Steiner node of degree two is replaced by
///   an edge;
/// * the edge of a potential leaf is deleted when it is not cheaper than the
///   prize of the leaf (the leaf is then only reachable on its own);
/// * a terminal leaf is merged with its neighbor when there are at least two
///   terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcDegreeTest;

impl Reduction for PcDegreeTest {
    fn technique(&self) -> Technique {
        Technique::PcDegree
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if !graph.variant().is_prize_collecting() {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        loop {
            let before = reduced.nelims;
            for v in 0..graph.nb_nodes() {
                let degree = graph.degree(v);
                if degree == 0 {
                    continue;
                }
                match graph.kind(v) {
                    NodeKind::Steiner => match degree {
                        1 => { graph.delete_edge(graph.incident(v)[0]); reduced.nelims += 1; },
                        2 => { graph.replace_by_edge(v); reduced.nelims += 1; },
                        _ => {},
                    },
                    NodeKind::Potential if degree == 1 => {
                        let e = graph.incident(v)[0];
                        if graph.cost(e) >= graph.prize(v) {
                            graph.delete_edge(e);
                            reduced.nelims += 1;
                        }
                    },
                    NodeKind::Terminal if degree == 1 && graph.nb_terminals() >= 2 => {
                        let e = graph.incident(v)[0];
                        let w = graph.opposite(e, v);
                        reduced.fixed  += graph.cost(e);
                        reduced.nelims += 1;
                        graph.contract_edge(e, w);
                    },
                    _ => {},
                }
            }
            if reduced.nelims == before {
                return Ok(reduced);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// --- MAXIMUM WEIGHT ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// The degree test of the maximum-weight connected subgraph problem:
///
/// * a leaf whose weight is not positive is disconnected (it can only be a
///   solution on its own);
/// * two adjacent nodes having a positive weight are merged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MwDegreeTest;

impl Reduction for MwDegreeTest {
    fn technique(&self) -> Technique {
        Technique::MwDegree
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Mw {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        loop {
            let before = reduced.nelims;
            for v in 0..graph.nb_nodes() {
                if graph.degree(v) == 1 && graph.prize(v) <= 0.0 {
                    graph.delete_edge(graph.incident(v)[0]);
                    reduced.nelims += 1;
                }
            }
            for e in 0..graph.edge_capacity() {
                if !graph.is_alive(e) {
                    continue;
                }
                let (t, h) = graph.endpoints(e);
                if graph.prize(t) > 0.0 && graph.prize(h) > 0.0 {
                    graph.contract_edge(e, t);
                    reduced.nelims += 1;
                }
            }
            if reduced.nelims == before {
                return Ok(reduced);
            }
        }
    }
}

/// The adjacent neighbourhood test: a node v whose weight is not positive is
/// disconnected when it has a neighbor u of non negative weight which is
/// adjacent to all the other neighbors of v. Any solution going through v can
/// then go through u instead (or simply drop v).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsTest;

impl AnsTest {
    fn dominated(graph: &Graph, v: NodeId) -> bool {
        let neighbors: Vec<NodeId> = graph.incident(v).iter().map(|e| graph.opposite(*e, v)).collect();
        neighbors.iter().copied()
            .filter(|u| graph.prize(*u) >= 0.0)
            .any(|u| neighbors.iter().all(|w| *w == u || graph.find_edge(u, *w).is_some()))
    }
}

impl Reduction for AnsTest {
    fn technique(&self) -> Technique {
        Technique::Ans
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Mw {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        for v in 0..graph.nb_nodes() {
            if graph.degree(v) > 0 && graph.prize(v) <= 0.0 && Self::dominated(graph, v) {
                reduced.nelims += graph.delete_node(v);
            }
        }
        Ok(reduced)
    }
}

// ----------------------------------------------------------------------------
// --- STEINER ARBORESCENCE ---------------------------------------------------
// ----------------------------------------------------------------------------
/// The degree test of the Steiner arborescence problem. Until nothing changes:
///
/// * an edge which can only be traversed towards the source is deleted;
/// * a non terminal node which can not be entered, or which can only be left
///   towards the source, is disconnected;
/// * a non terminal node having exactly one way in and one way out is replaced
///   by an arc connecting its neighbors, unless a cheaper arc already does.
///
/// When the source is the only terminal left, all edges are deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SapDegreeTest;

impl SapDegreeTest {
    /// The edges through which v can be entered, and those through which it
    /// can be left towards an other node than the source
    fn arcs(graph: &Graph, v: NodeId, source: NodeId) -> (Vec<EdgeId>, Vec<EdgeId>) {
        let mut ins  = vec![];
        let mut outs = vec![];
        for e in graph.incident(v).iter().copied() {
            let w = graph.opposite(e, v);
            if graph.cost_from(e, w).is_finite() {
                ins.push(e);
            }
            if w != source && graph.cost_from(e, v).is_finite() {
                outs.push(e);
            }
        }
        (ins, outs)
    }
    /// Replaces the path u -> v -> w by an arc u -> w. Returns the number of
    /// eliminations.
    fn bypass(graph: &mut Graph, v: NodeId, ein: EdgeId, eout: EdgeId) -> usize {
        let u = graph.opposite(ein, v);
        let w = graph.opposite(eout, v);
        if u == w {
            // v can only hang below u
            return graph.delete_node(v);
        }
        let cost = graph.cost_from(ein, u) + graph.cost_from(eout, v);
        match graph.find_edge(u, w) {
            Some(f) if graph.cost_from(f, u) <= cost => {
                graph.delete_node(v);
                1
            },
            Some(_) => 0,
            None => {
                let ancestors = graph.path_ancestors(&[ein, eout], v);
                graph.delete_node(v);
                graph.insert_edge(u, w, cost, f64::INFINITY, ancestors);
                1
            },
        }
    }
}

impl Reduction for SapDegreeTest {
    fn technique(&self) -> Technique {
        Technique::SapDegree
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Sap {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        let Some(source) = graph.source() else {
            return Ok(reduced);
        };
        if graph.nb_terminals() <= 1 {
            let edges: Vec<EdgeId> = graph.edges().collect();
            reduced.nelims += edges.len();
            edges.into_iter().for_each(|e| graph.delete_edge(e));
            return Ok(reduced);
        }
        loop {
            let before = reduced.nelims;
            for e in graph.edges().collect::<Vec<EdgeId>>() {
                let (t, h) = graph.endpoints(e);
                let forth = h != source && graph.cost_from(e, t).is_finite();
                let back  = t != source && graph.cost_from(e, h).is_finite();
                if !forth && !back {
                    graph.delete_edge(e);
                    reduced.nelims += 1;
                }
            }
            for v in 0..graph.nb_nodes() {
                if graph.degree(v) == 0 || graph.is_terminal(v) {
                    continue;
                }
                let (ins, outs) = Self::arcs(graph, v, source);
                if ins.is_empty() || outs.is_empty() {
                    reduced.nelims += graph.delete_node(v);
                } else if let ([ein], [eout]) = (ins.as_slice(), outs.as_slice()) {
                    reduced.nelims += Self::bypass(graph, v, *ein, *eout);
                }
            }
            if reduced.nelims == before {
                return Ok(reduced);
            }
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_degree {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::*;
    use crate::test_utils::*;

    fn assert_sound<R: Reduction>(mut red: R, original: &Graph) {
        let mut reduced = original.clone();
        let r = red.apply(&mut reduced).unwrap();
        reduced.validate().unwrap();
        let expected = brute_force(original);
        let actual   = brute_force(&reduced).map(|v| v + r.fixed);
        match (expected, actual) {
            (Some(e), Some(a)) => assert!((e - a).abs() < 1e-6, "{} expected {e} got {a}", red.technique()),
            (e, a) => assert_eq!(e, a),
        }
    }

    #[test]
    fn steiner_leaves_and_paths_are_removed() {
        // 0 - 1 - 2 - 3 with a steiner leaf 4 hanging at 1
        let mut g = Graph::new(5, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(1, 4, 1.0);
        g.add_edge(0, 3, 5.0);
        g.set_terminal(0);
        g.set_terminal(3);
        let r = DegreeTest.apply(&mut g).unwrap();
        assert!(r.nelims > 0);
        assert_eq!(0, g.nb_edges());
        assert_eq!(1, g.nb_terminals());
        assert_eq!(3.0, r.fixed);
        assert_eq!(vec![0, 1, 2], g.original_solution(&[]));
    }
    #[test]
    fn a_cheapest_edge_between_two_terminals_is_contracted() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 2, 3.0);
        g.add_edge(1, 2, 3.0);
        g.add_edge(2, 3, 3.0);
        g.add_edge(1, 3, 3.0);
        g.add_edge(0, 3, 3.0);
        g.set_terminal(0);
        g.set_terminal(1);
        g.set_terminal(2);
        let r = DegreeTest.apply(&mut g).unwrap();
        assert!(r.fixed >= 1.0);
        assert!(g.nb_terminals() < 3);
    }
    #[test]
    fn zero_edges_are_contracted_into_the_terminal() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 0.0);
        g.add_edge(1, 2, 2.0);
        g.set_terminal(1);
        g.set_terminal(2);
        let r = ZeroEdgeContraction.apply(&mut g).unwrap();
        assert_eq!(1, r.nelims);
        assert_eq!(0.0, r.fixed);
        assert!(g.is_terminal(1));
        assert_eq!(0, g.degree(0));
    }
    #[test]
    fn an_expensive_potential_leaf_is_disconnected() {
        let mut g = Graph::new(3, Variant::Pc);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 5.0);
        g.set_potential(0, 4.0);
        g.set_potential(1, 4.0);
        g.set_potential(2, 3.0);
        let r = PcDegreeTest.apply(&mut g).unwrap();
        assert_eq!(1, r.nelims);
        assert_eq!(0, g.degree(2));
        assert_eq!(1, g.degree(0));
    }
    #[test]
    fn positive_neighbors_are_merged_and_negative_leaves_dropped() {
        let mut g = Graph::new(4, Variant::Mw);
        g.add_edge(0, 1, 0.0);
        g.add_edge(1, 2, 0.0);
        g.add_edge(2, 3, 0.0);
        g.set_weight(0, -1.0);
        g.set_weight(1, 2.0);
        g.set_weight(2, 3.0);
        g.set_weight(3, -2.0);
        MwDegreeTest.apply(&mut g).unwrap();
        assert_eq!(0, g.nb_edges());
        assert_eq!(Some(-5.0), brute_force(&g));
    }
    #[test]
    fn a_dominated_node_is_disconnected() {
        // 0 and 2 are both adjacent to 1 and to each other
        let mut g = Graph::new(4, Variant::Mw);
        g.add_edge(0, 1, 0.0);
        g.add_edge(1, 2, 0.0);
        g.add_edge(0, 2, 0.0);
        g.add_edge(2, 3, 0.0);
        g.set_weight(0, 1.0);
        g.set_weight(1, -1.0);
        g.set_weight(2, -1.0);
        g.set_weight(3, 4.0);
        let r = AnsTest.apply(&mut g).unwrap();
        assert_eq!(2, r.nelims);
        assert_eq!(0, g.degree(1));
        assert_eq!(Some(-4.0), brute_force(&g));
    }
    #[test]
    fn the_degree_tests_are_sound_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_sound(DegreeTest, &random_stp(&mut rng, 10, 4, 3));
            assert_sound(ZeroEdgeContraction, &random_stp(&mut rng, 10, 4, 3));
            assert_sound(PcDegreeTest, &random_pc(&mut rng, 10, 3, 4));
            assert_sound(MwDegreeTest, &random_mw(&mut rng, 10, 4));
            assert_sound(AnsTest, &random_mw(&mut rng, 10, 6));
        }
    }
    #[test]
    fn arborescence_dead_ends_and_single_paths_are_removed() {
        // 0 -> 1 -> 2 -> 3 with a shortcut 0 -> 3 and a dead end 1 -> 4
        let mut g = Graph::new(5, Variant::Sap);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.add_arc_pair(1, 2, 1.0, f64::INFINITY);
        g.add_arc_pair(2, 3, 1.0, f64::INFINITY);
        g.add_arc_pair(0, 3, 5.0, f64::INFINITY);
        g.add_arc_pair(1, 4, 2.0, f64::INFINITY);
        g.set_terminal(0);
        g.set_terminal(3);
        let r = SapDegreeTest.apply(&mut g).unwrap();
        g.validate().unwrap();
        assert_eq!(2, r.nelims);
        assert_eq!(0.0, r.fixed);
        assert_eq!(0, g.degree(2));
        assert_eq!(0, g.degree(4));
        assert_eq!(3, g.nb_edges());
        assert_eq!(Some(3.0), brute_force_sap(&g));

        let bypass = g.find_edge(1, 3).unwrap();
        assert_eq!(2.0, g.cost_from(bypass, 1));
        assert_eq!(f64::INFINITY, g.cost_from(bypass, 3));
        assert_eq!(vec![0, 1, 2], g.original_solution(&[0, bypass]));
    }
    #[test]
    fn arcs_towards_the_source_are_useless() {
        let mut g = Graph::new(3, Variant::Sap);
        g.add_arc_pair(0, 1, 1.0, 1.0);
        g.add_arc_pair(2, 0, 1.0, f64::INFINITY);
        g.add_arc_pair(1, 2, 4.0, 1.0);
        g.set_terminal(0);
        g.set_terminal(1);
        let r = SapDegreeTest.apply(&mut g).unwrap();
        g.validate().unwrap();
        assert!(r.nelims >= 1);
        assert_eq!(0, g.degree(2));
        assert_eq!(Some(1.0), brute_force_sap(&g));
    }
    #[test]
    fn the_arborescence_degree_test_is_sound_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..40 {
            let g = random_sap(&mut rng, 6, 3, 2);
            let mut reduced = g.clone();
            let r = SapDegreeTest.apply(&mut reduced).unwrap();
            reduced.validate().unwrap();
            assert_eq!(0.0, r.fixed);
            assert_eq!(brute_force_sap(&g), brute_force_sap(&reduced));
        }
    }
    #[test]
    fn the_degree_tests_refuse_the_wrong_variant() {
        let mut g = Graph::new(2, Variant::Mw);
        g.add_edge(0, 1, 0.0);
        assert_eq!(Err(StpError::UnsupportedVariant(Variant::Mw)), DegreeTest.apply(&mut g));
        assert_eq!(Err(StpError::UnsupportedVariant(Variant::Mw)), PcDegreeTest.apply(&mut g));
        assert_eq!(Err(StpError::UnsupportedVariant(Variant::Mw)), SapDegreeTest.apply(&mut g));
    }
}
