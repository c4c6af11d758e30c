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

//! This module provides the sweeps which clean up the graph before and after
//! the actual reductions: removal of the parts of the graph that can not be
//! reached, and consolidation of the parallel edges.

use fxhash::FxHashMap;

use crate::{Graph, NodeId, EdgeId, NodeKind, Reduced, reachable_from};

/// Deletes the edges of all the nodes that can not be reached from the
/// source. In the unrooted variants, the connected components comprising no
/// potential node nor terminal are deleted instead. Returns the number of
/// deleted edges.
pub fn level0(graph: &mut Graph) -> usize {
    let useless = match graph.source().filter(|_| graph.variant().is_rooted()) {
        Some(source) => {
            let marked = reachable_from(graph, source);
            (0..graph.nb_nodes()).filter(|v| !marked[*v]).collect()
        },
        None => useless_components(graph),
    };
    useless.into_iter().map(|v| graph.delete_node(v)).sum()
}

/// Same as `level0`, but also tells whether some terminal can not be reached
/// (in which case the instance is infeasible).
pub fn level0_infeasible(graph: &mut Graph) -> Reduced {
    let infeasible = match graph.source().filter(|_| graph.variant().is_rooted()) {
        Some(source) => {
            let marked = reachable_from(graph, source);
            graph.terminals().into_iter().any(|t| !marked[t])
        },
        None => false,
    };
    Reduced { nelims: level0(graph), fixed: 0.0, infeasible }
}

/// The level 0 sweep of the rooted prize-collecting variant: the potential
/// nodes which can not be reached from the source will never be part of a
/// solution, so their prize is paid upfront and they become plain Steiner
/// nodes. An unreachable terminal makes the instance infeasible.
pub fn level0_rooted(graph: &mut Graph) -> Reduced {
    let Some(source) = graph.source() else {
        return Reduced::default();
    };
    let marked = reachable_from(graph, source);
    let mut reduced = Reduced::default();
    for v in (0..graph.nb_nodes()).filter(|v| !marked[*v]) {
        match graph.kind(v) {
            NodeKind::Terminal  => reduced.infeasible = true,
            NodeKind::Potential => {
                reduced.fixed += graph.prize(v);
                graph.set_prize(v, 0.0);
                graph.set_kind(v, NodeKind::Steiner);
            },
            NodeKind::Steiner   => {},
        }
        reduced.nelims += graph.delete_node(v);
    }
    reduced
}

/// The nodes of the components that contain neither a terminal nor a node
/// having a positive prize.
fn useless_components(graph: &Graph) -> Vec<NodeId> {
    let n = graph.nb_nodes();
    let mut seen    = vec![false; n];
    let mut useless = vec![];
    for v in 0..n {
        if seen[v] || graph.degree(v) == 0 {
            continue;
        }
        let marked = reachable_from(graph, v);
        let component: Vec<NodeId> = (0..n).filter(|w| marked[*w]).collect();
        component.iter().for_each(|w| seen[*w] = true);
        if component.iter().all(|w| graph.kind(*w) == NodeKind::Steiner) {
            useless.extend(component);
        }
    }
    useless
}

/// Consolidates the parallel edges: of all the edges connecting the same pair
/// of nodes, only the cheapest one survives (in the directed variants, an edge
/// is only deleted when it is not cheaper than the kept one in any direction).
/// Returns the number of deleted edges.
pub fn delete_multiedges(graph: &mut Graph) -> usize {
    let mut deleted = 0;
    for v in 0..graph.nb_nodes() {
        let mut kept: FxHashMap<NodeId, EdgeId> = FxHashMap::default();
        let incident: Vec<EdgeId> = graph.incident(v).to_vec();
        for e in incident {
            if !graph.is_alive(e) {
                continue;
            }
            let w = graph.opposite(e, v);
            let Some(k) = kept.get(&w).copied() else {
                kept.insert(w, e);
                continue;
            };
            let (out_e, in_e) = (graph.cost_from(e, v), graph.cost_from(e, w));
            let (out_k, in_k) = (graph.cost_from(k, v), graph.cost_from(k, w));
            if out_e >= out_k && in_e >= in_k {
                graph.delete_edge(e);
                deleted += 1;
            } else if out_k >= out_e && in_k >= in_e {
                graph.delete_edge(k);
                kept.insert(w, e);
                deleted += 1;
            }
        }
    }
    deleted
}

#[cfg(test)]
mod test_level0 {
    use crate::*;

    #[test]
    fn nodes_unreachable_from_the_source_lose_their_edges() {
        let mut g = Graph::new(5, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(3, 4, 1.0);
        g.set_terminal(0);
        g.set_terminal(2);
        assert_eq!(1, level0(&mut g));
        assert_eq!(2, g.nb_edges());
        assert_eq!(0, g.degree(3));
    }
    #[test]
    fn an_unreachable_terminal_is_reported() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.set_terminal(0);
        g.set_terminal(3);
        let r = level0_infeasible(&mut g);
        assert!(r.infeasible);
        assert_eq!(1, r.nelims);
    }
    #[test]
    fn unrooted_components_without_prizes_are_dropped() {
        let mut g = Graph::new(5, Variant::Pc);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(3, 4, 1.0);
        g.set_potential(1, 3.0);
        assert_eq!(2, level0(&mut g));
        assert_eq!(1, g.nb_edges());
    }
    #[test]
    fn unreachable_potentials_are_paid_upfront_in_the_rooted_variant() {
        let mut g = Graph::new(4, Variant::Rpc);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.set_terminal(0);
        g.set_potential(1, 2.0);
        g.set_potential(3, 4.0);
        let r = level0_rooted(&mut g);
        assert!(!r.infeasible);
        assert_eq!(4.0, r.fixed);
        assert_eq!(NodeKind::Steiner, g.kind(3));
        assert_eq!(NodeKind::Potential, g.kind(1));
        assert_eq!(1, g.nb_edges());
    }
    #[test]
    fn only_the_cheapest_parallel_edge_survives() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 3.0);
        g.add_edge(1, 0, 2.0);
        g.add_edge(0, 1, 4.0);
        g.add_edge(1, 2, 1.0);
        g.set_terminal(0);
        g.set_terminal(2);
        assert!(g.has_parallel_edges());
        assert_eq!(2, delete_multiedges(&mut g));
        assert!(!g.has_parallel_edges());
        assert_eq!(Some(1), g.find_edge(0, 1));
    }
    #[test]
    fn directed_parallel_arcs_survive_when_each_is_cheaper_in_one_direction() {
        let mut g = Graph::new(2, Variant::Sap);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.add_arc_pair(0, 1, f64::INFINITY, 1.0);
        g.set_terminal(0);
        assert_eq!(0, delete_multiedges(&mut g));
        assert_eq!(2, g.nb_edges());
    }
}
