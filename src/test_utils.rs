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

//! This module provides some utilities to write unit tests: exhaustive
//! solvers which are only usable on tiny graphs and generators of random
//! instances.
#![cfg(test)]

use ordered_float::OrderedFloat;
use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use crate::{DisjointSets, Graph, NodeKind, Variant};

/// The largest number of candidate nodes the exhaustive solver accepts
const MAX_CANDIDATES: usize = 20;

/// Computes the optimal objective value of the given graph by enumerating all
/// the connected node subsets. Returns None when there is no feasible
/// solution.
///
/// * Steiner and prize-collecting variants: the solution contains every
///   terminal, its cost is the one of a minimum spanning tree of the subset
///   plus the prizes of the potential nodes left out.
/// * Maximum-weight variant: the solution is a non empty connected subset and
///   its cost is the opposite of its weight.
pub fn brute_force(graph: &Graph) -> Option<f64> {
    let mw = graph.variant() == Variant::Mw;
    let candidates: Vec<usize> = (0..graph.nb_nodes())
        .filter(|v| mw || graph.degree(*v) > 0 || graph.kind(*v) != NodeKind::Steiner)
        .collect();
    assert!(candidates.len() <= MAX_CANDIDATES, "too large for an exhaustive search");

    let mut edges: Vec<usize> = graph.edges().collect();
    edges.sort_by_key(|e| (OrderedFloat(graph.cost(*e)), *e));

    let required: Vec<usize> = graph.terminals();
    let missed = |inside: &[bool]| -> f64 {
        (0..graph.nb_nodes())
            .filter(|v| !inside[*v] && graph.kind(*v) == NodeKind::Potential)
            .map(|v| graph.prize(v))
            .sum()
    };

    let mut best: Option<f64> = None;
    if !mw && required.is_empty() {
        best = Some(missed(&vec![false; graph.nb_nodes()]));
    }
    for mask in 1_usize..(1 << candidates.len()) {
        let mut inside = vec![false; graph.nb_nodes()];
        let mut size = 0;
        for (i, v) in candidates.iter().enumerate() {
            if mask & (1 << i) != 0 {
                inside[*v] = true;
                size += 1;
            }
        }
        if required.iter().any(|t| !inside[*t]) {
            continue;
        }

        let mut sets  = DisjointSets::new(graph.nb_nodes());
        let mut joins = 0;
        let mut tree  = 0.0;
        for e in edges.iter().copied() {
            let (u, v) = graph.endpoints(e);
            if inside[u] && inside[v] && sets.union(u, v) {
                joins += 1;
                tree  += graph.cost(e);
            }
        }
        if joins + 1 != size {
            continue;
        }
        let cost = if mw {
            -(0..graph.nb_nodes()).filter(|v| inside[*v]).map(|v| graph.prize(v)).sum::<f64>()
        } else {
            tree + missed(&inside)
        };
        if best.map_or(true, |b| cost < b) {
            best = Some(cost);
        }
    }
    best
}

/// Builds a random connected graph: a random spanning tree plus `extra`
/// random edges. Costs are integers between 1 and `max_cost`.
pub fn random_connected(rng: &mut StdRng, nnodes: usize, extra: usize, max_cost: u32, variant: Variant) -> Graph {
    let mut graph = Graph::new(nnodes, variant);
    for v in 1..nnodes {
        let u = rng.gen_range(0..v);
        graph.add_edge(u, v, rng.gen_range(1..=max_cost) as f64);
    }
    for _ in 0..extra {
        let u = rng.gen_range(0..nnodes);
        let v = rng.gen_range(0..nnodes);
        if u != v && graph.find_edge(u, v).is_none() {
            graph.add_edge(u, v, rng.gen_range(1..=max_cost) as f64);
        }
    }
    graph
}

/// A random Steiner tree instance with `nterms` terminals
pub fn random_stp(rng: &mut StdRng, nnodes: usize, extra: usize, nterms: usize) -> Graph {
    let mut graph = random_connected(rng, nnodes, extra, 10, Variant::Stp);
    let nodes: Vec<usize> = (0..nnodes).collect();
    for t in nodes.choose_multiple(rng, nterms) {
        graph.set_terminal(*t);
    }
    graph
}

/// A random (unrooted) prize-collecting instance where `npotentials` nodes
/// carry a prize
pub fn random_pc(rng: &mut StdRng, nnodes: usize, extra: usize, npotentials: usize) -> Graph {
    let mut graph = random_connected(rng, nnodes, extra, 10, Variant::Pc);
    let nodes: Vec<usize> = (0..nnodes).collect();
    for v in nodes.choose_multiple(rng, npotentials) {
        graph.set_potential(*v, rng.gen_range(1..=12) as f64);
    }
    graph
}

/// A random rooted prize-collecting instance whose source is node 0
pub fn random_rpc(rng: &mut StdRng, nnodes: usize, extra: usize, npotentials: usize) -> Graph {
    let mut graph = random_pc(rng, nnodes, extra, npotentials);
    graph.set_variant(Variant::Rpc);
    graph.set_terminal(0);
    graph.set_source(0);
    graph
}

/// A random maximum-weight connected subgraph instance (weights between -6
/// and 6)
pub fn random_mw(rng: &mut StdRng, nnodes: usize, extra: usize) -> Graph {
    let mut graph = random_connected(rng, nnodes, extra, 1, Variant::Mw);
    for e in graph.edges().collect::<Vec<_>>() {
        graph.set_cost(e, 0.0);
    }
    for v in 0..nnodes {
        graph.set_weight(v, rng.gen_range(-6..=6) as f64);
    }
    graph
}

/// Computes the cost of a cheapest arborescence rooted at the source which
/// reaches every terminal of a directed instance. Every edge is either left
/// out or used in one of its directions, so that this is only usable on graphs
/// with a handful of edges. Returns None when some terminal can not be reached.
pub fn brute_force_sap(graph: &Graph) -> Option<f64> {
    let edges: Vec<usize> = graph.edges().collect();
    assert!(edges.len() <= 10, "too large for an exhaustive search");
    let root = graph.source()?;

    let mut best: Option<f64> = None;
    let mut choice = vec![0_u8; edges.len()];
    loop {
        let mut cost = 0.0;
        let mut arcs = vec![];
        for (e, c) in edges.iter().copied().zip(choice.iter().copied()) {
            let (t, h) = graph.endpoints(e);
            let (from, to) = match c {
                1 => (t, h),
                2 => (h, t),
                _ => continue,
            };
            cost += graph.cost_from(e, from);
            arcs.push((from, to));
        }
        if cost.is_finite() && best.map_or(true, |b| cost < b) {
            let mut reached = vec![false; graph.nb_nodes()];
            let mut stack   = vec![root];
            reached[root] = true;
            while let Some(v) = stack.pop() {
                for (from, to) in arcs.iter().copied() {
                    if from == v && !reached[to] {
                        reached[to] = true;
                        stack.push(to);
                    }
                }
            }
            if graph.terminals().into_iter().all(|t| reached[t]) {
                best = Some(cost);
            }
        }

        // next combination
        let mut i = 0;
        while i < choice.len() && choice[i] == 2 {
            choice[i] = 0;
            i += 1;
        }
        if i == choice.len() {
            return best;
        }
        choice[i] += 1;
    }
}

/// A random Steiner arborescence instance rooted at node 0. Roughly half of
/// the arcs can only be traversed in one direction.
pub fn random_sap(rng: &mut StdRng, nnodes: usize, extra: usize, nterms: usize) -> Graph {
    let mut graph = Graph::new(nnodes, Variant::Sap);
    let arc = |graph: &mut Graph, u: usize, v: usize, rng: &mut StdRng| {
        let forth = rng.gen_range(1..=10) as f64;
        let back  = if rng.gen_bool(0.5) { f64::INFINITY } else { rng.gen_range(1..=10) as f64 };
        graph.add_arc_pair(u, v, forth, back);
    };
    for v in 1..nnodes {
        let u = rng.gen_range(0..v);
        arc(&mut graph, u, v, &mut *rng);
    }
    for _ in 0..extra {
        let u = rng.gen_range(0..nnodes);
        let v = rng.gen_range(0..nnodes);
        if u != v && graph.find_edge(u, v).is_none() {
            arc(&mut graph, u, v, &mut *rng);
        }
    }
    graph.set_terminal(0);
    let others: Vec<usize> = (1..nnodes).collect();
    for t in others.choose_multiple(rng, nterms) {
        graph.set_terminal(*t);
    }
    graph
}
