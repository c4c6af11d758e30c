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

//! This module provides the bound based transformations of the
//! prize-collecting variants: a potential node whose prize exceeds the cost of
//! a known solution belongs to every optimal solution and can thus be turned
//! into a terminal.

use ordered_float::OrderedFloat;

use crate::{Graph, NodeId, NodeKind, ShortestPathHeuristic, StpError, Variant, is_gt};

/// Computes the cost of a heuristic solution of a prize-collecting instance
/// (tree cost plus the prizes of the potential nodes left out). Two trees are
/// considered: one spanning the terminals only (or the most profitable node
/// when there is no terminal) and one spanning all the terminals and potential
/// nodes. Returns None when neither of them exists.
pub fn pc_upper_bound(graph: &Graph) -> Result<Option<f64>, StpError> {
    if !graph.variant().is_prize_collecting() {
        return Err(StpError::UnsupportedVariant(graph.variant()));
    }
    let n = graph.nb_nodes();
    let potentials: Vec<NodeId> = (0..n).filter(|v| graph.kind(*v) == NodeKind::Potential).collect();
    let terminals = graph.terminals();
    let richest = potentials.iter().copied().max_by_key(|v| OrderedFloat(graph.prize(*v)));
    let root = graph.source()
        .filter(|s| graph.is_terminal(*s))
        .or_else(|| terminals.first().copied())
        .or(richest);
    let Some(root) = root else {
        return Ok(Some(0.0));
    };

    let heuristic = ShortestPathHeuristic::new(graph);
    let mut best: Option<f64> = None;
    for with_potentials in [false, true] {
        let targets: Vec<bool> = (0..n)
            .map(|v| graph.is_terminal(v) || (with_potentials && graph.kind(v) == NodeKind::Potential))
            .collect();
        let Some(tree) = heuristic.from_root(root, &targets) else {
            continue;
        };
        let mut covered = vec![false; n];
        covered[root] = true;
        for e in tree.edges.iter().copied() {
            let (t, h) = graph.endpoints(e);
            covered[t] = true;
            covered[h] = true;
        }
        let missed: f64 = potentials.iter().filter(|v| !covered[**v]).map(|v| graph.prize(*v)).sum();
        let cost = tree.cost + missed;
        if best.map_or(true, |b| cost < b) {
            best = Some(cost);
        }
    }
    Ok(best)
}

/// Turns every potential node whose prize exceeds the given upper bound into
/// a terminal. When this happens on an unrooted instance, the instance becomes
/// rooted at the most profitable of the promoted nodes. Returns the number of
/// promoted nodes.
pub fn promote_potentials(graph: &mut Graph, upper: f64) -> Result<usize, StpError> {
    if !graph.variant().is_prize_collecting() {
        return Err(StpError::UnsupportedVariant(graph.variant()));
    }
    let mut promoted: Vec<NodeId> = (0..graph.nb_nodes())
        .filter(|v| graph.kind(*v) == NodeKind::Potential && is_gt(graph.prize(*v), upper))
        .collect();
    promoted.sort_by_key(|v| (std::cmp::Reverse(OrderedFloat(graph.prize(*v))), *v));
    for v in promoted.iter().copied() {
        graph.set_kind(v, NodeKind::Terminal);
    }
    if graph.variant() == Variant::Pc {
        if let Some(first) = promoted.first().copied() {
            let source = graph.source().filter(|s| graph.is_terminal(*s)).unwrap_or(first);
            graph.set_variant(Variant::Rpc);
            graph.set_source(source);
        }
    }
    Ok(promoted.len())
}
