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

//! This module provides the nearest vertex and short links tests. Both of them
//! identify edges which belong to at least one optimal solution and contract
//! them.

use crate::{Graph, NodeId, EdgeId, NodeKind, Reduced, Reduction, StpError, Technique, Variant,
    DegreeTest, PcDegreeTest, voronoi, two_nearest_terminals, is_le};

use super::degree::two_cheapest;

/// The nearest vertex and short links tests, interleaved with the degree test
/// as long as a full pass eliminates more than `min_elims` items.
///
/// * Nearest vertex: let e = (z, w) be the cheapest edge incident to the
///   terminal z and c2 the cost of the second cheapest. When an other terminal
///   is within distance c2 - c(e) from w, then e belongs to some optimal tree.
/// * Short links: let e be the cheapest edge leaving the voronoi region of a
///   terminal and f the second cheapest. When c(f) is at least as large as the
///   length of the path going from the terminal through e to the base of the
///   other region, then e belongs to some optimal tree. Both endpoints of e
///   are then required, the merged node becomes a terminal.
#[derive(Debug, Clone, Copy)]
pub struct NvslTest {
    pub min_elims: usize,
}

/// The cheapest and second cheapest edges leaving a voronoi region
#[derive(Debug, Clone, Copy)]
struct Links {
    best: Option<(EdgeId, NodeId, NodeId)>,
    c1: f64,
    c2: f64,
}
impl Default for Links {
    fn default() -> Self {
        Links { best: None, c1: f64::INFINITY, c2: f64::INFINITY }
    }
}
impl Links {
    fn offer(&mut self, e: EdgeId, inner: NodeId, outer: NodeId, c: f64) {
        if c < self.c1 {
            self.c2   = self.c1;
            self.c1   = c;
            self.best = Some((e, inner, outer));
        } else if c < self.c2 {
            self.c2 = c;
        }
    }
}

impl NvslTest {
    fn nearest_vertex(&self, graph: &mut Graph) -> Reduced {
        let mut reduced = Reduced::default();
        if graph.nb_terminals() < 2 {
            return reduced;
        }
        let near = two_nearest_terminals(graph);
        let mut dirty = vec![false; graph.nb_nodes()];
        for z in graph.terminals() {
            if dirty[z] || graph.degree(z) < 2 || !graph.is_terminal(z) {
                continue;
            }
            let (Some(e1), c2) = two_cheapest(graph, z) else {
                continue;
            };
            let c1 = graph.cost(e1);
            let w  = graph.opposite(e1, z);
            if dirty[w] {
                continue;
            }
            let d = near[w].iter().flatten()
                .find(|(t, _)| *t != z)
                .map_or(f64::INFINITY, |(_, d)| *d);
            if is_le(c1 + d, c2) {
                for x in [z, w] {
                    dirty[x] = true;
                    for e in graph.incident(x).iter() {
                        dirty[graph.opposite(*e, x)] = true;
                    }
                }
                reduced.fixed  += c1;
                reduced.nelims += 1;
                graph.contract_edge(e1, z);
            }
        }
        reduced
    }

    fn short_links(&self, graph: &mut Graph) -> Reduced {
        let mut reduced = Reduced::default();
        while graph.nb_terminals() >= 2 {
            let vo = voronoi(graph);
            let mut links = vec![Links::default(); graph.nb_nodes()];
            for e in graph.edges() {
                let (x, y) = graph.endpoints(e);
                if let (Some(bx), Some(by)) = (vo.base[x], vo.base[y]) {
                    if bx != by {
                        links[bx].offer(e, x, y, graph.cost(e));
                        links[by].offer(e, y, x, graph.cost(e));
                    }
                }
            }
            let found = graph.terminals().into_iter().find_map(|t| {
                let l = &links[t];
                l.best.filter(|(_, x, y)| is_le(vo.dist[*x] + l.c1 + vo.dist[*y], l.c2))
            });
            let Some((e, x, _)) = found else {
                break;
            };
            reduced.fixed  += graph.cost(e);
            reduced.nelims += 1;
            graph.contract_edge(e, x);
            graph.set_kind(x, NodeKind::Terminal);
        }
        reduced
    }
}

impl Reduction for NvslTest {
    fn technique(&self) -> Technique {
        Technique::Nvsl
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if !matches!(graph.variant(), Variant::Stp | Variant::Rpc) {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        loop {
            let mut pass = self.nearest_vertex(graph);
            pass.absorb(self.short_links(graph));
            match graph.variant() {
                Variant::Stp => pass.absorb(DegreeTest.apply(graph)?),
                _            => pass.absorb(PcDegreeTest.apply(graph)?),
            }
            reduced.absorb(pass);
            if pass.nelims <= self.min_elims {
                return Ok(reduced);
            }
        }
    }
}
