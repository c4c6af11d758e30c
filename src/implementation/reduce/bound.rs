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

//! This module provides the bound based test. It compares a lower bound on
//! the cost of any tree containing a given node with the cost of a heuristic
//! solution.

use rand::{SeedableRng, rngs::StdRng};

use crate::{Graph, Reduced, Reduction, ShortestPathHeuristic, StpError, Technique, Variant,
    HEURISTIC_STARTS, voronoi, is_gt};

/// The bound based node elimination test of the Steiner tree problem.
///
/// Let r(t) be the length of the shortest path from the terminal t to the
/// boundary of its voronoi region (including the edge leaving the region).
/// Any tree containing the node i whose voronoi base is t0 costs at least
/// the sum of r(t) over all other terminals plus min(r(t0), d(t0, i)). Every
/// non terminal node for which this bound exceeds the cost of a heuristic
/// tree is deleted.
#[derive(Debug, Clone, Copy)]
pub struct BoundTest {
    /// Seeds the randomized restarts of the heuristic
    pub seed: u64,
}

impl Reduction for BoundTest {
    fn technique(&self) -> Technique {
        Technique::Bound
    }

    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError> {
        if graph.variant() != Variant::Stp {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        let mut reduced = Reduced::default();
        if graph.nb_terminals() < 2 {
            return Ok(reduced);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let Some(upper) = ShortestPathHeuristic::new(graph).run(HEURISTIC_STARTS, &mut rng) else {
            return Ok(reduced);
        };

        let vo = voronoi(graph);
        let mut radius = vec![f64::INFINITY; graph.nb_nodes()];
        for e in graph.edges() {
            let (x, y) = graph.endpoints(e);
            if let (Some(bx), Some(by)) = (vo.base[x], vo.base[y]) {
                if bx != by {
                    let c = graph.cost(e);
                    radius[bx] = radius[bx].min(vo.dist[x] + c);
                    radius[by] = radius[by].min(vo.dist[y] + c);
                }
            }
        }
        let total: f64 = graph.terminals().into_iter().map(|t| radius[t]).sum();
        if !total.is_finite() {
            return Ok(reduced);
        }

        for i in 0..graph.nb_nodes() {
            if graph.is_terminal(i) || graph.degree(i) == 0 {
                continue;
            }
            let Some(base) = vo.base[i] else {
                continue;
            };
            let lower = total - radius[base] + radius[base].min(vo.dist[i]);
            if is_gt(lower, upper.cost) {
                graph.delete_node(i);
                reduced.nelims += 1;
            }
        }
        Ok(reduced)
    }
}
