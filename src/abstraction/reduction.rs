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

//! This module defines the `Reduction` trait along with the summary each
//! reduction reports after having been applied.

use crate::{Graph, StpError, Technique};

/// What a reduction did to the graph it was applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reduced {
    /// The number of eliminations (deleted edges, replaced nodes, contracted
    /// edges) performed by the reduction
    pub nelims: usize,
    /// The cost of the edges that have been fixed in every solution. This
    /// amount must be added to the cost of any solution on the reduced graph
    /// to obtain the cost of the corresponding solution on the original graph.
    pub fixed: f64,
    /// True iff the reduction proved the instance to be infeasible
    pub infeasible: bool,
}
impl Reduced {
    /// Accumulates the effect of an other reduction into this one
    pub fn absorb(&mut self, other: Reduced) {
        self.nelims    += other.nelims;
        self.fixed     += other.fixed;
        self.infeasible = self.infeasible || other.infeasible;
    }
}

/// A reduction is a graph transformation which preserves at least one optimal
/// solution. It may only:
///
/// * delete edges or nodes that are part of no optimal solution,
/// * replace a node by equivalent edges,
/// * contract edges that belong to some optimal solution (or have no cost).
///
/// In all cases, the ancestor history of the graph is kept up to date so that
/// a solution of the reduced graph can be mapped back to the original one.
pub trait Reduction {
    /// The technique implemented by this reduction
    fn technique(&self) -> Technique;
    /// Applies the reduction onto the given graph. Cutoffs are never polled
    /// while a reduction is being applied: a call always runs to completion.
    fn apply(&mut self, graph: &mut Graph) -> Result<Reduced, StpError>;
}
