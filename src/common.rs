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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).

use thiserror::Error;

use crate::Variant;

// ----------------------------------------------------------------------------
// --- IDENTIFIERS ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Nodes of a graph are identified by their position in `0..graph.nb_nodes()`
pub type NodeId = usize;
/// Edges of a graph are identified by their position in the edge arena of the
/// graph. An edge id remains valid (but the edge may be dead) for the whole
/// lifetime of the graph.
pub type EdgeId = usize;

/// A solution is the set of edges forming a Steiner tree
pub type Solution = Vec<EdgeId>;

// ----------------------------------------------------------------------------
// --- TOLERANCES -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The absolute tolerance used whenever two costs are compared
pub const EPSILON: f64 = 1e-9;

/// Returns true iff a is (definitely) smaller than b
#[inline]
pub fn is_lt(a: f64, b: f64) -> bool {
    a < b - EPSILON
}
/// Returns true iff a is smaller than or (almost) equal to b
#[inline]
pub fn is_le(a: f64, b: f64) -> bool {
    a <= b + EPSILON
}
/// Returns true iff a is (definitely) greater than b
#[inline]
pub fn is_gt(a: f64, b: f64) -> bool {
    a > b + EPSILON
}
/// Returns true iff a is (almost) zero
#[inline]
pub fn is_zero(a: f64) -> bool {
    a.abs() <= EPSILON
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The outcome of an optimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    /// is the given solution exact (proved optimal for the given problem)?
    /// or is it an approximation ?
    pub is_exact: bool,
    /// if present the value of the best solution that has been found
    pub best_value: Option<f64>,
}

/// The things that can go wrong when using this library. Note that neither
/// the infeasibility of an instance nor the expiration of a time budget are
/// errors: these are reported as regular outcomes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StpError {
    /// The graph handed to the library is not consistent
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    /// The requested operation does not exist for that problem variant
    #[error("operation not supported for the {0:?} variant")]
    UnsupportedVariant(Variant),
    /// An index entry was inserted twice with the same key
    #[error("duplicate key in the sub-solution index")]
    DuplicateKey,
    /// The configuration could not be built
    #[error("invalid configuration: {0}")]
    Config(String),
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
