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

//! # Steiner DP
//! This crate provides the two exact building blocks of a Steiner tree solver
//! that does not rely on linear programming:
//!
//! * a reduction engine which repeatedly applies graph transformations that are
//!   proved to preserve (at least) one optimal solution. Every transformation
//!   keeps track of the original edges an edge stands for, so that a solution
//!   of the reduced graph can always be mapped back onto the original graph.
//! * an exact dynamic program over the subsets of terminals which is meant to
//!   be used whenever the (reduced) graph has few terminals.
//!
//! ## Quick Example
//! ```
//! use steiner_dp::*;
//!
//! // a 4-cycle with two opposite terminals
//! let mut graph = Graph::new(4, Variant::Stp);
//! graph.add_edge(0, 1, 1.0);
//! graph.add_edge(1, 2, 1.0);
//! graph.add_edge(2, 3, 5.0);
//! graph.add_edge(3, 0, 5.0);
//! graph.set_terminal(0);
//! graph.set_terminal(2);
//!
//! let config  = ReduceConfig::default();
//! let reduced = reduce(&mut graph, &config, &NoCutoff).unwrap();
//!
//! let (completion, solution) = solve_dp(&graph, &NoCutoff).unwrap();
//! assert!(completion.is_exact);
//! assert_eq!(Some(2.0), completion.best_value.map(|v| v + reduced.offset));
//!
//! let edges = graph.original_solution(&solution.unwrap());
//! assert_eq!(vec![0, 1], edges);
//! ```

mod common;
mod abstraction;
mod implementation;

#[cfg(test)]
mod test_utils;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
