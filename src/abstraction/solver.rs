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

//! This module defines the `Solver` trait.

use crate::{Completion, Solution};

/// This is the solver abstraction. It is implemented by a structure that
/// searches for a minimum cost Steiner tree in a given graph.
pub trait Solver {
    /// This method orders the solver to search for the optimal solution among
    /// all possibilities. It returns a structure standing for the outcome of
    /// the attempted minimization. Such a `Completion` may either be marked
    /// **exact** if the minimization has been carried out until optimality was
    /// proved. Or it can be inexact, in which case it means that the
    /// minimization process was stopped because of the satisfaction of some
    /// cutoff criterion.
    ///
    /// Along with the `is_exact` exact flag, the completion provides an
    /// optional `best_value` of the minimization problem. Four cases are thus
    /// to be distinguished:
    ///
    /// * When the `is_exact` flag is true, and a `best_value` is present: the
    ///   `best_value` is the minimum cost of a Steiner tree.
    /// * When the `is_exact` flag is false and a `best_value` is present, it
    ///   is the cost of the best tree that was known at the time of cutoff.
    /// * When the `is_exact` flag is true, and no `best_value` is present: it
    ///   means that the terminals cannot be connected (infeasible).
    /// * When the `is_exact` flag is false and no `best_value` is present: it
    ///   simply means that no tree has been found before the cutoff occurred.
    fn minimize(&mut self) -> Completion;
    /// This method returns the cost of the best tree that has been found. It
    /// returns `None` when no tree is known.
    fn best_value(&self) -> Option<f64>;
    /// This method returns the edges of the best tree that has been found.
    fn best_solution(&self) -> Option<Solution>;

    /// Returns the best lower bound that has been proved so far.
    /// As costs are never negative, it is `0.0` when nothing has been proved.
    fn best_lower_bound(&self) -> f64;
    /// Returns the tightest upper bound that can be guaranteed so far.
    /// In case where no tree is known, it returns `+inf`.
    fn best_upper_bound(&self) -> f64;

    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: f64, solution: Solution);

    /// Computes the optimality gap
    fn gap(&self) -> f64 {
        let ub = self.best_upper_bound();
        let lb = self.best_lower_bound();
        if ub.is_infinite() || lb.is_infinite() {
            1.0
        } else {
            let aub = ub.abs();
            let alb = lb.abs();
            let u = aub.max(alb);
            let l = aub.min(alb);

            if u == 0.0 { 0.0 } else { (u - l) / u }
        }
    }
}
