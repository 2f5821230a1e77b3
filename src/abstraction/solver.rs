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

//! This module defines the `Solver` trait along with the statistics it
//! reports about its search.

use std::time::Duration;

use crate::{Decision, Reason, Sense, Cutoff, NoCutoff};

/// A decision is nothing but a sequence of decision covering all problem
/// variables.
pub type Solution = Vec<Decision>;

/// Where does the search stand ?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// No solution has been found (yet)
    Unknown,
    /// A solution has been found but it has not been proved optimal
    Sat,
    /// The best solution has been proved optimal
    Optimal,
    /// It has been proved that the problem admits no solution
    Infeasible,
}

/// A snapshot of the progress of the search. All values are expressed in the
/// unit (and sense) of the problem being solved.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Where does the search stand ?
    pub status: SearchStatus,
    /// The number of sub problems that have been popped off the frontier
    pub nb_iterations: usize,
    /// The largest number of sub problems that were simultaneously stored
    /// on the frontier
    pub queue_max_size: usize,
    /// How long has the search been running ?
    pub run_time: Duration,
    /// The value of the best solution found so far (if any)
    pub incumbent: Option<f64>,
    /// The tightest bound on the optimum that is known so far (if any)
    pub best_bound: Option<f64>,
    /// The relative distance between the incumbent and the best bound
    pub gap: f64,
}
impl SearchStatistics {
    /// Returns true iff the search has been carried out to the proof
    pub fn is_exact(&self) -> bool {
        matches!(self.status, SearchStatus::Optimal | SearchStatus::Infeasible)
    }
}

/// Computes the optimality gap between a solution value and a bound on the
/// optimum. It is 1.0 (100%) whenever one of the two is unknown.
///
/// # Examples:
/// ```
/// # use ddolib::gap;
/// assert_eq!(1.0, gap(None, Some(10.0)));
/// assert_eq!(0.0, gap(Some(10.0), Some(10.0)));
/// assert_eq!(0.5, gap(Some(5.0), Some(10.0)));
/// ```
pub fn gap(value: Option<f64>, bound: Option<f64>) -> f64 {
    match (value, bound) {
        (Some(value), Some(bound)) if value.is_finite() && bound.is_finite() => {
            let u = value.abs().max(bound.abs());
            if u == 0.0 {
                0.0
            } else {
                (bound - value).abs() / u
            }
        },
        _ => 1.0
    }
}

/// This is the solver abstraction. It is implemented by a structure that
/// implements the branch-and-bound with MDD paradigm (or possibly an other
/// optimization algorithm -- currently only branch-and-bound with DD) to
/// find the best possible solution to a given problem.
pub trait Solver {
    /// This method orders the solver to search for the optimal solution among
    /// all possibilities (in the given `sense`). It returns the statistics of
    /// the search. Its status tells whether the search was carried out until
    /// optimality was proved, or if it was stopped because the `cutoff`
    /// criterion was met:
    ///
    /// * `Optimal`: the `incumbent` is the optimum of the objective function.
    /// * `Infeasible`: the problem admits no feasible solution.
    /// * `Sat`: the `incumbent` is the best value that was known at the time
    ///   of the cutoff.
    /// * `Unknown`: no feasible solution has been found before the cutoff
    ///   occurred.
    ///
    /// Each time a strictly better solution is found, `on_new_incumbent` is
    /// called with that solution and the statistics of the search at that
    /// time.
    ///
    /// An error is only ever returned when a debug level is configured and the
    /// model has been caught violating its contract.
    fn solve(
        &mut self,
        sense: Sense,
        cutoff: &dyn Cutoff,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<SearchStatistics, Reason>;

    /// Searches for the solution that maximizes the objective
    fn maximize(&mut self) -> Result<SearchStatistics, Reason> {
        self.solve(Sense::Maximize, &NoCutoff, &mut |_, _| {})
    }
    /// Searches for the solution that minimizes the objective
    fn minimize(&mut self) -> Result<SearchStatistics, Reason> {
        self.solve(Sense::Minimize, &NoCutoff, &mut |_, _| {})
    }
    /// Searches for the solution that maximizes the objective until the
    /// `cutoff` criterion is met.
    fn maximize_with(
        &mut self,
        cutoff: &dyn Cutoff,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<SearchStatistics, Reason> {
        self.solve(Sense::Maximize, cutoff, on_new_incumbent)
    }
    /// Searches for the solution that minimizes the objective until the
    /// `cutoff` criterion is met.
    fn minimize_with(
        &mut self,
        cutoff: &dyn Cutoff,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<SearchStatistics, Reason> {
        self.solve(Sense::Minimize, cutoff, on_new_incumbent)
    }

    /// This method returns the value of the objective function for the best
    /// solution that has been found. It returns `None` when no solution exists
    /// to the problem.
    fn best_value(&self) -> Option<f64>;
    /// This method returns the best solution to the optimization problem.
    /// That is, it returns the vector of decision which optimizes the value
    /// of the objective function (sum of transition costs + initial value).
    /// It returns `None` when the problem admits no feasible solution.
    fn best_solution(&self) -> Option<Solution>;
    /// Returns the tightest bound on the optimum that can be guaranteed so
    /// far (an upper bound when maximizing, a lower bound when minimizing).
    /// It returns `None` when nothing is known about the optimum.
    fn best_bound(&self) -> Option<f64>;
    /// Returns the statistics describing the last search
    fn statistics(&self) -> SearchStatistics;

    /// Sets a primal (best known value and solution) of the problem. It will
    /// serve as the initial incumbent of the next search.
    fn set_primal(&mut self, value: f64, solution: Solution);

    /// Computes the optimality gap
    fn gap(&self) -> f64 {
        gap(self.best_value(), self.best_bound())
    }
}
