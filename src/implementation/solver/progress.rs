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

//! The bookkeeping shared by the solvers: the incumbent, the bounds and the
//! counters reported in the search statistics.

use std::time::{Duration, Instant};

use log::info;

use crate::{Decision, Sense, SearchStatus, SearchStatistics, Solution, gap};

/// This is the bookkeeping of one search: the incumbent and the counters
/// that are reported in the statistics. The bounds are expressed in the
/// internal (maximizing) space.
#[derive(Debug, Clone)]
pub(crate) struct Progress {
    pub(crate) sense: Sense,
    /// This is the value of the best known lower bound.
    pub(crate) best_lb: f64,
    /// This is the value of the best known upper bound.
    pub(crate) best_ub: f64,
    /// If set, this keeps the info about the best solution so far.
    pub(crate) best_sol: Option<Solution>,
    /// The number of nodes that have been popped off the frontier
    pub(crate) nb_iterations: usize,
    pub(crate) queue_max_size: usize,
    pub(crate) status: SearchStatus,
    pub(crate) started: Instant,
    /// Only set once the search is over
    pub(crate) run_time: Option<Duration>,
}
impl Progress {
    pub(crate) fn new(sense: Sense) -> Self {
        Self {
            sense,
            best_lb: f64::NEG_INFINITY,
            best_ub: f64::INFINITY,
            best_sol: None,
            nb_iterations: 0,
            queue_max_size: 0,
            status: SearchStatus::Unknown,
            started: Instant::now(),
            run_time: None,
        }
    }
    pub(crate) fn incumbent(&self) -> Option<f64> {
        self.best_sol.as_ref().map(|_| self.sense.orient(self.best_lb))
    }
    pub(crate) fn bound(&self) -> Option<f64> {
        let ub = self.best_ub.max(self.best_lb);
        if ub.is_finite() {
            Some(self.sense.orient(ub))
        } else {
            None
        }
    }
    pub(crate) fn statistics(&self) -> SearchStatistics {
        let incumbent = self.incumbent();
        let best_bound = self.bound();
        SearchStatistics {
            status: self.status,
            nb_iterations: self.nb_iterations,
            queue_max_size: self.queue_max_size,
            run_time: self.run_time.unwrap_or_else(|| self.started.elapsed()),
            incumbent,
            best_bound,
            gap: gap(incumbent, best_bound),
        }
    }
    /// Makes the given solution the new incumbent if its value is strictly
    /// better than the current one.
    pub(crate) fn improve<F>(
        &mut self,
        value: Option<f64>,
        solution: F,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    )
    where F: FnOnce() -> Option<Solution>
    {
        let best_lb = self.best_lb;
        if let Some(value) = value.filter(|v| *v > best_lb) {
            if let Some(solution) = solution() {
                self.best_lb = value;
                self.best_sol = Some(solution);
                self.status = SearchStatus::Sat;
                info!("new incumbent: {}", self.sense.orient(value));

                let stats = self.statistics();
                if let Some(sol) = self.best_sol.as_ref() {
                    on_new_incumbent(sol, &stats);
                }
            }
        }
    }
    /// Freezes the statistics
    pub(crate) fn conclude(&mut self, exhausted: bool) {
        self.status = match (exhausted, self.best_sol.is_some()) {
            (true, true) => SearchStatus::Optimal,
            (true, false) => SearchStatus::Infeasible,
            (false, true) => SearchStatus::Sat,
            (false, false) => SearchStatus::Unknown,
        };
        if exhausted {
            self.best_ub = self.best_lb;
        }
        self.run_time = Some(self.started.elapsed());
    }
}
