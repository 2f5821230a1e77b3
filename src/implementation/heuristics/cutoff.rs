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

//! This module provides the implementation of various cutoff heuristics that can
//! be used to tune the behavior of a MDD solver.

use std::time::Duration;

use crate::{Cutoff, SearchStatistics};

/// _This is the default cutoff heuristic._ It imposes that the search goes
/// proves optimality before to stop.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self, _: &SearchStatistics) -> bool {false}
}

/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the optimization stops and the best solution
/// that has been found (so far) is returned.
///
/// The budget is only checked in between two iterations of the solver. Hence
/// a single (very wide) compilation may make the search last a bit longer.
#[derive(Debug, Copy, Clone)]
pub struct TimeBudget {
    budget: Duration,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self, statistics: &SearchStatistics) -> bool {
        statistics.run_time >= self.budget
    }
}

/// This cutoff stops the search after a given number of sub problems have been
/// explored.
#[derive(Debug, Copy, Clone)]
pub struct MaxIterations(pub usize);
impl Cutoff for MaxIterations {
    fn must_stop(&self, statistics: &SearchStatistics) -> bool {
        statistics.nb_iterations >= self.0
    }
}
