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

//! This module provides the implementation of usual width heuristics.
//! The width heuristics bound the maximum number of nodes any layer of a
//! restricted or relaxed decision diagram may contain.

use crate::{SubProblem, WidthHeuristic};

/// This strategy specifies a fixed maximum width for all the layers of an
/// approximate MDD. This is a *static* heuristic as the width will remain
/// fixed regardless of the approximate MDD to generate.
///
/// # Example
/// Assuming a fixed width of 100, and problem with 5 variables (0..=4). The
/// heuristic will return 100 no matter how many free vars there are left to
/// assign.
///
/// ```
/// # use std::sync::Arc;
/// # use ddolib::*;
/// let heuristic = FixedWidth(100);
/// let subproblem = SubProblem {
///     state: Arc::new(0_usize),
///     value: 0.0,
///     ub: f64::INFINITY,
///     depth: 3,
///     path: vec![],
/// };
/// assert_eq!(100, heuristic.max_width(&subproblem));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedWidth(pub usize);
impl <X> WidthHeuristic<X> for FixedWidth {
    fn max_width(&self, _: &SubProblem<X>) -> usize {
        self.0.max(1)
    }
}

/// This strategy specifies a variable maximum width for the layers of an
/// approximate MDD. When using this heuristic, each layer of an approximate
/// MDD is allowed to have as many nodes as there are free variables to
/// decide upon.
///
/// The number held by the heuristic is the total number of variables of the
/// problem.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use ddolib::*;
/// let heuristic = NbUnassignedWidth(5);
/// let subproblem = SubProblem {
///     state: Arc::new(0_usize),
///     value: 0.0,
///     ub: f64::INFINITY,
///     depth: 2,
///     path: vec![
///         Decision{variable: Variable(0), value: 1},
///         Decision{variable: Variable(3), value: 0},
///     ],
/// };
/// assert_eq!(3, heuristic.max_width(&subproblem));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NbUnassignedWidth(pub usize);
impl <X> WidthHeuristic<X> for NbUnassignedWidth {
    fn max_width(&self, x: &SubProblem<X>) -> usize {
        self.0.saturating_sub(x.path.len()).max(1)
    }
}

/// This strategy acts as a decorator for an other max width heuristic. It
/// multiplies the maximum width of the strategy it delegates to by a constant
/// (configured) factor. It is typically used in conjunction with NbUnassigned
/// to provide a maximum width that allows a certain number of nodes for each
/// free variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Times<X>(pub usize, pub X);

impl <S, X: WidthHeuristic<S>> WidthHeuristic<S> for Times<X> {
    fn max_width(&self, x: &SubProblem<S>) -> usize {
        1.max(self.0 * self.1.max_width(x))
    }
}

/// This strategy acts as a decorator for an other max width heuristic. It
/// divides the maximum width of the strategy it delegates to by a constant
/// (configured) factor. It never yields a width smaller than one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DivBy<X>(pub usize, pub X);

impl <S, X: WidthHeuristic<S>> WidthHeuristic<S> for DivBy<X> {
    fn max_width(&self, x: &SubProblem<S>) -> usize {
        1.max(self.1.max_width(x) / self.0.max(1))
    }
}
