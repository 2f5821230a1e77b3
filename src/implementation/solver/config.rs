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

//! This module provides the configuration of a solver. All the knobs have
//! sensible defaults: only the problem, its relaxation, the state ranking and
//! the frontier must be given explicitly.

use derive_builder::Builder;

use crate::{Problem, Relaxation, StateRanking, Frontier, WidthHeuristic, VariableHeuristic, DominanceChecker,
    ReductionStrategy, CutsetType, DebugLevel, FixedWidth, DefaultVariableHeuristic, EmptyDominanceChecker, CostBased};

/// The maximum width used when none is configured
pub static DEFAULT_WIDTH: FixedWidth = FixedWidth(10);

/// Everything a solver needs to know in order to solve a problem.
///
/// # Example
/// ```
/// # use ddolib::*;
/// # use std::cmp::Ordering;
/// # struct Unit;
/// # impl Problem for Unit {
/// #     type State = ();
/// #     fn nb_variables(&self) -> usize { 1 }
/// #     fn initial_state(&self) {}
/// #     fn initial_value(&self) -> f64 { 0.0 }
/// #     fn transition(&self, _: &(), _: Decision) {}
/// #     fn transition_cost(&self, _: &(), d: Decision) -> f64 { d.value as f64 }
/// #     fn for_each_in_domain(&self, var: Variable, _: &(), f: &mut dyn DecisionCallback) {
/// #         f.apply(Decision { variable: var, value: 0 });
/// #         f.apply(Decision { variable: var, value: 1 });
/// #     }
/// # }
/// # impl Relaxation for Unit {
/// #     type State = ();
/// #     fn merge(&self, _: &mut dyn Iterator<Item = &()>) {}
/// #     fn relax(&self, _: &(), _: &(), _: &(), _: Decision, cost: f64) -> f64 { cost }
/// # }
/// # struct UnitRanking;
/// # impl StateRanking for UnitRanking {
/// #     type State = ();
/// #     fn compare(&self, _: &(), _: &()) -> Ordering { Ordering::Equal }
/// # }
/// let problem = Unit;
/// let ranking = UnitRanking;
/// let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking));
/// let width = FixedWidth(100);
///
/// let config = SolverConfigBuilder::default()
///     .problem(&problem)
///     .relaxation(&problem)
///     .ranking(&ranking)
///     .frontier(&mut frontier)
///     .width(&width)
///     .cutset(CutsetType::Frontier)
///     .use_cache(true)
///     .build()
///     .unwrap();
///
/// let mut solver = SequentialSolver::new(config);
/// let stats = solver.maximize().unwrap();
/// assert_eq!(SearchStatus::Optimal, stats.status);
/// assert_eq!(Some(1.0), solver.best_value());
/// ```
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct SolverConfig<'a, State> {
    /// The dynamic programming model of the problem to solve
    pub problem: &'a dyn Problem<State = State>,
    /// The relaxation used when a layer grows too large
    pub relaxation: &'a dyn Relaxation<State = State>,
    /// The ranking heuristic used to tell the most promising states apart
    pub ranking: &'a dyn StateRanking<State = State>,
    /// The set of open sub problems
    pub frontier: &'a mut dyn Frontier<State = State>,
    /// The maximum width of the restricted and relaxed dds
    #[builder(default = "&DEFAULT_WIDTH")]
    pub width: &'a dyn WidthHeuristic<State>,
    /// The heuristic picking the next variable to branch on
    #[builder(default = "&DefaultVariableHeuristic")]
    pub var_heuristic: &'a dyn VariableHeuristic<State>,
    /// The dominance checker used to filter out dominated exact nodes
    #[builder(default = "&EmptyDominanceChecker")]
    pub dominance: &'a dyn DominanceChecker<State>,
    /// How the nodes to merge are selected in relaxed dds
    #[builder(default = "&CostBased")]
    pub relax_strategy: &'a dyn ReductionStrategy<State>,
    /// How the nodes to drop are selected in restricted dds
    #[builder(default = "&CostBased")]
    pub restrict_strategy: &'a dyn ReductionStrategy<State>,
    /// The nodes to enqueue after a relaxed dd has been compiled
    #[builder(default)]
    pub cutset: CutsetType,
    /// Should the solver remember the thresholds of the states it has met ?
    #[builder(default)]
    pub use_cache: bool,
    /// The contract checks to perform while compiling
    #[builder(default)]
    pub debug: DebugLevel,
}
