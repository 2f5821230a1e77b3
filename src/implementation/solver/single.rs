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

//! Solvers which compile one single decision diagram rooted at the initial
//! state of the problem instead of running a branch and bound. They come in
//! handy to assess a model on small instances:
//!
//! * the `ExactSolver` compiles the complete (exact) dd. It always proves the
//!   optimum but its width is only limited by the size of the state space;
//! * the `RestrictionSolver` compiles a restricted dd. It quickly finds a
//!   feasible solution, without any guarantee about its quality;
//! * the `RelaxationSolver` compiles a relaxed dd. Its `best_bound` bounds
//!   the optimum, and its incumbent is the best exact path it came across
//!   (if any).
//!
//! They are configured with the same `SolverConfig` as the `SequentialSolver`
//! even though they make no use of the frontier nor of the cache.

use std::{fmt::Debug, hash::Hash, sync::Arc};

use log::{info, warn};

use crate::{Problem, Relaxation, StateRanking, WidthHeuristic, VariableHeuristic, DominanceChecker,
    ReductionStrategy, EmptyCache, Cutoff, SubProblem, DecisionDiagram, Mdd, CompilationInput, CompilationType,
    CutsetType, DebugLevel, Completion, Solver, Solution, Decision, Reason, Sense, SearchStatistics, SolverConfig};

use super::oriented::{Oriented, reorient};
use super::progress::Progress;

/// The machinery which is common to all single dd solvers
struct SingleDiagram<'a, State>
where State: Debug + Eq + Hash + Clone
{
    problem: &'a dyn Problem<State = State>,
    relaxation: &'a dyn Relaxation<State = State>,
    ranking: &'a dyn StateRanking<State = State>,
    width_heu: &'a dyn WidthHeuristic<State>,
    var_heuristic: &'a dyn VariableHeuristic<State>,
    dominance: &'a dyn DominanceChecker<State>,
    /// The strategy used to squash the layers that are too wide
    reduction: &'a dyn ReductionStrategy<State>,
    cutset_type: CutsetType,
    debug: DebugLevel,

    comp_type: CompilationType,
    mdd: Mdd<State>,
    primal: Option<(f64, Solution)>,
    progress: Progress,
}

impl<'a, State> SingleDiagram<'a, State>
where State: Debug + Eq + Hash + Clone
{
    fn new(config: SolverConfig<'a, State>, comp_type: CompilationType) -> Self {
        let SolverConfig {
            problem,
            relaxation,
            ranking,
            width,
            var_heuristic,
            dominance,
            relax_strategy,
            restrict_strategy,
            cutset,
            debug,
            ..
        } = config;

        let reduction = if comp_type == CompilationType::Restricted { restrict_strategy } else { relax_strategy };

        SingleDiagram {
            problem,
            relaxation,
            ranking,
            width_heu: width,
            var_heuristic,
            dominance,
            reduction,
            cutset_type: cutset,
            debug,
            //
            comp_type,
            mdd: Mdd::new(),
            primal: None,
            progress: Progress::new(Sense::Maximize),
        }
    }

    fn solve(
        &mut self,
        sense: Sense,
        cutoff: &dyn Cutoff,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<SearchStatistics, Reason> {
        info!("compiling one {:?} dd ({:?}) over {} variables", self.comp_type, sense, self.problem.nb_variables());
        self.progress = Progress::new(sense);
        self.dominance.clear();
        if let Some((value, solution)) = self.primal.as_ref() {
            self.progress.improve(Some(sense.orient(*value)), || Some(solution.clone()), &mut |_, _| {});
        }
        if cutoff.must_stop(&self.progress.statistics()) {
            self.progress.conclude(false);
            return Ok(self.progress.statistics());
        }

        let root = SubProblem {
            state: Arc::new(self.problem.initial_state()),
            value: sense.orient(self.problem.initial_value()),
            path: vec![],
            ub: f64::INFINITY,
            depth: 0,
        };
        let max_width = match self.comp_type {
            CompilationType::Exact => usize::MAX,
            _ => self.width_heu.max_width(&root),
        };
        let model = Oriented::new(self.problem, self.relaxation, sense);
        let input = CompilationInput {
            comp_type: self.comp_type,
            problem: &model,
            relaxation: &model,
            ranking: self.ranking,
            var_heuristic: self.var_heuristic,
            reduction: self.reduction,
            cutset_type: self.cutset_type,
            max_width,
            residual: &root,
            best_lb: self.progress.best_lb,
            cache: &EmptyCache,
            dominance: self.dominance,
            debug: self.debug,
        };

        self.progress.nb_iterations = 1;
        let Completion { is_exact, best_value } = match self.mdd.compile(&input) {
            Ok(completion) => completion,
            Err(reason) => {
                self.progress.conclude(false);
                let reason = reorient(reason, sense);
                warn!("compilation aborted: {}", reason);
                return Err(reason);
            }
        };

        let mdd = &self.mdd;
        let exhausted = if is_exact {
            self.progress.improve(best_value, || mdd.best_solution(), on_new_incumbent);
            true
        } else if self.comp_type == CompilationType::Relaxed {
            self.progress.improve(mdd.best_exact_value(), || mdd.best_exact_solution(), on_new_incumbent);
            match best_value {
                Some(bound) if bound > self.progress.best_lb => {
                    self.progress.best_ub = bound;
                    false
                },
                // nothing beats the incumbent
                _ => true,
            }
        } else {
            self.progress.improve(best_value, || mdd.best_solution(), on_new_incumbent);
            false
        };
        self.progress.conclude(exhausted);

        let stats = self.progress.statistics();
        info!("compilation over: {:?} in {:?} (incumbent: {:?}, bound: {:?})",
            stats.status, stats.run_time, stats.incumbent, stats.best_bound);
        Ok(stats)
    }
}

/// Generates the public face of a single dd solver
macro_rules! single_diagram_solver {
    ($(#[$doc:meta])* $name:ident => $comp_type:expr) => {
        $(#[$doc])*
        pub struct $name<'a, State>(SingleDiagram<'a, State>)
        where State: Debug + Eq + Hash + Clone;

        impl<'a, State> $name<'a, State>
        where State: Debug + Eq + Hash + Clone
        {
            pub fn new(config: SolverConfig<'a, State>) -> Self {
                Self(SingleDiagram::new(config, $comp_type))
            }
            /// The dd compiled by the last search (e.g. to render it with
            /// `Mdd::as_graphviz`)
            pub fn mdd(&self) -> &Mdd<State> {
                &self.0.mdd
            }
        }

        impl<'a, State> Solver for $name<'a, State>
        where State: Debug + Eq + Hash + Clone
        {
            fn solve(
                &mut self,
                sense: Sense,
                cutoff: &dyn Cutoff,
                on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
            ) -> Result<SearchStatistics, Reason> {
                self.0.solve(sense, cutoff, on_new_incumbent)
            }
            fn best_value(&self) -> Option<f64> {
                self.0.progress.incumbent()
            }
            fn best_solution(&self) -> Option<Solution> {
                self.0.progress.best_sol.clone()
            }
            fn best_bound(&self) -> Option<f64> {
                self.0.progress.bound()
            }
            fn statistics(&self) -> SearchStatistics {
                self.0.progress.statistics()
            }
            fn set_primal(&mut self, value: f64, solution: Solution) {
                self.0.primal = Some((value, solution));
            }
        }
    };
}

single_diagram_solver! {
    /// Solves the problem by compiling its exact dd. The search is always
    /// complete, whatever the width heuristic says.
    ExactSolver => CompilationType::Exact
}
single_diagram_solver! {
    /// Compiles one restricted dd of the problem: every solution it reports
    /// is feasible, but the optimum is only proved when no layer had to be
    /// restricted.
    RestrictionSolver => CompilationType::Restricted
}
single_diagram_solver! {
    /// Compiles one relaxed dd of the problem. The `best_bound` it reports
    /// is a bound on the optimum; its incumbent (when there is one) is the
    /// best solution made of exact nodes only.
    RelaxationSolver => CompilationType::Relaxed
}

#[cfg(test)]
mod test_single_diagram {
    use std::cmp::Ordering;

    use crate::*;

    /// A 0-1 knapsack whose state is the remaining capacity
    struct Knapsack {
        capacity: usize,
        profit: Vec<f64>,
        weight: Vec<usize>,
        /// When set, every item must be packed
        mandatory: bool,
    }
    impl Knapsack {
        fn new(mandatory: bool) -> Self {
            Knapsack {
                capacity: 23,
                profit: vec![12.0, 7.0, 9.0, 4.0, 11.0, 6.0, 8.0, 3.0, 10.0, 5.0],
                weight: vec![7, 4, 6, 2, 8, 3, 5, 1, 7, 4],
                mandatory,
            }
        }
        fn evaluate(&self, solution: &[Decision]) -> (f64, usize) {
            solution.iter()
                .filter(|d| d.value == 1)
                .fold((0.0, 0), |(p, w), d| (p + self.profit[d.variable.id()], w + self.weight[d.variable.id()]))
        }
    }
    impl Problem for Knapsack {
        type State = usize;

        fn nb_variables(&self) -> usize {
            self.profit.len()
        }
        fn initial_state(&self) -> usize {
            self.capacity
        }
        fn initial_value(&self) -> f64 {
            0.0
        }
        fn transition(&self, state: &usize, d: Decision) -> usize {
            state - d.value as usize * self.weight[d.variable.id()]
        }
        fn transition_cost(&self, _: &usize, d: Decision) -> f64 {
            d.value as f64 * self.profit[d.variable.id()]
        }
        fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
            if !self.mandatory {
                f.apply(Decision { variable: var, value: 0 });
            }
            if *state >= self.weight[var.id()] {
                f.apply(Decision { variable: var, value: 1 });
            }
        }
    }
    impl Relaxation for Knapsack {
        type State = usize;

        fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
            states.copied().max().unwrap_or(0)
        }
        fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
            cost
        }
        fn fast_upper_bound(&self, _: &usize, remaining: &VarSet) -> f64 {
            remaining.iter().map(|v| self.profit[v.id()]).sum()
        }
    }

    struct KnapsackRanking;
    impl StateRanking for KnapsackRanking {
        type State = usize;

        fn compare(&self, a: &usize, b: &usize) -> Ordering {
            a.cmp(b)
        }
    }

    const OPTIMUM: f64 = 41.0;

    fn config<'a>(
        problem: &'a Knapsack,
        frontier: &'a mut dyn Frontier<State = usize>,
        width: &'a FixedWidth,
    ) -> SolverConfig<'a, usize> {
        SolverConfigBuilder::default()
            .problem(problem)
            .relaxation(problem)
            .ranking(&KnapsackRanking)
            .frontier(frontier)
            .width(width)
            .debug(DebugLevel::On)
            .build()
            .unwrap()
    }

    #[test]
    fn the_exact_solver_proves_the_optimum_regardless_of_the_width() {
        let problem = Knapsack::new(false);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(1);
        let mut solver = ExactSolver::new(config(&problem, &mut frontier, &width));

        let stats = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(1, stats.nb_iterations);
        assert_eq!(Some(OPTIMUM), solver.best_value());
        assert_eq!(Some(OPTIMUM), solver.best_bound());
        assert_eq!(0.0, solver.gap());

        let solution = solver.best_solution().unwrap();
        let (value, weight) = problem.evaluate(&solution);
        assert_eq!(OPTIMUM, value);
        assert!(weight <= problem.capacity);

        // packing nothing is the cheapest option
        let stats = solver.minimize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(0.0), solver.best_value());
    }

    #[test]
    fn the_relaxation_solver_bounds_the_optimum() {
        let problem = Knapsack::new(false);
        for w in 1..=4 {
            let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
            let width = FixedWidth(w);
            let mut solver = RelaxationSolver::new(config(&problem, &mut frontier, &width));

            let stats = solver.maximize().unwrap();
            assert!(solver.best_bound().unwrap() >= OPTIMUM, "width {w}");
            assert!(solver.best_value().map_or(true, |v| v <= OPTIMUM), "width {w}");
            if stats.status == SearchStatus::Optimal {
                assert_eq!(Some(OPTIMUM), solver.best_value());
            } else {
                assert!(!stats.is_exact());
            }
            if let Some(solution) = solver.best_solution() {
                let (value, weight) = problem.evaluate(&solution);
                assert_eq!(solver.best_value(), Some(value));
                assert!(weight <= problem.capacity);
            }
        }
    }

    #[test]
    fn the_restriction_solver_stays_below_the_optimum() {
        let problem = Knapsack::new(false);
        for w in 1..=4 {
            let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
            let width = FixedWidth(w);
            let mut solver = RestrictionSolver::new(config(&problem, &mut frontier, &width));
            let mut reported = vec![];

            let stats = solver.maximize_with(&NoCutoff, &mut |_, stats| reported.extend(stats.incumbent)).unwrap();
            let value = solver.best_value().unwrap();
            assert!(value <= OPTIMUM, "width {w}");
            assert_eq!(vec![value], reported);
            assert!(matches!(stats.status, SearchStatus::Sat | SearchStatus::Optimal));

            let (actual, weight) = problem.evaluate(&solver.best_solution().unwrap());
            assert_eq!(value, actual);
            assert!(weight <= problem.capacity);
        }
    }

    #[test]
    fn a_wide_enough_restriction_is_exact() {
        let problem = Knapsack::new(false);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(usize::MAX);
        let mut solver = RestrictionSolver::new(config(&problem, &mut frontier, &width));

        let stats = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(OPTIMUM), solver.best_value());
    }

    #[test]
    fn infeasibility_is_proved_by_exact_and_relaxed_dds() {
        let problem = Knapsack::new(true);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);

        let mut exact = ExactSolver::new(config(&problem, &mut frontier, &width));
        assert_eq!(SearchStatus::Infeasible, exact.maximize().unwrap().status);
        assert_eq!(None, exact.best_value());
        assert_eq!(None, exact.best_solution());

        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let mut relaxed = RelaxationSolver::new(config(&problem, &mut frontier, &width));
        assert_eq!(SearchStatus::Infeasible, relaxed.maximize().unwrap().status);
        assert_eq!(None, relaxed.best_value());
    }

    #[test]
    fn nothing_is_compiled_when_the_cutoff_fires_right_away() {
        let problem = Knapsack::new(false);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = ExactSolver::new(config(&problem, &mut frontier, &width));

        let stats = solver.maximize_with(&MaxIterations(0), &mut |_, _| {}).unwrap();
        assert_eq!(SearchStatus::Unknown, stats.status);
        assert_eq!(0, stats.nb_iterations);
        assert_eq!(None, solver.best_value());
    }

    #[test]
    fn an_optimal_primal_is_kept() {
        let problem = Knapsack::new(false);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = ExactSolver::new(config(&problem, &mut frontier, &width));
        solver.maximize().unwrap();
        let optimum = solver.best_solution().unwrap();

        solver.set_primal(OPTIMUM, optimum.clone());
        let mut calls = 0;
        let stats = solver.maximize_with(&NoCutoff, &mut |_, _| calls += 1).unwrap();
        assert_eq!(0, calls);
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(OPTIMUM), solver.best_value());
        assert_eq!(Some(optimum), solver.best_solution());
    }

    #[test]
    fn the_compiled_dd_can_be_rendered() {
        let problem = Knapsack::new(false);
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = RelaxationSolver::new(config(&problem, &mut frontier, &width));
        solver.maximize().unwrap();

        let dot = solver.mdd().as_graphviz(&VizConfigBuilder::default().build().unwrap());
        assert!(dot.starts_with("digraph {"));
    }
}
