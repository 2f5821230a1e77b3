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

//! This module provides the implementation of a solver that will solve the
//! problem using one single thread of execution. It implements the branch
//! and bound with decision diagrams algorithm: a frontier of open sub
//! problems is processed, best bound first. For each of them, a restricted
//! dd is compiled to improve the incumbent; and a relaxed dd is compiled to
//! either prove that the sub problem has been solved or to split it into
//! smaller sub problems (the nodes of its cutset).

use std::{fmt::Debug, hash::Hash, sync::Arc, time::Duration};

use log::{debug, info, trace, warn};

use crate::{Problem, Relaxation, StateRanking, WidthHeuristic, VariableHeuristic, DominanceChecker,
    ReductionStrategy, Frontier, Cache, SimpleCache, EmptyCache, Cutoff, SubProblem, DecisionDiagram, Mdd,
    CompilationInput, CompilationType, CutsetType, DebugLevel, Completion, Solver, Solution, Decision, Reason,
    Sense, SearchStatus, SearchStatistics, SolverConfig};

use super::oriented::{Oriented, reorient};
use super::progress::Progress;

/// The workload the solver can get from its frontier
enum WorkLoad<T> {
    /// There is no work left to be done: the search is complete
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// The item to process
    WorkItem { node: SubProblem<T> },
}

/// This is the sequential (single threaded) branch and bound solver.
///
/// # Example
/// ```
/// # use ddolib::*;
/// # use std::cmp::Ordering;
/// /// The state of a knapsack is its remaining capacity
/// struct Knapsack { capacity: usize, profit: Vec<f64>, weight: Vec<usize> }
/// impl Problem for Knapsack {
///     type State = usize;
///     fn nb_variables(&self) -> usize { self.profit.len() }
///     fn initial_state(&self) -> usize { self.capacity }
///     fn initial_value(&self) -> f64 { 0.0 }
///     fn transition(&self, state: &usize, d: Decision) -> usize {
///         state - d.value as usize * self.weight[d.variable.id()]
///     }
///     fn transition_cost(&self, _: &usize, d: Decision) -> f64 {
///         d.value as f64 * self.profit[d.variable.id()]
///     }
///     fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
///         f.apply(Decision { variable: var, value: 0 });
///         if *state >= self.weight[var.id()] {
///             f.apply(Decision { variable: var, value: 1 });
///         }
///     }
/// }
/// struct KnapsackRelax;
/// impl Relaxation for KnapsackRelax {
///     type State = usize;
///     fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
///         states.copied().max().unwrap_or(0)
///     }
///     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
///         cost
///     }
/// }
/// struct KnapsackRanking;
/// impl StateRanking for KnapsackRanking {
///     type State = usize;
///     fn compare(&self, a: &usize, b: &usize) -> Ordering { a.cmp(b) }
/// }
///
/// let problem = Knapsack {
///     capacity: 10,
///     profit: vec![2.0, 3.0, 6.0, 6.0, 1.0],
///     weight: vec![4, 6, 4, 2, 5],
/// };
/// let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
/// let width = FixedWidth(2);
/// let config = SolverConfigBuilder::default()
///     .problem(&problem)
///     .relaxation(&KnapsackRelax)
///     .ranking(&KnapsackRanking)
///     .frontier(&mut frontier)
///     .width(&width)
///     .build()
///     .unwrap();
///
/// let mut solver = SequentialSolver::new(config);
/// let stats = solver.maximize().unwrap();
///
/// assert_eq!(SearchStatus::Optimal, stats.status);
/// assert_eq!(Some(14.0), solver.best_value());
/// assert_eq!(0.0, solver.gap());
/// ```
pub struct SequentialSolver<'a, State>
where State: Debug + Eq + Hash + Clone
{
    /// A reference to the problem being solved with branch-and-bound MDD
    problem: &'a dyn Problem<State = State>,
    /// The relaxation used when a DD layer grows too large
    relaxation: &'a dyn Relaxation<State = State>,
    /// The ranking heuristic used to discriminate the most promising from
    /// the least promising states
    ranking: &'a dyn StateRanking<State = State>,
    /// The maximum width heuristic used to enforce a given maximum memory
    /// usage when compiling mdds
    width_heu: &'a dyn WidthHeuristic<State>,
    var_heuristic: &'a dyn VariableHeuristic<State>,
    dominance: &'a dyn DominanceChecker<State>,
    relax_strategy: &'a dyn ReductionStrategy<State>,
    restrict_strategy: &'a dyn ReductionStrategy<State>,
    cutset_type: CutsetType,
    use_cache: bool,
    debug: DebugLevel,

    /// This is the frontier: the set of nodes that must still be explored
    /// before the problem can be considered 'solved'.
    ///
    /// # Note:
    /// The frontier orders the nodes by upper bound (so the highest ub is
    /// going to pop first). So, it is guaranteed that the upper bound of the
    /// first node being popped is an upper bound on the value reachable by
    /// exploring any of the nodes remaining on the frontier. As a consequence,
    /// the exploration can be stopped as soon as a node with an ub <= current
    /// best lower bound is popped.
    frontier: &'a mut dyn Frontier<State = State>,
    /// The thresholds of the states that have been met so far
    cache: SimpleCache<State>,
    /// The number of frontier nodes at each depth
    open_by_layer: Vec<usize>,
    /// No frontier node lies above this depth: the cache can forget the
    /// thresholds of the shallower layers
    first_active_layer: usize,
    /// The (reused) decision diagram
    mdd: Mdd<State>,
    /// A primal solution to start the next search from
    primal: Option<(f64, Solution)>,
    progress: Progress,
}

impl<'a, State> SequentialSolver<'a, State>
where State: Debug + Eq + Hash + Clone
{
    pub fn new(config: SolverConfig<'a, State>) -> Self {
        let SolverConfig {
            problem,
            relaxation,
            ranking,
            frontier,
            width,
            var_heuristic,
            dominance,
            relax_strategy,
            restrict_strategy,
            cutset,
            use_cache,
            debug,
        } = config;

        let mut progress = Progress::new(Sense::Maximize);
        progress.run_time = Some(Duration::ZERO);

        SequentialSolver {
            problem,
            relaxation,
            ranking,
            width_heu: width,
            var_heuristic,
            dominance,
            relax_strategy,
            restrict_strategy,
            cutset_type: cutset,
            use_cache,
            debug,
            //
            frontier,
            cache: SimpleCache::default(),
            open_by_layer: vec![],
            first_active_layer: 0,
            mdd: Mdd::new(),
            primal: None,
            progress,
        }
    }

    /// This method initializes the problem resolution. Put more simply, this
    /// method resets all that is left from a previous search and posts the
    /// root node onto the frontier so that the processing can be bootstrapped.
    fn initialize(&mut self, sense: Sense) {
        self.progress = Progress::new(sense);
        self.frontier.clear();
        self.dominance.clear();
        if self.use_cache {
            self.cache.initialize(self.problem.nb_variables());
        }
        if let Some((value, solution)) = self.primal.as_ref() {
            self.progress.best_lb = sense.orient(*value);
            self.progress.best_sol = Some(solution.clone());
            self.progress.status = SearchStatus::Sat;
        }

        self.open_by_layer.clear();
        self.open_by_layer.resize(self.problem.nb_variables() + 1, 0);
        self.first_active_layer = 0;

        let root = self.root_node(sense);
        self.open_by_layer[root.depth] += 1;
        self.frontier.push(root);
        self.progress.queue_max_size = self.frontier.len();
    }

    fn root_node(&self, sense: Sense) -> SubProblem<State> {
        SubProblem {
            state: Arc::new(self.problem.initial_state()),
            value: sense.orient(self.problem.initial_value()),
            path: vec![],
            ub: f64::INFINITY,
            depth: 0,
        }
    }

    /// This method processes the given `node`. To do so, it expands a
    /// restricted and possibly a relaxed mdd rooted in `node`. If that is
    /// necessary, it stores cutset nodes onto the frontier for further
    /// processing.
    fn process_one_node(
        &mut self,
        node: SubProblem<State>,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<(), Reason> {
        if self.use_cache {
            if !self.cache.must_explore(&node) {
                trace!("skipping a sub-problem at depth {}: its state has been met with a better value", node.depth);
                return Ok(());
            }
            self.cache.update_threshold(node.state.clone(), node.depth, node.value, true);
        }

        let sense = self.progress.sense;
        let model = Oriented::new(self.problem, self.relaxation, sense);
        let cache: &dyn Cache<State> = if self.use_cache { &self.cache } else { &EmptyCache };
        let width = self.width_heu.max_width(&node);

        debug!("exploring a sub-problem at depth {} (value: {}, bound: {}, width: {}), {} left",
            node.depth, sense.orient(node.value), sense.orient(node.ub), width, self.frontier.len());

        // 1. RESTRICTION
        let mut compilation = CompilationInput {
            comp_type: CompilationType::Restricted,
            problem: &model,
            relaxation: &model,
            ranking: self.ranking,
            var_heuristic: self.var_heuristic,
            reduction: self.restrict_strategy,
            cutset_type: self.cutset_type,
            max_width: width,
            residual: &node,
            best_lb: self.progress.best_lb,
            cache,
            dominance: self.dominance,
            debug: self.debug,
        };

        let Completion { is_exact, .. } = self.mdd.compile(&compilation)?;
        let mdd = &self.mdd;
        self.progress.improve(mdd.best_value(), || mdd.best_solution(), on_new_incumbent);
        if is_exact {
            return Ok(());
        }

        // 2. RELAXATION
        compilation.comp_type = CompilationType::Relaxed;
        compilation.reduction = self.relax_strategy;
        compilation.best_lb = self.progress.best_lb;

        let Completion { is_exact, best_value } = self.mdd.compile(&compilation)?;
        let mdd = &self.mdd;
        if is_exact {
            self.progress.improve(best_value, || mdd.best_solution(), on_new_incumbent);
        } else {
            self.progress.improve(mdd.best_exact_value(), || mdd.best_exact_solution(), on_new_incumbent);
            if best_value.map_or(false, |v| v > self.progress.best_lb) {
                self.enqueue_cutset(node.ub);
            }
        }

        Ok(())
    }

    /// If necessary, thightens the bound of nodes in the cutset of `mdd` and
    /// then add the relevant nodes to the frontier.
    fn enqueue_cutset(&mut self, ub: f64) {
        let best_lb = self.progress.best_lb;
        let frontier = &mut self.frontier;
        let open_by_layer = &mut self.open_by_layer;
        self.mdd.drain_cutset(|mut cutset_node| {
            cutset_node.ub = ub.min(cutset_node.ub);
            if cutset_node.ub > best_lb {
                if let Some(open) = open_by_layer.get_mut(cutset_node.depth) {
                    *open += 1;
                }
                frontier.push(cutset_node);
            }
        });
        self.progress.queue_max_size = self.progress.queue_max_size.max(self.frontier.len());
    }

    /// Consults the frontier to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Complete, when the problem is solved.
    ///   + Aborted, when the cutoff criterion says the search must stop.
    ///   + WorkItem, when a subproblem must be processed.
    fn get_workload(&mut self, cutoff: &dyn Cutoff) -> WorkLoad<State> {
        // Can we clean up the cache?
        if self.use_cache {
            while self.first_active_layer < self.problem.nb_variables()
                && self.open_by_layer.get(self.first_active_layer).map_or(false, |n| *n == 0)
            {
                self.cache.clear_layer(self.first_active_layer);
                self.first_active_layer += 1;
            }
        }

        if self.frontier.is_empty() {
            return WorkLoad::Complete;
        }
        if cutoff.must_stop(&self.progress.statistics()) {
            return WorkLoad::Aborted;
        }

        match self.frontier.pop() {
            None => WorkLoad::Complete,
            Some(node) => {
                self.progress.nb_iterations += 1;
                if let Some(open) = self.open_by_layer.get_mut(node.depth) {
                    *open = open.saturating_sub(1);
                }
                // every node left has a bound at most as good as this one's
                if node.ub <= self.progress.best_lb {
                    self.frontier.clear();
                    return WorkLoad::Complete;
                }
                self.progress.best_ub = node.ub;
                WorkLoad::WorkItem { node }
            }
        }
    }
}

impl<'a, State> Solver for SequentialSolver<'a, State>
where State: Debug + Eq + Hash + Clone
{
    /// Applies the branch and bound algorithm proposed by Bergman et al. to
    /// solve the problem. The workloads are processed one after the other
    /// until either the problem is solved or the cutoff criterion is met.
    fn solve(
        &mut self,
        sense: Sense,
        cutoff: &dyn Cutoff,
        on_new_incumbent: &mut dyn FnMut(&[Decision], &SearchStatistics),
    ) -> Result<SearchStatistics, Reason> {
        info!("starting a search ({:?}) over {} variables", sense, self.problem.nb_variables());
        self.initialize(sense);

        loop {
            match self.get_workload(cutoff) {
                WorkLoad::Complete => {
                    self.progress.conclude(true);
                    break;
                },
                WorkLoad::Aborted => {
                    self.progress.conclude(false);
                    break;
                },
                WorkLoad::WorkItem { node } => {
                    if let Err(reason) = self.process_one_node(node, on_new_incumbent) {
                        self.frontier.clear();
                        self.progress.conclude(false);
                        let reason = reorient(reason, sense);
                        warn!("search aborted: {}", reason);
                        return Err(reason);
                    }
                }
            }
        }

        let stats = self.progress.statistics();
        info!("search over: {:?} after {} iterations in {:?} (incumbent: {:?}, bound: {:?})",
            stats.status, stats.nb_iterations, stats.run_time, stats.incumbent, stats.best_bound);
        Ok(stats)
    }

    /// Returns the value of the best solution that has been identified for
    /// this problem.
    fn best_value(&self) -> Option<f64> {
        self.progress.incumbent()
    }
    /// Returns the best solution that has been identified for this problem.
    fn best_solution(&self) -> Option<Solution> {
        self.progress.best_sol.clone()
    }
    fn best_bound(&self) -> Option<f64> {
        self.progress.bound()
    }
    fn statistics(&self) -> SearchStatistics {
        self.progress.statistics()
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: f64, solution: Solution) {
        self.primal = Some((value, solution));
    }
}

#[cfg(test)]
mod test_solver {
    use std::cmp::Ordering;

    use crate::*;

    /// A 0-1 knapsack whose state is the remaining capacity. The profits
    /// are multiplied by `sign` so that the same instance can be turned into
    /// a problem with negative costs.
    struct Knapsack {
        capacity: usize,
        profit: Vec<f64>,
        weight: Vec<usize>,
        sign: f64,
        /// When set, every item must be packed
        mandatory: bool,
    }
    impl Knapsack {
        fn scenario() -> Self {
            Knapsack {
                capacity: 10,
                profit: vec![2.0, 3.0, 6.0, 6.0, 1.0],
                weight: vec![4, 6, 4, 2, 5],
                sign: 1.0,
                mandatory: false,
            }
        }
        fn larger() -> Self {
            Knapsack {
                capacity: 23,
                profit: vec![12.0, 7.0, 9.0, 4.0, 11.0, 6.0, 8.0, 3.0, 10.0, 5.0],
                weight: vec![7, 4, 6, 2, 8, 3, 5, 1, 7, 4],
                sign: 1.0,
                mandatory: false,
            }
        }
        fn cost(&self, i: usize) -> f64 {
            self.sign * self.profit[i]
        }
        fn evaluate(&self, solution: &[Decision]) -> (f64, usize) {
            solution.iter()
                .filter(|d| d.value == 1)
                .fold((0.0, 0), |(p, w), d| (p + self.cost(d.variable.id()), w + self.weight[d.variable.id()]))
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
            d.value as f64 * self.cost(d.variable.id())
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
            remaining.iter().map(|v| self.cost(v.id()).max(0.0)).sum()
        }
        fn fast_lower_bound(&self, _: &usize, remaining: &VarSet) -> f64 {
            remaining.iter().map(|v| self.cost(v.id()).min(0.0)).sum()
        }
    }

    /// A relaxation which pretends nothing can be gained when minimizing
    struct Pessimistic;
    impl Relaxation for Pessimistic {
        type State = usize;

        fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
            states.copied().max().unwrap_or(0)
        }
        fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
            cost
        }
        fn fast_lower_bound(&self, _: &usize, _: &VarSet) -> f64 {
            0.0
        }
    }

    struct KnapsackRanking;
    impl StateRanking for KnapsackRanking {
        type State = usize;

        fn compare(&self, a: &usize, b: &usize) -> Ordering {
            a.cmp(b)
        }
    }

    struct KnapsackDominance;
    impl Dominance for KnapsackDominance {
        type State = usize;
        type Key = ();

        fn get_key(&self, _: &usize) -> Option<()> {
            Some(())
        }
        fn is_dominated_or_equal(&self, a: &usize, b: &usize) -> bool {
            a <= b
        }
    }

    fn config<'a>(
        problem: &'a Knapsack,
        frontier: &'a mut dyn Frontier<State = usize>,
        width: &'a FixedWidth,
    ) -> SolverConfigBuilder<'a, usize> {
        SolverConfigBuilder::default()
            .problem(problem)
            .relaxation(problem)
            .ranking(&KnapsackRanking)
            .frontier(frontier)
            .width(width)
    }

    #[test]
    fn maximize_finds_the_optimum() {
        let problem = Knapsack::scenario();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert!(stats.is_exact());
        assert_eq!(Some(14.0), stats.incumbent);
        assert_eq!(Some(14.0), stats.best_bound);
        assert_eq!(0.0, stats.gap);
        assert_eq!(Some(14.0), solver.best_value());
        assert_eq!(Some(14.0), solver.best_bound());

        let solution = solver.best_solution().unwrap();
        assert_eq!(5, solution.len());
        let (value, weight) = problem.evaluate(&solution);
        assert_eq!(14.0, value);
        assert!(weight <= problem.capacity);
    }

    #[test]
    fn minimize_negated_profits_yields_the_negated_optimum() {
        let mut problem = Knapsack::scenario();
        problem.sign = -1.0;
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.minimize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(-14.0), solver.best_value());
        assert_eq!(Some(-14.0), solver.best_bound());

        let solution = solver.best_solution().unwrap();
        assert_eq!(-14.0, problem.evaluate(&solution).0);
    }

    #[test]
    fn the_same_solver_can_maximize_then_minimize() {
        let problem = Knapsack::scenario();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        assert!(solver.maximize().is_ok());
        assert_eq!(Some(14.0), solver.best_value());

        assert!(solver.minimize().is_ok());
        assert_eq!(Some(0.0), solver.best_value());
        let solution = solver.best_solution().unwrap();
        assert!(solution.iter().all(|d| d.value == 0));
    }

    #[test]
    fn all_configurations_agree_on_the_optimum() {
        let problem = Knapsack::larger();
        let dominance = SimpleDominanceChecker::new(KnapsackDominance);
        for w in 1..=4 {
            for cutset in [CutsetType::LastExactLayer, CutsetType::Frontier] {
                for use_cache in [false, true] {
                    for use_dominance in [false, true] {
                        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
                        let width = FixedWidth(w);
                        let mut builder = config(&problem, &mut frontier, &width)
                            .cutset(cutset)
                            .use_cache(use_cache);
                        if use_dominance {
                            builder = builder.dominance(&dominance);
                        }
                        let mut solver = SequentialSolver::new(builder.build().unwrap());

                        let stats = solver.maximize().unwrap();
                        assert_eq!(SearchStatus::Optimal, stats.status);
                        assert_eq!(Some(41.0), stats.incumbent,
                            "width {w}, {cutset:?}, cache: {use_cache}, dominance: {use_dominance}");
                        assert!(stats.nb_iterations >= 1);
                        assert!(stats.queue_max_size >= 1);
                        assert_eq!(41.0, problem.evaluate(&solver.best_solution().unwrap()).0);
                    }
                }
            }
        }
    }

    #[test]
    fn infeasible_problems_are_reported_as_such() {
        let mut problem = Knapsack::scenario();
        problem.mandatory = true;
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Infeasible, stats.status);
        assert!(stats.is_exact());
        assert_eq!(None, solver.best_value());
        assert_eq!(None, solver.best_solution());
        assert_eq!(None, solver.best_bound());
        assert_eq!(1.0, solver.gap());
    }

    #[test]
    fn the_cutoff_is_checked_before_each_iteration() {
        let problem = Knapsack::larger();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.maximize_with(&MaxIterations(0), &mut |_, _| {}).unwrap();
        assert_eq!(SearchStatus::Unknown, stats.status);
        assert!(!stats.is_exact());
        assert_eq!(0, stats.nb_iterations);
        assert_eq!(None, solver.best_value());
        assert_eq!(1.0, stats.gap);
    }

    #[test]
    fn an_interrupted_search_keeps_its_incumbent() {
        let problem = Knapsack::larger();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.maximize_with(&MaxIterations(1), &mut |_, _| {}).unwrap();
        assert_eq!(1, stats.nb_iterations);
        assert!(matches!(stats.status, SearchStatus::Sat | SearchStatus::Optimal));
        let value = solver.best_value().unwrap();
        assert!(value <= 41.0);
        assert!(solver.best_bound().map_or(true, |bound| bound >= 41.0));
        assert_eq!(value, problem.evaluate(&solver.best_solution().unwrap()).0);
    }

    #[test]
    fn the_primal_seeds_the_next_search() {
        let problem = Knapsack::larger();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let primal = vec![Decision { variable: Variable(7), value: 1 }];
        solver.set_primal(3.0, primal.clone());

        let stats = solver.maximize_with(&MaxIterations(0), &mut |_, _| {}).unwrap();
        assert_eq!(SearchStatus::Sat, stats.status);
        assert_eq!(Some(3.0), stats.incumbent);
        assert_eq!(Some(primal), solver.best_solution());

        let mut calls = 0;
        let stats = solver.maximize_with(&NoCutoff, &mut |_, _| calls += 1).unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(41.0), stats.incumbent);
        assert!(calls >= 1);
    }

    #[test]
    fn an_optimal_primal_is_never_replaced() {
        let problem = Knapsack::scenario();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let primal = vec![
            Decision { variable: Variable(2), value: 1 },
            Decision { variable: Variable(3), value: 1 },
            Decision { variable: Variable(0), value: 1 },
        ];
        solver.set_primal(14.0, primal.clone());

        let mut calls = 0;
        let stats = solver.maximize_with(&NoCutoff, &mut |_, _| calls += 1).unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(0, calls);
        assert_eq!(Some(primal), solver.best_solution());
    }

    #[test]
    fn incumbents_are_reported_as_they_improve() {
        let problem = Knapsack::larger();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(1);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let mut seen = vec![];
        solver.maximize_with(&NoCutoff, &mut |solution, stats| {
            assert_eq!(SearchStatus::Sat, stats.status);
            assert_eq!(Some(problem.evaluate(solution).0), stats.incumbent);
            seen.push(stats.incumbent.unwrap_or(f64::NEG_INFINITY));
        }).unwrap();

        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Some(&41.0), seen.last());
    }

    #[test]
    fn the_cache_forgets_the_layers_above_the_frontier() {
        let problem = Knapsack::larger();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width)
            .use_cache(true)
            .build()
            .unwrap());

        // the root is explored then the next workload is requested
        let stats = solver.maximize_with(&MaxIterations(1), &mut |_, _| {}).unwrap();
        assert_eq!(1, stats.nb_iterations);
        assert!(solver.first_active_layer >= 1);
        assert_eq!(None, solver.cache.get_threshold(&23, 0));

        // the complete search still reaches the optimum
        let stats = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Optimal, stats.status);
        assert_eq!(Some(41.0), solver.best_value());
    }

    #[test]
    fn cache_and_dominance_together_keep_the_optimum() {
        let problem = Knapsack::larger();
        let dominance = SimpleDominanceChecker::new(KnapsackDominance);
        for w in 1..=3 {
            for cutset in [CutsetType::LastExactLayer, CutsetType::Frontier] {
                let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
                let width = FixedWidth(w);
                let mut solver = SequentialSolver::new(config(&problem, &mut frontier, &width)
                    .use_cache(true)
                    .dominance(&dominance)
                    .cutset(cutset)
                    .build()
                    .unwrap());

                let stats = solver.maximize().unwrap();
                assert_eq!(SearchStatus::Optimal, stats.status);
                assert_eq!(Some(41.0), solver.best_value(), "width {w}, {cutset:?}");
            }
        }
    }

    #[test]
    fn statistics_of_an_idle_solver_are_empty() {
        let problem = Knapsack::scenario();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let solver = SequentialSolver::new(config(&problem, &mut frontier, &width).build().unwrap());

        let stats = solver.statistics();
        assert_eq!(SearchStatus::Unknown, stats.status);
        assert_eq!(0, stats.nb_iterations);
        assert_eq!(None, stats.incumbent);
        assert_eq!(None, stats.best_bound);
    }

    #[test]
    fn contract_violations_are_reported_in_the_sense_of_the_model() {
        let mut problem = Knapsack::scenario();
        problem.sign = -1.0;
        let mut frontier = SimpleFrontier::new(MaxUB::new(&KnapsackRanking));
        let width = FixedWidth(2);
        let config = config(&problem, &mut frontier, &width)
            .relaxation(&Pessimistic)
            .debug(DebugLevel::On)
            .build()
            .unwrap();
        let mut solver = SequentialSolver::new(config);

        match solver.minimize() {
            Err(Reason::InadmissibleBound { bound, actual, .. }) => assert!(bound > actual),
            other => panic!("unexpected outcome {other:?}"),
        }
        // maximizing only relies on the (default) upper bound
        assert!(solver.maximize().is_ok());
        assert_eq!(Some(0.0), solver.best_value());
    }
}
