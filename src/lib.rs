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

//! # DDO
//! DDO is a truly generic framework to develop MDD-based combinatorial
//! optimization solvers in Rust. Its goal is to let you describe your
//! optimization problem as a dynamic program (see `Problem`) along with a
//! `Relaxation`. When the dynamic program of the problem is considered as a
//! transition system, the relaxation serves the purpose of merging different
//! nodes of the transition system into an other node standing for them all.
//! In that setup, the sole condition to ensure the correctness of the
//! optimization algorithm is that the replacement node must be an over
//! approximation of all what is feasible from the merged nodes.
//!
//! The same model can be maximized or minimized: the sense of the
//! optimization is only chosen when the solver is started.
//!
//! ## Quick Example
//! The following presents a minimalistic use of ddo. It implements a solver for
//! the knapsack problem. This example is shown for illustration purpose because
//! it is pretty simple and chances are high anybody is already comfortable with
//! the problem definition.
//!
//! #### Describe the problem as dynamic program
//! The first thing to do in this example is to describe the binary knapsack
//! problem in terms of a dynamic program. Here, the state of a node, is nothing
//! more than an unsigned integer (usize). That unsigned integer represents the
//! remaining capacity of our sack. To do so, you define your own structure and
//! make sure it implements the `Problem` trait.
//! ```
//! # use ddolib::*;
//! #
//! #[derive(Debug, Clone)]
//! struct Knapsack {
//!     capacity: usize,
//!     profit  : Vec<f64>,
//!     weight  : Vec<usize>
//! }
//! impl Problem for Knapsack {
//!     type State = usize;
//!
//!     fn nb_variables(&self) -> usize {
//!         self.profit.len()
//!     }
//!     fn initial_state(&self) -> usize {
//!         self.capacity
//!     }
//!     fn initial_value(&self) -> f64 {
//!         0.0
//!     }
//!     fn transition(&self, state: &usize, dec: Decision) -> usize {
//!         state - (self.weight[dec.variable.id()] * dec.value as usize)
//!     }
//!     fn transition_cost(&self, _state: &usize, dec: Decision) -> f64 {
//!         self.profit[dec.variable.id()] * dec.value as f64
//!     }
//!     fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
//!         f.apply(Decision { variable: var, value: 0 });
//!         if *state >= self.weight[var.id()] {
//!             f.apply(Decision { variable: var, value: 1 });
//!         }
//!     }
//! }
//! ```
//!
//! #### Define a Relaxation
//! The relaxation we will define is probably the simplest you can think of.
//! When one needs to define a new state to replace those exceeding the maximum
//! width of the MDD, we will simply keep the state with the maximum capacity
//! as it enables at least all the possibly behaviors feasible with lesser capacities.
//!
//! Optionally, we also implement a rough upper bound estimator: the sum of
//! the profits of all the items that are still to be decided upon.
//!
//! ```
//! # use ddolib::*;
//! #
//! # struct Knapsack { profit: Vec<f64> }
//! struct KPRelax<'a> { pb: &'a Knapsack }
//! impl Relaxation for KPRelax<'_> {
//!     type State = usize;
//!
//!     /// To merge a given selection of states (capacities) we will keep the
//!     /// maximum capacity. This is an obvious relaxation as it allows us to
//!     /// put more items in the sack.
//!     fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
//!         states.copied().max().unwrap_or(0)
//!     }
//!     /// When relaxing (merging) the states, we did not run into the risk of
//!     /// possibly decreasing the maximum objective value reachable from the
//!     /// components of the merged node. Hence, we dont need to do anything
//!     /// when relaxing the edge.
//!     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
//!         cost
//!     }
//!     fn fast_upper_bound(&self, _: &usize, remaining: &VarSet) -> f64 {
//!         remaining.iter().map(|v| self.pb.profit[v.id()]).sum()
//!     }
//! }
//! ```
//!
//! #### Rank the states
//! When a layer grows too large, the solver needs to know which states are the
//! most promising. With the knapsack, the more capacity the better.
//! ```
//! # use ddolib::*;
//! # use std::cmp::Ordering;
//! struct KPRanking;
//! impl StateRanking for KPRanking {
//!     type State = usize;
//!
//!     fn compare(&self, a: &usize, b: &usize) -> Ordering {
//!         a.cmp(b)
//!     }
//! }
//! ```
//!
//! # Instanciate your Solver
//! As soon as you have defined a problem and relaxation, you are good to go.
//! The only thing you still need to do is to configure your solver and spin
//! it to solve actual problems. Here is how you would do it.
//!
//! ```
//! # use ddolib::*;
//! # use std::cmp::Ordering;
//! #
//! # struct Knapsack { capacity: usize, profit: Vec<f64>, weight: Vec<usize> }
//! # impl Problem for Knapsack {
//! #     type State = usize;
//! #     fn nb_variables(&self) -> usize { self.profit.len() }
//! #     fn initial_state(&self) -> usize { self.capacity }
//! #     fn initial_value(&self) -> f64 { 0.0 }
//! #     fn transition(&self, state: &usize, dec: Decision) -> usize {
//! #         state - (self.weight[dec.variable.id()] * dec.value as usize)
//! #     }
//! #     fn transition_cost(&self, _state: &usize, dec: Decision) -> f64 {
//! #         self.profit[dec.variable.id()] * dec.value as f64
//! #     }
//! #     fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
//! #         f.apply(Decision { variable: var, value: 0 });
//! #         if *state >= self.weight[var.id()] {
//! #             f.apply(Decision { variable: var, value: 1 });
//! #         }
//! #     }
//! # }
//! # struct KPRelax<'a> { pb: &'a Knapsack }
//! # impl Relaxation for KPRelax<'_> {
//! #     type State = usize;
//! #     fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
//! #         states.copied().max().unwrap_or(0)
//! #     }
//! #     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
//! #         cost
//! #     }
//! #     fn fast_upper_bound(&self, _: &usize, remaining: &VarSet) -> f64 {
//! #         remaining.iter().map(|v| self.pb.profit[v.id()]).sum()
//! #     }
//! # }
//! # struct KPRanking;
//! # impl StateRanking for KPRanking {
//! #     type State = usize;
//! #     fn compare(&self, a: &usize, b: &usize) -> Ordering { a.cmp(b) }
//! # }
//! // 1. Create an instance of our knapsack problem
//! let problem = Knapsack {
//!     capacity: 50,
//!     profit  : vec![60.0, 100.0, 120.0],
//!     weight  : vec![10,  20,  30]
//! };
//! let relaxation = KPRelax { pb: &problem };
//! // 2. Decide how wide the approximate dds may grow, and how the open
//! //    sub problems are to be prioritized.
//! let width = FixedWidth(2);
//! let mut frontier = SimpleFrontier::new(MaxUB::new(&KPRanking));
//! // 3. Configure the solver. Everything which is not explicitly set
//! //    takes a sensible default value.
//! let config = SolverConfigBuilder::default()
//!     .problem(&problem)
//!     .relaxation(&relaxation)
//!     .ranking(&KPRanking)
//!     .width(&width)
//!     .frontier(&mut frontier)
//!     .use_cache(true)
//!     .build()
//!     .unwrap();
//! let mut solver = SequentialSolver::new(config);
//! // 4. Maximize your objective function. The statistics tell whether the
//! //    search was carried out until the optimum was proved. Should the
//! //    model violate its contract (which is only checked when a debug level
//! //    is configured), an error explains what went wrong.
//! let stats = solver.maximize().unwrap();
//! assert_eq!(SearchStatus::Optimal, stats.status);
//! assert_eq!(Some(220.0), solver.best_value());
//! // 5. Retrieve the decisions which make up the best solution
//! let mut solution = solver.best_solution().unwrap();
//! solution.sort_unstable_by_key(|d| d.variable.id());
//! assert_eq!(vec![0, 1, 1], solution.iter().map(|d| d.value).collect::<Vec<_>>());
//! ```

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
