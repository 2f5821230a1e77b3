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

//! This module defines the traits used to encapsulate solver heuristics.
//!
//! Namely, it defines :
//!
//!  - the `WidthHeuristic` which is used to control the maximum width of an MDD
//!  - the `StateRanking` heuristic which is used to guess the nodes promisingess
//!  - the `SubProblemRanking` which orders the nodes of the solver frontier
//!  - the `VariableHeuristic` which picks the next variable to branch on
//!  - the `ReductionStrategy` which decides what nodes get merged or dropped
//!    when a layer grows too large
//!  - the `Cutoff` heuristic which is used to impose a stopping criterion on the
//!    solver resolution.

use std::cmp::Ordering;

use crate::{SearchStatistics, SubProblem, VarSet, Variable};

/// This trait enclapsulates the behavior of the heuristic that determines
/// the maximum permitted width of a decision diagram.
///
/// # Technical Note:
/// Just like `Problem`, `Relaxation` and `StateRanking`, the `WidthHeuristic`
/// trait is generic over `State`s. However, rather than using the same
/// 'assciated-type' mechanism that was used for the former three types,
/// `WidthHeuristic` uses a parameter type for this purpose. It does make
/// sense to define a `WidthHeuristic` implementation which is applicable
/// regardless of the state of the problem which is currently being solved
/// (`FixedWidth` and `NbUnassignedWidth` are two such heuristics).
pub trait WidthHeuristic<State> {
    /// Estimates a good maximum width for an MDD rooted in the given state
    fn max_width(&self, sub: &SubProblem<State>) -> usize;
}

/// A state ranking is an heuristic that imposes a partial order on states.
/// This order is used by the framework as a means to discriminate the most
/// promising nodes from the least promising ones when restricting or relaxing
/// a layer from some given DD.
///
/// According to this ordering, greater means better and hence more likely to
/// means a node with a given state is more likely to be kept after restriction
/// or relaxation.
pub trait StateRanking {
    /// As is the case for `Problem` and `Relaxation`, a `StateRanking` must
    /// tell the kind of states it is able to operate on.
    type State;

    /// This method compares two states and determines which is the most
    /// desirable to keep. In this ordering, greater means better.
    fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering;
}

/// A subproblem ranking is an heuristic that imposes a partial order on
/// subproblems on the solver frontier. This order is used by the framework
/// as a means to impose a given ordering on the nodes that are popped from
/// the solver frontier.
pub trait SubProblemRanking {
    /// As is the case for `Problem` and `Relaxation`, a `SubProblemRanking`
    /// must tell the kind of states it is able to operate on.
    type State;

    /// This method compares two subproblems and determines which is the one
    /// that needs to be popped off the frontier first. In this ordering, greater
    /// means more likely to be popped first.
    fn compare(&self, a: &SubProblem<Self::State>, b: &SubProblem<Self::State>) -> Ordering;
}

/// The variable heuristic decides which variable is to be branched upon when
/// developing the next layer of a decision diagram. Its choice may depend on
/// the set of variables which are still free and on the states that make up
/// the next layer.
pub trait VariableHeuristic<State> {
    /// Returns the next variable to branch on, or None when the diagram
    /// should not be developed any further.
    fn next_variable(&self, free: &VarSet, next_layer: &mut dyn Iterator<Item = &State>) -> Option<Variable>;
}

/// A read-only view on one node of a layer that needs to be reduced. It is
/// what a `ReductionStrategy` gets to sort.
#[derive(Debug)]
pub struct LayerNode<'a, State> {
    pub(crate) id: usize,
    /// The state of the node
    pub state: &'a State,
    /// The best value of any path from the root to this node
    pub value: f64,
}

/// A reduction strategy decides which nodes of an oversized layer are kept
/// as they are, and which ones are going to be merged together (relaxation)
/// or dropped (restriction).
///
/// This choice never affects the correctness of the search; only its speed
/// and the quality of the bounds.
pub trait ReductionStrategy<State> {
    /// Reorders the `layer` in place so that the `keep` nodes which are to be
    /// kept come first. All the nodes after position `keep` are going to be
    /// either merged or deleted.
    fn sort_layer(&self, layer: &mut [LayerNode<'_, State>], keep: usize, ranking: &dyn StateRanking<State = State>);
}

/// A distance between two states. It is used by the distance based reduction
/// strategy to group similar states together.
pub trait StateDistance {
    type State;

    /// A non negative number telling how far apart two states are
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;
}

/// This trait encapsulates a criterion (external to the solver) which imposes
/// to stop searching for a better solution. Typically, this is done to grant
/// a given time budget to the search.
///
/// The criterion is evaluated once per iteration of the solver main loop.
pub trait Cutoff {
    /// Returns true iff the criterion is met and the search must stop.
    fn must_stop(&self, statistics: &SearchStatistics) -> bool;
}
/// Any predicate on the search statistics can serve as a cutoff
impl <X: Fn(&SearchStatistics) -> bool> Cutoff for X {
    fn must_stop(&self, statistics: &SearchStatistics) -> bool {
        self(statistics)
    }
}
