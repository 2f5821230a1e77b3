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

//! The whole engine maximizes. This module provides the adapter which lets
//! it minimize a model as well: the values produced by the model are negated
//! on their way in, and the values reported to the user are negated on their
//! way out.

use crate::{Problem, Relaxation, Sense, Decision, Variable, DecisionCallback, VarSet, Reason};

/// Presents a problem (and its relaxation) to the engine as if it were to be
/// maximized.
pub(crate) struct Oriented<'a, State> {
    problem: &'a dyn Problem<State = State>,
    relaxation: &'a dyn Relaxation<State = State>,
    sense: Sense,
}
impl <'a, State> Oriented<'a, State> {
    pub fn new(
        problem: &'a dyn Problem<State = State>,
        relaxation: &'a dyn Relaxation<State = State>,
        sense: Sense,
    ) -> Self {
        Self { problem, relaxation, sense }
    }
}

impl <State> Problem for Oriented<'_, State> {
    type State = State;

    fn nb_variables(&self) -> usize {
        self.problem.nb_variables()
    }
    fn initial_state(&self) -> State {
        self.problem.initial_state()
    }
    fn initial_value(&self) -> f64 {
        self.sense.orient(self.problem.initial_value())
    }
    fn transition(&self, state: &State, decision: Decision) -> State {
        self.problem.transition(state, decision)
    }
    fn transition_cost(&self, state: &State, decision: Decision) -> f64 {
        self.sense.orient(self.problem.transition_cost(state, decision))
    }
    fn for_each_in_domain(&self, var: Variable, state: &State, f: &mut dyn DecisionCallback) {
        self.problem.for_each_in_domain(var, state, f)
    }
}

impl <State> Relaxation for Oriented<'_, State> {
    type State = State;

    fn merge(&self, states: &mut dyn Iterator<Item = &State>) -> State {
        self.relaxation.merge(states)
    }
    fn relax(&self, source: &State, dest: &State, new: &State, decision: Decision, cost: f64) -> f64 {
        let cost = self.sense.orient(cost);
        self.sense.orient(self.relaxation.relax(source, dest, new, decision, cost))
    }
    fn fast_upper_bound(&self, state: &State, remaining: &VarSet) -> f64 {
        match self.sense {
            Sense::Maximize => self.relaxation.fast_upper_bound(state, remaining),
            Sense::Minimize => -self.relaxation.fast_lower_bound(state, remaining),
        }
    }
    fn fast_lower_bound(&self, state: &State, remaining: &VarSet) -> f64 {
        match self.sense {
            Sense::Maximize => self.relaxation.fast_lower_bound(state, remaining),
            Sense::Minimize => -self.relaxation.fast_upper_bound(state, remaining),
        }
    }
}

/// Expresses the values carried by a reason in the sense of the model
pub(crate) fn reorient(reason: Reason, sense: Sense) -> Reason {
    match reason {
        Reason::InadmissibleBound { state, depth, bound, actual } =>
            Reason::InadmissibleBound { state, depth, bound: sense.orient(bound), actual: sense.orient(actual) },
        Reason::UnsoundRelaxation { merged, state, relaxed, exact } =>
            Reason::UnsoundRelaxation { merged, state, relaxed: sense.orient(relaxed), exact: sense.orient(exact) },
        other => other,
    }
}
