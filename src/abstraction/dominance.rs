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

use std::sync::Arc;

/// This trait gives the possibility to model dominance relations between the
/// states of a specific problem. The dominance relation is evaluated only for
/// pairs of states that are mapped to the same key.
pub trait Dominance {
    type State;
    type Key;

    /// Takes a state and returns a key that maps it to comparable states.
    /// A state for which no key is returned is never subject to dominance.
    fn get_key(&self, state: &Self::State) -> Option<Self::Key>;

    /// Returns true iff any completion of `a` can be matched by a completion
    /// of `b` which is at least as good. In other words, whenever `b` has been
    /// reached with a value at least as good as the one of `a`, there is no
    /// point in exploring `a` any further.
    ///
    /// Note: the states are assumed to have the same key, otherwise they are
    /// not comparable for dominance
    fn is_dominated_or_equal(&self, a: &Self::State, b: &Self::State) -> bool;
}

/// The outcome of a dominance check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominanceCheckResult {
    /// Whether the checked state is dominated by some stored state
    pub dominated: bool,
    /// When dominated, the value of the dominating entry. Any node with the
    /// same state at that depth and a value no better than this one would be
    /// dominated as well.
    pub threshold: Option<f64>,
}

/// The dominance checker stores the states which have been kept so far
/// and decides whether some newly generated state is worth exploring.
///
/// The values it is given live in the internal (maximizing) space of the
/// engine: greater is better.
pub trait DominanceChecker<State> {
    /// Returns whether the state is dominated by a stored one. When it is
    /// not, the (state, value) pair is stored; and any previously kept entry
    /// which is dominated by the new pair is forgotten.
    fn is_dominated_or_insert(&self, state: Arc<State>, depth: usize, value: f64) -> DominanceCheckResult;

    /// Forgets all the kept entries
    fn clear(&self);
}
