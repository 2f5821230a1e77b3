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

use std::{hash::Hash, sync::Arc};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{Dominance, DominanceChecker, DominanceCheckResult};

/// One (state, value) pair that has been kept by the dominance checker
#[derive(Debug)]
struct DominanceEntry<T> {
    state: Arc<T>,
    value: f64,
}

/// Simple implementation of a dominance checker that stores a vector of non-dominated
/// states for each distinct (depth, key) pair.
#[derive(Debug)]
pub struct SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
    D::State: Eq,
{
    dominance: D,
    data: DashMap<(usize, D::Key), Vec<DominanceEntry<D::State>>, fxhash::FxBuildHasher>,
}

impl<D> SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
    D::State: Eq,
{
    pub fn new(dominance: D) -> Self {
        Self { dominance, data: Default::default() }
    }

    /// Returns the number of entries which are currently kept
    pub fn len(&self) -> usize {
        self.data.iter().map(|e| e.value().len()).sum()
    }

    /// Returns true iff no entry is kept
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff `kept` makes the (state, value) pair useless. An identical pair
    /// is not considered dominated: it replaces the kept one instead.
    fn dominates(&self, kept: &DominanceEntry<D::State>, state: &D::State, value: f64) -> bool {
        value <= kept.value
            && self.dominance.is_dominated_or_equal(state, kept.state.as_ref())
            && !(value == kept.value && state == kept.state.as_ref())
    }
}

impl<D> DominanceChecker<D::State> for SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
    D::State: Eq,
{
    fn is_dominated_or_insert(&self, state: Arc<D::State>, depth: usize, value: f64) -> DominanceCheckResult {
        if let Some(key) = self.dominance.get_key(state.as_ref()) {
            match self.data.entry((depth, key)) {
                Entry::Occupied(mut e) => {
                    let entries = e.get_mut();
                    if let Some(kept) = entries.iter().find(|kept| self.dominates(kept, state.as_ref(), value)) {
                        return DominanceCheckResult { dominated: true, threshold: Some(kept.value) };
                    }
                    entries.retain(|kept| !(kept.value <= value
                        && self.dominance.is_dominated_or_equal(kept.state.as_ref(), state.as_ref())));
                    entries.push(DominanceEntry { state, value });
                },
                Entry::Vacant(e) => {
                    e.insert(vec![DominanceEntry { state, value }]);
                },
            }
        }
        DominanceCheckResult { dominated: false, threshold: None }
    }

    fn clear(&self) {
        self.data.clear();
    }
}
