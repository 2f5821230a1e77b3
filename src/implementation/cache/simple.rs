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

//! This module provides the cache that is used when the solver is told to
//! remember the thresholds of the states it has explored.

use std::{sync::Arc, hash::Hash};

use dashmap::DashMap;

use crate::{Cache, Threshold};

/// Simple implementation of Cache using one hashmap for each layer,
/// each protected with a read-write lock.
#[derive(Debug)]
pub struct SimpleCache<State>
where State: Hash + Eq {
    thresholds_by_layer: Vec<DashMap<Arc<State>, Threshold, fxhash::FxBuildHasher>>,
}
impl <State> Default for SimpleCache<State>
where State: Hash + Eq {
    fn default() -> Self {
        Self { thresholds_by_layer: vec![] }
    }
}
impl <State> SimpleCache<State>
where State: Hash + Eq {
    /// The total number of thresholds which are currently stored
    pub fn len(&self) -> usize {
        self.thresholds_by_layer.iter().map(|l| l.len()).sum()
    }
    /// Returns true iff no threshold is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<State> Cache<State> for SimpleCache<State>
where State: Hash + Eq {
    fn initialize(&mut self, nb_variables: usize) {
        self.thresholds_by_layer.clear();
        for _ in 0..=nb_variables {
            self.thresholds_by_layer.push(Default::default());
        }
    }

    fn get_threshold(&self, state: &State, depth: usize) -> Option<Threshold> {
        self.thresholds_by_layer.get(depth)
            .and_then(|layer| layer.get(state).as_deref().copied())
    }

    fn update_threshold(&self, state: Arc<State>, depth: usize, value: f64, explored: bool) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.entry(state)
                .and_modify(|e| *e = Threshold { value, explored }.max(*e))
                .or_insert(Threshold { value, explored });
        }
    }

    fn clear_layer(&self, depth: usize) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.clear();
        }
    }

    fn clear(&self) {
        self.thresholds_by_layer.iter().for_each(|l| l.clear());
    }
}
