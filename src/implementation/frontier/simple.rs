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

//! A priority queue of exact sub-problems, ordered by a `SubProblemRanking`.

use binary_heap_plus::BinaryHeap;

use crate::*;

/// Binary-heap backed frontier. The entry popped first is the greatest one
/// according to the ranking `O`; with `MaxUB` that is the entry having the
/// highest upper bound (ties broken on the value, then on the state ranking).
///
/// Any cut-set policy may feed this frontier: it only stores what the solver
/// pushes.
pub struct SimpleFrontier<O: SubProblemRanking> {
    queue: BinaryHeap<SubProblem<O::State>, CompareSubProblem<O>>
}
impl <O> SimpleFrontier<O> where O: SubProblemRanking {
    /// Creates an empty frontier ordered by `ranking`.
    pub fn new(ranking: O) -> Self {
        Self::with_capacity(ranking, 0)
    }
    /// Creates an empty frontier ordered by `ranking` with room for
    /// `capacity` entries before it has to grow.
    pub fn with_capacity(ranking: O, capacity: usize) -> Self {
        let order = CompareSubProblem::new(ranking);
        Self{ queue: BinaryHeap::from_vec_cmp(Vec::with_capacity(capacity), order) }
    }
}
impl <O> Frontier for SimpleFrontier<O> where O: SubProblemRanking {
    type State = O::State;

    fn push(&mut self, node: SubProblem<Self::State>) {
        self.queue.push(node)
    }
    fn pop(&mut self) -> Option<SubProblem<Self::State>> {
        self.queue.pop()
    }
    fn clear(&mut self) {
        self.queue.clear()
    }
    fn len(&self) -> usize {
        self.queue.len()
    }
}
