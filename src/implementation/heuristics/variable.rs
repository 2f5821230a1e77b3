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

//! This module provides the variable heuristic that is used unless told
//! otherwise.

use crate::{VarSet, Variable, VariableHeuristic};

/// Branches on the free variables in their natural order: the variable with
/// the smallest index comes first.
///
/// # Example
/// ```
/// # use ddolib::*;
/// let mut free = VarSet::all(4);
/// free.remove(Variable(0));
/// let next = DefaultVariableHeuristic.next_variable(&free, &mut std::iter::empty::<&usize>());
/// assert_eq!(Some(Variable(1)), next);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultVariableHeuristic;
impl <X> VariableHeuristic<X> for DefaultVariableHeuristic {
    fn next_variable(&self, free: &VarSet, _: &mut dyn Iterator<Item = &X>) -> Option<Variable> {
        free.iter().next()
    }
}
