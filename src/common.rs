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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use std::{cmp::Ordering, sync::Arc};

use bit_set::BitSet;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable from the optimization problem at hand.
/// In this case, each variable is assumed to be identified with an integer
/// ranging from 0 until `problem.nb_variables()`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub usize);
impl Variable {
    #[inline]
    /// This function returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use ddolib::Variable;
    /// assert_eq!(0, Variable(0).id());
    /// assert_eq!(3, Variable(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- DECISION ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This denotes a decision that was made during the search. It affects a given
/// `value` to the specified `variable`. Any given `Decision` should be
/// understood as ```[[ variable = value ]]````
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Decision {
    pub variable : Variable,
    pub value    : isize
}

// ----------------------------------------------------------------------------
// --- VARSET -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The set of variables which have not been assigned yet in some (sub)problem.
/// This is what the variable heuristic chooses from, and what the fast bounds
/// are told about the remaining part of the problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarSet(BitSet);
impl VarSet {
    /// Creates a set comprising all the variables `0..n`
    ///
    /// # Examples:
    /// ```
    /// # use ddolib::{VarSet, Variable};
    /// let vs = VarSet::all(3);
    /// assert_eq!(3, vs.len());
    /// assert!(vs.contains(Variable(2)));
    /// assert!(!vs.contains(Variable(3)));
    /// ```
    pub fn all(n: usize) -> Self {
        let mut set = BitSet::with_capacity(n);
        for i in 0..n {
            set.insert(i);
        }
        VarSet(set)
    }
    /// Creates an empty set of variables
    pub fn empty() -> Self {
        VarSet(BitSet::new())
    }
    /// Adds the given variable to the set
    pub fn add(&mut self, var: Variable) {
        self.0.insert(var.id());
    }
    /// Removes the given variable from the set
    pub fn remove(&mut self, var: Variable) {
        self.0.remove(var.id());
    }
    /// Returns true iff the variable belongs to this set
    pub fn contains(&self, var: Variable) -> bool {
        self.0.contains(var.id())
    }
    /// The number of variables in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns true iff no variable is left in the set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Iterates over the variables of the set in increasing order
    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        self.0.iter().map(Variable)
    }
}

// ----------------------------------------------------------------------------
// --- SENSE ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The direction of the optimization.
///
/// Internally, the whole engine maximizes. Minimizing a model is achieved by
/// orienting all the values it produces (that is, negating them) before they
/// enter the engine, and orienting them back before they are reported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sense {
    Maximize,
    Minimize,
}
impl Sense {
    /// Converts a value between the user's space and the (maximizing) internal
    /// space. The operation is its own inverse.
    ///
    /// # Examples:
    /// ```
    /// # use ddolib::Sense;
    /// assert_eq!(4.0, Sense::Maximize.orient(4.0));
    /// assert_eq!(-4.0, Sense::Minimize.orient(4.0));
    /// assert_eq!(4.0, Sense::Minimize.orient(Sense::Minimize.orient(4.0)));
    /// ```
    #[inline]
    pub fn orient(self, value: f64) -> f64 {
        match self {
            Sense::Maximize => value,
            Sense::Minimize => -value,
        }
    }
    /// Returns true iff `a` is strictly better than `b` (both in user space)
    #[inline]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.orient(a) > self.orient(b)
    }
    /// The worst possible value in user space
    pub fn worst(self) -> f64 {
        self.orient(f64::NEG_INFINITY)
    }
}

// ----------------------------------------------------------------------------
// --- SUBPROBLEM -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A subproblem is a residual problem that must be solved in order to complete the
/// resolution of the original problem which had been defined.
///
/// # Note:
/// Subproblems are automatically instanciated from nodes in the exact custsets
/// of relaxed decision diagrams. If you are only discovering the API, rest
/// assured.. you don't need to implement any subproblem yourself.
///
/// All the values of a subproblem are expressed in the internal (maximizing)
/// space of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SubProblem<T> {
    /// The root state of this sub problem
    pub state: Arc<T>,
    /// The root value of this sub problem
    pub value: f64,
    /// The path to traverse to reach this subproblem from the root
    /// of the original problem
    pub path: Vec<Decision>,
    /// An upper bound on the objective reachable in this subproblem
    pub ub: f64,
    /// The depth of the subproblem with respect to the root problem
    pub depth: usize,
}
impl <T> SubProblem<T> {
    /// The variables that are still free in this subproblem, given that the
    /// complete problem has `nb_variables` variables
    pub fn free_variables(&self, nb_variables: usize) -> VarSet {
        let mut free = VarSet::all(nb_variables);
        for d in self.path.iter() {
            free.remove(d.variable);
        }
        free
    }
}

// ----------------------------------------------------------------------------
// --- THRESHOLD --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A threshold is a value that can be stored during the execution of a branch
/// and bound algorithm. It is associated with a single exact state and is used
/// to determine whether a new node with the same state is worth exploring.
///
/// Thresholds are totally ordered: first on their value, then on the explored
/// flag (an explored threshold is tighter than an unexplored one).
#[derive(Debug, Copy, Clone)]
pub struct Threshold {
    /// The value of the threshold
    pub value: f64,
    /// Whether a node with the given value has already been explored
    pub explored: bool,
}
impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Threshold {}
impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
            .then_with(|| self.explored.cmp(&other.explored))
    }
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why the development of an mdd (and hence the whole
/// search) had to be interrupted. All of these denote a broken contract on
/// the part of the model, and can only be detected when a debug level is set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Reason {
    /// Applying the same decision twice to a state yielded two different states
    #[error("transition is not deterministic: applying {decision:?} to {state} gave {first} then {second}")]
    NonDeterministicTransition {
        state: String,
        decision: Decision,
        first: String,
        second: String,
    },
    /// The fast upper bound of a node underestimates the best completion of that node
    #[error("fast upper bound of {state} (depth {depth}) is not admissible: {bound} < {actual}")]
    InadmissibleBound {
        state: String,
        depth: usize,
        bound: f64,
        actual: f64,
    },
    /// A merged node has a worse best completion than one of the nodes it absorbed
    #[error("relaxation is unsound: merged node {merged} is worth {relaxed} but absorbed {state} is worth {exact}")]
    UnsoundRelaxation {
        merged: String,
        state: String,
        relaxed: f64,
        exact: f64,
    },
}

/// The outcome of an mdd development
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// is the given solution exact (proved optimal for the given [sub-]problem)?
    /// or is it an approximation ?
    pub is_exact: bool,
    /// if present the value of the best solution derived from this mdd
    pub best_value: Option<f64>,
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
