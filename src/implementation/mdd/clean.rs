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

//! This module provides the decision diagram compiler. It is a vector based
//! layered mdd which implements all the pruning techniques of the engine: the
//! rough upper bound (RUB), the local bounds (LocB), the exact best path
//! optimization (EBPO) as well as the cache and dominance based filtering.
//!
//! All the values handled here live in the internal (maximizing) space of
//! the engine.

use std::{collections::{hash_map::Entry, BTreeMap}, fmt::Debug, hash::Hash, sync::Arc};

use fxhash::FxHashMap;
use log::trace;

use crate::{CompilationInput, CompilationType, Completion, CutsetType, DebugLevel, Decision, DecisionDiagram,
    DominanceCheckResult, EmptyCache, EmptyDominanceChecker, LayerNode, Problem, Reason, ReductionStrategy,
    Solution, SubProblem, VarSet, VizConfig};

use super::node_flags::NodeFlags;
use super::viz::extreme;

/// The identifier of a node: it indicates the position of the referenced node
/// in the 'nodes' vector of the mdd structure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct NodeId(usize);

/// The identifier of an edge: it indicates the position of the referenced edge
/// in the 'edges' vector of the mdd structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeId(usize);

/// The identifier of an edge list: it indicates the position of an edge list
/// in the 'edgelists' vector of the mdd structure.
#[derive(Debug, Clone, Copy)]
struct EdgesListId(usize);

/// The identifier of a layer: it indicates the position of the referenced layer
/// in the 'layers' vector of the mdd structure.
#[derive(Debug, Clone, Copy)]
struct LayerId(usize);

/// Represents an effective node from the decision diagram
#[derive(Debug, Clone)]
struct Node<T> {
    /// The state associated to this node
    state: Arc<T>,
    /// The length of the longest path between the problem root and this
    /// specific node
    value_top: f64,
    /// The length of the longest path between this node and the terminal layer.
    /// It is only populated once the mdd has been fully unrolled.
    value_bot: f64,
    /// The identifier of the last edge on the longest path between the problem
    /// root and this node if it exists.
    best: Option<EdgeId>,
    /// The head of the list of edges entering this node
    inbound: EdgesListId,
    /// The rough upper bound associated to this node (+inf until the node
    /// is expanded)
    rub: f64,
    /// The value below which a node having the same state cannot improve on
    /// the best known solution
    theta: Option<f64>,
    flags: NodeFlags,
    /// The number of decisions that have been made since the problem root
    depth: usize,
}

/// Materializes one edge a.k.a arc from the decision diagram. It logically
/// connects two nodes and annotates the link with a decision and a cost.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    from: NodeId,
    to: NodeId,
    decision: Decision,
    cost: f64,
}

/// Represents a 'node' in the linked list that forms the adjacent edges list for a node
#[derive(Debug, Clone, Copy)]
enum EdgesList {
    Cons { head: EdgeId, tail: EdgesListId },
    Nil,
}

/// Represents a 'layer' in the decision diagram: the nodes of a layer form
/// a contiguous range in the 'nodes' vector.
#[derive(Debug, Clone, Copy)]
struct Layer {
    from: usize,
    to: usize,
}

/// The decision diagram in itself. This structure essentially keeps track
/// of the nodes composing the diagam as well as the edges connecting these
/// nodes in two vectors (enabling preallocation and good cache locality).
/// In addition to that, it also keeps track of the path (root_pa) from the
/// problem root to the root of this decision diagram (explores a sub problem).
///
/// The very same structure is used to compile exact, restricted and relaxed
/// dds. The type of cut-set which is computed for relaxed dds is chosen at
/// compile time through the `CompilationInput`.
#[derive(Debug, Clone)]
pub struct Mdd<T>
where
    T: Eq + Hash + Clone,
{
    /// The structure of all the layers of this decision diagram
    layers: Vec<Layer>,
    /// All the nodes composing this decision diagram, layer after layer
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
    edgelists: Vec<EdgesList>,
    /// The nodes from the next layer; those are the result of an application
    /// of the transition function to a node of the current layer. It is
    /// indexed on the states so that two transitions to the same state in
    /// the same layer lead to the same node.
    next_l: FxHashMap<Arc<T>, NodeId>,
    /// The variables that have not been branched on yet
    free: VarSet,
    /// Keeps track of the decisions that have been taken to reach the root
    /// of this DD, starting from the problem root.
    path_to_root: Vec<Decision>,
    /// The identifier of the last exact layer (should this dd be inexact)
    lel: Option<LayerId>,
    /// The cutset of the decision diagram (only maintained for relaxed dd)
    cutset: Vec<NodeId>,
    /// The identifier of the best terminal node of the diagram (None when the
    /// problem compiled into this dd is infeasible)
    best_node: Option<NodeId>,
    /// The identifier of the best exact terminal node of the diagram
    best_exact_node: Option<NodeId>,
    /// A flag set to true when no reduction occurred, or when the longest r-t
    /// path of this relaxed dd traverses no merged node (EBPO).
    is_exact: bool,
}

const NIL: EdgesListId = EdgesListId(0);

/// Relative tolerance used by the debug checks comparing floating point values
const TOLERANCE: f64 = 1e-9;

// Tech note: these macros make it possible to touch distinct parts of the
// dd without fighting the borrow checker

/// These macro retrieve an element of the dd by its id
macro_rules! get {
    (    node     $id:expr, $dd:expr) => {&    $dd.nodes   [$id.0]};
    (mut node     $id:expr, $dd:expr) => {&mut $dd.nodes   [$id.0]};
    (    edge     $id:expr, $dd:expr) => {&    $dd.edges   [$id.0]};
    (    edgelist $id:expr, $dd:expr) => {&    $dd.edgelists[$id.0]};
    (    layer    $id:expr, $dd:expr) => {&    $dd.layers  [$id.0]};
}

/// This macro performs an action for each edge of a given node in the dd
macro_rules! foreach {
    (edge of $id:expr, $dd:expr, $action:expr) => {
        let mut list = get!(node $id, $dd).inbound;
        while let EdgesList::Cons{head, tail} = *get!(edgelist list, $dd) {
            let edge = *get!(edge head, $dd);
            $action(edge);
            list = tail;
        }
    };
}

/// This macro appends an edge to the list of edges adjacent to a given node
macro_rules! append_edge_to {
    ($dd:expr, $id:expr, $edge:expr) => {
        let new_eid = EdgeId($dd.edges.len());
        let lst_id  = EdgesListId($dd.edgelists.len());
        $dd.edges.push($edge);
        $dd.edgelists.push(EdgesList::Cons { head: new_eid, tail: get!(node $id, $dd).inbound });

        let parent = get!(node $edge.from, $dd);
        let parent_exact = parent.flags.is_exact();
        let value = parent.value_top + $edge.cost;

        let node = get!(mut node $id, $dd);
        let exact = parent_exact & node.flags.is_exact();
        node.flags.set_exact(exact);
        node.inbound = lst_id;

        if value >= node.value_top {
            node.best = Some(new_eid);
            node.value_top = value;
        }
    };
}

/// True iff `a` is strictly greater than `b`, up to the comparison tolerance
fn exceeds(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        a > b
    } else {
        a > b + TOLERANCE * 1.0_f64.max(a.abs()).max(b.abs())
    }
}

/// Computes `best - delta` where a missing completion (delta = -inf) means
/// that no value can ever beat `best`.
fn room(best: f64, delta: f64) -> f64 {
    if delta == f64::NEG_INFINITY {
        f64::INFINITY
    } else {
        best - delta
    }
}

impl<T> Default for Mdd<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecisionDiagram<T> for Mdd<T>
where
    T: Debug + Eq + Hash + Clone,
{
    fn compile(&mut self, input: &CompilationInput<T>) -> Result<Completion, Reason> {
        self._compile(input)
    }

    fn is_exact(&self) -> bool {
        self.is_exact
    }

    fn best_value(&self) -> Option<f64> {
        self.best_node.map(|id| get!(node id, self).value_top)
    }

    fn best_solution(&self) -> Option<Solution> {
        self.best_node.map(|id| self._best_path(id))
    }

    fn best_exact_value(&self) -> Option<f64> {
        self.best_exact_node.map(|id| get!(node id, self).value_top)
    }

    fn best_exact_solution(&self) -> Option<Solution> {
        self.best_exact_node.map(|id| self._best_path(id))
    }

    fn drain_cutset<F>(&mut self, func: F)
    where
        F: FnMut(SubProblem<T>),
    {
        self._drain_cutset(func)
    }
}

impl<T> Mdd<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            layers: vec![],
            nodes: vec![],
            edges: vec![],
            edgelists: vec![],
            //
            next_l: Default::default(),
            free: VarSet::empty(),
            //
            path_to_root: vec![],
            lel: None,
            cutset: vec![],
            best_node: None,
            best_exact_node: None,
            is_exact: true,
        }
    }

    fn _clear(&mut self) {
        self.layers.clear();
        self.nodes.clear();
        self.edges.clear();
        self.edgelists.clear();
        self.next_l.clear();
        self.free = VarSet::empty();
        self.path_to_root.clear();
        self.cutset.clear();
        self.lel = None;
        self.best_node = None;
        self.best_exact_node = None;
        self.is_exact = true;
    }

    fn _best_path(&self, id: NodeId) -> Vec<Decision> {
        Self::_best_path_partial_borrow(id, &self.path_to_root, &self.nodes, &self.edges)
    }

    fn _best_path_partial_borrow(
        id: NodeId,
        root_pa: &[Decision],
        nodes: &[Node<T>],
        edges: &[Edge],
    ) -> Vec<Decision> {
        let mut sol = root_pa.to_owned();
        let mut edge_id = nodes[id.0].best;
        while let Some(eid) = edge_id {
            let edge = edges[eid.0];
            sol.push(edge.decision);
            edge_id = nodes[edge.from.0].best;
        }
        sol
    }

    /// The nodes of the layer which are still part of the dd
    fn _alive(&self, layer: LayerId) -> impl Iterator<Item = NodeId> + '_ {
        let Layer { from, to } = *get!(layer layer, self);
        (from..to).map(NodeId).filter(move |id| get!(node id, self).flags.is_alive())
    }
}

impl<T> Mdd<T>
where
    T: Debug + Eq + Hash + Clone,
{
    fn _compile(&mut self, input: &CompilationInput<T>) -> Result<Completion, Reason> {
        self._clear();
        self._initialize(input);

        let mut curr_l = vec![];
        loop {
            let var = input.var_heuristic.next_variable(&self.free, &mut self.next_l.keys().map(|s| s.as_ref()));

            if !self._move_to_next_layer(input, &mut curr_l)? {
                break;
            }
            // the layer we just moved to is the terminal one
            let Some(var) = var else {
                break;
            };

            let mut fault = None;
            for node_id in curr_l.iter().copied() {
                let state = get!(node node_id, self).state.clone();
                let rub = input.relaxation.fast_upper_bound(state.as_ref(), &self.free);
                let node = get!(mut node node_id, self);
                node.rub = rub;
                if node.value_top + rub <= input.best_lb {
                    continue;
                }

                input.problem.for_each_in_domain(var, state.as_ref(), &mut |decision: Decision| {
                    if fault.is_none() {
                        fault = self._branch_on(node_id, decision, input).err();
                    }
                });
                if let Some(reason) = fault.take() {
                    return Err(reason);
                }
            }
            self.free.remove(var);
        }

        self._finalize(input)?;

        Ok(Completion {
            is_exact: self.is_exact,
            best_value: self.best_node.map(|n| get!(node n, self).value_top),
        })
    }

    fn _initialize(&mut self, input: &CompilationInput<T>) {
        self.path_to_root.extend_from_slice(&input.residual.path);
        self.free = input.residual.free_variables(input.problem.nb_variables());
        self.edgelists.push(EdgesList::Nil);

        let root_node_id = NodeId(0);
        let root_node = Node {
            state: input.residual.state.clone(),
            value_top: input.residual.value,
            value_bot: f64::NEG_INFINITY,
            best: None,
            inbound: NIL,
            rub: input.residual.ub,
            theta: None,
            flags: NodeFlags::new_exact(),
            depth: input.residual.depth,
        };

        self.nodes.push(root_node);
        self.next_l.insert(input.residual.state.clone(), root_node_id);
    }

    fn _finalize(&mut self, input: &CompilationInput<T>) -> Result<(), Reason> {
        self._find_best_nodes();
        self._finalize_exact(input);
        self._finalize_cutset(input);
        self._compute_local_bounds(input);
        self._check_bounds(input)?;
        self._compute_thresholds(input);
        Ok(())
    }

    fn _drain_cutset<F>(&mut self, mut func: F)
    where
        F: FnMut(SubProblem<T>),
    {
        if let Some(best_value) = self.best_node.map(|id| get!(node id, self).value_top) {
            for id in self.cutset.drain(..) {
                let node = get!(node id, self);

                if node.flags.is_marked() {
                    let rub  = node.value_top + node.rub;
                    let locb = node.value_top + node.value_bot;
                    let ub = rub.min(locb).min(best_value);

                    func(SubProblem {
                        state: node.state.clone(),
                        value: node.value_top,
                        path: Self::_best_path_partial_borrow(
                            id,
                            &self.path_to_root,
                            &self.nodes,
                            &self.edges,
                        ),
                        ub,
                        depth: node.depth,
                    })
                }
            }
        }
    }

    fn _find_best_nodes(&mut self) {
        if let Some(last) = self.layers.len().checked_sub(1) {
            let mut best: Option<NodeId> = None;
            let mut best_exact: Option<NodeId> = None;
            for id in self._alive(LayerId(last)) {
                let node = get!(node id, self);
                if best.map_or(true, |b| node.value_top >= get!(node b, self).value_top) {
                    best = Some(id);
                }
                if node.flags.is_exact() && best_exact.map_or(true, |b| node.value_top >= get!(node b, self).value_top) {
                    best_exact = Some(id);
                }
            }
            self.best_node = best;
            self.best_exact_node = best_exact;
        }
    }

    fn _finalize_exact(&mut self, input: &CompilationInput<T>) {
        self.is_exact = self.lel.is_none()
            || (input.comp_type == CompilationType::Relaxed && self._has_exact_best_path(self.best_node));
    }

    fn _has_exact_best_path(&self, node: Option<NodeId>) -> bool {
        let mut current = node;
        while let Some(id) = current {
            let n = get!(node id, self);
            if n.flags.is_exact() {
                return true;
            }
            if n.flags.is_relaxed() {
                return false;
            }
            current = n.best.map(|e| get!(edge e, self).from);
        }
        true
    }

    fn _finalize_cutset(&mut self, input: &CompilationInput<T>) {
        if input.comp_type == CompilationType::Relaxed {
            if let Some(lel) = self.lel {
                match input.cutset_type {
                    CutsetType::LastExactLayer => self._compute_last_exact_layer_cutset(lel),
                    CutsetType::Frontier => self._compute_frontier_cutset(lel),
                }
            }
        }
    }

    fn _compute_last_exact_layer_cutset(&mut self, lel: LayerId) {
        let cutset = self._alive(lel).collect::<Vec<_>>();
        for id in cutset.iter() {
            get!(mut node id, self).flags.set_cutset(true);
        }
        self.cutset = cutset;
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_frontier_cutset(&mut self, lel: LayerId) {
        // traverse bottom-up
        for Layer { from, to } in self.layers.iter().skip(lel.0).rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(node id, self);

                if node.flags.is_alive() && !node.flags.is_exact() {
                    foreach!(edge of id, self, |edge: Edge| {
                        let parent = get!(mut node edge.from, self);
                        if parent.flags.is_exact() && !parent.flags.is_cutset() {
                            self.cutset.push(edge.from);
                            parent.flags.set_cutset(true);
                        }
                    });
                }
            }
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_local_bounds(&mut self, input: &CompilationInput<T>) {
        if input.comp_type == CompilationType::Relaxed || input.debug != DebugLevel::Off {
            let Some(last) = self.layers.len().checked_sub(1) else {
                return;
            };
            let terminal = self._alive(LayerId(last)).collect::<Vec<_>>();
            for id in terminal {
                let node = get!(mut node id, self);
                node.value_bot = 0.0;
                node.flags.set_marked(true);
            }

            // traverse bottom-up
            for Layer { from, to } in self.layers.iter().rev().copied() {
                for id in from..to {
                    let id = NodeId(id);
                    let node = get!(node id, self);
                    let value = node.value_bot;
                    if node.flags.is_marked() {
                        foreach!(edge of id, self, |edge: Edge| {
                            let using_edge = value + edge.cost;
                            let parent = get!(mut node edge.from, self);
                            parent.flags.set_marked(true);
                            parent.value_bot = parent.value_bot.max(using_edge);
                        });
                    }
                }
            }
        }
    }

    /// Checks that no rough upper bound underestimates the longest path
    /// below its node. Only exact and restricted dds are checked since the
    /// edges of a relaxed dd over-approximate.
    fn _check_bounds(&self, input: &CompilationInput<T>) -> Result<(), Reason> {
        if input.debug >= DebugLevel::On && input.comp_type != CompilationType::Relaxed {
            for node in self.nodes.iter() {
                if node.flags.is_alive() && node.flags.is_marked() && exceeds(node.value_bot, node.rub) {
                    return Err(Reason::InadmissibleBound {
                        state: format!("{:?}", node.state),
                        depth: node.depth,
                        bound: node.rub,
                        actual: node.value_bot,
                    });
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_thresholds(&mut self, input: &CompilationInput<T>) {
        if input.comp_type == CompilationType::Relaxed || self.is_exact {
            let mut best_known = input.best_lb;

            if let Some(best_exact_node) = self.best_exact_node {
                best_known = best_known.max(get!(node best_exact_node, self).value_top);

                let last = LayerId(self.layers.len() - 1);
                let terminal = self._alive(last).collect::<Vec<_>>();
                for id in terminal {
                    let node = get!(mut node id, self);
                    if node.flags.is_exact() {
                        node.theta = Some(best_known);
                    }
                }
            }

            self._mark_above_cutset(input);

            for Layer { from, to } in self.layers.iter().rev().copied() {
                for id in from..to {
                    let id = NodeId(id);
                    let node = get!(mut node id, self);

                    if node.flags.is_deleted() {
                        continue;
                    }

                    // pruned nodes already know their threshold, yet it must be propagated
                    if !node.flags.is_pruned() {
                        let tot_rub = node.value_top + node.rub;
                        if tot_rub <= best_known {
                            node.theta = Some(room(best_known, node.rub));
                        } else if node.flags.is_cutset() {
                            let tot_locb = node.value_top + node.value_bot;
                            if tot_locb <= best_known {
                                let theta = node.theta.unwrap_or(f64::INFINITY);
                                node.theta = Some(theta.min(room(best_known, node.value_bot)));
                            } else {
                                node.theta = Some(node.value_top);
                            }
                        } else if node.flags.is_exact() && node.theta.is_none() {
                            // dangling node
                            node.theta = Some(f64::INFINITY);
                        }
                    }
                    // a dominated node borrows the threshold of its dominator:
                    // saving it under its own state could prune the dominator
                    if !node.flags.is_pruned() {
                        Self::_maybe_update_cache(node, input);
                    }

                    if let Some(my_theta) = node.theta {
                        let borrowed = node.flags.is_pruned_by_dominance() || node.flags.has_dominance_theta();
                        foreach!(edge of id, self, |edge: Edge| {
                            let parent = get!(mut node edge.from, self);
                            let theta = parent.theta.unwrap_or(f64::INFINITY);
                            parent.theta = Some(theta.min(my_theta - edge.cost));
                            if borrowed {
                                parent.flags.set_dominance_theta(true);
                            }
                        });
                    }
                }
            }
        }
    }

    /// Flags the nodes whose threshold may be remembered: those which belong
    /// to the cutset or lie above it.
    fn _mark_above_cutset(&mut self, input: &CompilationInput<T>) {
        match self.lel {
            Some(lel) if input.comp_type == CompilationType::Relaxed && input.cutset_type == CutsetType::LastExactLayer => {
                let Layer { to, .. } = *get!(layer lel, self);
                for node in self.nodes[..to].iter_mut() {
                    if !node.flags.is_deleted() {
                        node.flags.set_above_cutset(true);
                    }
                }
            },
            _ => {
                for node in self.nodes.iter_mut() {
                    if !node.flags.is_deleted() && node.flags.is_exact() {
                        node.flags.set_above_cutset(true);
                    }
                }
            }
        }
    }

    fn _maybe_update_cache(node: &Node<T>, input: &CompilationInput<T>) {
        if let Some(theta) = node.theta {
            if node.flags.is_above_cutset() {
                input.cache.update_threshold(
                    node.state.clone(),
                    node.depth,
                    theta,
                    // a cutset node has not been explored yet
                    !node.flags.is_cutset() && !node.flags.has_dominance_theta())
            }
        }
    }

    fn _move_to_next_layer(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) -> Result<bool, Reason> {
        curr_l.clear();
        curr_l.extend(self.next_l.drain().map(|(_, id)| id));
        curr_l.sort_unstable_by_key(|id| id.0);

        if !self.layers.is_empty() {
            self._filter_with_cache(input, curr_l);
        }
        self._filter_with_dominance(input, curr_l);

        if !curr_l.is_empty() {
            self._squash_if_needed(input, curr_l)?;
        }

        let from = self.layers.last().map_or(0, |l| l.to);
        self.layers.push(Layer { from, to: self.nodes.len() });
        trace!("layer {} holds {} nodes", self.layers.len() - 1, curr_l.len());

        Ok(!curr_l.is_empty())
    }

    fn _filter_with_cache(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            match input.cache.get_threshold(node.state.as_ref(), node.depth) {
                Some(threshold) if node.value_top <= threshold.value => {
                    node.flags.set_pruned_by_cache(true);
                    node.theta = Some(threshold.value);
                    false
                },
                _ => true,
            }
        });
    }

    fn _filter_with_dominance(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        curr_l.sort_unstable_by(|a, b| {
            let a = get!(node a, self);
            let b = get!(node b, self);
            b.value_top.total_cmp(&a.value_top)
                .then_with(|| input.ranking.compare(b.state.as_ref(), a.state.as_ref()))
        });
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            if node.flags.is_exact() {
                let DominanceCheckResult { dominated, threshold } =
                    input.dominance.is_dominated_or_insert(node.state.clone(), node.depth, node.value_top);
                if dominated {
                    node.flags.set_pruned_by_dominance(true);
                    node.theta = threshold;
                }
                !dominated
            } else {
                true
            }
        });
    }

    fn _branch_on(
        &mut self,
        from_id: NodeId,
        decision: Decision,
        input: &CompilationInput<T>,
    ) -> Result<(), Reason> {
        let state = get!(node from_id, self).state.clone();
        let next_state = Arc::new(input.problem.transition(state.as_ref(), decision));
        if input.debug >= DebugLevel::On {
            Self::_check_determinism(input.problem, state.as_ref(), decision, next_state.as_ref())?;
        }
        let cost = input.problem.transition_cost(state.as_ref(), decision);

        match self.next_l.entry(next_state.clone()) {
            Entry::Vacant(e) => {
                let parent = get!(node from_id, self);
                let node_id = NodeId(self.nodes.len());
                let mut flags = NodeFlags::new_exact();
                flags.set_exact(parent.flags.is_exact());

                self.nodes.push(Node {
                    state: next_state,
                    value_top: parent.value_top + cost,
                    value_bot: f64::NEG_INFINITY,
                    //
                    best: None,
                    inbound: NIL,
                    //
                    rub: f64::INFINITY,
                    theta: None,
                    flags,
                    depth: parent.depth + 1,
                });
                append_edge_to!(self, node_id, Edge {
                    from: from_id,
                    to  : node_id,
                    decision,
                    cost,
                });
                e.insert(node_id);
            }
            Entry::Occupied(e) => {
                let node_id = *e.get();
                append_edge_to!(self, node_id, Edge {
                    from: from_id,
                    to  : node_id,
                    decision,
                    cost,
                });
            }
        }
        Ok(())
    }

    /// Applies the transition a second time and makes sure the outcome is
    /// the same state (with the same hash)
    fn _check_determinism(problem: &dyn Problem<State = T>, state: &T, decision: Decision, first: &T) -> Result<(), Reason> {
        let second = problem.transition(state, decision);
        if second != *first || fxhash::hash64(&second) != fxhash::hash64(first) {
            Err(Reason::NonDeterministicTransition {
                state: format!("{state:?}"),
                decision,
                first: format!("{first:?}"),
                second: format!("{second:?}"),
            })
        } else {
            Ok(())
        }
    }

    fn _squash_if_needed(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) -> Result<(), Reason> {
        let width = input.max_width.max(1);
        if curr_l.len() <= width {
            return Ok(());
        }
        match input.comp_type {
            CompilationType::Exact => { /* do nothing: you want to explore the complete DD */ }
            CompilationType::Restricted => {
                self._maybe_save_lel();
                self._restrict(input, curr_l, width);
            },
            CompilationType::Relaxed => {
                // the layer right below the root is never merged so that the
                // root never belongs to the cutset
                if self.layers.len() > 1 {
                    self._maybe_save_lel();
                    self._relax(input, curr_l, width)?;
                }
            },
        }
        Ok(())
    }

    fn _maybe_save_lel(&mut self) {
        if self.lel.is_none() {
            // lel was the previous layer
            self.lel = Some(LayerId(self.layers.len().saturating_sub(1)));
        }
    }

    /// Reorders the layer so that the nodes to keep come first
    fn _sort_layer(&self, input: &CompilationInput<T>, curr_l: &mut [NodeId], keep: usize) {
        let mut view = curr_l.iter()
            .map(|id| {
                let node = get!(node id, self);
                LayerNode { id: id.0, state: node.state.as_ref(), value: node.value_top }
            })
            .collect::<Vec<_>>();

        ReductionStrategy::sort_layer(input.reduction, &mut view, keep, input.ranking);

        for (slot, node) in curr_l.iter_mut().zip(view.iter()) {
            *slot = NodeId(node.id);
        }
    }

    fn _restrict(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>, width: usize) {
        self._sort_layer(input, curr_l, width);

        for drop_id in curr_l.iter().skip(width).copied() {
            get!(mut node drop_id, self).flags.set_deleted(true);
        }
        trace!("restriction dropped {} nodes", curr_l.len() - width);

        curr_l.truncate(width);
    }

    #[allow(clippy::redundant_closure_call)]
    fn _relax(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>, width: usize) -> Result<(), Reason> {
        self._sort_layer(input, curr_l, width - 1);

        let absorbed = curr_l[width - 1..].to_vec();
        let merged = Arc::new(input.relaxation.merge(&mut absorbed.iter().map(|id| get!(node id, self).state.as_ref())));

        let recycled = curr_l[..width - 1].iter().copied()
            .find(|id| get!(node id, self).state.as_ref() == merged.as_ref());

        let merged_id = match recycled {
            Some(id) => id,
            None => {
                let node_id = NodeId(self.nodes.len());
                let depth = get!(node absorbed[0], self).depth;
                self.nodes.push(Node {
                    state: merged.clone(),
                    value_top: f64::NEG_INFINITY,
                    value_bot: f64::NEG_INFINITY,
                    best: None,    // yet
                    inbound: NIL,  // yet
                    //
                    rub: f64::INFINITY,
                    theta: None,
                    flags: NodeFlags::new_relaxed(),
                    depth,
                });
                node_id
            }
        };

        get!(mut node merged_id, self).flags.set_relaxed(true);

        for drop_id in absorbed.iter().copied() {
            get!(mut node drop_id, self).flags.set_deleted(true);

            foreach!(edge of drop_id, self, |edge: Edge| {
                let src   = get!(node edge.from, self).state.as_ref();
                let dst   = get!(node edge.to,   self).state.as_ref();
                let rcost = input.relaxation.relax(src, dst, merged.as_ref(), edge.decision, edge.cost);

                append_edge_to!(self, merged_id, Edge {
                    from: edge.from,
                    to: merged_id,
                    decision: edge.decision,
                    cost: rcost
                });
            });
        }

        curr_l.truncate(width - 1);
        if recycled.is_none() {
            curr_l.push(merged_id);
        }
        trace!("relaxation merged {} nodes", absorbed.len());

        if input.debug >= DebugLevel::Extended {
            self._check_relaxation(input, merged_id, &absorbed)?;
        }
        Ok(())
    }

    /// Compiles the exact dds rooted at the merged node and at each absorbed
    /// node, and makes sure that the merged node is never worse than any of
    /// the nodes it stands for.
    fn _check_relaxation(&self, input: &CompilationInput<T>, merged_id: NodeId, absorbed: &[NodeId]) -> Result<(), Reason> {
        let relaxed = self._exact_completion(input, merged_id)?;
        for id in absorbed.iter().copied() {
            if let Some(exact) = self._exact_completion(input, id)? {
                if relaxed.map_or(true, |relaxed| exceeds(exact, relaxed)) {
                    return Err(Reason::UnsoundRelaxation {
                        merged: format!("{:?}", get!(node merged_id, self).state),
                        state: format!("{:?}", get!(node id, self).state),
                        relaxed: relaxed.unwrap_or(f64::NEG_INFINITY),
                        exact,
                    });
                }
            }
        }
        Ok(())
    }

    /// The value of the longest path traversing the given node in an exact
    /// dd rooted at that node
    fn _exact_completion(&self, input: &CompilationInput<T>, id: NodeId) -> Result<Option<f64>, Reason> {
        let node = get!(node id, self);
        let residual = SubProblem {
            state: node.state.clone(),
            value: node.value_top,
            path: self._best_path(id),
            ub: f64::INFINITY,
            depth: node.depth,
        };
        let exact = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: input.problem,
            relaxation: input.relaxation,
            ranking: input.ranking,
            var_heuristic: input.var_heuristic,
            reduction: input.reduction,
            cutset_type: input.cutset_type,
            max_width: usize::MAX,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::<T>::new();
        mdd.compile(&exact).map(|completion| completion.best_value)
    }
}

// ############################################################################
// #### GRAPHVIZ ##############################################################
// ############################################################################

impl<T> Mdd<T>
where
    T: Debug + Eq + Hash + Clone,
{
    /// Renders the last compiled dd in the graphviz 'dot' language. The text
    /// is not rendered to an image: pipe it through `dot` (or any other
    /// graphviz tool) once you are done tweaking it.
    pub fn as_graphviz(&self, config: &VizConfig) -> String {
        let mut out = String::new();

        out.push_str("digraph {\n\tranksep = 3;\n\n");

        for id in 0..self.nodes.len() {
            let node = get!(node NodeId(id), self);
            if !config.show_deleted && node.flags.is_deleted() {
                continue;
            }
            out.push_str(&self._viz_node(id, config));
            out.push_str(&self._viz_edges_of(id, config));
        }

        if config.show_deleted && config.group_merged {
            let mut merged_by_layer = BTreeMap::<usize, Vec<String>>::default();
            for node_id in 0..self.nodes.len() {
                let node = get!(node NodeId(node_id), self);
                if node.flags.is_deleted() || node.flags.is_relaxed() {
                    merged_by_layer.entry(node.depth).or_default().push(format!("{node_id}"));
                }
            }
            for (depth, merged) in merged_by_layer.iter() {
                out.push_str(&format!("\tsubgraph cluster_{depth} {{\n"));
                out.push_str("\t\tstyle=filled;\n");
                out.push_str("\t\tcolor=purple;\n");
                out.push_str(&format!("\t\t{}\n", merged.join(";")));
                out.push_str("\t};\n");
            }
        }

        out.push_str(&self._viz_terminal());
        out.push_str("}\n");
        out
    }

    fn _viz_node(&self, id: usize, config: &VizConfig) -> String {
        let node = &self.nodes[id];
        let merged = node.flags.is_relaxed();

        let shape = if merged || node.flags.is_deleted() { "square" } else { "circle" };
        let peripheries = if node.flags.is_cutset() { 4 } else { 1 };
        let color = if node.flags.is_cutset() {
            "red"
        } else if node.flags.is_exact() {
            "\"#99ccff\""
        } else if merged {
            "yellow"
        } else {
            "lightgray"
        };

        let mut label = format!("{:?}", node.state);
        if config.show_value {
            label.push_str(&format!("\\nval: {}", extreme(node.value_top)));
        }
        if config.show_locb {
            label.push_str(&format!("\\nlocb: {}", extreme(node.value_bot)));
        }
        if config.show_rub {
            label.push_str(&format!("\\nrub: {}", extreme(node.rub)));
        }
        if config.show_threshold {
            label.push_str(&format!("\\ntheta: {}", extreme(node.theta.unwrap_or(f64::INFINITY))));
        }

        format!("\t{id} [shape={shape},style=filled,color={color},peripheries={peripheries},label=\"{label}\"];\n")
    }

    #[allow(clippy::redundant_closure_call)]
    fn _viz_edges_of(&self, id: usize, config: &VizConfig) -> String {
        let mut out = String::new();
        let best = get!(node NodeId(id), self).best;
        let mut list = get!(node NodeId(id), self).inbound;
        while let EdgesList::Cons { head, tail } = *get!(edgelist list, self) {
            let Edge { from, to, decision, cost } = *get!(edge head, self);
            list = tail;
            if !config.show_deleted && get!(node from, self).flags.is_deleted() {
                continue;
            }
            let width = if Some(head) == best { 3 } else { 1 };
            let variable = decision.variable.id();
            let value = decision.value;
            out.push_str(&format!(
                "\t{} -> {} [penwidth={width},label=\"(x{variable} = {value})\\ncost = {}\"];\n",
                from.0, to.0, extreme(cost)));
        }
        out
    }

    fn _viz_terminal(&self) -> String {
        let mut out = String::new();
        if let Some(best) = self.best_node {
            out.push_str("\tterminal [shape=\"circle\", label=\"\", style=\"filled\", color=\"black\"];\n");
            let last = LayerId(self.layers.len() - 1);
            for id in self._alive(last) {
                let width = if id == best { 3 } else { 1 };
                out.push_str(&format!("\t{} -> terminal [penwidth={width}];\n", id.0));
            }
        }
        out
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_mdd {
    use std::{cell::Cell, cmp::Ordering, sync::Arc};

    use crate::*;
    use super::Mdd;

    /// A 0/1 knapsack whose state is the remaining capacity
    struct Knapsack {
        capacity: usize,
        profit: Vec<f64>,
        weight: Vec<usize>,
    }
    impl Knapsack {
        fn scenario() -> Self {
            Knapsack {
                capacity: 10,
                profit: vec![2.0, 3.0, 6.0, 6.0, 1.0],
                weight: vec![4, 6, 4, 2, 5],
            }
        }
        fn larger() -> Self {
            Knapsack {
                capacity: 23,
                profit: vec![12.0, 7.0, 9.0, 4.0, 11.0, 6.0, 8.0, 3.0, 10.0, 5.0],
                weight: vec![7, 4, 6, 2, 8, 3, 5, 1, 7, 4],
            }
        }
        fn brute_force(&self) -> f64 {
            let n = self.profit.len();
            (0..(1_usize << n))
                .filter(|set| (0..n).filter(|i| set & (1 << i) != 0).map(|i| self.weight[i]).sum::<usize>() <= self.capacity)
                .map(|set| (0..n).filter(|i| set & (1 << i) != 0).map(|i| self.profit[i]).sum::<f64>())
                .fold(f64::NEG_INFINITY, f64::max)
        }
        fn evaluate(&self, solution: &[Decision]) -> Option<f64> {
            let mut weight = 0;
            let mut profit = 0.0;
            for d in solution.iter() {
                if d.value == 1 {
                    weight += self.weight[d.variable.id()];
                    profit += self.profit[d.variable.id()];
                }
            }
            if weight <= self.capacity { Some(profit) } else { None }
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
        fn transition(&self, state: &usize, decision: Decision) -> usize {
            if decision.value == 1 { state - self.weight[decision.variable.id()] } else { *state }
        }
        fn transition_cost(&self, _: &usize, decision: Decision) -> f64 {
            if decision.value == 1 { self.profit[decision.variable.id()] } else { 0.0 }
        }
        fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
            f.apply(Decision { variable: var, value: 0 });
            if *state >= self.weight[var.id()] {
                f.apply(Decision { variable: var, value: 1 });
            }
        }
    }

    struct KnapsackRelax<'a>(&'a Knapsack);
    impl Relaxation for KnapsackRelax<'_> {
        type State = usize;

        fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
            states.copied().max().unwrap_or(0)
        }
        fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
            cost
        }
        fn fast_upper_bound(&self, _: &usize, remaining: &VarSet) -> f64 {
            remaining.iter().map(|v| self.0.profit[v.id()]).sum()
        }
    }

    struct KnapsackRanking;
    impl StateRanking for KnapsackRanking {
        type State = usize;

        fn compare(&self, a: &usize, b: &usize) -> Ordering {
            a.cmp(b)
        }
    }

    /// A knapsack state dominates another one when it has more room left
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

    fn root(pb: &Knapsack) -> SubProblem<usize> {
        SubProblem {
            state: Arc::new(pb.initial_state()),
            value: pb.initial_value(),
            path: vec![],
            ub: f64::INFINITY,
            depth: 0,
        }
    }

    fn compile(
        pb: &Knapsack,
        comp_type: CompilationType,
        cutset_type: CutsetType,
        max_width: usize,
        cache: &dyn Cache<usize>,
        dominance: &dyn DominanceChecker<usize>,
    ) -> (Mdd<usize>, Completion) {
        let relax = KnapsackRelax(pb);
        let residual = root(pb);
        let input = CompilationInput {
            comp_type,
            problem: pb,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type,
            max_width,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache,
            dominance,
            debug: DebugLevel::On,
        };
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();
        (mdd, completion)
    }

    fn plain(pb: &Knapsack, comp_type: CompilationType, cutset_type: CutsetType, max_width: usize) -> (Mdd<usize>, Completion) {
        compile(pb, comp_type, cutset_type, max_width, &EmptyCache, &EmptyDominanceChecker)
    }

    fn alive_width(mdd: &Mdd<usize>, layer: usize) -> usize {
        let super::Layer { from, to } = mdd.layers[layer];
        (from..to).filter(|id| mdd.nodes[*id].flags.is_alive()).count()
    }

    #[test]
    fn exact_dd_finds_the_optimum() {
        let pb = Knapsack::scenario();
        let (mdd, completion) = plain(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1);

        assert!(completion.is_exact);
        assert!(mdd.is_exact());
        assert_eq!(Some(14.0), completion.best_value);
        assert_eq!(Some(pb.brute_force()), mdd.best_value());
        let solution = mdd.best_solution().unwrap();
        assert_eq!(pb.nb_variables(), solution.len());
        assert_eq!(Some(14.0), pb.evaluate(&solution));
        assert_eq!(mdd.best_value(), mdd.best_exact_value());
    }

    #[test]
    fn restricted_dd_yields_a_feasible_lower_bound() {
        let pb = Knapsack::larger();
        let optimum = pb.brute_force();
        for width in 1..6 {
            let (mdd, _) = plain(&pb, CompilationType::Restricted, CutsetType::LastExactLayer, width);
            let value = mdd.best_value().unwrap();
            assert!(value <= optimum);
            assert_eq!(Some(value), pb.evaluate(&mdd.best_solution().unwrap()));
        }
    }

    #[test]
    fn relaxed_dd_never_underestimates_the_optimum() {
        let pb = Knapsack::larger();
        let optimum = pb.brute_force();
        for width in 1..6 {
            for cutset in [CutsetType::LastExactLayer, CutsetType::Frontier] {
                let (mdd, _) = plain(&pb, CompilationType::Relaxed, cutset, width);
                assert!(mdd.best_value().unwrap() >= optimum);
            }
        }
    }

    #[test]
    fn layers_comply_with_the_maximum_width() {
        let pb = Knapsack::larger();
        for width in 1..6 {
            let (mdd, _) = plain(&pb, CompilationType::Restricted, CutsetType::LastExactLayer, width);
            for layer in 0..mdd.layers.len() {
                assert!(alive_width(&mdd, layer) <= width);
            }
            let (mdd, _) = plain(&pb, CompilationType::Relaxed, CutsetType::LastExactLayer, width);
            for layer in 2..mdd.layers.len() {
                assert!(alive_width(&mdd, layer) <= width);
            }
        }
    }

    #[test]
    fn the_optimum_goes_through_the_cutset() {
        let pb = Knapsack::larger();
        let optimum = pb.brute_force();
        for cutset_type in [CutsetType::LastExactLayer, CutsetType::Frontier] {
            let (mut mdd, completion) = plain(&pb, CompilationType::Relaxed, cutset_type, 3);
            assert!(!completion.is_exact);

            let mut cutset = vec![];
            mdd.drain_cutset(|sub| cutset.push(sub));
            assert!(!cutset.is_empty());

            let mut best = f64::NEG_INFINITY;
            for sub in cutset.iter() {
                assert!(sub.ub >= sub.value);
                let relax = KnapsackRelax(&pb);
                let input = CompilationInput {
                    comp_type: CompilationType::Exact,
                    problem: &pb,
                    relaxation: &relax,
                    ranking: &KnapsackRanking,
                    var_heuristic: &DefaultVariableHeuristic,
                    reduction: &CostBased,
                    cutset_type,
                    max_width: usize::MAX,
                    residual: sub,
                    best_lb: f64::NEG_INFINITY,
                    cache: &EmptyCache,
                    dominance: &EmptyDominanceChecker,
                    debug: DebugLevel::Off,
                };
                let mut exact = Mdd::new();
                let value = exact.compile(&input).unwrap().best_value.unwrap();
                assert!(value <= sub.ub);
                assert_eq!(Some(value), pb.evaluate(&exact.best_solution().unwrap()));
                best = best.max(value);
            }
            assert_eq!(optimum, best);
        }
    }

    #[test]
    fn the_cutset_can_only_be_drained_once() {
        let pb = Knapsack::larger();
        let (mut mdd, _) = plain(&pb, CompilationType::Relaxed, CutsetType::Frontier, 2);
        let mut count = 0;
        mdd.drain_cutset(|_| count += 1);
        assert!(count > 0);
        count = 0;
        mdd.drain_cutset(|_| count += 1);
        assert_eq!(0, count);
    }

    #[test]
    fn the_root_never_belongs_to_the_cutset() {
        let pb = Knapsack::larger();
        for cutset_type in [CutsetType::LastExactLayer, CutsetType::Frontier] {
            let (mut mdd, _) = plain(&pb, CompilationType::Relaxed, cutset_type, 1);
            mdd.drain_cutset(|sub| assert!(sub.depth >= 1));
        }
    }

    #[test]
    fn a_relaxed_dd_with_an_exact_best_path_is_exact() {
        // the cheapest items come first, so the best path is never merged
        let pb = Knapsack {
            capacity: 3,
            profit: vec![10.0, 10.0, 10.0, 1.0, 1.0, 1.0],
            weight: vec![1, 1, 1, 1, 1, 1],
        };
        let (mdd, completion) = plain(&pb, CompilationType::Relaxed, CutsetType::LastExactLayer, 2);
        assert_eq!(Some(30.0), completion.best_value);
        assert!(completion.is_exact);
        assert_eq!(Some(30.0), mdd.best_exact_value());
    }

    #[test]
    fn an_infeasible_residual_yields_no_solution() {
        struct Nothing;
        impl Problem for Nothing {
            type State = usize;
            fn nb_variables(&self) -> usize { 3 }
            fn initial_state(&self) -> usize { 0 }
            fn initial_value(&self) -> f64 { 0.0 }
            fn transition(&self, state: &usize, _: Decision) -> usize { *state }
            fn transition_cost(&self, _: &usize, _: Decision) -> f64 { 0.0 }
            fn for_each_in_domain(&self, _: Variable, _: &usize, _: &mut dyn DecisionCallback) {}
        }
        let pb = Knapsack::scenario();
        let relax = KnapsackRelax(&pb);
        let residual = root(&pb);
        let input = CompilationInput {
            comp_type: CompilationType::Relaxed,
            problem: &Nothing,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: 2,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();
        assert!(completion.is_exact);
        assert_eq!(None, completion.best_value);
        assert_eq!(None, mdd.best_solution());
        assert_eq!(None, mdd.best_exact_value());
    }

    #[test]
    fn nodes_that_cannot_beat_the_best_known_value_are_not_expanded() {
        let pb = Knapsack::scenario();
        let relax = KnapsackRelax(&pb);
        let residual = root(&pb);
        let input = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: &pb,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: usize::MAX,
            residual: &residual,
            best_lb: 14.0,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();
        // the optimal path is never pruned, but many others are
        assert_eq!(Some(14.0), completion.best_value);

        let (unbounded, _) = plain(&pb, CompilationType::Exact, CutsetType::LastExactLayer, usize::MAX);
        assert!(mdd.nodes.len() < unbounded.nodes.len());
    }

    #[test]
    fn dominated_nodes_are_filtered_out_without_losing_the_optimum() {
        let pb = Knapsack::larger();
        let dominance = SimpleDominanceChecker::new(KnapsackDominance);
        let (mdd, completion) = compile(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1, &EmptyCache, &dominance);

        assert_eq!(Some(pb.brute_force()), completion.best_value);
        assert!(mdd.nodes.iter().any(|n| n.flags.is_pruned_by_dominance()));
        assert!(!dominance.is_empty());
    }

    #[test]
    fn recompiling_with_the_same_dominance_table_is_harmless() {
        let pb = Knapsack::larger();
        let dominance = SimpleDominanceChecker::new(KnapsackDominance);
        let (_, first) = compile(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1, &EmptyCache, &dominance);
        let size = dominance.len();
        let (_, second) = compile(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1, &EmptyCache, &dominance);
        assert_eq!(first, second);
        assert_eq!(size, dominance.len());
    }

    #[test]
    fn an_exact_compilation_fills_the_cache_with_explored_thresholds() {
        let pb = Knapsack::scenario();
        let mut cache = SimpleCache::default();
        cache.initialize(pb.nb_variables());

        let (_, completion) = compile(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1, &cache, &EmptyDominanceChecker);
        assert_eq!(Some(14.0), completion.best_value);
        assert!(!cache.is_empty());

        let root = Cache::<usize>::get_threshold(&cache, &10, 0).unwrap();
        assert!(root.explored);
        assert_eq!(0.0, root.value);

        // nothing can be improved: every node below the root is pruned
        let (mdd, completion) = compile(&pb, CompilationType::Exact, CutsetType::LastExactLayer, 1, &cache, &EmptyDominanceChecker);
        assert_eq!(None, completion.best_value);
        assert!(mdd.nodes.iter().any(|n| n.flags.is_pruned_by_cache()));
    }

    #[test]
    fn cutset_thresholds_are_not_marked_explored() {
        let pb = Knapsack::larger();
        let mut cache = SimpleCache::default();
        cache.initialize(pb.nb_variables());

        let (mut mdd, _) = compile(&pb, CompilationType::Relaxed, CutsetType::LastExactLayer, 3, &cache, &EmptyDominanceChecker);
        let mut cutset = vec![];
        mdd.drain_cutset(|sub| cutset.push(sub));
        assert!(!cutset.is_empty());
        for sub in cutset.iter() {
            let threshold = cache.get_threshold(sub.state.as_ref(), sub.depth).unwrap();
            assert!(!threshold.explored);
            assert!(threshold.value >= sub.value);
        }
    }

    #[test]
    fn a_dominated_node_never_caches_the_threshold_of_its_dominator() {
        let pb = Knapsack::scenario();
        let relax = KnapsackRelax(&pb);
        let residual = root(&pb);
        let mut cache = SimpleCache::default();
        cache.initialize(pb.nb_variables());
        // a better way to reach the full capacity at depth 1, found elsewhere
        // and not explored yet
        let dominance = SimpleDominanceChecker::new(KnapsackDominance);
        dominance.is_dominated_or_insert(Arc::new(10), 1, 5.0);

        let input = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: &pb,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: 1,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &cache,
            dominance: &dominance,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();
        assert_eq!(None, completion.best_value);
        assert!(mdd.nodes.iter().any(|n| n.flags.is_pruned_by_dominance()));

        // the dominator itself must still be explored
        let dominator = SubProblem { state: Arc::new(10), value: 5.0, path: vec![], ub: f64::INFINITY, depth: 1 };
        assert_eq!(None, cache.get_threshold(&10, 1));
        assert!(cache.must_explore(&dominator));

        // the root threshold is derived from the dominator: it stays unexplored
        let root = cache.get_threshold(&10, 0).unwrap();
        assert_eq!(3.0, root.value);
        assert!(!root.explored);
        assert!(cache.must_explore(&SubProblem { state: Arc::new(10), value: 3.0, path: vec![], ub: f64::INFINITY, depth: 0 }));
    }

    #[test]
    fn non_deterministic_transitions_are_reported() {
        struct Flaky(Knapsack, Cell<usize>);
        impl Problem for Flaky {
            type State = usize;
            fn nb_variables(&self) -> usize { self.0.nb_variables() }
            fn initial_state(&self) -> usize { self.0.initial_state() }
            fn initial_value(&self) -> f64 { 0.0 }
            fn transition(&self, state: &usize, decision: Decision) -> usize {
                self.1.set(self.1.get() + 1);
                self.0.transition(state, decision) + self.1.get() % 2
            }
            fn transition_cost(&self, state: &usize, decision: Decision) -> f64 {
                self.0.transition_cost(state, decision)
            }
            fn for_each_in_domain(&self, var: Variable, state: &usize, f: &mut dyn DecisionCallback) {
                f.apply(Decision { variable: var, value: 0 });
                if *state >= 10 {
                    f.apply(Decision { variable: var, value: 1 });
                }
            }
        }
        let pb = Flaky(Knapsack::scenario(), Cell::new(0));
        let relax = KnapsackRelax(&pb.0);
        let residual = root(&pb.0);
        let input = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: &pb,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: usize::MAX,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::On,
        };
        let mut mdd = Mdd::new();
        let result = mdd.compile(&input);
        assert!(matches!(result, Err(Reason::NonDeterministicTransition { .. })));
    }

    #[test]
    fn inadmissible_bounds_are_reported() {
        struct Pessimistic;
        impl Relaxation for Pessimistic {
            type State = usize;
            fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
                states.copied().max().unwrap_or(0)
            }
            fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
                cost
            }
            fn fast_upper_bound(&self, _: &usize, _: &VarSet) -> f64 {
                0.0
            }
        }
        let pb = Knapsack::scenario();
        let residual = root(&pb);
        let mut input = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: &pb,
            relaxation: &Pessimistic,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: usize::MAX,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        input.debug = DebugLevel::On;
        let result = mdd.compile(&input);
        assert!(matches!(result, Err(Reason::InadmissibleBound { .. })));
    }

    #[test]
    fn unsound_relaxations_are_reported_in_extended_mode() {
        struct Unsound;
        impl Relaxation for Unsound {
            type State = usize;
            fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
                states.copied().max().unwrap_or(0)
            }
            fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
                cost - 100.0
            }
        }
        let pb = Knapsack::larger();
        let residual = root(&pb);
        let mut input = CompilationInput {
            comp_type: CompilationType::Relaxed,
            problem: &pb,
            relaxation: &Unsound,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: 2,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::On,
        };
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).is_ok());

        input.debug = DebugLevel::Extended;
        let result = mdd.compile(&input);
        assert!(matches!(result, Err(Reason::UnsoundRelaxation { .. })));
    }

    #[test]
    fn sound_relaxations_pass_the_extended_checks() {
        let pb = Knapsack::larger();
        let relax = KnapsackRelax(&pb);
        let residual = root(&pb);
        let input = CompilationInput {
            comp_type: CompilationType::Relaxed,
            problem: &pb,
            relaxation: &relax,
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::Frontier,
            max_width: 2,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Extended,
        };
        let mut mdd = Mdd::new();
        assert!(mdd.compile(&input).unwrap().best_value.unwrap() >= pb.brute_force());
    }

    #[test]
    fn a_kept_node_equal_to_the_merged_state_absorbs_the_merge() {
        /// Merging always yields the initial capacity
        struct FullCapacity(usize);
        impl Relaxation for FullCapacity {
            type State = usize;
            fn merge(&self, _: &mut dyn Iterator<Item = &usize>) -> usize {
                self.0
            }
            fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: f64) -> f64 {
                cost
            }
        }
        // every item is a penalty: the node which keeps the full capacity
        // is always the best one of its layer
        let pb = Knapsack {
            capacity: 4,
            profit: vec![-1.0, -1.0, -1.0, -1.0],
            weight: vec![1, 1, 1, 1],
        };
        let residual = root(&pb);
        let input = CompilationInput {
            comp_type: CompilationType::Relaxed,
            problem: &pb,
            relaxation: &FullCapacity(4),
            ranking: &KnapsackRanking,
            var_heuristic: &DefaultVariableHeuristic,
            reduction: &CostBased,
            cutset_type: CutsetType::LastExactLayer,
            max_width: 2,
            residual: &residual,
            best_lb: f64::NEG_INFINITY,
            cache: &EmptyCache,
            dominance: &EmptyDominanceChecker,
            debug: DebugLevel::Extended,
        };
        let mut mdd = Mdd::new();
        let completion = mdd.compile(&input).unwrap();

        assert_eq!(Some(0.0), completion.best_value);
        // layers 2 and 4 are too wide, and shrink to a single node
        assert_eq!(5, mdd.layers.len());
        assert_eq!(1, alive_width(&mdd, 2));
        assert_eq!(2, alive_width(&mdd, 3));
        assert_eq!(1, alive_width(&mdd, 4));
        // the merged nodes are the recycled ones: none of them was created
        assert!(mdd.nodes.iter().filter(|n| n.flags.is_relaxed()).all(|n| *n.state == 4 && n.flags.is_alive()));
        assert_eq!(2, mdd.nodes.iter().filter(|n| n.flags.is_relaxed()).count());
    }

    #[test]
    fn graphviz_output_shows_the_nodes_and_the_best_edges() {
        let pb = Knapsack::scenario();
        let (mdd, _) = plain(&pb, CompilationType::Relaxed, CutsetType::LastExactLayer, 2);

        let config = VizConfigBuilder::default().build().unwrap();
        let dot = mdd.as_graphviz(&config);
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("terminal"));
        assert!(dot.contains("penwidth=3"));
        assert!(dot.contains("(x0 = 1)"));

        let terse = VizConfigBuilder::default()
            .show_value(false)
            .show_locb(false)
            .show_rub(false)
            .show_deleted(false)
            .build().unwrap();
        let dot = mdd.as_graphviz(&terse);
        assert!(!dot.contains("val:"));
        assert!(!dot.contains("rub:"));
        for (id, node) in mdd.nodes.iter().enumerate() {
            if node.flags.is_deleted() {
                assert!(!dot.contains(&format!("\t{id} [")));
            }
        }
    }
}
