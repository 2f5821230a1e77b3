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

//! The compact set of boolean properties attached to each node of an mdd.

/// The flags of one node.
///
/// A node can be inexact without being relaxed: this is the case of all the
/// nodes that have a merged ancestor without being the result of a merge
/// themselves. Conversely, a relaxed node is never exact regardless of the
/// value of its exact bit. Other than that, the setters do not enforce any
/// relationship between the flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct NodeFlags(u16);
impl NodeFlags {
    pub const F_EXACT: u16 = 1;
    pub const F_RELAXED: u16 = 2;
    /// Reachable from a terminal node in a backwards traversal
    pub const F_MARKED: u16 = 4;
    pub const F_CUTSET: u16 = 8;
    /// Dropped by a restriction or absorbed by a merge
    pub const F_DELETED: u16 = 16;
    pub const F_CACHE: u16 = 32;
    pub const F_ABOVE_CUTSET: u16 = 64;
    pub const F_DOMINATED: u16 = 128;
    /// The threshold depends on a node kept by the dominance checker, which
    /// may not have been explored yet
    pub const F_DOMINANCE_THETA: u16 = 256;

    #[inline]
    pub fn new_exact() -> Self {
        NodeFlags(NodeFlags::F_EXACT)
    }
    #[inline]
    pub fn new_relaxed() -> Self {
        NodeFlags(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_exact(self) -> bool {
        self.test(NodeFlags::F_EXACT) && !self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_relaxed(self) -> bool {
        self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_marked(self) -> bool {
        self.test(NodeFlags::F_MARKED)
    }
    #[inline]
    pub fn is_cutset(self) -> bool {
        self.test(NodeFlags::F_CUTSET)
    }
    #[inline]
    pub fn is_above_cutset(self) -> bool {
        self.test(NodeFlags::F_ABOVE_CUTSET)
    }
    #[inline]
    pub fn is_deleted(self) -> bool {
        self.test(NodeFlags::F_DELETED)
    }
    #[inline]
    pub fn is_pruned_by_cache(self) -> bool {
        self.test(NodeFlags::F_CACHE)
    }
    #[inline]
    pub fn is_pruned_by_dominance(self) -> bool {
        self.test(NodeFlags::F_DOMINATED)
    }
    #[inline]
    pub fn has_dominance_theta(self) -> bool {
        self.test(NodeFlags::F_DOMINANCE_THETA)
    }
    /// True iff the node was filtered out of its layer before it could be
    /// expanded (either by the cache or by the dominance checker)
    #[inline]
    pub fn is_pruned(self) -> bool {
        self.0 & (NodeFlags::F_CACHE | NodeFlags::F_DOMINATED) != 0
    }
    /// True iff the node still takes part to the dd
    #[inline]
    pub fn is_alive(self) -> bool {
        !self.is_deleted() && !self.is_pruned()
    }
    #[inline]
    pub fn set_exact(&mut self, exact: bool) {
        self.set(NodeFlags::F_EXACT, exact)
    }
    #[inline]
    pub fn set_relaxed(&mut self, relaxed: bool) {
        self.set(NodeFlags::F_RELAXED, relaxed)
    }
    #[inline]
    pub fn set_marked(&mut self, marked: bool) {
        self.set(NodeFlags::F_MARKED, marked)
    }
    #[inline]
    pub fn set_cutset(&mut self, cutset: bool) {
        self.set(NodeFlags::F_CUTSET, cutset)
    }
    #[inline]
    pub fn set_above_cutset(&mut self, above: bool) {
        self.set(NodeFlags::F_ABOVE_CUTSET, above)
    }
    #[inline]
    pub fn set_deleted(&mut self, deleted: bool) {
        self.set(NodeFlags::F_DELETED, deleted)
    }
    #[inline]
    pub fn set_pruned_by_cache(&mut self, pruned: bool) {
        self.set(NodeFlags::F_CACHE, pruned)
    }
    #[inline]
    pub fn set_pruned_by_dominance(&mut self, pruned: bool) {
        self.set(NodeFlags::F_DOMINATED, pruned)
    }
    #[inline]
    pub fn set_dominance_theta(&mut self, dominance: bool) {
        self.set(NodeFlags::F_DOMINANCE_THETA, dominance)
    }
    /// True iff all the flags of the mask are on
    #[inline]
    pub fn test(self, mask: u16) -> bool {
        self.0 & mask == mask
    }
    #[inline]
    pub fn set(&mut self, mask: u16, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}
impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::new_exact()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
