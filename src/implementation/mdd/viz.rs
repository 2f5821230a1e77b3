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

//! This module holds the knobs of the graphviz export of a compiled mdd
//! (see `Mdd::as_graphviz`).

use derive_builder::Builder;

/// This is how you configure the output visualisation e.g.
/// if you want to see the RUB, LocB and the nodes that have been merged
#[derive(Debug, Clone, Builder)]
pub struct VizConfig {
    /// Show the value of each node (length of the longest path from the root)
    #[builder(default = "true")]
    pub show_value: bool,
    /// Show the local bound of each node (length of the longest path to the
    /// terminal layer)
    #[builder(default = "true")]
    pub show_locb: bool,
    /// Show the rough upper bound of each node
    #[builder(default = "true")]
    pub show_rub: bool,
    /// Show the threshold computed for each node
    #[builder(default = "false")]
    pub show_threshold: bool,
    /// Also draw the nodes that were deleted by a restriction or absorbed
    /// by a merge
    #[builder(default = "true")]
    pub show_deleted: bool,
    /// Group the merged nodes of each layer in a cluster (only meaningful
    /// when `show_deleted` is on)
    #[builder(default = "false")]
    pub group_merged: bool,
}

/// Renders the infinite values the way a human would write them
pub(crate) fn extreme(x: f64) -> String {
    if x == f64::INFINITY {
        "+inf".to_string()
    } else if x == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{x}")
    }
}
