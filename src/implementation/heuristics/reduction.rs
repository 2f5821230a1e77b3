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

//! This module provides the strategies that decide which nodes of a layer
//! are kept, and which ones are merged (or dropped) when the layer exceeds
//! the maximum width of the dd being compiled.

use crate::{LayerNode, ReductionStrategy, StateDistance, StateRanking};

/// _This is the default reduction strategy._ It keeps the nodes having the
/// best value and relies on the state ranking to break ties. The nodes it
/// reduces are thus the least promising ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostBased;
impl <S> ReductionStrategy<S> for CostBased {
    fn sort_layer(&self, layer: &mut [LayerNode<'_, S>], _keep: usize, ranking: &dyn StateRanking<State = S>) {
        layer.sort_unstable_by(|a, b|
            b.value.total_cmp(&a.value)
                .then_with(|| ranking.compare(b.state, a.state)));
    }
}

/// This strategy groups similar states together. The least promising node of
/// the layer (as per `CostBased`) seeds a cluster, and that cluster is filled
/// with the nodes which are the closest to the seed. All the nodes of the
/// cluster get reduced while the others are kept.
///
/// The intuition is that merging nodes which are alike loses less information
/// than merging unrelated nodes.
#[derive(Debug, Clone, Copy)]
pub struct DistanceBased<D>(pub D);
impl <S, D: StateDistance<State = S>> ReductionStrategy<S> for DistanceBased<D> {
    fn sort_layer(&self, layer: &mut [LayerNode<'_, S>], keep: usize, ranking: &dyn StateRanking<State = S>) {
        CostBased.sort_layer(layer, keep, ranking);
        if keep >= layer.len() {
            return;
        }
        let seed = layer.len() - 1;
        let center = layer[seed].state;
        // farthest first; stable so that equidistant nodes keep their cost order
        layer[..seed].sort_by(|a, b| {
            let da = self.0.distance(a.state, center);
            let db = self.0.distance(b.state, center);
            db.total_cmp(&da)
        });
    }
}
