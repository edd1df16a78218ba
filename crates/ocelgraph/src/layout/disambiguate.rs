//! Multi-edge disambiguation.
//!
//! Relations sharing the same endpoints would be drawn on top of each other.
//! Each group of such relations is fanned out by assigning every member a
//! lateral offset, symmetric around zero: for a group of size `n` the member
//! at position `i` (input order) gets `(i - (n - 1) / 2) * step`.

use indexmap::IndexMap;
use log::trace;

use ocelgraph_core::identifier::Id;

use crate::{
    config::EdgeGrouping,
    layout::{EdgeId, GraphEdge},
    structure::Relation,
};

fn group_key(relation: &Relation, grouping: EdgeGrouping) -> (Id, Id) {
    let (source, target) = (relation.source(), relation.target());
    match grouping {
        EdgeGrouping::Directed => (source.clone(), target.clone()),
        EdgeGrouping::Unordered if target < source => (target.clone(), source.clone()),
        EdgeGrouping::Unordered => (source.clone(), target.clone()),
    }
}

/// Turns relations into graph edges with ids and lateral offsets.
///
/// Edge ids are `e-0`, `e-1`, ... in relation order, and the returned edges
/// keep that order.
pub fn assign_offsets(relations: &[Relation], grouping: EdgeGrouping, step: f32) -> Vec<GraphEdge> {
    let mut groups: IndexMap<(Id, Id), Vec<usize>> = IndexMap::new();
    for (index, relation) in relations.iter().enumerate() {
        groups
            .entry(group_key(relation, grouping))
            .or_default()
            .push(index);
    }

    let mut offsets = vec![0.0; relations.len()];
    for ((source, target), members) in &groups {
        let center = (members.len() as f32 - 1.0) / 2.0;
        for (position, &index) in members.iter().enumerate() {
            offsets[index] = (position as f32 - center) * step;
        }
        if members.len() > 1 {
            trace!(
                source = source.as_str(),
                target = target.as_str(),
                size = members.len();
                "Fanned out edge group"
            );
        }
    }

    relations
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(index, (relation, offset))| GraphEdge::new(EdgeId::new(index), relation, offset))
        .collect()
}
