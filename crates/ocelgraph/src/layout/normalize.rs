//! Coordinate normalization.
//!
//! Engines report node centers in an arbitrary frame. The normalizer turns
//! them into top-left corners, translates the drawing so that its smallest
//! x and y are exactly zero, and derives the canvas size from the extent of
//! the drawing plus padding.

use log::debug;

use ocelgraph_core::geometry::{Bounds, Point, Size};

use crate::{
    error::OcelGraphError,
    layout::{GraphNode, engines::RankedLayout},
    structure::ObjectGraph,
};

/// Positions every node of `graph` and computes the canvas size.
///
/// Nodes are returned in graph order. For an empty graph the canvas is just
/// the padding.
///
/// # Errors
///
/// Returns [`OcelGraphError::Layout`] if a node has no placement or a
/// placement is not a finite point.
pub fn normalize(
    graph: &ObjectGraph,
    ranked: &RankedLayout,
    node_size: Size,
    padding: f32,
) -> Result<(Vec<GraphNode>, Size), OcelGraphError> {
    let mut nodes = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let placement = ranked.get(node.id()).ok_or_else(|| {
            OcelGraphError::Layout(format!("Position not found for node {}", node.id()))
        })?;
        let center = placement.center();
        if !center.x().is_finite() || !center.y().is_finite() {
            return Err(OcelGraphError::Layout(format!(
                "Non-finite position calculated for node {}",
                node.id()
            )));
        }
        let top_left = center.sub_point(node_size.half_extent());
        nodes.push(GraphNode::new(node, placement.rank(), top_left, node_size));
    }

    let Some(bounds) = nodes
        .iter()
        .map(|node| Bounds::new_from_top_left(node.position(), node_size))
        .reduce(|acc, bounds| acc.merge(&bounds))
    else {
        return Ok((nodes, Size::new(padding, padding)));
    };

    let origin = bounds.min_point();
    let mut extent = Point::default();
    for node in &mut nodes {
        let position = node.position().sub_point(origin);
        node.set_position(position);
        extent = Point::new(
            extent.x().max(position.x() + node_size.width()),
            extent.y().max(position.y() + node_size.height()),
        );
    }

    let canvas = Size::new(extent.x() + padding, extent.y() + padding);
    debug!(width = canvas.width(), height = canvas.height(); "Canvas size calculated");
    Ok((nodes, canvas))
}
