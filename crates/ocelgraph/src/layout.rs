//! Layered layout of the object graph.
//!
//! [`calculate`] runs the layout pipeline over an [`ObjectGraph`]:
//!
//! 1. the configured [`LayeredEngine`] assigns ranks and node centers,
//! 2. [`disambiguate`] gives every relation an id and a lateral offset,
//! 3. [`normalize`] moves the drawing into a zero-based frame and sizes the
//!    canvas.
//!
//! The result is a [`LayoutResult`], which is pure data: it does not know
//! how it will be rendered.

pub mod disambiguate;
pub mod engines;
pub mod normalize;

use std::fmt;

use log::info;
use serde::{Serialize, Serializer};

use ocelgraph_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    config::LayoutConfig,
    error::OcelGraphError,
    structure::{Attribute, Diagnostic, ObjectGraph, ObjectTypeNode, Relation},
};

pub use engines::{EngineBuilder, LayeredEngine, Placement, RankedLayout};

/// Identifier of a laid-out edge: `e-0`, `e-1`, ... in relation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the relation this edge was built from.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{}", self.0)
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A positioned object type node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    id: Id,
    count: u64,
    attributes: Vec<Attribute>,
    rank: usize,
    position: Point,
    size: Size,
}

impl GraphNode {
    pub fn new(node: &ObjectTypeNode, rank: usize, position: Point, size: Size) -> Self {
        Self {
            id: node.id().clone(),
            count: node.count(),
            attributes: node.attributes().to_vec(),
            rank,
            position,
            size,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// A laid-out relation.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    id: EdgeId,
    source: Id,
    target: Id,
    label: String,
    frequency: Option<u64>,
    lateral_offset: f32,
}

impl GraphEdge {
    pub fn new(id: EdgeId, relation: &Relation, lateral_offset: f32) -> Self {
        Self {
            id,
            source: relation.source().clone(),
            target: relation.target().clone(),
            label: relation.qualifier().to_string(),
            frequency: relation.frequency(),
            lateral_offset,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> &Id {
        &self.source
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    /// Returns the relation qualifier.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frequency(&self) -> Option<u64> {
        self.frequency
    }

    /// Returns the perpendicular distance from the straight path between
    /// the endpoints. Zero for edges without siblings.
    pub fn lateral_offset(&self) -> f32 {
        self.lateral_offset
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// The complete layout of an object graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    canvas: Size,
    diagnostics: Vec<Diagnostic>,
}

impl LayoutResult {
    /// Returns the nodes in object type order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Returns the edges in relation order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas.width()
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas.height()
    }

    /// Returns the problems recorded while building the graph.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Lays out `graph` according to `config`.
///
/// # Errors
///
/// Returns [`OcelGraphError::Config`] for unusable geometry settings and
/// [`OcelGraphError::Layout`] when the engine cannot place every node.
pub fn calculate(graph: &ObjectGraph, config: &LayoutConfig) -> Result<LayoutResult, OcelGraphError> {
    config.validate().map_err(OcelGraphError::Config)?;

    info!(
        engine:% = config.engine(),
        direction:% = config.rank_direction(),
        nodes = graph.nodes().len();
        "Calculating layout"
    );

    let engine = EngineBuilder::from_config(config).build(config.engine());
    let ranked = engine.calculate(graph)?;

    let edges = disambiguate::assign_offsets(
        graph.relations(),
        config.edge_grouping(),
        config.edge_offset_step(),
    );
    let (nodes, canvas) =
        normalize::normalize(graph, &ranked, config.node_size(), config.canvas_padding())?;

    Ok(LayoutResult {
        nodes,
        edges,
        canvas,
        diagnostics: graph.diagnostics().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use ocelgraph_core::summary::{ObjectGraphSummary, RelationEdge};

    use super::*;
    use crate::config::{EdgeGrouping, InputPolicy, LayoutEngine, RankDirection};

    fn basic() -> LayoutConfig {
        LayoutConfig::default().with_engine(LayoutEngine::Basic)
    }

    fn graph(summary: ObjectGraphSummary) -> ObjectGraph {
        ObjectGraph::from_summary(&summary, InputPolicy::Skip).unwrap()
    }

    #[test]
    fn test_two_node_chain() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 3)
                .with_object_type("Item", 5)
                .with_relation(RelationEdge::new("Order", "Item", "contains")),
        );
        let layout = calculate(&graph, &basic()).unwrap();

        let order = layout.node("Order").unwrap();
        let item = layout.node("Item").unwrap();
        assert_eq!(order.position(), Point::new(0.0, 0.0));
        assert_approx_eq!(f32, item.position().x(), 400.0);
        assert_approx_eq!(f32, item.position().y(), 0.0);
        assert_approx_eq!(f32, layout.canvas_height(), 200.0);
        assert_approx_eq!(f32, layout.canvas_width(), 700.0);

        let edge = &layout.edges()[0];
        assert_eq!(edge.id().to_string(), "e-0");
        assert_eq!(edge.label(), "contains");
        assert_eq!(edge.lateral_offset(), 0.0);
    }

    #[test]
    fn test_top_to_bottom_direction() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 3)
                .with_object_type("Item", 5)
                .with_relation(RelationEdge::new("Order", "Item", "contains")),
        );
        let config = basic().with_rank_direction(RankDirection::TB);
        let layout = calculate(&graph, &config).unwrap();

        let item = layout.node("Item").unwrap();
        assert_approx_eq!(f32, item.position().x(), 0.0);
        assert_approx_eq!(f32, item.position().y(), 300.0);
    }

    #[test]
    fn test_right_to_left_direction_is_normalized() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 3)
                .with_object_type("Item", 5)
                .with_relation(RelationEdge::new("Order", "Item", "contains")),
        );
        let config = basic().with_rank_direction(RankDirection::RL);
        let layout = calculate(&graph, &config).unwrap();

        let order = layout.node("Order").unwrap();
        let item = layout.node("Item").unwrap();
        assert_approx_eq!(f32, item.position().x(), 0.0);
        assert_approx_eq!(f32, order.position().x(), 400.0);
    }

    #[test]
    fn test_offset_step_and_padding_are_configurable() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 1)
                .with_object_type("Item", 1)
                .with_relation(RelationEdge::new("Order", "Item", "contains"))
                .with_relation(RelationEdge::new("Order", "Item", "returns")),
        );
        let config = basic()
            .with_edge_offset_step(30.0)
            .with_canvas_padding(10.0);
        let layout = calculate(&graph, &config).unwrap();

        let offsets: Vec<f32> = layout.edges().iter().map(GraphEdge::lateral_offset).collect();
        assert_eq!(offsets, vec![-15.0, 15.0]);
        assert_approx_eq!(f32, layout.canvas_height(), 110.0);
    }

    #[test]
    fn test_unordered_grouping_fans_out_opposite_edges() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 1)
                .with_object_type("Item", 1)
                .with_relation(RelationEdge::new("Order", "Item", "contains"))
                .with_relation(RelationEdge::new("Item", "Order", "belongs to")),
        );

        let directed = calculate(&graph, &basic()).unwrap();
        assert!(directed.edges().iter().all(|e| e.lateral_offset() == 0.0));

        let config = basic().with_edge_grouping(EdgeGrouping::Unordered);
        let unordered = calculate(&graph, &config).unwrap();
        let offsets: Vec<f32> = unordered
            .edges()
            .iter()
            .map(GraphEdge::lateral_offset)
            .collect();
        assert_eq!(offsets, vec![-10.0, 10.0]);
    }

    #[test]
    fn test_invalid_geometry_is_config_error() {
        let config = basic().with_node_size(-1.0, 100.0);
        let err = calculate(&ObjectGraph::default(), &config).unwrap_err();
        assert!(matches!(err, OcelGraphError::Config(_)));
    }

    #[test]
    fn test_diagnostics_are_carried() {
        let graph = graph(
            ObjectGraphSummary::default()
                .with_object_type("Order", 1)
                .with_relation(RelationEdge::new("Order", "Ghost", "haunts")),
        );
        let layout = calculate(&graph, &basic()).unwrap();

        assert!(layout.edges().is_empty());
        assert_eq!(layout.diagnostics().len(), 1);
    }

    #[test]
    fn test_edge_id_display_and_serialize() {
        let id = EdgeId::new(7);
        assert_eq!(id.to_string(), "e-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"e-7\"");
    }
}
