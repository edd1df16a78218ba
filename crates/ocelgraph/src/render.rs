//! Render adapter.
//!
//! Maps a [`LayoutResult`] onto renderer-neutral descriptors: nodes with a
//! position, a fixed size, a label (title, count line and attribute table)
//! and a style; edges with an id, endpoints, a label, a stroke style, an
//! arrowhead and the lateral offset computed during layout.
//!
//! The descriptors serialize to camel-case JSON so that a node-and-edge
//! canvas component can consume them directly. The canvas is read-only:
//! see [`InteractionOptions`].

use serde::Serialize;

use ocelgraph_core::{color::Color, geometry::Point, identifier::Id};

use crate::{
    config::StyleConfig,
    error::OcelGraphError,
    layout::{EdgeId, GraphEdge, GraphNode, LayoutResult},
};

/// Resolved style settings shared by every descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    node: NodeStyle,
    edge: EdgeStyle,
    label: LabelStyle,
    show_frequency: bool,
    background: Option<Color>,
}

impl RenderStyle {
    /// Parses and validates the colors of a style configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OcelGraphError::Config`] naming the first invalid color.
    pub fn from_config(config: &StyleConfig) -> Result<Self, OcelGraphError> {
        Ok(Self {
            node: NodeStyle {
                border_color: config.node_border_color().map_err(OcelGraphError::Config)?,
                border_width: config.node_border_width(),
                border_radius: config.node_border_radius(),
                padding: config.node_padding(),
                background: config.node_background().map_err(OcelGraphError::Config)?,
                title_font_size: config.title_font_size(),
                attribute_font_size: config.attribute_font_size(),
            },
            edge: EdgeStyle {
                stroke: config.edge_color().map_err(OcelGraphError::Config)?,
                stroke_width: config.edge_width(),
            },
            label: LabelStyle {
                fill: config.label_color().map_err(OcelGraphError::Config)?,
                font_size: config.label_font_size(),
            },
            show_frequency: config.show_frequency(),
            background: config.background_color().map_err(OcelGraphError::Config)?,
        })
    }
}

/// Box style of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    border_color: Color,
    border_width: f32,
    border_radius: f32,
    padding: f32,
    background: Color,
    title_font_size: f32,
    attribute_font_size: f32,
}

impl NodeStyle {
    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn border_width(&self) -> f32 {
        self.border_width
    }

    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn attribute_font_size(&self) -> f32 {
        self.attribute_font_size
    }
}

/// Stroke of an edge path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    stroke: Color,
    stroke_width: f32,
}

impl EdgeStyle {
    pub fn stroke(&self) -> Color {
        self.stroke
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }
}

/// Text style of an edge label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    fill: Color,
    font_size: f32,
}

impl LabelStyle {
    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

/// One row of a node's attribute table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRow {
    name: String,
    #[serde(rename = "type")]
    value_type: String,
}

impl AttributeRow {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }
}

/// Content of a node box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
    title: String,
    count: u64,
    count_text: String,
    attributes: Vec<AttributeRow>,
}

impl NodeLabel {
    fn from_node(node: &GraphNode) -> Self {
        Self {
            title: node.id().to_string(),
            count: node.count(),
            count_text: format!("Count: {}", node.count()),
            attributes: node
                .attributes()
                .iter()
                .map(|attribute| AttributeRow {
                    name: attribute.name().to_string(),
                    value_type: attribute.value_type().to_string(),
                })
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the count line, e.g. `Count: 3`.
    pub fn count_text(&self) -> &str {
        &self.count_text
    }

    pub fn attributes(&self) -> &[AttributeRow] {
        &self.attributes
    }
}

/// Node descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableNode {
    id: Id,
    #[serde(rename = "type")]
    kind: &'static str,
    position: Point,
    width: f32,
    height: f32,
    label: NodeLabel,
    style: NodeStyle,
    draggable: bool,
    selectable: bool,
    connectable: bool,
}

impl RenderableNode {
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Returns the top-left corner.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn label(&self) -> &NodeLabel {
        &self.label
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }
}

/// Arrowhead drawn at an edge end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Filled triangle
    ArrowClosed,
}

/// Arrowhead descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowMarker {
    #[serde(rename = "type")]
    kind: MarkerKind,
    color: Color,
}

impl ArrowMarker {
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Edge descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableEdge {
    id: EdgeId,
    source: Id,
    target: Id,
    #[serde(rename = "type")]
    kind: &'static str,
    label: String,
    style: EdgeStyle,
    label_style: LabelStyle,
    offset_distance: f32,
    marker_end: ArrowMarker,
}

impl RenderableEdge {
    fn from_edge(edge: &GraphEdge, style: &RenderStyle) -> Self {
        let label = match edge.frequency() {
            Some(frequency) if style.show_frequency => {
                format!("{} ({frequency})", edge.label())
            }
            _ => edge.label().to_string(),
        };

        Self {
            id: edge.id(),
            source: edge.source().clone(),
            target: edge.target().clone(),
            kind: "smoothstep",
            label,
            style: style.edge.clone(),
            label_style: style.label.clone(),
            offset_distance: edge.lateral_offset(),
            marker_end: ArrowMarker {
                kind: MarkerKind::ArrowClosed,
                color: style.edge.stroke,
            },
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

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    pub fn label_style(&self) -> &LabelStyle {
        &self.label_style
    }

    /// Returns the lateral offset of the edge path.
    pub fn offset_distance(&self) -> f32 {
        self.offset_distance
    }

    pub fn marker_end(&self) -> &ArrowMarker {
        &self.marker_end
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Viewer behaviour: the graph is a static, read-only picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionOptions {
    fit_view: bool,
    pan_on_drag: bool,
    zoom_on_scroll: bool,
    zoom_on_pinch: bool,
    zoom_on_double_click: bool,
    nodes_draggable: bool,
    nodes_connectable: bool,
    elements_selectable: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            fit_view: true,
            pan_on_drag: false,
            zoom_on_scroll: false,
            zoom_on_pinch: false,
            zoom_on_double_click: false,
            nodes_draggable: false,
            nodes_connectable: false,
            elements_selectable: false,
        }
    }
}

impl InteractionOptions {
    pub fn fit_view(&self) -> bool {
        self.fit_view
    }

    /// Returns true if any pan, zoom, drag or selection gesture is enabled.
    pub fn is_interactive(&self) -> bool {
        self.pan_on_drag
            || self.zoom_on_scroll
            || self.zoom_on_pinch
            || self.zoom_on_double_click
            || self.nodes_draggable
            || self.nodes_connectable
            || self.elements_selectable
    }
}

/// Everything a renderer needs to draw the object graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    nodes: Vec<RenderableNode>,
    edges: Vec<RenderableEdge>,
    canvas_height: f32,
    canvas_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<Color>,
    interaction: InteractionOptions,
}

impl RenderModel {
    /// Builds the descriptors for a layout. Node and edge order is kept.
    pub fn from_layout(layout: &LayoutResult, style: &RenderStyle) -> Self {
        let nodes = layout
            .nodes()
            .iter()
            .map(|node| RenderableNode {
                id: node.id().clone(),
                kind: "default",
                position: node.position(),
                width: node.size().width(),
                height: node.size().height(),
                label: NodeLabel::from_node(node),
                style: style.node.clone(),
                draggable: false,
                selectable: false,
                connectable: false,
            })
            .collect();

        let edges = layout
            .edges()
            .iter()
            .map(|edge| RenderableEdge::from_edge(edge, style))
            .collect();

        Self {
            nodes,
            edges,
            canvas_height: layout.canvas_height(),
            canvas_width: layout.canvas_width(),
            background_color: style.background,
            interaction: InteractionOptions::default(),
        }
    }

    pub fn nodes(&self) -> &[RenderableNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RenderableEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&RenderableNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn interaction(&self) -> &InteractionOptions {
        &self.interaction
    }

    /// Returns every distinct edge stroke color, in first-use order.
    pub fn edge_colors(&self) -> Vec<Color> {
        let mut colors: Vec<Color> = Vec::new();
        for edge in &self.edges {
            if !colors.contains(&edge.style.stroke) {
                colors.push(edge.style.stroke);
            }
        }
        colors
    }
}
