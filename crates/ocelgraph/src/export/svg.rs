//! SVG exporter: a static drawing of the render descriptors.
//!
//! Nodes are drawn as rounded boxes holding the type name, the count line
//! and as many attribute rows as fit. Edges run orthogonally between the
//! facing sides of their endpoints, shifted sideways by their lateral
//! offset, and end in a closed arrowhead. Self-loops are drawn as a curve
//! below the node.

mod arrows;

use std::collections::HashMap;

use log::debug;
use svg::{
    Document,
    node::element::{Group, Path, Rectangle, Text},
};

use ocelgraph_core::geometry::Point;

use crate::{
    export::{Error, Exporter},
    render::{RenderModel, RenderableEdge, RenderableNode},
};

const LINE_SPACING: f32 = 1.4;
const LOOP_REACH: f32 = 40.0;

/// Draws a [`RenderModel`] as an SVG document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Svg;

impl Svg {
    pub fn new() -> Self {
        Self
    }

    fn render_document(&self, model: &RenderModel) -> Result<Document, Error> {
        let width = model.canvas_width();
        let height = model.canvas_height();

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(background) = model.background_color() {
            doc = doc.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", &background),
            );
        }

        let colors = model.edge_colors();
        doc = doc.add(arrows::create_marker_definitions(colors.iter()));

        let nodes: HashMap<&str, &RenderableNode> = model
            .nodes()
            .iter()
            .map(|node| (node.id().as_str(), node))
            .collect();

        let mut edge_group = Group::new().set("class", "edges");
        let mut label_group = Group::new().set("class", "edge-labels");
        for edge in model.edges() {
            let source = nodes.get(edge.source().as_str()).ok_or_else(|| {
                Error::Render(format!("Edge {} has unknown source {}", edge.id(), edge.source()))
            })?;
            let target = nodes.get(edge.target().as_str()).ok_or_else(|| {
                Error::Render(format!("Edge {} has unknown target {}", edge.id(), edge.target()))
            })?;

            let (path_data, label_point) = edge_path(edge, source, target);
            edge_group = edge_group.add(
                Path::new()
                    .set("id", edge.id().to_string())
                    .set("d", path_data)
                    .set("fill", "none")
                    .set("stroke", &edge.style().stroke())
                    .set("stroke-width", edge.style().stroke_width())
                    .set("marker-end", arrows::marker_end_url(&edge.marker_end().color())),
            );

            if !edge.label().is_empty() {
                label_group = label_group.add(
                    Text::new(edge.label())
                        .set("x", label_point.x())
                        .set("y", label_point.y())
                        .set("text-anchor", "middle")
                        .set("dominant-baseline", "middle")
                        .set("fill", &edge.label_style().fill())
                        .set("font-size", edge.label_style().font_size()),
                );
            }
        }

        let mut node_group = Group::new().set("class", "nodes");
        for node in model.nodes() {
            node_group = node_group.add(render_node(node));
        }

        Ok(doc.add(node_group).add(edge_group).add(label_group))
    }
}

/// Draws one node box with its title, count line and attribute rows.
fn render_node(node: &RenderableNode) -> Group {
    let style = node.style();
    let label = node.label();
    let position = node.position();
    let center_x = position.x() + node.width() / 2.0;

    let mut group = Group::new().set("id", node_element_id(node.id().as_str())).add(
        Rectangle::new()
            .set("x", position.x())
            .set("y", position.y())
            .set("width", node.width())
            .set("height", node.height())
            .set("rx", style.border_radius())
            .set("fill", &style.background())
            .set("stroke", &style.border_color())
            .set("stroke-width", style.border_width()),
    );

    let title_line = style.title_font_size() * LINE_SPACING;
    let mut baseline = position.y() + style.padding() + style.title_font_size();
    group = group.add(
        Text::new(label.title())
            .set("x", center_x)
            .set("y", baseline)
            .set("text-anchor", "middle")
            .set("font-weight", "bold")
            .set("font-size", style.title_font_size()),
    );

    baseline += title_line;
    group = group.add(
        Text::new(label.count_text())
            .set("x", center_x)
            .set("y", baseline)
            .set("text-anchor", "middle")
            .set("font-size", style.title_font_size()),
    );

    let row_line = style.attribute_font_size() * LINE_SPACING;
    let bottom = position.y() + node.height() - style.padding();
    let available = ((bottom - baseline) / row_line).floor().max(0.0) as usize;
    let attributes = label.attributes();
    let (shown, hidden) = if attributes.len() > available {
        let shown = available.saturating_sub(1);
        (shown, attributes.len() - shown)
    } else {
        (attributes.len(), 0)
    };

    for row in &attributes[..shown] {
        baseline += row_line;
        group = group.add(
            Text::new(format!("{}: {}", row.name(), row.value_type()))
                .set("x", position.x() + style.padding())
                .set("y", baseline)
                .set("font-size", style.attribute_font_size()),
        );
    }
    if hidden > 0 && available > 0 {
        baseline += row_line;
        group = group.add(
            Text::new(format!("+{hidden} more"))
                .set("x", position.x() + style.padding())
                .set("y", baseline)
                .set("font-style", "italic")
                .set("font-size", style.attribute_font_size()),
        );
    }

    group
}

/// XML id of a node group. ASCII letters, digits and `-` are kept; every
/// other character is written as `_<hex code point>_`, so distinct type
/// names never share an id.
fn node_element_id(id: &str) -> String {
    let mut element_id = String::from("node-");
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            element_id.push(c);
        } else {
            element_id.push_str(&format!("_{:x}_", u32::from(c)));
        }
    }
    element_id
}

/// Returns the path data of an edge and the anchor point of its label.
fn edge_path(
    edge: &RenderableEdge,
    source: &RenderableNode,
    target: &RenderableNode,
) -> (String, Point) {
    let offset = edge.offset_distance();

    if edge.is_self_loop() {
        let bottom = source.position().y() + source.height();
        let center_x = source.position().x() + source.width() / 2.0 + offset;
        let start = Point::new(center_x - source.width() / 4.0, bottom);
        let end = Point::new(center_x + source.width() / 4.0, bottom);
        let reach = Point::new(0.0, LOOP_REACH);
        let label = Point::new(center_x, bottom + LOOP_REACH);
        return (arrows::create_loop_path_data(start, end, reach), label);
    }

    let source_center = source
        .position()
        .add_point(Point::new(source.width() / 2.0, source.height() / 2.0));
    let target_center = target
        .position()
        .add_point(Point::new(target.width() / 2.0, target.height() / 2.0));
    let delta = target_center.sub_point(source_center);
    let horizontal = delta.x().abs() >= delta.y().abs();

    let (start, end) = if horizontal {
        let direction = delta.x().signum();
        (
            Point::new(
                source_center.x() + direction * source.width() / 2.0,
                source_center.y() + offset,
            ),
            Point::new(
                target_center.x() - direction * target.width() / 2.0,
                target_center.y() + offset,
            ),
        )
    } else {
        let direction = delta.y().signum();
        (
            Point::new(
                source_center.x() + offset,
                source_center.y() + direction * source.height() / 2.0,
            ),
            Point::new(
                target_center.x() + offset,
                target_center.y() - direction * target.height() / 2.0,
            ),
        )
    };

    (
        arrows::create_orthogonal_path_data(start, end, horizontal),
        start.midpoint(end),
    )
}

impl Exporter for Svg {
    fn render(&self, model: &RenderModel) -> Result<String, Error> {
        let doc = self.render_document(model)?;
        debug!("SVG document rendered");
        Ok(doc.to_string())
    }
}
