//! ocelgraph - Layered layout of object-type relation graphs.
//!
//! Turns the object graph summary of an object-centric event log (object
//! types, their instance counts and attributes, and the qualified relations
//! between them) into a positioned node-and-edge graph, and renders it as
//! canvas-ready JSON descriptors or as an SVG picture.
//!
//! The pipeline is:
//!
//! 1. [`structure`]: build the graph model from the summary,
//! 2. [`layout`]: rank and order the nodes, fan out parallel edges and
//!    normalize coordinates,
//! 3. [`render`]: map the layout onto render descriptors,
//! 4. [`export`]: serialize the descriptors.

pub mod config;
pub mod export;
pub mod layout;
pub mod render;
pub mod structure;
pub mod view;

mod error;

pub use ocelgraph_core::{color, geometry, identifier, summary};

pub use error::OcelGraphError;

use log::{debug, info, trace};

use config::AppConfig;
use export::Exporter;
use layout::LayoutResult;
use render::{RenderModel, RenderStyle};
use structure::ObjectGraph;
use summary::ObjectGraphSummary;

/// Builder for laying out and rendering object graphs.
///
/// Every call takes its own input and returns a fresh result; the builder
/// holds nothing but its configuration.
///
/// # Examples
///
/// ```rust
/// use ocelgraph::{ObjectGraphBuilder, config::AppConfig};
///
/// let source = r#"{
///     "object_type_count": { "Order": 3, "Item": 5 },
///     "attributes": [],
///     "relations": [{ "src": "Order", "target": "Item", "qualifier": "contains" }]
/// }"#;
///
/// let builder = ObjectGraphBuilder::new(AppConfig::default());
/// let summary = builder.parse(source).expect("Failed to parse");
/// let model = builder.render(&summary).expect("Failed to render");
///
/// assert_eq!(model.nodes().len(), 2);
/// assert_eq!(model.edges()[0].label(), "contains");
/// ```
#[derive(Debug, Default)]
pub struct ObjectGraphBuilder {
    config: AppConfig,
}

impl ObjectGraphBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout, style and
    ///   input settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON summary.
    ///
    /// # Errors
    ///
    /// Returns [`OcelGraphError::Parse`] carrying the source text if the
    /// document is not a valid summary.
    pub fn parse(&self, source: &str) -> Result<ObjectGraphSummary, OcelGraphError> {
        info!("Parsing object graph summary");

        let summary: ObjectGraphSummary = serde_json::from_str(source)
            .map_err(|err| OcelGraphError::new_parse_error(err, source))?;

        debug!(
            object_types = summary.object_type_count().len(),
            relations = summary.relations().len();
            "Summary parsed successfully"
        );
        trace!(summary:?; "Parsed summary");

        Ok(summary)
    }

    /// Build the graph model of a summary.
    ///
    /// # Errors
    ///
    /// Returns [`OcelGraphError::MalformedInput`] under the `reject` input
    /// policy.
    pub fn build_graph(&self, summary: &ObjectGraphSummary) -> Result<ObjectGraph, OcelGraphError> {
        info!(policy:? = self.config.input().policy(); "Building object graph");
        ObjectGraph::from_summary(summary, self.config.input().policy())
    }

    /// Lay out a summary.
    ///
    /// # Errors
    ///
    /// Returns an error for rejected input, unusable layout settings or a
    /// layout engine failure.
    pub fn layout(&self, summary: &ObjectGraphSummary) -> Result<LayoutResult, OcelGraphError> {
        let graph = self.build_graph(summary)?;
        let result = layout::calculate(&graph, self.config.layout())?;

        info!(
            nodes = result.nodes().len(),
            edges = result.edges().len();
            "Layout calculated"
        );
        trace!(result:?; "Layout result");
        Ok(result)
    }

    /// Lay out a summary and map it onto render descriptors.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::layout`], and
    /// [`OcelGraphError::Config`] for invalid style colors.
    pub fn render(&self, summary: &ObjectGraphSummary) -> Result<RenderModel, OcelGraphError> {
        let style = RenderStyle::from_config(self.config.style())?;
        let layout = self.layout(summary)?;
        Ok(RenderModel::from_layout(&layout, &style))
    }

    /// Render a summary to pretty-printed JSON descriptors.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::render`] and export errors.
    pub fn render_json(&self, summary: &ObjectGraphSummary) -> Result<String, OcelGraphError> {
        let model = self.render(summary)?;
        let json = export::json::Json::new().with_pretty(true).render(&model)?;
        info!("JSON rendered successfully");
        Ok(json)
    }

    /// Render a summary to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::render`] and export errors.
    pub fn render_svg(&self, summary: &ObjectGraphSummary) -> Result<String, OcelGraphError> {
        let model = self.render(summary)?;
        let svg = export::svg::Svg::new().render(&model)?;
        info!("SVG rendered successfully");
        Ok(svg)
    }
}
