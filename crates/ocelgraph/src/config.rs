//! Configuration types for object graph layout and rendering.
//!
//! This module provides configuration structures that control how the object
//! graph is built, laid out and styled. All types implement
//! [`serde::Deserialize`] for loading from TOML or JSON, and every field has
//! a default, so a partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Engine choice, node geometry, spacing and edge grouping.
//! - [`StyleConfig`] - Colors, stroke widths and font sizes of the render output.
//! - [`InputConfig`] - How malformed summary input is handled.
//!
//! # Example
//!
//! ```
//! # use ocelgraph::config::{AppConfig, LayoutEngine};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().engine(), LayoutEngine::Sugiyama);
//! assert_eq!(config.layout().node_width(), 200.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use ocelgraph_core::{color::Color, geometry::Size};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Input handling section.
    #[serde(default)]
    input: InputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout engine and geometry settings.
    /// * `style` - Visual styling options.
    /// * `input` - Input validation policy.
    pub fn new(layout: LayoutConfig, style: StyleConfig, input: InputConfig) -> Self {
        Self {
            layout,
            style,
            input,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the input configuration.
    pub fn input(&self) -> &InputConfig {
        &self.input
    }
}

/// Available layered layout engines.
///
/// - `Sugiyama` - Crossing-minimizing layered layout (default)
/// - `Basic` - Longest-path ranking with barycenter ordering
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEngine {
    /// Basic layered engine
    Basic,
    /// Sugiyama layered engine (default)
    #[default]
    Sugiyama,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Basic => "basic",
            LayoutEngine::Sugiyama => "sugiyama",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Direction in which ranks advance.
///
/// With `LR` (the default) rank 0 is the leftmost column and edges flow
/// rightwards; `TB` stacks ranks top to bottom. `RL` and `BT` mirror them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDirection {
    #[default]
    LR,
    RL,
    TB,
    BT,
}

impl RankDirection {
    /// Returns true when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Returns true when ranks advance towards negative coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RL | Self::BT)
    }
}

impl FromStr for RankDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            "TB" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            _ => Err("Unsupported rank direction"),
        }
    }
}

impl Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LR => "LR",
            Self::RL => "RL",
            Self::TB => "TB",
            Self::BT => "BT",
        };
        write!(f, "{s}")
    }
}

/// How relations are grouped before lateral offsets are assigned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeGrouping {
    /// `A -> B` and `B -> A` form separate groups (default).
    #[default]
    Directed,
    /// `A -> B` and `B -> A` share one group.
    Unordered,
}

impl FromStr for EdgeGrouping {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directed" => Ok(Self::Directed),
            "unordered" => Ok(Self::Unordered),
            _ => Err("Unsupported edge grouping"),
        }
    }
}

/// What to do with summary entries that cannot be placed in the graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Drop the entry, record a diagnostic and continue (default).
    #[default]
    Skip,
    /// Fail the whole build on the first offending entry.
    Reject,
}

impl FromStr for InputPolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            _ => Err("Unsupported input policy"),
        }
    }
}

/// Layout engine choice, node geometry and spacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    engine: LayoutEngine,
    rank_direction: RankDirection,
    node_width: f32,
    node_height: f32,
    /// Minimum gap between neighbouring nodes of the same rank.
    node_separation: f32,
    /// Gap between consecutive ranks.
    rank_separation: f32,
    /// Lateral distance between sibling edges of one group.
    edge_offset_step: f32,
    /// Padding added to the extent of the drawing to obtain the canvas size.
    canvas_padding: f32,
    edge_grouping: EdgeGrouping,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            rank_direction: RankDirection::default(),
            node_width: 200.0,
            node_height: 100.0,
            node_separation: 100.0,
            rank_separation: 200.0,
            edge_offset_step: 20.0,
            canvas_padding: 100.0,
            edge_grouping: EdgeGrouping::default(),
        }
    }
}

impl LayoutConfig {
    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn rank_direction(&self) -> RankDirection {
        self.rank_direction
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Returns the fixed size shared by every node.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn node_separation(&self) -> f32 {
        self.node_separation
    }

    pub fn rank_separation(&self) -> f32 {
        self.rank_separation
    }

    pub fn edge_offset_step(&self) -> f32 {
        self.edge_offset_step
    }

    pub fn canvas_padding(&self) -> f32 {
        self.canvas_padding
    }

    pub fn edge_grouping(&self) -> EdgeGrouping {
        self.edge_grouping
    }

    /// Sets the layout engine.
    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the rank direction.
    pub fn with_rank_direction(mut self, rank_direction: RankDirection) -> Self {
        self.rank_direction = rank_direction;
        self
    }

    /// Sets the node size.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Sets the in-rank and between-rank separations.
    pub fn with_separation(mut self, node_separation: f32, rank_separation: f32) -> Self {
        self.node_separation = node_separation;
        self.rank_separation = rank_separation;
        self
    }

    /// Sets the lateral offset step between sibling edges.
    pub fn with_edge_offset_step(mut self, step: f32) -> Self {
        self.edge_offset_step = step;
        self
    }

    /// Sets the canvas padding.
    pub fn with_canvas_padding(mut self, padding: f32) -> Self {
        self.canvas_padding = padding;
        self
    }

    /// Sets the edge grouping mode.
    pub fn with_edge_grouping(mut self, grouping: EdgeGrouping) -> Self {
        self.edge_grouping = grouping;
        self
    }

    /// Checks that every numeric setting is usable for layout.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("`{name}` must be a positive number, got {value}"));
            }
        }

        let non_negative = [
            ("node_separation", self.node_separation),
            ("rank_separation", self.rank_separation),
            ("edge_offset_step", self.edge_offset_step),
            ("canvas_padding", self.canvas_padding),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "`{name}` must be a non-negative number, got {value}"
                ));
            }
        }

        Ok(())
    }
}

/// Visual styling of the render output.
///
/// Colors are kept as strings here and parsed on access, so that a bad
/// color is reported when rendering rather than when loading the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    node_border_color: String,
    node_border_width: f32,
    node_border_radius: f32,
    node_padding: f32,
    node_background: String,
    title_font_size: f32,
    attribute_font_size: f32,
    edge_color: String,
    edge_width: f32,
    label_color: String,
    label_font_size: f32,
    /// Append the relation frequency to edge labels when it is known.
    show_frequency: bool,
    background_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_border_color: "#666".to_string(),
            node_border_width: 2.0,
            node_border_radius: 8.0,
            node_padding: 10.0,
            node_background: "#fff".to_string(),
            title_font_size: 12.0,
            attribute_font_size: 10.0,
            edge_color: "#888".to_string(),
            edge_width: 1.5,
            label_color: "#333".to_string(),
            label_font_size: 12.0,
            show_frequency: false,
            background_color: None,
        }
    }
}

impl StyleConfig {
    pub fn node_border_color(&self) -> Result<Color, String> {
        parse_color("node_border_color", &self.node_border_color)
    }

    pub fn node_border_width(&self) -> f32 {
        self.node_border_width
    }

    pub fn node_border_radius(&self) -> f32 {
        self.node_border_radius
    }

    pub fn node_padding(&self) -> f32 {
        self.node_padding
    }

    pub fn node_background(&self) -> Result<Color, String> {
        parse_color("node_background", &self.node_background)
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn attribute_font_size(&self) -> f32 {
        self.attribute_font_size
    }

    pub fn edge_color(&self) -> Result<Color, String> {
        parse_color("edge_color", &self.edge_color)
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn label_color(&self) -> Result<Color, String> {
        parse_color("label_color", &self.label_color)
    }

    pub fn label_font_size(&self) -> f32 {
        self.label_font_size
    }

    pub fn show_frequency(&self) -> bool {
        self.show_frequency
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("background_color", color))
            .transpose()
    }

    /// Enables or disables frequency suffixes on edge labels.
    pub fn with_show_frequency(mut self, show_frequency: bool) -> Self {
        self.show_frequency = show_frequency;
        self
    }

    /// Sets the canvas background color.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the edge stroke color.
    pub fn with_edge_color(mut self, color: impl Into<String>) -> Self {
        self.edge_color = color.into();
        self
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid `{field}` in config: {err}"))
}

/// Input validation settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    policy: InputPolicy,
}

impl InputConfig {
    /// Creates an input configuration with the given policy.
    pub fn new(policy: InputPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }
}
