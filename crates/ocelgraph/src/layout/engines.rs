//! Layered layout engines.
//!
//! An engine assigns every node of an [`ObjectGraph`] a rank and a center
//! point. Ranks grow along the configured [`RankDirection`]; nodes of one
//! rank share the rank-axis coordinate and are kept at least one node
//! separation apart along the other axis.
//!
//! Engines are created through [`EngineBuilder`], which carries the shared
//! geometry settings.

mod basic;
mod sugiyama;

use std::collections::{HashMap, HashSet};

use log::debug;
use ocelgraph_core::{
    geometry::{Point, Size},
    identifier::Id,
};
use petgraph::{
    algo::greedy_feedback_arc_set,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    config::{LayoutConfig, LayoutEngine, RankDirection},
    error::OcelGraphError,
    structure::ObjectGraph,
};

/// Trait implemented by every layered layout engine.
pub trait LayeredEngine {
    /// Calculates a rank and a center point for every node of `graph`.
    ///
    /// Cycles and self-loops are accepted. Nodes without relations are
    /// placed too, in rank 0.
    fn calculate(&self, graph: &ObjectGraph) -> Result<RankedLayout, OcelGraphError>;
}

/// The rank and center of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    rank: usize,
    center: Point,
}

impl Placement {
    pub fn new(rank: usize, center: Point) -> Self {
        Self { rank, center }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

/// Engine output: the placement of every node, keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct RankedLayout {
    placements: HashMap<Id, Placement>,
}

impl RankedLayout {
    pub fn insert(&mut self, id: Id, placement: Placement) {
        self.placements.insert(id, placement);
    }

    pub fn get(&self, id: &Id) -> Option<&Placement> {
        self.placements.get(id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Maps abstract `(rank, slot)` coordinates to node centers.
///
/// A slot is a position along the in-rank axis measured in node pitches, so
/// two nodes whose slots differ by at least one never overlap and keep at
/// least the node separation between them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerGeometry {
    node_size: Size,
    node_separation: f32,
    rank_separation: f32,
    direction: RankDirection,
}

impl LayerGeometry {
    fn center(&self, rank: usize, slot: f32) -> Point {
        let size = if self.direction.is_horizontal() {
            self.node_size
        } else {
            self.node_size.transpose()
        };

        let rank_pitch = size.width() + self.rank_separation;
        let slot_pitch = size.height() + self.node_separation;

        let along = rank as f32 * rank_pitch + size.width() / 2.0;
        let along = if self.direction.is_reversed() {
            -along
        } else {
            along
        };
        let across = slot * slot_pitch + size.height() / 2.0;

        let center = Point::new(along, across);
        if self.direction.is_horizontal() {
            center
        } else {
            center.transpose()
        }
    }
}

/// Pushes slots of one rank apart so that neighbours are at least one slot
/// apart, preserving their order. `ordered` must be sorted by slot.
pub(crate) fn enforce_slot_gaps(ordered: &mut [f32]) {
    for i in 1..ordered.len() {
        if ordered[i] < ordered[i - 1] + 1.0 {
            ordered[i] = ordered[i - 1] + 1.0;
        }
    }
}

/// The relations of `graph` that matter for layering, as `(source, target)`
/// node indices in relation order. Self-loops and repeated pairs are dropped.
pub(crate) fn layering_edges(graph: &ObjectGraph) -> Vec<(u32, u32)> {
    let indices: HashMap<_, u32> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id(), i as u32))
        .collect();

    let mut seen = HashSet::new();
    graph
        .relations()
        .iter()
        .filter(|relation| !relation.is_self_loop())
        .filter_map(|relation| {
            Some((*indices.get(relation.source())?, *indices.get(relation.target())?))
        })
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Makes `edges` acyclic by reversing a greedy feedback arc set.
///
/// Every other edge keeps its direction and its position in the list. A
/// reversed edge that duplicates an existing one is dropped.
pub(crate) fn break_cycles(node_count: usize, edges: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut cyclic = DiGraph::<(), ()>::with_capacity(node_count, edges.len());
    for _ in 0..node_count {
        cyclic.add_node(());
    }
    for &(source, target) in edges {
        cyclic.add_edge(
            NodeIndex::new(source as usize),
            NodeIndex::new(target as usize),
            (),
        );
    }

    let feedback: HashSet<_> = greedy_feedback_arc_set(&cyclic)
        .map(|edge| edge.id())
        .collect();
    if !feedback.is_empty() {
        debug!(reversed = feedback.len(); "Breaking cycles");
    }

    let mut seen = HashSet::new();
    cyclic
        .edge_references()
        .map(|edge| {
            let (source, target) = if feedback.contains(&edge.id()) {
                (edge.target(), edge.source())
            } else {
                (edge.source(), edge.target())
            };
            (source.index() as u32, target.index() as u32)
        })
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Builder for creating and configuring layout engines.
pub struct EngineBuilder {
    node_size: Size,
    node_separation: f32,
    rank_separation: f32,
    direction: RankDirection,
    ordering_sweeps: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Create a new engine builder with the default geometry.
    pub fn new() -> Self {
        Self {
            node_size: Size::new(200.0, 100.0),
            node_separation: 100.0,
            rank_separation: 200.0,
            direction: RankDirection::LR,
            ordering_sweeps: 8,
        }
    }

    /// Create a builder carrying the geometry of a layout configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new()
            .with_node_size(config.node_size())
            .with_node_separation(config.node_separation())
            .with_rank_separation(config.rank_separation())
            .with_rank_direction(config.rank_direction())
    }

    /// Set the fixed node size
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_size = size;
        self
    }

    /// Set the gap between neighbouring nodes of one rank
    pub fn with_node_separation(mut self, separation: f32) -> Self {
        self.node_separation = separation;
        self
    }

    /// Set the gap between consecutive ranks
    pub fn with_rank_separation(mut self, separation: f32) -> Self {
        self.rank_separation = separation;
        self
    }

    /// Set the direction in which ranks advance
    pub fn with_rank_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the number of barycenter sweeps used by the basic engine
    pub fn with_ordering_sweeps(mut self, sweeps: usize) -> Self {
        self.ordering_sweeps = sweeps;
        self
    }

    fn geometry(&self) -> LayerGeometry {
        LayerGeometry {
            node_size: self.node_size,
            node_separation: self.node_separation,
            rank_separation: self.rank_separation,
            direction: self.direction,
        }
    }

    /// Build an engine of the specified type with the configured options
    pub fn build(&self, engine_type: LayoutEngine) -> Box<dyn LayeredEngine> {
        match engine_type {
            LayoutEngine::Basic => Box::new(basic::Engine::new(
                self.geometry(),
                self.ordering_sweeps,
            )),
            LayoutEngine::Sugiyama => Box::new(sugiyama::Engine::new(self.geometry())),
        }
    }
}
