//! Sugiyama layout engine.
//!
//! Uses the rust-sugiyama implementation for ranking and crossing
//! minimization. Its output is reduced to `(rank, slot)` pairs per node so
//! that node size, separations and rank direction stay under our control:
//!
//! - ranks are the distinct layer coordinates of a component, in order;
//! - slots are in-layer coordinates divided by the vertex spacing;
//! - a component whose edges mostly point backwards is flipped.
//!
//! rust-sugiyama only receives acyclic input: the edges of a greedy feedback
//! arc set are reversed beforehand. It lays out each weakly connected
//! component separately and leaves out isolated vertices; components are
//! stacked along the in-rank axis in the order of their first node and
//! isolated nodes get their own rank-0 component.

use std::{
    collections::{HashMap, HashSet},
    panic,
};

use log::{debug, warn};
use rust_sugiyama::configure::Config;

use crate::{
    error::OcelGraphError,
    layout::engines::{
        LayerGeometry, LayeredEngine, Placement, RankedLayout, break_cycles, enforce_slot_gaps,
        layering_edges,
    },
    structure::ObjectGraph,
};

const VERTEX_SPACING: f64 = 10.0;
const LAYER_EPSILON: f64 = 1e-6;

/// One node of a component: its index in the object graph, rank and slot.
#[derive(Debug, Clone, Copy)]
struct Slotted {
    node: u32,
    rank: usize,
    slot: f32,
}

/// The Sugiyama layered engine.
pub struct Engine {
    geometry: LayerGeometry,
}

impl Engine {
    pub(super) fn new(geometry: LayerGeometry) -> Self {
        Self { geometry }
    }

    /// Runs rust-sugiyama on the acyclic `layered` edges and converts every
    /// returned component. Rank flips are decided on the `original` edges.
    fn components(
        &self,
        layered: &[(u32, u32)],
        original: &[(u32, u32)],
    ) -> Result<Vec<Vec<Slotted>>, OcelGraphError> {
        debug!(edges = layered.len(); "Applying Sugiyama algorithm");

        let owned = layered.to_vec();
        let layouts = panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: VERTEX_SPACING,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&owned, &config)
        })
        .map_err(|err| {
            let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                format!("Rust-sugiyama layout engine panicked: {panic_msg}")
            } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                format!("Rust-sugiyama layout engine panicked: {panic_msg}")
            } else {
                "Rust-sugiyama layout engine panicked with unknown error".to_string()
            };
            OcelGraphError::Layout(message)
        })?;

        if layouts.is_empty() {
            return Err(OcelGraphError::Layout(
                "Rust-sugiyama returned empty layout results".to_string(),
            ));
        }

        let mut components = Vec::with_capacity(layouts.len());
        for (coords, _, _) in &layouts {
            let mut raw = Vec::with_capacity(coords.len());
            for &(id, (x, y)) in coords {
                let Ok(node) = u32::try_from(id) else {
                    debug!("Node ID {id} from rust-sugiyama result is out of valid range");
                    continue;
                };
                raw.push((node, x, y));
            }
            if !raw.is_empty() {
                components.push(slot_component(&raw, original));
            }
        }

        if components.is_empty() {
            return Err(OcelGraphError::Layout(
                "Failed to map any rust-sugiyama positions back to graph nodes".to_string(),
            ));
        }
        Ok(components)
    }
}

/// Converts raw `(node, x, y)` coordinates of one component into ranks and
/// slots, flipping the rank order when most edges would point backwards.
fn slot_component(raw: &[(u32, f64, f64)], edges: &[(u32, u32)]) -> Vec<Slotted> {
    let mut layers: Vec<f64> = raw.iter().map(|&(_, _, y)| y).collect();
    layers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    layers.dedup_by(|a, b| (*a - *b).abs() < LAYER_EPSILON);

    let rank_of = |y: f64| {
        layers
            .iter()
            .position(|layer| (layer - y).abs() < LAYER_EPSILON)
            .unwrap_or(0)
    };

    let mut ranks: HashMap<u32, usize> = raw.iter().map(|&(node, _, y)| (node, rank_of(y))).collect();

    let (forward, backward) = edges
        .iter()
        .filter_map(|(source, target)| Some((*ranks.get(source)?, *ranks.get(target)?)))
        .fold((0usize, 0usize), |(forward, backward), (source, target)| {
            match source.cmp(&target) {
                std::cmp::Ordering::Less => (forward + 1, backward),
                std::cmp::Ordering::Greater => (forward, backward + 1),
                std::cmp::Ordering::Equal => (forward, backward),
            }
        });
    if backward > forward {
        let last = layers.len().saturating_sub(1);
        for rank in ranks.values_mut() {
            *rank = last - *rank;
        }
    }

    let min_x = raw
        .iter()
        .map(|&(_, x, _)| x)
        .fold(f64::INFINITY, f64::min);

    let mut slotted: Vec<Slotted> = raw
        .iter()
        .map(|&(node, x, _)| Slotted {
            node,
            rank: ranks[&node],
            slot: ((x - min_x) / VERTEX_SPACING) as f32,
        })
        .collect();

    // Keep neighbours of one rank at least one slot apart.
    slotted.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then(a.slot.partial_cmp(&b.slot).unwrap_or(std::cmp::Ordering::Equal))
    });
    for rank_nodes in slotted.chunk_by_mut(|a, b| a.rank == b.rank) {
        let mut slots: Vec<f32> = rank_nodes.iter().map(|n| n.slot).collect();
        enforce_slot_gaps(&mut slots);
        for (node, slot) in rank_nodes.iter_mut().zip(slots) {
            node.slot = slot;
        }
    }

    slotted
}

impl LayeredEngine for Engine {
    fn calculate(&self, graph: &ObjectGraph) -> Result<RankedLayout, OcelGraphError> {
        let mut layout = RankedLayout::default();
        let nodes = graph.nodes();
        if nodes.is_empty() {
            return Ok(layout);
        }

        // rust-sugiyama does not terminate on every cyclic input.
        let edges = layering_edges(graph);
        let layered = break_cycles(nodes.len(), &edges);

        let mut components = if layered.is_empty() {
            Vec::new()
        } else {
            self.components(&layered, &edges)?
        };

        let placed: HashSet<u32> = components.iter().flatten().map(|n| n.node).collect();
        for node in 0..nodes.len() as u32 {
            if !placed.contains(&node) {
                components.push(vec![Slotted {
                    node,
                    rank: 0,
                    slot: 0.0,
                }]);
            }
        }
        components.sort_by_key(|component| {
            component.iter().map(|n| n.node).min().unwrap_or(u32::MAX)
        });

        let mut offset = 0.0;
        for component in &components {
            let width = component.iter().map(|n| n.slot).fold(0.0, f32::max);
            for slotted in component {
                let Some(node) = nodes.get(slotted.node as usize) else {
                    warn!("Node ID {} from rust-sugiyama result has no graph node", slotted.node);
                    continue;
                };
                let center = self.geometry.center(slotted.rank, slotted.slot + offset);
                layout.insert(node.id().clone(), Placement::new(slotted.rank, center));
            }
            offset += width + 1.0;
        }

        debug!(
            nodes = layout.len(),
            components = components.len();
            "Sugiyama layout calculated"
        );
        Ok(layout)
    }
}
