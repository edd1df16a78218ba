//! Basic layered layout engine.
//!
//! A self-contained layered layout built on petgraph:
//!
//! 1. Cycle breaking: the edges of a greedy feedback arc set are reversed.
//! 2. Ranking: longest path from the sources of the resulting DAG.
//! 3. Ordering: alternating barycenter sweeps over the ranks.
//! 4. Placement: every rank is centered on the widest rank of its weakly
//!    connected component; components are stacked along the in-rank axis
//!    in the order of their first node.
//!
//! Unlike the Sugiyama engine it has no external failure modes, which makes
//! it the engine of choice for reproducible coordinates.

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::{
    Direction,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    unionfind::UnionFind,
    visit::EdgeRef,
};

use crate::{
    error::OcelGraphError,
    layout::engines::{
        LayerGeometry, LayeredEngine, Placement, RankedLayout, break_cycles, layering_edges,
    },
    structure::ObjectGraph,
};

/// The basic layered engine.
pub struct Engine {
    geometry: LayerGeometry,
    sweeps: usize,
}

impl Engine {
    pub(super) fn new(geometry: LayerGeometry, sweeps: usize) -> Self {
        Self { geometry, sweeps }
    }

    /// Builds the acyclic layering graph: one node per object type (weight is
    /// the node's index in the object graph), self-loops and parallel edges
    /// dropped, feedback arcs reversed.
    fn acyclic_graph(graph: &ObjectGraph) -> DiGraph<usize, ()> {
        let node_count = graph.nodes().len();
        let edges = break_cycles(node_count, &layering_edges(graph));

        let mut dag = DiGraph::<usize, ()>::with_capacity(node_count, edges.len());
        for position in 0..node_count {
            dag.add_node(position);
        }
        for (source, target) in edges {
            dag.add_edge(
                NodeIndex::new(source as usize),
                NodeIndex::new(target as usize),
                (),
            );
        }
        dag
    }

    /// Weakly connected components of `dag`, each listed in node order and
    /// ordered by their first node.
    fn components(dag: &DiGraph<usize, ()>) -> Vec<Vec<NodeIndex>> {
        let mut sets = UnionFind::new(dag.node_count());
        for edge in dag.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut components: Vec<Vec<NodeIndex>> = Vec::new();
        let mut slot_of_root = HashMap::new();
        for index in dag.node_indices() {
            let root = sets.find(index.index());
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(index);
        }
        components
    }

    /// Longest-path ranking: sources sit in rank 0, every other node one
    /// rank after its furthest predecessor.
    fn ranks(dag: &DiGraph<usize, ()>) -> Result<Vec<usize>, OcelGraphError> {
        let order = toposort(dag, None).map_err(|cycle| {
            OcelGraphError::Layout(format!(
                "Cycle left after feedback arc removal at node {}",
                cycle.node_id().index()
            ))
        })?;

        let mut ranks = vec![0; dag.node_count()];
        for node in order {
            let next = ranks[node.index()] + 1;
            for successor in dag.neighbors_directed(node, Direction::Outgoing) {
                ranks[successor.index()] = ranks[successor.index()].max(next);
            }
        }
        Ok(ranks)
    }

    /// Orders every rank of one component by alternating downward and upward
    /// barycenter sweeps.
    fn order(
        &self,
        dag: &DiGraph<usize, ()>,
        ranks: &[usize],
        component: &[NodeIndex],
    ) -> Vec<Vec<NodeIndex>> {
        let rank_count = component
            .iter()
            .map(|index| ranks[index.index()])
            .max()
            .map_or(0, |max| max + 1);
        let mut layers: Vec<Vec<NodeIndex>> = vec![Vec::new(); rank_count];
        for &index in component {
            layers[ranks[index.index()]].push(index);
        }

        let mut positions = vec![0.0_f32; dag.node_count()];
        for layer in &layers {
            store_positions(layer, &mut positions);
        }

        for _ in 0..self.sweeps {
            for rank in 1..rank_count {
                sort_by_barycenter(&mut layers[rank], dag, &positions, Direction::Incoming);
                store_positions(&layers[rank], &mut positions);
            }
            for rank in (0..rank_count.saturating_sub(1)).rev() {
                sort_by_barycenter(&mut layers[rank], dag, &positions, Direction::Outgoing);
                store_positions(&layers[rank], &mut positions);
            }
        }

        layers
    }
}

fn store_positions(layer: &[NodeIndex], positions: &mut [f32]) {
    for (i, node) in layer.iter().enumerate() {
        positions[node.index()] = i as f32;
    }
}

/// Stable sort of one rank by the mean position of each node's neighbours
/// in `direction`. Nodes without such neighbours keep their position.
fn sort_by_barycenter(
    layer: &mut [NodeIndex],
    dag: &DiGraph<usize, ()>,
    positions: &[f32],
    direction: Direction,
) {
    let mut keyed: Vec<(NodeIndex, f32)> = layer
        .iter()
        .map(|&node| {
            let (sum, count) = dag
                .neighbors_directed(node, direction)
                .fold((0.0, 0usize), |(sum, count), neighbour| {
                    (sum + positions[neighbour.index()], count + 1)
                });
            let key = if count == 0 {
                positions[node.index()]
            } else {
                sum / count as f32
            };
            (node, key)
        })
        .collect();

    keyed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    for (slot, (node, _)) in layer.iter_mut().zip(keyed) {
        *slot = node;
    }
}

impl LayeredEngine for Engine {
    fn calculate(&self, graph: &ObjectGraph) -> Result<RankedLayout, OcelGraphError> {
        let mut layout = RankedLayout::default();
        if graph.is_empty() {
            return Ok(layout);
        }

        let dag = Self::acyclic_graph(graph);
        let ranks = Self::ranks(&dag)?;
        let components = Self::components(&dag);

        // Components are stacked along the in-rank axis, each one as wide as
        // its widest rank.
        let mut offset = 0.0;
        for component in &components {
            let layers = self.order(&dag, &ranks, component);
            trace!(layers:?; "Ordered ranks");

            let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
            for (rank, layer) in layers.iter().enumerate() {
                let shift = (widest - layer.len()) as f32 / 2.0;
                for (i, &index) in layer.iter().enumerate() {
                    let node = &graph.nodes()[dag[index]];
                    let center = self.geometry.center(rank, offset + i as f32 + shift);
                    layout.insert(node.id().clone(), Placement::new(rank, center));
                }
            }
            offset += widest as f32;
        }

        debug!(
            nodes = layout.len(),
            components = components.len();
            "Basic layout calculated"
        );
        Ok(layout)
    }
}
