//! Graph model construction.
//!
//! [`ObjectGraph::from_summary`] turns an [`ObjectGraphSummary`] into the
//! internal graph model: one [`ObjectTypeNode`] per object type, carrying its
//! instance count and its object attributes, plus one [`Relation`] per raw
//! relation whose endpoints are both known.
//!
//! Entries that cannot be placed are handled according to the configured
//! [`InputPolicy`]: they are either dropped and recorded as [`Diagnostic`]s,
//! or they abort the build with [`OcelGraphError::MalformedInput`].

use std::{collections::HashMap, fmt};

use log::{debug, warn};
use serde::Serialize;

use ocelgraph_core::{
    identifier::Id,
    summary::{AttributeTarget, ObjectGraphSummary},
};

use crate::{config::InputPolicy, error::OcelGraphError};

/// A recoverable problem found in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An object type name appeared more than once; the first entry wins.
    DuplicateObjectType { object_type: String, count: u64 },

    /// A relation names a type that is not in the object type counts.
    UnknownRelationEndpoint {
        index: usize,
        source: String,
        target: String,
        qualifier: String,
    },

    /// An object attribute is owned by a type that is not in the counts.
    UnknownAttributeOwner { name: String, owner_type: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateObjectType { object_type, count } => write!(
                f,
                "duplicate object type `{object_type}` (count {count}) ignored"
            ),
            Self::UnknownRelationEndpoint {
                index,
                source,
                target,
                qualifier,
            } => write!(
                f,
                "relation #{index} `{source}` -[{qualifier}]-> `{target}` references an unknown object type"
            ),
            Self::UnknownAttributeOwner { name, owner_type } => write!(
                f,
                "attribute `{name}` belongs to unknown object type `{owner_type}`"
            ),
        }
    }
}

/// An attribute shown on an object type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value_type: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }
}

/// An object type in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeNode {
    id: Id,
    count: u64,
    attributes: Vec<Attribute>,
}

impl ObjectTypeNode {
    fn new(id: Id, count: u64) -> Self {
        Self {
            id,
            count,
            attributes: Vec::new(),
        }
    }

    /// Returns the object type name, which doubles as the node id.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Returns the number of objects of this type.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the object attributes in summary order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// A qualified relation between two known object types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    source: Id,
    target: Id,
    qualifier: String,
    frequency: Option<u64>,
}

impl Relation {
    pub fn new(source: Id, target: Id, qualifier: impl Into<String>) -> Self {
        Self {
            source,
            target,
            qualifier: qualifier.into(),
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: Option<u64>) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn source(&self) -> &Id {
        &self.source
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn frequency(&self) -> Option<u64> {
        self.frequency
    }

    /// Returns true if the relation starts and ends at the same type.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// The object-type relation graph built from a summary.
///
/// Nodes keep the order of the object type counts; relations keep the order
/// of the summary's relation list. Every relation endpoint is guaranteed to
/// be a node of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectGraph {
    nodes: Vec<ObjectTypeNode>,
    relations: Vec<Relation>,
    diagnostics: Vec<Diagnostic>,
}

impl ObjectGraph {
    /// Builds the graph model from a summary.
    ///
    /// # Errors
    ///
    /// Returns [`OcelGraphError::MalformedInput`] for the first offending
    /// entry when `policy` is [`InputPolicy::Reject`]. With
    /// [`InputPolicy::Skip`] this never fails.
    pub fn from_summary(
        summary: &ObjectGraphSummary,
        policy: InputPolicy,
    ) -> Result<Self, OcelGraphError> {
        let mut builder = GraphBuilder::new(policy);

        for (object_type, count) in summary.object_type_count().iter() {
            builder.add_node(object_type, count)?;
        }

        for attribute in summary.attributes() {
            if attribute.target() != AttributeTarget::Object {
                continue;
            }
            builder.add_attribute(
                attribute.owner_type(),
                Attribute::new(attribute.name(), attribute.value_type()),
            )?;
        }

        for (index, relation) in summary.relations().iter().enumerate() {
            builder.add_relation(
                index,
                relation.source(),
                relation.target(),
                relation.qualifier(),
                relation.frequency(),
            )?;
        }

        let graph = builder.build();
        debug!(
            nodes = graph.nodes.len(),
            relations = graph.relations.len(),
            diagnostics = graph.diagnostics.len();
            "Object graph built"
        );
        Ok(graph)
    }

    /// Returns the nodes in object type order.
    pub fn nodes(&self) -> &[ObjectTypeNode] {
        &self.nodes
    }

    /// Returns the relations in input order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns the problems recorded while building.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Looks up a node by its object type name.
    pub fn node(&self, id: &str) -> Option<&ObjectTypeNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

struct GraphBuilder {
    policy: InputPolicy,
    index: HashMap<Id, usize>,
    graph: ObjectGraph,
}

impl GraphBuilder {
    fn new(policy: InputPolicy) -> Self {
        Self {
            policy,
            index: HashMap::new(),
            graph: ObjectGraph::default(),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), OcelGraphError> {
        match self.policy {
            InputPolicy::Reject => Err(OcelGraphError::MalformedInput(diagnostic)),
            InputPolicy::Skip => {
                warn!("Skipping summary entry: {diagnostic}");
                self.graph.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }

    fn add_node(&mut self, object_type: &str, count: u64) -> Result<(), OcelGraphError> {
        if self.index.contains_key(object_type) {
            return self.report(Diagnostic::DuplicateObjectType {
                object_type: object_type.to_string(),
                count,
            });
        }

        let id = Id::new(object_type);
        self.index.insert(id.clone(), self.graph.nodes.len());
        self.graph.nodes.push(ObjectTypeNode::new(id, count));
        Ok(())
    }

    fn add_attribute(&mut self, owner: &str, attribute: Attribute) -> Result<(), OcelGraphError> {
        match self.index.get(owner) {
            Some(&position) => {
                self.graph.nodes[position].attributes.push(attribute);
                Ok(())
            }
            None => self.report(Diagnostic::UnknownAttributeOwner {
                name: attribute.name,
                owner_type: owner.to_string(),
            }),
        }
    }

    fn add_relation(
        &mut self,
        index: usize,
        source: &str,
        target: &str,
        qualifier: &str,
        frequency: Option<u64>,
    ) -> Result<(), OcelGraphError> {
        let endpoints = self
            .index
            .get_key_value(source)
            .zip(self.index.get_key_value(target))
            .map(|((source, _), (target, _))| (source.clone(), target.clone()));

        match endpoints {
            Some((source, target)) => {
                self.graph
                    .relations
                    .push(Relation::new(source, target, qualifier).with_frequency(frequency));
                Ok(())
            }
            None => self.report(Diagnostic::UnknownRelationEndpoint {
                index,
                source: source.to_string(),
                target: target.to_string(),
                qualifier: qualifier.to_string(),
            }),
        }
    }

    fn build(self) -> ObjectGraph {
        self.graph
    }
}
