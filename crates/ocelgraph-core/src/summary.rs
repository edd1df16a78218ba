//! Object graph summary: the read-only input contract.
//!
//! A summary describes the object types of an event log, how many instances
//! each type has, the attributes recorded on them, and the qualified
//! object-to-object relations between types. It is produced by an external
//! data service and consumed as-is by the layout pipeline.
//!
//! The JSON field names follow the service payload:
//!
//! ```json
//! {
//!   "object_type_count": { "Order": 3, "Item": 5 },
//!   "attributes": [
//!     { "name": "price", "type": "float", "otype": "Item", "target": "object" }
//!   ],
//!   "relations": [
//!     { "src": "Order", "target": "Item", "qualifier": "contains", "freq": 12 }
//!   ]
//! }
//! ```
//!
//! Camel-case aliases (`source`, `valueType`, `ownerType`) are accepted as well.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

/// The complete summary consumed by the layout pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectGraphSummary {
    #[serde(default)]
    object_type_count: ObjectTypeCounts,

    #[serde(default)]
    attributes: Vec<AttributeDescriptor>,

    #[serde(default)]
    relations: Vec<RelationEdge>,
}

impl ObjectGraphSummary {
    /// Creates a summary from its three parts.
    pub fn new(
        object_type_count: ObjectTypeCounts,
        attributes: Vec<AttributeDescriptor>,
        relations: Vec<RelationEdge>,
    ) -> Self {
        Self {
            object_type_count,
            attributes,
            relations,
        }
    }

    /// Appends an object type with its instance count (builder style).
    pub fn with_object_type(mut self, object_type: impl Into<String>, count: u64) -> Self {
        self.object_type_count.push(object_type, count);
        self
    }

    /// Appends an attribute descriptor (builder style).
    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends a relation (builder style).
    pub fn with_relation(mut self, relation: RelationEdge) -> Self {
        self.relations.push(relation);
        self
    }

    /// Returns the object type counts in document order.
    pub fn object_type_count(&self) -> &ObjectTypeCounts {
        &self.object_type_count
    }

    /// Returns all attribute descriptors, including event attributes.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Returns all raw relations in document order.
    pub fn relations(&self) -> &[RelationEdge] {
        &self.relations
    }
}

/// Ordered mapping from object type name to instance count.
///
/// Unlike a hash or index map, this keeps every entry in document order,
/// duplicate keys included, so that duplicates can be reported downstream
/// instead of being collapsed while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectTypeCounts {
    entries: Vec<(String, u64)>,
}

impl ObjectTypeCounts {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Duplicate names are kept.
    pub fn push(&mut self, object_type: impl Into<String>, count: u64) {
        self.entries.push((object_type.into(), count));
    }

    /// Iterates over `(object_type, count)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(object_type, count)| (object_type.as_str(), *count))
    }

    /// Returns the number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ObjectTypeCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(object_type, count)| (object_type.into(), count))
                .collect(),
        }
    }
}

impl Serialize for ObjectTypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for ObjectTypeCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ObjectTypeCountsVisitor)
    }
}

struct ObjectTypeCountsVisitor;

impl<'de> Visitor<'de> for ObjectTypeCountsVisitor {
    type Value = ObjectTypeCounts;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of object type names to non-negative instance counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((object_type, count)) = access.next_entry::<String, u64>()? {
            entries.push((object_type, count));
        }
        Ok(ObjectTypeCounts { entries })
    }
}

/// What an attribute is recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeTarget {
    /// Attribute of an object type; shown on graph nodes.
    Object,
    /// Attribute of an event type; never shown on the object graph.
    Event,
    /// Any target the service may add later.
    #[serde(other)]
    Other,
}

/// Describes one attribute of an object or event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    name: String,

    #[serde(rename = "type", alias = "valueType")]
    value_type: String,

    #[serde(rename = "otype", alias = "ownerType")]
    owner_type: String,

    target: AttributeTarget,
}

impl AttributeDescriptor {
    /// Creates a new attribute descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - Attribute name
    /// * `value_type` - Declared value type (e.g. `"string"`, `"float"`)
    /// * `owner_type` - Name of the type that owns the attribute
    /// * `target` - Whether the owner is an object type or an event type
    pub fn new(
        name: impl Into<String>,
        value_type: impl Into<String>,
        owner_type: impl Into<String>,
        target: AttributeTarget,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            owner_type: owner_type.into(),
            target,
        }
    }

    /// Shorthand for an object attribute.
    pub fn object(
        name: impl Into<String>,
        value_type: impl Into<String>,
        owner_type: impl Into<String>,
    ) -> Self {
        Self::new(name, value_type, owner_type, AttributeTarget::Object)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    pub fn target(&self) -> AttributeTarget {
        self.target
    }
}

/// A raw qualified relation between two object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    #[serde(rename = "src", alias = "source")]
    source: String,

    target: String,

    qualifier: String,

    /// Number of object pairs carrying this relation, when reported.
    #[serde(rename = "freq", default, skip_serializing_if = "Option::is_none")]
    frequency: Option<u64>,
}

impl RelationEdge {
    /// Creates a new relation without frequency information.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            qualifier: qualifier.into(),
            frequency: None,
        }
    }

    /// Sets the relation frequency (builder style).
    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn frequency(&self) -> Option<u64> {
        self.frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_PAYLOAD: &str = r#"{
        "object_type_count": { "Order": 3, "Item": 5 },
        "attributes": [
            { "name": "price", "type": "float", "otype": "Item", "target": "object" },
            { "name": "resource", "type": "string", "otype": "place order", "target": "event" }
        ],
        "relations": [
            { "src": "Order", "target": "Item", "qualifier": "contains", "freq": 12 }
        ]
    }"#;

    #[test]
    fn test_deserialize_service_payload() {
        let summary: ObjectGraphSummary = serde_json::from_str(SERVICE_PAYLOAD).unwrap();

        let counts: Vec<_> = summary.object_type_count().iter().collect();
        assert_eq!(counts, vec![("Order", 3), ("Item", 5)]);

        assert_eq!(summary.attributes().len(), 2);
        assert_eq!(summary.attributes()[0].value_type(), "float");
        assert_eq!(summary.attributes()[0].owner_type(), "Item");
        assert_eq!(summary.attributes()[1].target(), AttributeTarget::Event);

        let relation = &summary.relations()[0];
        assert_eq!(relation.source(), "Order");
        assert_eq!(relation.target(), "Item");
        assert_eq!(relation.qualifier(), "contains");
        assert_eq!(relation.frequency(), Some(12));
    }

    #[test]
    fn test_deserialize_camel_case_aliases() {
        let json = r#"{
            "attributes": [
                { "name": "weight", "valueType": "float", "ownerType": "Item", "target": "object" }
            ],
            "relations": [
                { "source": "Order", "target": "Item", "qualifier": "contains" }
            ]
        }"#;
        let summary: ObjectGraphSummary = serde_json::from_str(json).unwrap();

        assert!(summary.object_type_count().is_empty());
        assert_eq!(summary.attributes()[0].owner_type(), "Item");
        assert_eq!(summary.relations()[0].source(), "Order");
        assert_eq!(summary.relations()[0].frequency(), None);
    }

    #[test]
    fn test_duplicate_object_types_are_preserved() {
        let json = r#"{ "object_type_count": { "Order": 1, "Item": 2, "Order": 7 } }"#;
        let summary: ObjectGraphSummary = serde_json::from_str(json).unwrap();

        let counts: Vec<_> = summary.object_type_count().iter().collect();
        assert_eq!(counts, vec![("Order", 1), ("Item", 2), ("Order", 7)]);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let json = r#"{ "object_type_count": { "Order": -1 } }"#;
        assert!(serde_json::from_str::<ObjectGraphSummary>(json).is_err());
    }

    #[test]
    fn test_unknown_attribute_target_maps_to_other() {
        let json = r#"{ "name": "x", "type": "int", "otype": "Order", "target": "relation" }"#;
        let attribute: AttributeDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(attribute.target(), AttributeTarget::Other);
    }

    #[test]
    fn test_serialize_uses_service_field_names() {
        let summary = ObjectGraphSummary::default()
            .with_object_type("Order", 3)
            .with_relation(RelationEdge::new("Order", "Order", "follows"));
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["object_type_count"]["Order"], 3);
        assert_eq!(value["relations"][0]["src"], "Order");
        assert!(value["relations"][0].get("freq").is_none());
    }

    #[test]
    fn test_counts_from_iterator() {
        let counts: ObjectTypeCounts = [("A", 1), ("B", 0)].into_iter().collect();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.iter().nth(1), Some(("B", 0)));
    }
}
