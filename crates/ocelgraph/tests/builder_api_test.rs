//! Integration tests for the ObjectGraphBuilder API
//!
//! These tests drive the public API end to end, from summary JSON to render
//! descriptors.

use std::collections::HashSet;

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use ocelgraph::{
    ObjectGraphBuilder, OcelGraphError,
    config::{AppConfig, InputConfig, InputPolicy, LayoutConfig, LayoutEngine, StyleConfig},
    structure::Diagnostic,
    summary::{ObjectGraphSummary, RelationEdge},
};

fn builder_with(engine: LayoutEngine) -> ObjectGraphBuilder {
    ObjectGraphBuilder::new(AppConfig::new(
        LayoutConfig::default().with_engine(engine),
        StyleConfig::default(),
        InputConfig::default(),
    ))
}

fn two_types() -> ObjectGraphSummary {
    ObjectGraphSummary::default()
        .with_object_type("A", 3)
        .with_object_type("B", 5)
}

#[test]
fn test_two_node_chain() {
    let summary = two_types().with_relation(RelationEdge::new("A", "B", "contains"));

    for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
        let layout = builder_with(engine)
            .layout(&summary)
            .unwrap_or_else(|err| panic!("{engine} failed: {err}"));

        assert_eq!(layout.nodes().len(), 2);
        assert_eq!(layout.edges().len(), 1);
        assert_eq!(layout.edges()[0].lateral_offset(), 0.0);

        let a = layout.node("A").unwrap();
        let b = layout.node("B").unwrap();
        assert!(a.rank() < b.rank(), "{engine}: B must be ranked after A");
        assert_eq!(a.count(), 3);
        assert_eq!(b.count(), 5);
    }
}

#[test]
fn test_two_node_chain_coordinates() {
    let summary = two_types().with_relation(RelationEdge::new("A", "B", "contains"));
    let layout = builder_with(LayoutEngine::Basic).layout(&summary).unwrap();

    let a = layout.node("A").unwrap().position();
    let b = layout.node("B").unwrap().position();
    assert_approx_eq!(f32, a.x(), 0.0);
    assert_approx_eq!(f32, a.y(), 0.0);
    assert_approx_eq!(f32, b.x(), 200.0 + 200.0);
    assert_approx_eq!(f32, b.y(), 0.0);
    assert_approx_eq!(f32, layout.canvas_height(), 100.0 + 100.0);
}

#[test]
fn test_parallel_edges_are_fanned_out() {
    let summary = two_types()
        .with_relation(RelationEdge::new("A", "B", "q1"))
        .with_relation(RelationEdge::new("A", "B", "q2"))
        .with_relation(RelationEdge::new("A", "B", "q3"));
    let model = ObjectGraphBuilder::default().render(&summary).unwrap();

    let offsets: Vec<f32> = model.edges().iter().map(|e| e.offset_distance()).collect();
    assert_eq!(offsets, vec![-20.0, 0.0, 20.0]);

    let labels: Vec<&str> = model.edges().iter().map(|e| e.label()).collect();
    assert_eq!(labels, vec!["q1", "q2", "q3"]);
}

#[test]
fn test_empty_summary() {
    let builder = ObjectGraphBuilder::default();
    let summary = builder.parse("{}").unwrap();
    let model = builder.render(&summary).unwrap();

    assert!(model.nodes().is_empty());
    assert!(model.edges().is_empty());
    assert_approx_eq!(f32, model.canvas_height(), 100.0);
}

#[test]
fn test_unknown_type_is_skipped() {
    let summary = ObjectGraphSummary::default()
        .with_object_type("A", 1)
        .with_relation(RelationEdge::new("A", "Z", "x"));
    let layout = ObjectGraphBuilder::default().layout(&summary).unwrap();

    assert_eq!(layout.nodes().len(), 1);
    assert!(layout.edges().is_empty());
    assert!(matches!(
        layout.diagnostics(),
        [Diagnostic::UnknownRelationEndpoint { .. }]
    ));
}

#[test]
fn test_unknown_type_is_rejected_on_request() {
    let summary = ObjectGraphSummary::default()
        .with_object_type("A", 1)
        .with_relation(RelationEdge::new("A", "Z", "x"));
    let builder = ObjectGraphBuilder::new(AppConfig::new(
        LayoutConfig::default(),
        StyleConfig::default(),
        InputConfig::new(InputPolicy::Reject),
    ));

    let err = builder.layout(&summary).unwrap_err();
    assert!(matches!(err, OcelGraphError::MalformedInput(_)));
}

#[test]
fn test_cycles_lay_out_under_both_engines() {
    let summary = two_types()
        .with_relation(RelationEdge::new("A", "B", "to"))
        .with_relation(RelationEdge::new("B", "A", "back"))
        .with_relation(RelationEdge::new("A", "A", "self"));

    for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
        let layout = builder_with(engine)
            .layout(&summary)
            .unwrap_or_else(|err| panic!("{engine} failed: {err}"));
        assert_eq!(layout.nodes().len(), 2);
        assert_eq!(layout.edges().len(), 3);
    }
}

#[test]
fn test_same_rank_nodes_do_not_overlap() {
    let summary = ObjectGraphSummary::default()
        .with_object_type("Order", 1)
        .with_object_type("Item", 1)
        .with_object_type("Package", 1)
        .with_object_type("Invoice", 1)
        .with_relation(RelationEdge::new("Order", "Item", "contains"))
        .with_relation(RelationEdge::new("Order", "Package", "ships"))
        .with_relation(RelationEdge::new("Order", "Invoice", "billed"));

    for engine in [LayoutEngine::Basic, LayoutEngine::Sugiyama] {
        let layout = builder_with(engine).layout(&summary).unwrap();
        for (i, a) in layout.nodes().iter().enumerate() {
            for b in &layout.nodes()[i + 1..] {
                let dx = (a.position().x() - b.position().x()).abs();
                let dy = (a.position().y() - b.position().y()).abs();
                assert!(
                    dx >= a.size().width() || dy >= a.size().height() + 100.0 - 1e-3,
                    "{engine}: {} and {} are too close",
                    a.id(),
                    b.id()
                );
            }
        }
    }
}

#[test]
fn test_parse_service_payload() {
    let source = r#"{
        "object_type_count": { "Order": 3, "Item": 5 },
        "attributes": [
            { "name": "price", "type": "float", "otype": "Item", "target": "object" }
        ],
        "relations": [
            { "src": "Order", "target": "Item", "qualifier": "contains", "freq": 12 }
        ]
    }"#;
    let builder = ObjectGraphBuilder::default();
    let summary = builder.parse(source).unwrap();
    let json = builder.render_json(&summary).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"][1]["label"]["attributes"][0]["name"], "price");
    assert_eq!(value["edges"][0]["source"], "Order");
}

#[test]
fn test_parse_invalid_json_returns_error() {
    let builder = ObjectGraphBuilder::default();
    let err = builder.parse("{ not json").unwrap_err();
    assert!(matches!(err, OcelGraphError::Parse { .. }));
}

#[test]
fn test_render_svg() {
    let summary = two_types().with_relation(RelationEdge::new("A", "B", "contains"));
    let svg = ObjectGraphBuilder::default().render_svg(&summary).unwrap();

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
}

#[test]
fn test_builder_reusability_is_deterministic() {
    let summary = two_types()
        .with_relation(RelationEdge::new("A", "B", "x"))
        .with_relation(RelationEdge::new("B", "A", "y"));
    let builder = ObjectGraphBuilder::default();

    let first = builder.render_json(&summary).unwrap();
    let second = builder.render_json(&summary).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tangled_cycles_under_default_engine() {
    let relations = [
        (12, 0), (12, 1), (10, 1), (8, 10), (9, 13), (12, 12), (0, 8), (12, 13), (13, 10),
        (0, 11), (8, 7), (3, 2), (1, 3), (0, 3), (12, 0), (10, 13), (12, 5),
    ];
    let mut summary = ObjectGraphSummary::default();
    for i in 0..14 {
        summary = summary.with_object_type(format!("T{i}"), 1);
    }
    for (source, target) in relations {
        summary = summary.with_relation(RelationEdge::new(
            format!("T{source}"),
            format!("T{target}"),
            "rel",
        ));
    }

    for engine in [LayoutEngine::Sugiyama, LayoutEngine::Basic] {
        let layout = builder_with(engine)
            .layout(&summary)
            .unwrap_or_else(|err| panic!("{engine} failed: {err}"));
        assert_eq!(layout.nodes().len(), 14);
        assert_eq!(layout.edges().len(), relations.len());
    }
}

fn summary_strategy() -> impl Strategy<Value = ObjectGraphSummary> {
    (1usize..30).prop_flat_map(|types| {
        (
            Just(types),
            prop::collection::vec((0..types, 0..types, 0u8..3), 0..60),
        )
            .prop_map(|(types, relations)| {
                let mut summary = ObjectGraphSummary::default();
                for i in 0..types {
                    summary = summary.with_object_type(format!("T{i}"), i as u64);
                }
                for (source, target, qualifier) in relations {
                    summary = summary.with_relation(RelationEdge::new(
                        format!("T{source}"),
                        format!("T{target}"),
                        format!("q{qualifier}"),
                    ));
                }
                summary
            })
    })
}

fn check_layout_invariants(
    summary: ObjectGraphSummary,
    engine: LayoutEngine,
) -> Result<(), TestCaseError> {
    let builder = builder_with(engine);
    let layout = builder
        .layout(&summary)
        .map_err(|err| TestCaseError::fail(format!("{engine} failed: {err}")))?;

    prop_assert_eq!(layout.nodes().len(), summary.object_type_count().len());
    prop_assert_eq!(layout.edges().len(), summary.relations().len());

    let min_x = layout.nodes().iter().map(|n| n.position().x()).fold(f32::INFINITY, f32::min);
    let min_y = layout.nodes().iter().map(|n| n.position().y()).fold(f32::INFINITY, f32::min);
    prop_assert_eq!(min_x, 0.0);
    prop_assert_eq!(min_y, 0.0);

    let ids: HashSet<String> = layout.edges().iter().map(|e| e.id().to_string()).collect();
    prop_assert_eq!(ids.len(), layout.edges().len());

    let again = builder.layout(&summary).unwrap();
    prop_assert_eq!(&layout, &again);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_layout_invariants_basic(summary in summary_strategy()) {
        check_layout_invariants(summary, LayoutEngine::Basic)?;
    }

    #[test]
    fn prop_layout_invariants_sugiyama(summary in summary_strategy()) {
        check_layout_invariants(summary, LayoutEngine::Sugiyama)?;
    }
}
