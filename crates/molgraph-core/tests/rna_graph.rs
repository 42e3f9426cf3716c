use molgraph::workflows::rna::{BASES, RnaEdgeKind, RnaGraphBuilder};

#[test]
fn hairpin_scenario_has_expected_shape() {
    let structure = "((((((....))))))";
    let sequence = "AUGCAUGCAUGCAUGC";
    assert_eq!(structure.len(), 16);

    let graph = RnaGraphBuilder::new().build(structure, Some(sequence)).unwrap();

    assert_eq!(graph.node_count(), 16);
    assert_eq!(graph.edges_of_kind(RnaEdgeKind::Backbone).count(), 15);
    assert_eq!(graph.edges_of_kind(RnaEdgeKind::BasePair).count(), 6);
    for node in &graph.nodes {
        let features = node.features.unwrap();
        assert_eq!(features.len(), BASES.len());
        assert_eq!(features.iter().sum::<f64>(), 1.0);
    }

    let pairs: Vec<_> = graph
        .edges_of_kind(RnaEdgeKind::BasePair)
        .map(|e| (e.source, e.target))
        .collect();
    assert_eq!(pairs, vec![(10, 5), (11, 4), (12, 3), (13, 2), (14, 1), (15, 0)]);
}

#[test]
fn balanced_inputs_follow_the_counting_rule() {
    let builder = RnaGraphBuilder::new();
    for structure in ["", ".", "()", "(.(..).)", "((..))..((...))", "....."] {
        let graph = builder.build(structure, None).unwrap();
        let len = structure.len();
        assert_eq!(graph.node_count(), len);
        assert_eq!(
            graph.edges_of_kind(RnaEdgeKind::Backbone).count(),
            len.saturating_sub(1)
        );
        assert_eq!(
            graph.edges_of_kind(RnaEdgeKind::BasePair).count(),
            structure.matches('(').count()
        );
    }
}

#[test]
fn unbalanced_or_invalid_inputs_yield_nothing() {
    let builder = RnaGraphBuilder::new();
    for structure in ["(", ")", "(()", "())(", "((..]]", "..x.."] {
        assert!(builder.build(structure, None).is_none(), "{}", structure);
    }
}

#[test]
fn graph_serializes_to_json() {
    let graph = RnaGraphBuilder::new().build("(.)", Some("GAC")).unwrap();
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"][2]["kind"], "base_pair");
}
