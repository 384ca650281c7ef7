use snarlkit::{
    handle::{Direction, Handle, NodeId},
    handlegraph::*,
    hashgraph::HashGraph,
    path_index::PathIndex,
    pathhandlegraph::*,
    snarls::{CactusSnarlFinder, SnarlBounds, SnarlType, Visit},
    support::NoSupports,
    traversal::{RepresentativeTraversalFinder, SearchLimits},
};

use gfa::{gfa::GFA, parser::GFAParser};

fn hnd(x: u64) -> Handle {
    Handle::pack(x, false)
}

fn read_gfa(path: &str) -> HashGraph {
    let parser = GFAParser::new();
    let gfa: GFA<usize, ()> = parser.parse_file(path).unwrap();
    HashGraph::from_gfa(&gfa)
}

fn read_test_gfa() -> HashGraph {
    read_gfa("./tests/data/nested.gfa")
}

#[test]
fn construct_from_gfa() {
    let graph = read_test_gfa();

    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 8);
    assert_eq!(graph.path_count(), 2);

    assert_eq!(graph.sequence(hnd(7)), b"TTT".to_vec());
    assert_eq!(graph.degree(hnd(1), Direction::Right), 2);
    assert_eq!(graph.degree(hnd(6), Direction::Left), 2);
    assert!(graph.has_edge(hnd(6).flip(), hnd(7).flip()));

    let ref_id = graph.get_path_id(b"ref").unwrap();
    let steps: Vec<_> =
        graph.path_steps(ref_id).unwrap().map(|(_, h)| h).collect();
    assert_eq!(steps, vec![hnd(1), hnd(7), hnd(6)]);
}

#[test]
fn path_index_from_gfa() {
    let graph = read_test_gfa();
    let index = PathIndex::from_path(&graph, b"alt").unwrap();

    assert_eq!(index.len(), 5);
    assert_eq!(index.base_len(), 7);
    assert_eq!(index.offset_of(NodeId(4)), Some(3));
    assert_eq!(index.offset_of(NodeId(6)), Some(5));
    assert!(!index.contains(NodeId(7)));
}

#[test]
fn snarls_from_gfa() {
    let graph = read_test_gfa();
    let manager = CactusSnarlFinder::new(&graph)
        .with_hint_path(b"ref")
        .find_snarls()
        .unwrap();

    let outer = manager.manage(SnarlBounds::new(hnd(1), hnd(6))).unwrap();
    let inner = manager.manage(SnarlBounds::new(hnd(2), hnd(5))).unwrap();

    assert_eq!(manager.len(), 2);
    assert_eq!(manager.top_level_snarls(), vec![outer]);
    assert_eq!(manager.parent_of(inner), Some(outer));

    for &id in &[outer, inner] {
        assert_eq!(
            manager.snarl(id).unwrap().snarl_type(),
            SnarlType::Ultrabubble
        );
    }
}

#[test]
fn traversals_from_gfa() {
    let graph = read_test_gfa();
    let manager = CactusSnarlFinder::new(&graph)
        .with_hint_path(b"ref")
        .find_snarls()
        .unwrap();
    let index = PathIndex::from_path(&graph, b"ref").unwrap();

    let finder = RepresentativeTraversalFinder::new(
        &graph,
        &manager,
        NoSupports,
        Some(&index),
        SearchLimits::default(),
    );

    let outer = manager.manage(SnarlBounds::new(hnd(1), hnd(6))).unwrap();
    let inner = manager.manage(SnarlBounds::new(hnd(2), hnd(5))).unwrap();

    let travs = finder.find_traversals(outer).unwrap();
    let formatted: Vec<String> =
        travs.iter().map(|t| t.to_string()).collect();
    assert_eq!(formatted, vec!["1+,7+,6+", "1+,(2+, 5+)+,6+"]);

    // the inner snarl is off the reference, so a backbone is made up
    let travs = finder.find_traversals(inner).unwrap();
    assert_eq!(travs.len(), 2);
    let mut middles: Vec<Visit> = travs.iter().map(|t| t.visits[1]).collect();
    middles.sort();
    assert_eq!(middles, vec![Visit::Node(hnd(3)), Visit::Node(hnd(4))]);
}

#[test]
fn unusable_gfa_paths_are_skipped() {
    let graph = read_gfa("./tests/data/bad_paths.gfa");

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.path_count(), 1);

    // "broken" names segment 9, which doesn't exist
    assert!(graph.get_path_id(b"broken").is_none());

    // the first "ref" is kept, the duplicate is not
    let ref_id = graph.get_path_id(b"ref").unwrap();
    let steps: Vec<_> =
        graph.path_steps(ref_id).unwrap().map(|(_, h)| h).collect();
    assert_eq!(steps, vec![hnd(1), hnd(2), hnd(3)]);
}
