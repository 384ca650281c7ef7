use snarlkit::{
    handle::{Direction, Edge, Handle, NodeId},
    handlegraph::*,
    hashgraph::HashGraph,
    mutablehandlegraph::*,
    pathhandlegraph::*,
};

static H1: Handle = Handle::from_integer(2);
static H2: Handle = Handle::from_integer(4);
static H3: Handle = Handle::from_integer(6);
static H4: Handle = Handle::from_integer(8);
static H5: Handle = Handle::from_integer(10);
static H6: Handle = Handle::from_integer(12);

#[test]
fn can_create_handles() {
    let mut graph = HashGraph::new();
    let h1 = graph.append_handle(b"CAAATAAG");
    let h2 = graph.append_handle(b"A");
    let h3 = graph.append_handle(b"G");

    let n1 = graph.get_node_unchecked(&h1.id());
    let n2 = graph.get_node_unchecked(&h2.id());
    let n3 = graph.get_node_unchecked(&h3.id());

    assert_eq!(u64::from(h1.id()), 1);
    assert_eq!(u64::from(h3.id()), 3);

    assert_eq!(n1.sequence.as_slice(), b"CAAATAAG");
    assert_eq!(n2.sequence.as_slice(), b"A");
    assert_eq!(n3.sequence.as_slice(), b"G");

    assert_eq!(graph.min_node_id(), NodeId(1));
    assert_eq!(graph.max_node_id(), NodeId(3));
}

#[test]
fn can_create_edges() {
    let mut graph = HashGraph::new();
    let h1 = graph.append_handle(b"CAAATAAG");
    let h2 = graph.append_handle(b"A");
    let h3 = graph.append_handle(b"G");
    let h4 = graph.append_handle(b"TTG");

    graph.create_edge(Edge(h1, h2));
    graph.create_edge(Edge(h1, h3));
    graph.create_edge(Edge(h2, h4));
    graph.create_edge(Edge(h3, h4));

    let n1 = graph.get_node_unchecked(&h1.id());
    let n2 = graph.get_node_unchecked(&h2.id());
    let n3 = graph.get_node_unchecked(&h3.id());
    let n4 = graph.get_node_unchecked(&h4.id());

    assert!(n1.right_edges.contains(&h2));
    assert!(n1.right_edges.contains(&h3));

    assert!(n2.left_edges.contains(&h1.flip()));
    assert!(n2.right_edges.contains(&h4));
    assert!(n3.left_edges.contains(&h1.flip()));
    assert!(n3.right_edges.contains(&h4));

    assert!(n4.left_edges.contains(&h2.flip()));
    assert!(n4.left_edges.contains(&h3.flip()));
}

fn path_graph() -> HashGraph {
    let mut graph = HashGraph::new();
    let h1 = graph.create_handle(b"1", 1);
    let h2 = graph.create_handle(b"2", 2);
    let h3 = graph.create_handle(b"3", 3);
    let h4 = graph.create_handle(b"4", 4);
    let h5 = graph.create_handle(b"5", 5);
    let h6 = graph.create_handle(b"6", 6);

    /*
    edges
    1  -> 2 -> 5 -> 6
      \-> 3 -> 4 /
     */
    graph.create_edge(Edge(h1, h2));
    graph.create_edge(Edge(h2, h5));
    graph.create_edge(Edge(h5, h6));

    graph.create_edge(Edge(h1, h3));
    graph.create_edge(Edge(h3, h4));
    graph.create_edge(Edge(h4, h6));

    graph
}

#[test]
fn degree_is_correct() {
    let graph = path_graph();

    assert_eq!(graph.degree(H1, Direction::Right), 2);
    assert_eq!(graph.degree(H1, Direction::Left), 0);
    assert_eq!(graph.degree(H6, Direction::Left), 2);
    assert_eq!(graph.degree(H6.flip(), Direction::Right), 2);
    assert_eq!(graph.degree(H3, Direction::Left), 1);
}

#[test]
fn graph_has_edge() {
    let graph = path_graph();

    assert!(graph.has_edge(H2, H5));
    assert!(graph.has_edge(H5.flip(), H2.flip()));
    assert!(!graph.has_edge(H5, H2));
    assert!(!graph.has_edge(H1, H6));
}

#[test]
fn graph_neighbors_iter() {
    let mut graph = path_graph();

    graph.create_edge(Edge(H1, H4));
    graph.create_edge(Edge(H1, H6));

    let mut iter = graph.neighbors(H1, Direction::Right);

    assert_eq!(Some(H2), iter.next());
    assert_eq!(Some(H3), iter.next());
    assert_eq!(Some(H4), iter.next());
    assert_eq!(Some(H6), iter.next());
    assert_eq!(None, iter.next());
}

#[test]
fn graph_handles_iter() {
    let graph = path_graph();

    let nodes: Vec<_> = vec![H1, H2, H3, H4, H5, H6]
        .into_iter()
        .map(|x| x.id())
        .collect();

    let iter_nodes: Vec<NodeId> = graph.all_handles().map(|h| h.id()).collect();

    assert_eq!(graph.node_count(), 6);
    assert!(iter_nodes.iter().all(|n| graph.get_node(n).is_some()));
    assert!(nodes.iter().all(|n| iter_nodes.contains(n)));
    assert!(graph.all_handles().all(|h| !h.is_reverse()));
}

#[test]
fn graph_edges_iter() {
    let mut graph = path_graph();

    graph.create_edge(Edge(H1, H4));
    graph.create_edge(Edge(H1, H6));

    graph.create_edge(Edge(H4, H2));
    graph.create_edge(Edge(H6, H2));

    graph.create_edge(Edge(H3, H5));

    let mut edges_found: Vec<_> = graph.all_edges().collect();

    edges_found.sort();

    let mut edges: Vec<_> = vec![
        Edge::edge_handle(H1, H2),
        Edge::edge_handle(H1, H3),
        Edge::edge_handle(H1, H4),
        Edge::edge_handle(H1, H6),
        Edge::edge_handle(H2, H5),
        Edge::edge_handle(H4, H2),
        Edge::edge_handle(H6, H2),
        Edge::edge_handle(H3, H4),
        Edge::edge_handle(H3, H5),
        Edge::edge_handle(H4, H6),
        Edge::edge_handle(H5, H6),
    ];

    edges.sort();

    assert_eq!(edges, edges_found);
}

#[test]
fn append_path_steps() {
    let mut graph = path_graph();

    // Add a path 3 -> 5
    let p1 = graph.create_path(b"path-1", false).unwrap();
    graph.path_append_step(p1, H3);
    graph.path_append_step(p1, H5);

    // Add another path 1 -> 3 -> 4 -> 6
    let p2 = graph.create_path(b"path-2", false).unwrap();
    graph.path_append_step(p2, H1);
    graph.path_append_step(p2, H3);
    graph.path_append_step(p2, H4);
    graph.path_append_step(p2, H6);

    let occurrences = |graph: &HashGraph, handle: Handle| {
        let mut occurs: Vec<_> =
            graph.steps_on_handle(handle).unwrap().collect();
        occurs.sort();
        occurs
    };

    // Node 3 is on both paths, at index 0 in path 1 and 1 in path 2
    assert_eq!(occurrences(&graph, H3), vec![(p1, 0), (p2, 1)]);
    assert_eq!(occurrences(&graph, H1), vec![(p2, 0)]);
    assert_eq!(occurrences(&graph, H6), vec![(p2, 3)]);

    graph.path_append_step(p1, H6);
    assert_eq!(occurrences(&graph, H6), vec![(p1, 2), (p2, 3)]);
    assert!(occurrences(&graph, H2).is_empty());

    // A missing node isn't appended
    assert_eq!(graph.path_append_step(p1, Handle::pack(9, false)), None);
    assert_eq!(graph.path_len(p1), Some(3));

    let mut names: Vec<_> = graph
        .path_ids()
        .filter_map(|id| graph.get_path_name_vec(id))
        .collect();
    names.sort();
    assert_eq!(names, vec![b"path-1".to_vec(), b"path-2".to_vec()]);
}

#[test]
fn graph_path_steps_iter() {
    let mut graph = path_graph();

    let p1 = graph.create_path(b"path-1", false).unwrap();
    graph.path_append_step(p1, H1);
    graph.path_append_step(p1, H2);
    graph.path_append_step(p1, H5.flip());
    graph.path_append_step(p1, H6);

    let mut iter = graph.path_steps(p1).unwrap();

    assert_eq!(Some((0, H1)), iter.next());
    assert_eq!(Some((1, H2)), iter.next());
    assert_eq!(Some((2, H5.flip())), iter.next());
    assert_eq!(Some((3, H6)), iter.next());
    assert_eq!(None, iter.next());

    assert_eq!(graph.path_circular(p1), Some(false));
}
