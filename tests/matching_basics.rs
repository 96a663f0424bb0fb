use anyhow::Result;
use matchkit::{Error, Graph, GraphLoader, Matching, MatchingAlgorithm, SuitorMatcher};

fn path_of_four() -> Result<Graph> {
    let mut graph = Graph::new(4, false);
    graph.add_edge(0, 1)?;
    graph.add_edge(1, 2)?;
    graph.add_edge(2, 3)?;
    Ok(graph)
}

#[test]
fn manual_matching_on_a_path() -> Result<()> {
    let graph = path_of_four()?;
    let mut matching = Matching::new(graph.upper_node_id_bound());
    assert!(matching.is_proper(&graph));
    assert_eq!(matching.size(&graph), 0);

    matching.match_nodes(0, 1)?;
    matching.match_nodes(2, 3)?;
    assert!(matching.is_matched(0));
    assert!(matching.are_matched(3, 2));
    assert_eq!(matching.mate(1), Some(0));
    assert_eq!(matching.size(&graph), 2);
    assert_eq!(matching.weight(&graph), 2.0);
    assert!(matching.is_proper(&graph));

    let partition = matching.to_partition(&graph);
    assert_eq!(partition.len(), 4);
    assert_eq!(partition.number_of_subsets(), 2);
    assert!(partition.in_same_subset(0, 1));
    assert!(!partition.in_same_subset(1, 2));

    matching.unmatch(2, 3)?;
    assert!(!matching.is_matched(2));
    assert_eq!(matching.mate(3), None);
    assert_eq!(matching.size(&graph), 1);

    assert_eq!(
        matching.match_nodes(1, 2),
        Err(Error::AlreadyMatched { node: 1, mate: 0 })
    );
    Ok(())
}

#[test]
fn pair_without_edge_is_not_proper() -> Result<()> {
    let graph = path_of_four()?;
    let mut matching = Matching::new(4);
    matching.match_nodes(0, 3)?;
    assert!(!matching.is_proper(&graph));
    Ok(())
}

#[test]
fn two_isolated_nodes_give_two_singletons() {
    let graph = Graph::new(2, false);
    let partition = Matching::new(2).to_partition(&graph);
    assert_eq!(partition.len(), 2);
    assert_eq!(partition.number_of_subsets(), 2);
}

#[test]
fn loaded_graph_is_matched_by_external_ids() -> Result<()> {
    let instance = GraphLoader::from_json_str(
        r#"{
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
            "edges": [
                {"source": "a", "target": "b", "attributes": {"weight": 1.0}},
                {"source": "b", "target": "c", "attributes": {"weight": 3.0}},
                {"source": "c", "target": "d", "attributes": {"weight": 1.0}}
            ]
        }"#,
    )?;
    let graph = &instance.graph;

    let mut matcher = SuitorMatcher::new(graph, false, false)?;
    matcher.run()?;
    let matching = matcher.get_matching()?;

    let b = instance.node_id("b").expect("b");
    let c = instance.node_id("c").expect("c");
    assert!(matching.are_matched(b, c));
    assert_eq!(matching.size(graph), 1);
    assert_eq!(matching.weight(graph), 3.0);

    let mates: Vec<(&str, &str)> = matching
        .pairs()
        .map(|(u, v)| {
            (
                instance.external_id(u).map(String::as_str).unwrap_or("?"),
                instance.external_id(v).map(String::as_str).unwrap_or("?"),
            )
        })
        .collect();
    assert_eq!(mates, vec![("b", "c")]);
    Ok(())
}
