use std::collections::{HashSet, VecDeque};

use super::social::SocialGraph;

/// Breadth-first hop counts from `root_id`. Every node is reset to unreached
/// first; nodes outside the root's component stay unreached.
///
/// Returns `false` and leaves the graph untouched when the root is unknown.
pub fn compute_distances(graph: &mut SocialGraph, root_id: &str) -> bool {
    let Some(root) = graph.index_of(root_id) else {
        log::warn!("distance root {root_id} is not in the graph");
        return false;
    };

    let mut distances = vec![None; graph.len()];
    distances[root] = Some(0u32);
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[current].map(|distance| distance + 1);
        for &next in graph.neighbors(current) {
            if distances[next].is_none() {
                distances[next] = next_distance;
                queue.push_back(next);
            }
        }
    }

    for (node, distance) in graph.nodes_mut().iter_mut().zip(distances) {
        node.distance = distance;
    }
    true
}

fn component_indices(graph: &SocialGraph) -> Vec<Vec<usize>> {
    let mut visited = vec![false; graph.len()];
    let mut components = Vec::new();

    for start in 0..graph.len() {
        if visited[start] {
            continue;
        }

        visited[start] = true;
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            component.push(current);
            for &next in graph.neighbors(current) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Partitions every node id into connected components, in discovery order.
pub fn find_connected_components(graph: &SocialGraph) -> Vec<Vec<String>> {
    component_indices(graph)
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|index| graph.nodes()[index].id.clone())
                .collect()
        })
        .collect()
}

/// The component with the most nodes; the first one found wins ties.
pub fn extract_largest_component(graph: &SocialGraph) -> SocialGraph {
    let mut largest: Option<Vec<usize>> = None;
    for component in component_indices(graph) {
        if largest
            .as_ref()
            .is_none_or(|current| component.len() > current.len())
        {
            largest = Some(component);
        }
    }

    let keep = largest
        .map(|component| component.into_iter().collect::<HashSet<_>>())
        .unwrap_or_default();
    graph.restricted_to(|index| keep.contains(&index))
}

/// Node indices along one shortest path from `from` to `to`, both ends
/// included.
pub fn shortest_path(graph: &SocialGraph, from: usize, to: usize) -> Option<Vec<usize>> {
    if from >= graph.len() || to >= graph.len() {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let mut queue = VecDeque::from([from]);
    let mut visited = vec![false; graph.len()];
    let mut parent = vec![usize::MAX; graph.len()];
    visited[from] = true;

    while let Some(node) = queue.pop_front() {
        if node == to {
            break;
        }

        for &next in graph.neighbors(node) {
            if !visited[next] {
                visited[next] = true;
                parent[next] = node;
                queue.push_back(next);
            }
        }
    }

    if !visited[to] {
        return None;
    }

    let mut path = vec![to];
    let mut cursor = to;
    while cursor != from {
        let prev = parent[cursor];
        if prev == usize::MAX {
            return None;
        }
        path.push(prev);
        cursor = prev;
    }

    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::Vec2;

    use super::*;

    fn graph_of(ids: &[&str], edges: &[(&str, &str)]) -> SocialGraph {
        let mut graph = SocialGraph::new();
        for id in ids {
            graph.add_node(*id, Vec2::ZERO);
        }
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    fn distances(graph: &SocialGraph) -> HashMap<String, i32> {
        graph
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), node.distance_code()))
            .collect()
    }

    #[test]
    fn path_distances_count_hops() {
        let mut graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(compute_distances(&mut graph, "A"));

        let distances = distances(&graph);
        assert_eq!(distances["A"], 0);
        assert_eq!(distances["B"], 1);
        assert_eq!(distances["C"], 2);
    }

    #[test]
    fn shortcut_wins_over_long_way_round() {
        let mut graph = graph_of(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("A", "E")],
        );
        compute_distances(&mut graph, "A");

        let distances = distances(&graph);
        assert_eq!(distances["E"], 1);
        assert_eq!(distances["D"], 2);
        assert_eq!(distances["C"], 2);
    }

    #[test]
    fn unreachable_nodes_stay_unreached_after_reset() {
        let mut graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        compute_distances(&mut graph, "C");
        compute_distances(&mut graph, "A");

        let distances = distances(&graph);
        assert_eq!(distances["A"], 0);
        assert_eq!(distances["B"], 1);
        assert_eq!(distances["C"], -1);
        assert_eq!(distances["D"], -1);
    }

    #[test]
    fn unknown_root_is_a_no_op() {
        let mut graph = graph_of(&["A", "B"], &[("A", "B")]);
        compute_distances(&mut graph, "A");

        assert!(!compute_distances(&mut graph, "nobody"));
        assert_eq!(distances(&graph)["B"], 1);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let mut graph = SocialGraph::new();
        assert!(!compute_distances(&mut graph, "A"));
        assert!(find_connected_components(&graph).is_empty());
        assert!(extract_largest_component(&graph).is_empty());
    }

    #[test]
    fn two_disjoint_edges_make_two_components() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        let components = find_connected_components(&graph);

        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|component| component.len() == 2));
        assert_eq!(components[0], vec!["A", "B"]);
        assert_eq!(components[1], vec!["C", "D"]);
    }

    #[test]
    fn largest_component_keeps_only_its_edges() {
        let graph = graph_of(
            &["x1", "A", "B", "C", "D", "E", "x2"],
            &[
                ("x1", "x2"),
                ("A", "B"),
                ("B", "C"),
                ("C", "D"),
                ("D", "E"),
                ("E", "A"),
            ],
        );

        let largest = extract_largest_component(&graph);

        let ids = largest
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(ids, HashSet::from(["A", "B", "C", "D", "E"]));
        assert_eq!(largest.edge_count(), 5);
        for &(a, b) in largest.edges() {
            assert!(a < largest.len() && b < largest.len());
        }
    }

    #[test]
    fn largest_component_ties_go_to_first_found() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("C", "D"), ("A", "B")]);
        let largest = extract_largest_component(&graph);
        assert!(largest.contains("A") && largest.contains("B"));
        assert_eq!(largest.len(), 2);
    }

    #[test]
    fn shortest_path_walks_through_friends() {
        let graph = graph_of(
            &["me", "a", "b", "c"],
            &[("me", "a"), ("a", "b"), ("b", "c"), ("me", "b")],
        );
        let path = shortest_path(&graph, 0, 3).unwrap();
        let ids = path
            .iter()
            .map(|&index| graph.nodes()[index].id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["me", "b", "c"]);

        assert_eq!(shortest_path(&graph, 2, 2), Some(vec![2]));
        assert_eq!(shortest_path(&graph, 0, 9), None);
    }
}
