use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::layout::Interaction;
use crate::store::ProfileDirectory;

use super::wire::GraphResponse;

#[derive(Clone, Debug)]
pub struct SocialNode {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Hop count from the session root; `None` until reached by a BFS.
    pub distance: Option<u32>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub force: Vec2,
    pub interaction: Interaction,
}

impl SocialNode {
    pub fn new(id: impl Into<String>, position: Vec2) -> Self {
        let id = id.into();
        Self {
            name: String::new(),
            icon: String::new(),
            id,
            distance: None,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            interaction: Interaction::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction == Interaction::Dragging
    }

    /// Distance with `-1` standing in for unreached nodes.
    pub fn distance_code(&self) -> i32 {
        self.distance
            .and_then(|distance| i32::try_from(distance).ok())
            .unwrap_or(-1)
    }
}

/// Nodes live in an arena indexed by position; `index_by_id` maps user ids
/// to slots. Adjacency is kept symmetric and edges are stored once as
/// `(low, high)` index pairs.
#[derive(Clone, Debug, Default)]
pub struct SocialGraph {
    nodes: Vec<SocialNode>,
    index_by_id: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_response(response: &GraphResponse, profiles: &ProfileDirectory) -> Self {
        let mut graph = Self::new();

        for wire_node in &response.nodes {
            if graph.index_by_id.contains_key(&wire_node.id) {
                log::warn!("duplicate node {} in graph response", wire_node.id);
                continue;
            }
            let index = graph.add_node(wire_node.id.as_str(), vec2(wire_node.x, wire_node.y));
            let profile = profiles.resolve(&wire_node.id);
            graph.nodes[index].name = profile.name;
            graph.nodes[index].icon = profile.icon;
        }

        let mut dropped = 0usize;
        for edge in &response.edges {
            if !graph.contains(&edge.source) || !graph.contains(&edge.target) {
                log::warn!("dropping dangling edge {} - {}", edge.source, edge.target);
                dropped += 1;
                continue;
            }
            graph.add_edge(&edge.source, &edge.target);
        }

        log::debug!(
            "client graph: {} nodes, {} edges ({dropped} dangling dropped)",
            graph.len(),
            graph.edge_count()
        );
        graph
    }

    /// Returns the slot of `id`, inserting a fresh node when it is new.
    pub fn add_node(&mut self, id: impl Into<String>, position: Vec2) -> usize {
        let id = id.into();
        if let Some(&index) = self.index_by_id.get(&id) {
            return index;
        }

        let index = self.nodes.len();
        self.index_by_id.insert(id.clone(), index);
        self.nodes.push(SocialNode::new(id, position));
        self.adjacency.push(Vec::new());
        index
    }

    /// Adds an undirected edge. Self-loops, duplicates in either direction
    /// and edges touching unknown ids are ignored.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.add_edge_between(a, b),
            _ => false,
        }
    }

    fn add_edge_between(&mut self, a: usize, b: usize) -> bool {
        if a == b || self.adjacency[a].contains(&b) {
            return false;
        }

        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edges.push((a.min(b), a.max(b)));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&SocialNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut SocialNode> {
        self.index_of(id).map(|index| &mut self.nodes[index])
    }

    pub fn nodes(&self) -> &[SocialNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [SocialNode] {
        &mut self.nodes
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Copies the nodes accepted by `keep` (with their current state) and
    /// every edge whose endpoints both survive.
    pub fn restricted_to(&self, keep: impl Fn(usize) -> bool) -> Self {
        let mut subgraph = Self::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if keep(index) {
                let slot = subgraph.add_node(node.id.as_str(), node.position);
                subgraph.nodes[slot] = node.clone();
            }
        }

        for &(a, b) in &self.edges {
            let (Some(a), Some(b)) = (
                subgraph.index_of(&self.nodes[a].id),
                subgraph.index_of(&self.nodes[b].id),
            ) else {
                continue;
            };
            subgraph.add_edge_between(a, b);
        }

        subgraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::wire::{WireEdge, WireNode};

    fn wire_node(id: &str) -> WireNode {
        WireNode {
            id: id.to_owned(),
            x: 0.0,
            y: 0.0,
        }
    }

    fn wire_edge(source: &str, target: &str) -> WireEdge {
        WireEdge {
            source: source.to_owned(),
            target: target.to_owned(),
        }
    }

    #[test]
    fn reverse_and_duplicate_edges_collapse() {
        let mut graph = SocialGraph::new();
        graph.add_node("A", Vec2::ZERO);
        graph.add_node("B", Vec2::ZERO);

        assert!(graph.add_edge("A", "B"));
        assert!(!graph.add_edge("B", "A"));
        assert!(!graph.add_edge("A", "B"));
        assert!(!graph.add_edge("A", "A"));
        assert!(!graph.add_edge("A", "Z"));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
    }

    #[test]
    fn response_dangling_edges_are_ignored() {
        let response = GraphResponse {
            nodes: vec![wire_node("U1"), wire_node("U2"), wire_node("U1")],
            edges: vec![
                wire_edge("U1", "U2"),
                wire_edge("U2", "U1"),
                wire_edge("U1", "ghost"),
            ],
        };

        let mut profiles = ProfileDirectory::new();
        profiles.insert("U1", Some("Ada".to_owned()), None);
        let graph = SocialGraph::from_response(&response, &profiles);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("U1").map(|node| node.name.as_str()), Some("Ada"));
        assert_eq!(
            graph.node("U2").map(|node| node.name.as_str()),
            Some("User U2")
        );
        assert!(graph.nodes().iter().all(|node| node.distance_code() == -1));
    }

    #[test]
    fn restriction_keeps_inner_edges_only() {
        let mut graph = SocialGraph::new();
        for id in ["A", "B", "C"] {
            graph.add_node(id, Vec2::ZERO);
        }
        graph.add_edge("A", "B");
        graph.add_edge("B", "C");
        graph.node_mut("B").unwrap().position = vec2(4.0, 2.0);

        let subgraph = graph.restricted_to(|index| index != 2);

        assert_eq!(subgraph.len(), 2);
        assert_eq!(subgraph.edge_count(), 1);
        assert_eq!(subgraph.node("B").unwrap().position, vec2(4.0, 2.0));
        assert!(!subgraph.contains("C"));
    }
}
