use std::time::Duration;

use eframe::egui::Vec2;

use crate::graph::{
    GraphResponse, SocialGraph, compute_distances, extract_largest_component,
    find_connected_components,
};
use crate::store::ProfileDirectory;

use super::LayoutConfig;
use super::clock::PhysicsClock;
use super::drag::{begin_drag, drag_by, end_drag};
use super::fit::fit_to_viewport;
use super::physics::step;

/// One visible graph screen: owns the node state, the viewport and the
/// single physics loop that animates them.
pub struct LayoutSession {
    graph: SocialGraph,
    root_id: String,
    viewport: Vec2,
    config: LayoutConfig,
    clock: PhysicsClock,
    cluster_count: usize,
}

impl LayoutSession {
    pub fn new(
        graph: SocialGraph,
        root_id: impl Into<String>,
        viewport: Vec2,
        config: LayoutConfig,
    ) -> Self {
        let clock = PhysicsClock::new(config.tick_rate_hz);
        let mut session = Self {
            graph: SocialGraph::new(),
            root_id: root_id.into(),
            viewport,
            config,
            clock,
            cluster_count: 0,
        };
        session.reload(graph);
        session
    }

    pub fn from_response(
        response: &GraphResponse,
        profiles: &ProfileDirectory,
        root_id: impl Into<String>,
        viewport: Vec2,
        config: LayoutConfig,
    ) -> Self {
        Self::new(
            SocialGraph::from_response(response, profiles),
            root_id,
            viewport,
            config,
        )
    }

    /// Swaps in a new node set: refit, recompute distances, restart the loop.
    pub fn reload(&mut self, graph: SocialGraph) {
        self.graph = graph;
        fit_to_viewport(&mut self.graph, self.viewport, self.config.padding);
        compute_distances(&mut self.graph, &self.root_id);
        self.cluster_count = find_connected_components(&self.graph).len();
        let generation = self.clock.start();
        log::info!(
            "layout session for {}: {} nodes, {} edges, {} clusters (loop #{generation})",
            self.root_id,
            self.graph.len(),
            self.graph.edge_count(),
            self.cluster_count
        );
    }

    /// Keeps only the biggest connected group. Refused, leaving the graph
    /// untouched, when the local user is not in that group: every remaining
    /// person would be unreachable and so hidden.
    pub fn restrict_to_largest_component(&mut self) -> bool {
        let largest = extract_largest_component(&self.graph);
        if !largest.contains(&self.root_id) {
            log::info!(
                "largest cluster ({} people) does not include {}; keeping the full graph",
                largest.len(),
                self.root_id
            );
            return false;
        }

        if largest.len() != self.graph.len() {
            self.reload(largest);
        }
        true
    }

    /// Refits to a new viewport size and restarts the loop. Returns `false`
    /// when the size did not change.
    pub fn resize(&mut self, viewport: Vec2) -> bool {
        if (viewport - self.viewport).length_sq() < 0.25 {
            return false;
        }

        self.viewport = viewport;
        fit_to_viewport(&mut self.graph, viewport, self.config.padding);
        self.clock.start();
        true
    }

    /// Runs the physics ticks owed for `elapsed`. Returns whether the
    /// layout changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let ticks = self.clock.advance(elapsed);
        let mut moving = false;
        for _ in 0..ticks {
            moving |= step(&mut self.graph, self.viewport, &self.config);
        }
        moving
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        log::debug!("layout session for {} stopped", self.root_id);
    }

    pub fn begin_drag(&mut self, id: &str) -> bool {
        begin_drag(&mut self.graph, id)
    }

    pub fn drag_by(&mut self, id: &str, delta: Vec2) -> bool {
        drag_by(
            &mut self.graph,
            id,
            delta,
            self.viewport,
            self.config.clamp_margin(),
        )
    }

    pub fn end_drag(&mut self, id: &str) -> bool {
        end_drag(&mut self.graph, id)
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        let rate_changed = config.tick_rate_hz != self.config.tick_rate_hz;
        self.config = config;
        if rate_changed {
            self.clock.set_rate(self.config.tick_rate_hz);
            self.clock.start();
        }
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn root_index(&self) -> Option<usize> {
        self.graph.index_of(&self.root_id)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn clock(&self) -> &PhysicsClock {
        &self.clock
    }

    /// Nothing to show: no nodes, or the local user has no connections.
    /// Number of separate friend groups in the current node set.
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn is_empty(&self) -> bool {
        self.root_index().is_none()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::graph::{WireEdge, WireNode};
    use crate::util::pseudo_random_coord;

    fn response(edges: &[(&str, &str)]) -> GraphResponse {
        let mut nodes: Vec<WireNode> = Vec::new();
        for id in edges.iter().flat_map(|(a, b)| [*a, *b]) {
            if nodes.iter().all(|node| node.id != id) {
                let (x, y) = pseudo_random_coord(id);
                nodes.push(WireNode {
                    id: id.to_owned(),
                    x,
                    y,
                });
            }
        }
        GraphResponse {
            nodes,
            edges: edges
                .iter()
                .map(|(source, target)| WireEdge {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                })
                .collect(),
        }
    }

    fn session(edges: &[(&str, &str)]) -> LayoutSession {
        LayoutSession::from_response(
            &response(edges),
            &ProfileDirectory::new(),
            "U1",
            vec2(390.0, 700.0),
            LayoutConfig::default(),
        )
    }

    #[test]
    fn load_fits_and_tags_distances() {
        let session = session(&[("U1", "U2"), ("U2", "U3"), ("U3", "U4")]);
        let graph = session.graph();

        let distances = ["U1", "U2", "U3", "U4"].map(|id| graph.node(id).unwrap().distance);
        assert_eq!(distances, [Some(0), Some(1), Some(2), Some(3)]);
        for node in graph.nodes() {
            assert!(node.position.x >= 49.9 && node.position.x <= 340.1);
            assert!(node.position.y >= 49.9 && node.position.y <= 650.1);
        }
        assert!(session.clock().is_running());
        assert!(!session.is_empty());
    }

    #[test]
    fn resize_refits_and_restarts_loop() {
        let mut session = session(&[("U1", "U2"), ("U1", "U3")]);
        let generation = session.clock().generation();

        assert!(!session.resize(vec2(390.0, 700.0)));
        assert!(session.resize(vec2(1024.0, 768.0)));
        assert!(session.clock().generation() > generation);
        for node in session.graph().nodes() {
            assert!(node.position.x <= 1024.0 - 49.9);
        }
    }

    #[test]
    fn stopped_session_stops_moving() {
        let mut session = session(&[("U1", "U2"), ("U1", "U3")]);
        assert!(session.advance(Duration::from_millis(50)));

        session.stop();
        let frozen = session
            .graph()
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert!(!session.advance(Duration::from_millis(500)));
        let after = session
            .graph()
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert_eq!(frozen, after);
    }

    #[test]
    fn dragged_node_stays_under_pointer_while_loop_runs() {
        let mut session = session(&[("U1", "U2"), ("U1", "U3")]);
        assert!(session.begin_drag("U2"));
        let start = session.graph().node("U2").unwrap().position;

        session.drag_by("U2", vec2(10.0, 5.0));
        session.advance(Duration::from_millis(100));
        let held = session.graph().node("U2").unwrap().position;
        assert!((held - (start + vec2(10.0, 5.0))).length() < 1e-4);

        assert!(session.end_drag("U2"));
        session.advance(Duration::from_millis(100));
        assert!(!session.graph().node("U2").unwrap().is_dragging());
    }

    #[test]
    fn requester_outside_graph_is_empty() {
        let session = session(&[("U7", "U8")]);
        assert!(session.is_empty());
        assert!(session.graph().nodes().iter().all(|node| node.distance.is_none()));
    }

    #[test]
    fn largest_component_filter_drops_small_clusters() {
        let mut session = session(&[("U1", "U2"), ("U2", "U3"), ("U7", "U8")]);
        assert_eq!(session.cluster_count(), 2);
        assert!(session.restrict_to_largest_component());
        assert_eq!(session.cluster_count(), 1);

        assert_eq!(session.graph().len(), 3);
        assert!(!session.graph().contains("U7"));
        assert_eq!(session.graph().node("U3").unwrap().distance, Some(2));
    }

    #[test]
    fn largest_component_filter_never_drops_the_requester() {
        let mut session = session(&[("U1", "U2"), ("A", "B"), ("B", "C")]);
        assert!(!session.restrict_to_largest_component());

        assert_eq!(session.graph().len(), 5);
        assert_eq!(session.cluster_count(), 2);
        assert!(!session.is_empty());
        assert_eq!(session.graph().nodes()[session.root_index().unwrap()].distance, Some(0));
        assert_eq!(session.graph().node("U2").unwrap().distance, Some(1));
    }

    #[test]
    fn tick_rate_change_keeps_loop_numbering() {
        let mut session = session(&[("U1", "U2")]);
        session.resize(vec2(800.0, 600.0));
        let generation = session.clock().generation();

        session.set_config(LayoutConfig {
            tick_rate_hz: 30.0,
            ..LayoutConfig::default()
        });
        assert!(session.clock().generation() > generation);
        assert!(session.clock().is_running());
        assert!((session.clock().interval().as_secs_f32() - 1.0 / 30.0).abs() < 1e-4);
    }
}
