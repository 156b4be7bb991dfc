use eframe::egui::Vec2;

use crate::graph::SocialGraph;

use super::physics::clamp_to_viewport;

/// Pointer interaction state of a single node. Runs independently of the
/// simulation loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging,
}

/// `Idle -> Dragging`. The node is pinned until `end_drag`.
pub fn begin_drag(graph: &mut SocialGraph, id: &str) -> bool {
    let Some(node) = graph.node_mut(id) else {
        return false;
    };
    if node.is_dragging() {
        return false;
    }

    node.interaction = Interaction::Dragging;
    node.velocity = Vec2::ZERO;
    node.force = Vec2::ZERO;
    log::debug!("drag started on {id}");
    true
}

/// Moves a dragged node by the pointer delta, kept inside the viewport.
pub fn drag_by(
    graph: &mut SocialGraph,
    id: &str,
    delta: Vec2,
    viewport: Vec2,
    margin: f32,
) -> bool {
    let Some(node) = graph.node_mut(id) else {
        return false;
    };
    if !node.is_dragging() {
        return false;
    }

    node.position = clamp_to_viewport(node.position + delta, viewport, margin);
    true
}

/// `Dragging -> Idle`, committing the current position; the simulation
/// picks the node up again from rest.
pub fn end_drag(graph: &mut SocialGraph, id: &str) -> bool {
    let Some(node) = graph.node_mut(id) else {
        return false;
    };
    if !node.is_dragging() {
        return false;
    }

    node.interaction = Interaction::Idle;
    node.velocity = Vec2::ZERO;
    log::debug!(
        "drag ended on {id} at ({:.1}, {:.1})",
        node.position.x,
        node.position.y
    );
    true
}
