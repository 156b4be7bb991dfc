use eframe::egui::{Vec2, vec2};

use crate::graph::SocialGraph;

/// Uniformly scales and recenters every node so the whole graph fits inside
/// `viewport` with `padding` on each side, preserving aspect ratio.
pub fn fit_to_viewport(graph: &mut SocialGraph, viewport: Vec2, padding: f32) {
    if graph.is_empty() {
        return;
    }

    let mut min = vec2(f32::INFINITY, f32::INFINITY);
    let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for node in graph.nodes() {
        min = min.min(node.position);
        max = max.max(node.position);
    }

    let bounds = (max - min).max(vec2(1.0, 1.0));
    let available = (viewport - vec2(padding, padding) * 2.0).max(vec2(1.0, 1.0));
    let scale = (available.x / bounds.x).min(available.y / bounds.y);

    let midpoint = (min + max) * 0.5;
    let offset = viewport * 0.5 - midpoint * scale;

    for node in graph.nodes_mut() {
        node.position = node.position * scale + offset;
    }
    log::debug!(
        "fit {} nodes into {:.0}x{:.0} (scale {scale:.3})",
        graph.len(),
        viewport.x,
        viewport.y
    );
}
