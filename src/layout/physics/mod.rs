mod forces;
mod quadtree;

use eframe::egui::Vec2;

use crate::graph::SocialGraph;

use super::LayoutConfig;
use forces::{accumulate_repulsion_for_node, repulsion_between, spring_on};
use quadtree::QuadNode;

fn free_indices(graph: &SocialGraph) -> Vec<usize> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.is_dragging())
        .map(|(index, _)| index)
        .collect()
}

fn clamp_axis(value: f32, margin: f32, extent: f32) -> f32 {
    if extent <= margin * 2.0 {
        extent * 0.5
    } else {
        value.clamp(margin, extent - margin)
    }
}

pub(crate) fn clamp_to_viewport(position: Vec2, viewport: Vec2, margin: f32) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, margin, viewport.x),
        clamp_axis(position.y, margin, viewport.y),
    )
}

/// Advances the simulation by one tick. Nodes being dragged take no part:
/// they neither feel nor exert forces and are never moved here.
///
/// Returns whether any free node is still moving.
pub fn step(graph: &mut SocialGraph, viewport: Vec2, config: &LayoutConfig) -> bool {
    let node_count = graph.len();
    if node_count == 0 {
        return false;
    }

    let positions = graph
        .nodes()
        .iter()
        .map(|node| node.position)
        .collect::<Vec<_>>();
    let free = free_indices(graph);
    let mut is_free = vec![false; node_count];
    for &index in &free {
        is_free[index] = true;
    }

    let mut forces = vec![Vec2::ZERO; node_count];

    if config.approximate_repulsion {
        if let Some(tree) = QuadNode::build(&positions, free.clone()) {
            for &index in &free {
                accumulate_repulsion_for_node(
                    &tree,
                    index,
                    &positions,
                    config.repulsion,
                    config.barnes_hut_theta,
                    &mut forces[index],
                );
            }
        }
    } else {
        for (offset, &i) in free.iter().enumerate() {
            for &j in &free[offset + 1..] {
                let push = repulsion_between(positions[i], positions[j], i, j, config.repulsion);
                forces[i] += push;
                forces[j] -= push;
            }
        }
    }

    for &(a, b) in graph.edges() {
        if !is_free[a] || !is_free[b] {
            continue;
        }
        let pull = spring_on(
            positions[a],
            positions[b],
            a,
            b,
            config.attraction,
            config.rest_length,
        );
        forces[a] += pull;
        forces[b] -= pull;
    }

    let center = viewport * 0.5;
    for &index in &free {
        forces[index] += (center - positions[index]) * config.gravity;
    }

    let margin = config.clamp_margin();
    let mut any_motion = false;
    for (index, node) in graph.nodes_mut().iter_mut().enumerate() {
        if !is_free[index] {
            continue;
        }

        let far = node
            .distance
            .is_none_or(|distance| distance > config.stable_distance);
        let (damping, time_step) = if far {
            (config.far_damping, config.far_time_step)
        } else {
            (config.damping, config.time_step)
        };

        node.force = forces[index];
        node.velocity = (node.velocity + node.force * time_step) * damping;
        node.position =
            clamp_to_viewport(node.position + node.velocity * time_step, viewport, margin);

        if node.velocity.length_sq() > 0.000_001 {
            any_motion = true;
        }
    }

    any_motion
}
