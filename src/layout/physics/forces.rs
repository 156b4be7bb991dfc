use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const MIN_DISTANCE: f32 = 1.0;

/// Unit vector from `b` to `a`. Coincident points get a stable fallback
/// direction derived from their indices so they can still separate.
pub(super) fn direction_between(a: Vec2, b: Vec2, a_index: usize, b_index: usize) -> Vec2 {
    let delta = a - b;
    let length = delta.length();
    if length > 0.0001 {
        delta / length
    } else {
        let (low, high) = (a_index.min(b_index), a_index.max(b_index));
        let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
        let direction = vec2(angle.cos(), angle.sin());
        if a_index < b_index { direction } else { -direction }
    }
}

/// Coulomb-style push on `a` away from `b`: `strength / d^2`, `d >= 1`.
pub(super) fn repulsion_between(
    a: Vec2,
    b: Vec2,
    a_index: usize,
    b_index: usize,
    strength: f32,
) -> Vec2 {
    let distance = (a - b).length().max(MIN_DISTANCE);
    direction_between(a, b, a_index, b_index) * (strength / (distance * distance))
}

/// Hooke spring pulling `a` toward `b` when stretched past `rest_length`
/// and pushing it away when compressed.
pub(super) fn spring_on(
    a: Vec2,
    b: Vec2,
    a_index: usize,
    b_index: usize,
    strength: f32,
    rest_length: f32,
) -> Vec2 {
    let distance = (a - b).length();
    -direction_between(a, b, a_index, b_index) * (strength * (distance - rest_length))
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *force += repulsion_between(point, positions[other_index], index, other_index, strength);
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance = delta.length().max(MIN_DISTANCE);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < theta
        && node.mass > 1.0;

    if can_approximate {
        *force += (delta / distance) * (strength * node.mass / (distance * distance));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, strength, theta, force);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_follows_inverse_square() {
        let near = repulsion_between(vec2(10.0, 0.0), Vec2::ZERO, 0, 1, 100.0);
        let far = repulsion_between(vec2(20.0, 0.0), Vec2::ZERO, 0, 1, 100.0);
        assert!((near.x - 1.0).abs() < 1e-5);
        assert!((far.x - 0.25).abs() < 1e-5);
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn coincident_points_push_apart_finitely() {
        let on_a = repulsion_between(Vec2::ZERO, Vec2::ZERO, 3, 7, 100.0);
        let on_b = repulsion_between(Vec2::ZERO, Vec2::ZERO, 7, 3, 100.0);
        assert!(on_a.x.is_finite() && on_a.y.is_finite());
        assert!((on_a.length() - 100.0).abs() < 1e-3);
        assert!((on_a + on_b).length() < 1e-4);
    }

    #[test]
    fn spring_attracts_when_stretched_and_repels_when_compressed() {
        let stretched = spring_on(Vec2::ZERO, vec2(150.0, 0.0), 0, 1, 0.1, 100.0);
        let compressed = spring_on(Vec2::ZERO, vec2(50.0, 0.0), 0, 1, 0.1, 100.0);
        assert!((stretched.x - 5.0).abs() < 1e-4);
        assert!((compressed.x + 5.0).abs() < 1e-4);
    }
}
