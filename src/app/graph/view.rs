use std::collections::HashSet;
use std::time::Duration;

use eframe::egui::{self, Align2, Color32, FontId, PointerButton, Pos2, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{SocialGraph, shortest_path};
use crate::layout::DistanceTier;

use super::super::ViewModel;
use super::super::render_utils::{avatar_color, blend_color, draw_background, initial, with_opacity};

const PATH_COLOR: Color32 = Color32::from_rgb(246, 206, 104);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const ANON_COLOR: Color32 = Color32::from_rgb(120, 128, 140);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices whose displayed name matches `query`. Names the privacy tiers
/// hide are never searched.
pub(in crate::app) fn search_matches(graph: &SocialGraph, query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            DistanceTier::for_distance(node.distance)
                .presentation()
                .show_name
        })
        .filter(|(_, node)| fuzzy_match_score(&matcher, &node.name, query).is_some())
        .map(|(index, _)| index)
        .collect()
}

fn path_edges(path: &[usize]) -> HashSet<(usize, usize)> {
    path.windows(2)
        .map(|pair| (pair[0].min(pair[1]), pair[0].max(pair[1])))
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.ensure_session(rect.size());
        self.handle_node_drag(ui, rect, &response);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = match (self.session.as_ref(), pointer) {
            (Some(session), Some(pointer)) => Self::node_at(session, rect, pointer),
            _ => None,
        };
        if hovered.is_some() && self.dragging.is_none() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let pending_selection = if response.clicked_by(PointerButton::Primary) {
            Some(hovered.and_then(|index| {
                self.session
                    .as_ref()
                    .map(|session| session.graph().nodes()[index].id.clone())
            }))
        } else {
            None
        };

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(0.0, 0.25);
        let live_physics = self.live_physics;

        let Some(session) = self.session.as_mut() else {
            return;
        };

        if live_physics && session.clock().is_running() {
            session.advance(Duration::from_secs_f32(frame_delta_seconds));
            ui.ctx().request_repaint_after(session.clock().interval());
        } else if self.dragging.is_some() {
            ui.ctx().request_repaint();
        }

        let graph = session.graph();
        let node_radius = session.config().node_radius;
        let tiers = graph
            .nodes()
            .iter()
            .map(|node| DistanceTier::for_distance(node.distance))
            .collect::<Vec<_>>();
        let screen = graph
            .nodes()
            .iter()
            .map(|node| rect.min + node.position)
            .collect::<Vec<Pos2>>();

        let selected_index = self.selected.as_deref().and_then(|id| graph.index_of(id));
        let path = match (session.root_index(), selected_index) {
            (Some(root), Some(selected)) => {
                shortest_path(graph, root, selected).unwrap_or_default()
            }
            _ => Vec::new(),
        };
        let path_nodes = path.iter().copied().collect::<HashSet<_>>();
        let path_edges = path_edges(&path);
        let matches = search_matches(graph, &self.search);
        let search_active = !self.search.trim().is_empty();

        for &(a, b) in graph.edges() {
            if !tiers[a].is_visible() || !tiers[b].is_visible() {
                continue;
            }

            let depth = tiers[a].max(tiers[b]);
            let fade = depth.presentation().blur / 16.0;
            let stroke = if path_edges.contains(&(a, b)) {
                Stroke::new(3.0, PATH_COLOR)
            } else {
                Stroke::new(
                    1.2,
                    Color32::from_rgba_unmultiplied(140, 150, 165, (170.0 * (1.0 - fade)) as u8),
                )
            };
            painter.line_segment([screen[a], screen[b]], stroke);
        }

        let mut selection_animating = false;
        for (index, node) in graph.nodes().iter().enumerate() {
            let tier = tiers[index];
            let look = tier.presentation();
            if !tier.is_visible() || look.opacity <= 0.0 {
                continue;
            }

            let position = screen[index];
            let is_root = session.root_index() == Some(index);
            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);
            let is_match = matches.contains(&index);

            let base = if look.show_icon {
                avatar_color(&node.id)
            } else {
                ANON_COLOR
            };
            let color = if is_match {
                blend_color(base, MATCH_COLOR, 0.7)
            } else if path_nodes.contains(&index) {
                blend_color(base, PATH_COLOR, 0.5)
            } else if search_active {
                blend_color(base, Color32::from_rgb(19, 23, 29), 0.45)
            } else {
                base
            };

            // Blur is approximated with translucent halos that widen with the tier.
            if look.blur > 0.0 {
                for ring in 1..=3 {
                    let spread = look.blur * ring as f32 / 3.0;
                    painter.circle_filled(
                        position,
                        node_radius + spread,
                        with_opacity(color, 0.18 * look.opacity),
                    );
                }
            }
            let fill_opacity = look.opacity * (1.0 - look.blur / 16.0);
            painter.circle_filled(position, node_radius, with_opacity(color, fill_opacity));

            if look.show_icon {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    initial(&node.name),
                    FontId::proportional(node_radius * 0.9),
                    Color32::from_gray(20),
                );
            }

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", node.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }
            if is_root || selection_mix > 0.0 || is_hovered {
                let ring_color = if is_root {
                    Color32::from_gray(240)
                } else {
                    blend_color(Color32::from_gray(200), PATH_COLOR, selection_mix)
                };
                painter.circle_stroke(
                    position,
                    node_radius + 3.0 + (1.0 - selection_mix) * 2.0,
                    Stroke::new(1.5 + selection_mix, ring_color),
                );
            }

            if look.show_name {
                let label_alpha = (255.0 * look.opacity * (1.0 - look.blur / 12.0)) as u8;
                painter.text(
                    position + vec2(0.0, node_radius + 4.0),
                    Align2::CENTER_TOP,
                    node.name.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_rgba_unmultiplied(238, 238, 238, label_alpha),
                );
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(index) = hovered {
            let node = &graph.nodes()[index];
            let tier = tiers[index];
            let hops = node.distance.map_or_else(String::new, |distance| {
                format!("  |  {distance} hop{}", if distance == 1 { "" } else { "s" })
            });
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}{hops}", node.name, tier.label()),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(selected) = pending_selection {
            self.apply_graph_selection(selected);
        }
    }
}
