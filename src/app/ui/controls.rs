use std::ops::RangeInclusive;

use eframe::egui::{self, Ui, emath::Numeric};

use crate::graph::SocialGraph;
use crate::layout::{DistanceTier, LayoutConfig};

use super::super::{OUTSIDE_LARGEST_CLUSTER, ViewModel};

fn tuning_slider<T: Numeric>(
    ui: &mut Ui,
    value: &mut T,
    range: RangeInclusive<T>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hover)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name)")
            .on_hover_text("Highlight people whose visible name matches.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Names hidden by distance are never matched.");

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Keep the layout moving while the graph is on screen.");

        let mut config_changed = ui
            .checkbox(
                &mut self.config.approximate_repulsion,
                "Approximate repulsion (Barnes-Hut)",
            )
            .on_hover_text("Use a quadtree instead of the exact pairwise pass.")
            .changed();

        let cluster_changed = ui
            .checkbox(&mut self.largest_cluster_only, "Largest cluster only")
            .on_hover_text("Hide every group of people not connected to the biggest one.")
            .changed();
        if let Some(notice) = self.cluster_notice {
            ui.small(notice);
        }

        ui.collapsing("Physics tuning", |ui| {
            config_changed |= tuning_slider(
                ui,
                &mut self.config.repulsion,
                500.0..=30000.0,
                "Repulsion",
                "How strongly people push away from each other.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.attraction,
                0.005..=0.25,
                "Attraction",
                "Spring stiffness between friends.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.rest_length,
                30.0..=250.0,
                "Rest length",
                "Preferred distance between friends, in points.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.gravity,
                0.0..=0.1,
                "Gravity",
                "Pull toward the center of the canvas.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.damping,
                0.5..=0.99,
                "Damping (near)",
                "Velocity kept per tick for people within the stable distance.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.far_damping,
                0.2..=0.99,
                "Damping (far)",
                "Velocity kept per tick for distant people.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.stable_distance,
                1..=5,
                "Stable distance",
                "Hop count beyond which people move with the calmer far parameters.",
            );
            config_changed |= tuning_slider(
                ui,
                &mut self.config.tick_rate_hz,
                15.0..=120.0,
                "Tick rate (Hz)",
                "Physics steps per second.",
            );

            if ui.button("Reset to defaults").clicked() {
                self.config = LayoutConfig::default();
                config_changed = true;
            }
        });

        ui.separator();
        if ui
            .button("Refit layout")
            .on_hover_text("Rescale the current layout to the canvas and restart the loop.")
            .clicked()
            && let Some(session) = self.session.as_mut()
        {
            let graph = session.graph().clone();
            session.reload(graph);
        }

        if config_changed && let Some(session) = self.session.as_mut() {
            session.set_config(self.config.clone());
        }
        if cluster_changed {
            self.apply_cluster_filter();
        }

        ui.separator();
        egui::CollapsingHeader::new("Friends")
            .default_open(true)
            .show(ui, |ui| self.draw_friend_list(ui));
    }

    fn apply_cluster_filter(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.cluster_notice = None;
        if self.largest_cluster_only {
            if !session.restrict_to_largest_component() {
                self.largest_cluster_only = false;
                self.cluster_notice = Some(OUTSIDE_LARGEST_CLUSTER);
            }
        } else {
            session.reload(SocialGraph::from_response(
                &self.loaded.response,
                &self.loaded.profiles,
            ));
        }

        let still_present = self
            .selected
            .as_deref()
            .is_none_or(|id| session.graph().contains(id));
        if !still_present {
            self.set_selected(None);
        }
    }

    fn draw_friend_list(&mut self, ui: &mut Ui) {
        let Some(session) = self.session.as_ref() else {
            ui.label("Layout not started yet.");
            return;
        };

        let mut friends = session
            .graph()
            .nodes()
            .iter()
            .filter(|node| node.distance == Some(1))
            .map(|node| (node.name.clone(), node.id.clone()))
            .collect::<Vec<_>>();
        friends.sort();

        if friends.is_empty() {
            ui.label("No direct friends in this graph.");
            return;
        }

        let mut selected_id = None;
        egui::ScrollArea::vertical()
            .id_salt("friend_list_scroll")
            .max_height(260.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, friends.len(), |ui, row_range| {
                for (name, id) in &friends[row_range] {
                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    if ui
                        .selectable_label(is_selected, name.as_str())
                        .on_hover_text(DistanceTier::Close.label())
                        .clicked()
                    {
                        selected_id = Some(id.clone());
                    }
                }
            });

        if let Some(id) = selected_id {
            self.set_selected(Some(id));
        }
    }
}
