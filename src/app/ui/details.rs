use eframe::egui::{RichText, Ui};

use crate::graph::{SocialGraph, SocialNode, shortest_path};
use crate::layout::DistanceTier;

use super::super::ViewModel;

const HIDDEN_NAME: &str = "someone";

/// Display name as the privacy tiers allow it.
fn visible_name(node: &SocialNode) -> &str {
    if DistanceTier::for_distance(node.distance)
        .presentation()
        .show_name
    {
        node.name.as_str()
    } else {
        HIDDEN_NAME
    }
}

/// "You -> Ada -> someone -> Bo" for a path that starts at the root.
fn describe_path(graph: &SocialGraph, path: &[usize]) -> String {
    path.iter()
        .enumerate()
        .map(|(step, &index)| {
            if step == 0 {
                "You".to_owned()
            } else {
                visible_name(&graph.nodes()[index]).to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn tier_counts(graph: &SocialGraph) -> [(DistanceTier, usize); 5] {
    let mut counts = [
        (DistanceTier::Close, 0),
        (DistanceTier::FriendOfFriend, 0),
        (DistanceTier::ThirdDegree, 0),
        (DistanceTier::FourthDegree, 0),
        (DistanceTier::Hidden, 0),
    ];
    for node in graph.nodes() {
        let tier = DistanceTier::for_distance(node.distance);
        if let Some(entry) = counts.iter_mut().find(|(candidate, _)| *candidate == tier) {
            entry.1 += 1;
        }
    }
    counts
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(session) = self.session.as_ref() else {
            ui.label("Layout not started yet.");
            return;
        };
        let graph = session.graph();

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select someone on the canvas or in the friend list.");
            ui.separator();
            ui.label(RichText::new("People by distance").strong());
            for (tier, count) in tier_counts(graph) {
                ui.label(format!("{}: {count}", tier.label()));
            }
            return;
        };

        let Some(index) = graph.index_of(&selected_id) else {
            ui.label("Selected person is no longer in the graph.");
            return;
        };

        let node = &graph.nodes()[index];
        let tier = DistanceTier::for_distance(node.distance);
        let is_root = session.root_index() == Some(index);

        ui.label(RichText::new(visible_name(node)).strong());
        if is_root {
            ui.small("you");
        } else {
            ui.small(tier.label());
        }
        ui.add_space(6.0);

        match node.distance_code() {
            -1 => ui.label("Distance: not connected to you"),
            hops => ui.label(format!("Distance: {hops} hop(s)")),
        };
        ui.label(format!("Friends in graph: {}", graph.neighbors(index).len()));
        if tier.presentation().show_icon {
            ui.label(format!("Icon: {}", node.icon));
        }

        ui.separator();
        ui.label(RichText::new("How you're connected").strong());
        let path = session
            .root_index()
            .and_then(|root| shortest_path(graph, root, index));
        match path {
            Some(path) if path.len() > 1 => {
                ui.label(describe_path(graph, &path));
            }
            Some(_) => {
                ui.label("This is you.");
            }
            None => {
                ui.label("No chain of friends links you to this person.");
            }
        }

        ui.separator();
        ui.label(RichText::new("Their friends").strong());
        let mut neighbors = graph
            .neighbors(index)
            .iter()
            .map(|&neighbor| &graph.nodes()[neighbor])
            .collect::<Vec<_>>();
        neighbors.sort_by(|a, b| {
            a.distance
                .unwrap_or(u32::MAX)
                .cmp(&b.distance.unwrap_or(u32::MAX))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut next_selection = None;
        for neighbor in neighbors {
            let neighbor_tier = DistanceTier::for_distance(neighbor.distance);
            if neighbor_tier.is_visible() {
                if ui
                    .link(visible_name(neighbor))
                    .on_hover_text(neighbor_tier.label())
                    .clicked()
                {
                    next_selection = Some(neighbor.id.clone());
                }
            } else {
                ui.label(HIDDEN_NAME);
            }
        }

        if let Some(id) = next_selection {
            self.set_selected(Some(id));
        }
    }
}
