use eframe::egui::{self, PointerButton, Pos2, Rect, Ui, Vec2};

use crate::layout::{DistanceTier, LayoutSession};

use super::super::{OUTSIDE_LARGEST_CLUSTER, ViewModel};

const PICK_SLOP: f32 = 4.0;

impl ViewModel {
    /// Creates the session on the first frame the canvas size is known, and
    /// refits it whenever that size changes.
    pub(in crate::app) fn ensure_session(&mut self, viewport: Vec2) {
        if let Some(session) = self.session.as_mut() {
            if session.resize(viewport) {
                log::debug!("canvas resized to {:.0}x{:.0}", viewport.x, viewport.y);
            }
            return;
        }

        let mut session = LayoutSession::from_response(
            &self.loaded.response,
            &self.loaded.profiles,
            self.user_id.clone(),
            viewport,
            self.config.clone(),
        );
        if self.largest_cluster_only && !session.restrict_to_largest_component() {
            self.largest_cluster_only = false;
            self.cluster_notice = Some(OUTSIDE_LARGEST_CLUSTER);
        }
        self.session = Some(session);
    }

    /// Nearest visible node under `pointer`. Hidden people cannot be picked.
    pub(in crate::app) fn node_at(
        session: &LayoutSession,
        rect: Rect,
        pointer: Pos2,
    ) -> Option<usize> {
        let radius = session.config().node_radius + PICK_SLOP;
        session
            .graph()
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| DistanceTier::for_distance(node.distance).is_visible())
            .filter_map(|(index, node)| {
                let distance = ((rect.min + node.position) - pointer).length();
                (distance <= radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui.input(|input| input.pointer.press_origin());
            let grabbed = origin
                .and_then(|origin| Self::node_at(session, rect, origin))
                .map(|index| session.graph().nodes()[index].id.clone());
            if let Some(id) = grabbed
                && session.begin_drag(&id)
            {
                self.dragging = Some(id);
            }
        }

        let Some(id) = self.dragging.clone() else {
            return;
        };

        if response.dragged_by(PointerButton::Primary) {
            session.drag_by(&id, response.drag_delta());
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else {
            session.end_drag(&id);
            self.dragging = None;
        }
    }

    pub(in crate::app) fn apply_graph_selection(&mut self, selected: Option<String>) {
        if self.dragging.is_none() {
            self.set_selected(selected);
        }
    }
}
