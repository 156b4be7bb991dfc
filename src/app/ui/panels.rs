use eframe::egui::{self, Align, Context, Layout};

use crate::layout::{DistanceTier, LayoutConfig, LayoutSession};

use super::super::{LoadedGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(user_id: String, loaded: LoadedGraph, config: LayoutConfig) -> Self {
        Self {
            user_id,
            loaded,
            config,
            session: None,
            live_physics: true,
            largest_cluster_only: false,
            cluster_notice: None,
            search: String::new(),
            selected: None,
            dragging: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("shakegraph");
                    ui.separator();
                    ui.label(format!("you: {}", self.display_name()));
                    ui.label(format!("people: {}", self.loaded.response.nodes.len()));
                    ui.label(format!("friendships: {}", self.loaded.response.edges.len()));
                    if let Some(session) = self.session.as_ref() {
                        ui.label(format!("clusters: {}", session.cluster_count()));
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = self.loop_status_text() {
                            ui.label(status);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    /// Stops the physics loop; called before the view is replaced.
    pub(in crate::app) fn teardown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.stop();
        }
        self.dragging = None;
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }

    /// True once the session exists but no longer holds the local user.
    pub(in crate::app) fn is_empty(&self) -> bool {
        self.session.as_ref().is_some_and(LayoutSession::is_empty)
    }

    fn display_name(&self) -> String {
        self.session
            .as_ref()
            .and_then(|session| session.graph().node(&self.user_id))
            .map(|node| node.name.clone())
            .unwrap_or_else(|| self.loaded.profiles.resolve(&self.user_id).name)
    }

    fn loop_status_text(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let visible = session
            .graph()
            .nodes()
            .iter()
            .filter(|node| DistanceTier::for_distance(node.distance).is_visible())
            .count();
        let state = if !self.live_physics {
            "paused"
        } else if session.clock().is_running() {
            "running"
        } else {
            "stopped"
        };
        Some(format!(
            "visible {visible}/{}  |  physics {state} (loop #{})",
            session.graph().len(),
            session.clock().generation()
        ))
    }
}
