use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::layout::{LayoutConfig, LayoutSession};

mod graph;
mod load;
mod render_utils;
mod ui;

pub use load::{GraphSource, LoadFailure, LoadRequest, LoadedGraph, fetch_graph, load_graph};

type LoadResult = Result<LoadedGraph, LoadFailure>;

const OUTSIDE_LARGEST_CLUSTER: &str =
    "You are not part of the largest cluster, so everyone stays on screen.";

pub struct ShakeGraphApp {
    request: LoadRequest,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Empty,
    Error(LoadFailure),
}

struct ViewModel {
    user_id: String,
    loaded: LoadedGraph,
    config: LayoutConfig,
    session: Option<LayoutSession>,
    live_physics: bool,
    largest_cluster_only: bool,
    cluster_notice: Option<&'static str>,
    search: String,
    selected: Option<String>,
    dragging: Option<String>,
}

impl ShakeGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, request: LoadRequest) -> Self {
        let state = Self::start_load(request.clone());
        Self {
            request,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(request: LoadRequest) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(load_graph(&request));
        });

        rx
    }

    fn start_load(request: LoadRequest) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }

    fn settle(&self, result: LoadResult) -> AppState {
        match result {
            Ok(loaded) if loaded.response.is_empty() => {
                log::info!("no connections for {}", self.request.user_id);
                AppState::Empty
            }
            Ok(loaded) if !loaded.contains_user(&self.request.user_id) => AppState::Empty,
            Ok(loaded) => AppState::Ready(Box::new(ViewModel::new(
                self.request.user_id.clone(),
                loaded,
                self.request.config.clone(),
            ))),
            Err(failure) => AppState::Error(failure),
        }
    }
}

impl eframe::App for ShakeGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut restart = false;
        let mut emptied = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err(LoadFailure::fatal(
                            "Background load worker disconnected",
                        )));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading your encounter graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Empty => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("No connections yet");
                        ui.add_space(6.0);
                        ui.label("Shake phones with someone to add your first friend.");
                        ui.add_space(10.0);
                        restart = ui.button("Check again").clicked();
                    });
                });
            }
            AppState::Error(failure) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the encounter graph");
                    ui.add_space(6.0);
                    ui.label(failure.message.as_str());
                    ui.add_space(10.0);
                    if failure.retryable {
                        restart = ui.button("Retry").clicked();
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);
                emptied = model.is_empty();

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.request.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err(LoadFailure::fatal(
                                "Background load worker disconnected",
                            )));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.teardown();
            }
            self.reload_rx = None;
            self.state = self.settle(result);
        } else if emptied {
            if let AppState::Ready(model) = &mut self.state {
                model.teardown();
            }
            log::info!("{} is no longer in the graph", self.request.user_id);
            self.reload_rx = None;
            self.state = AppState::Empty;
        } else if restart {
            self.state = Self::start_load(self.request.clone());
        }
    }
}
