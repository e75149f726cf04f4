use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::warn;
use siteswap_graph::{
    DataIntegrityError, GraphPayload, GraphRequest, LayoutConfig, SessionHost, SnapshotId,
    TickResult,
};

mod graph;
mod render_utils;
mod ui;

type LoadResult = Result<(GraphRequest, GraphPayload), String>;

pub struct SiteswapGraphApp {
    request: GraphRequest,
    config: LayoutConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    host: SessionHost,
    request: GraphRequest,
    form_num_balls: usize,
    form_max_throw: usize,
    search: String,
    search_miss: bool,
    pattern: String,
    pattern_status: Option<Result<String, String>>,
    show_edge_labels: bool,
    ticks_per_frame: usize,
    last_tick: Option<TickResult>,
    active_drag: Option<(SnapshotId, usize)>,
    load_error: Option<String>,
}

impl SiteswapGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        request: GraphRequest,
        config: LayoutConfig,
    ) -> Self {
        let state = Self::start_load(request.clone());
        Self {
            request,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(request: GraphRequest) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = request
                .fetch()
                .map(|payload| (request, payload))
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(request: GraphRequest) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }
}

impl eframe::App for SiteswapGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok((request, payload))) => {
                        let mut model = ViewModel::new(self.config, request.clone());
                        transition = Some(match model.load(request, payload) {
                            Ok(()) => AppState::Ready(Box::new(model)),
                            Err(error) => AppState::Error(error.to_string()),
                        });
                    }
                    Ok(Err(error)) => {
                        warn!("graph load failed: {error}");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Building state graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the state graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.request.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_request = None;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_request, is_reloading);

                if let Some(request) = reload_request
                    && self.reload_rx.is_none()
                {
                    self.request = request.clone();
                    self.reload_rx = Some(Self::spawn_load(request));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok((request, payload))) => {
                            if let Err(error) = model.load(request, payload) {
                                model.load_error = Some(error.to_string());
                            }
                        }
                        Ok(Err(error)) => {
                            warn!("graph reload failed: {error}");
                            model.load_error = Some(error);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.load_error = Some("Background load worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(config: LayoutConfig, request: GraphRequest) -> Self {
        Self {
            host: SessionHost::new(config),
            form_num_balls: request.num_balls,
            form_max_throw: request.max_throw,
            request,
            search: String::new(),
            search_miss: false,
            pattern: String::new(),
            pattern_status: None,
            show_edge_labels: true,
            ticks_per_frame: 1,
            last_tick: None,
            active_drag: None,
            load_error: None,
        }
    }

    /// Replaces the displayed graph. On failure the previous graph stays up.
    fn load(
        &mut self,
        request: GraphRequest,
        payload: GraphPayload,
    ) -> Result<(), DataIntegrityError> {
        let graph = payload.into_snapshot().inspect_err(|error| {
            warn!("rejected graph payload: {error}");
        })?;
        self.host.load(graph, Some(&request.ground_state()));
        self.request = request;
        self.active_drag = None;
        self.last_tick = None;
        self.load_error = None;
        self.pattern_status = None;
        Ok(())
    }
}
