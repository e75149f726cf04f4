use eframe::egui::{self, Context};
use siteswap_graph::{EngineState, GraphRequest};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_request: &mut Option<GraphRequest>,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("siteswap-graph");
                ui.separator();
                ui.label(self.source_label());
                if let Some(session) = self.host.session() {
                    ui.separator();
                    ui.label(format!(
                        "{} states, {} transitions",
                        session.graph().node_count(),
                        session.graph().edge_count()
                    ));
                }
                if is_loading {
                    ui.separator();
                    ui.spinner();
                }
            });
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui, reload_request, is_loading));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn source_label(&self) -> String {
        match &self.request.file {
            Some(path) => path.display().to_string(),
            None => format!(
                "{} balls, max throw {}",
                self.request.num_balls, self.request.max_throw
            ),
        }
    }

    pub(in crate::app) fn engine_status(&self) -> &'static str {
        match self.last_tick.map(|tick| tick.state) {
            Some(EngineState::Running) => "running",
            Some(EngineState::Idle) => "idle",
            None => "waiting",
        }
    }
}
