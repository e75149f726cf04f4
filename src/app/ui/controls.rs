use eframe::egui::{self, Color32, Key, RichText, Ui};
use siteswap_graph::graph::siteswap::parse_pattern;
use siteswap_graph::{GraphRequest, InteractionEvent, PatternError};

use super::super::ViewModel;

const MAX_BALLS: usize = 12;
const MAX_THROW: usize = 14;

impl ViewModel {
    pub(in crate::app) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        reload_request: &mut Option<GraphRequest>,
        is_loading: bool,
    ) {
        ui.heading("State graph");
        ui.add_space(4.0);

        egui::Grid::new("graph_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Balls");
                ui.add(egui::DragValue::new(&mut self.form_num_balls).range(1..=MAX_BALLS));
                ui.end_row();

                ui.label("Max throw");
                ui.add(egui::DragValue::new(&mut self.form_max_throw).range(1..=MAX_THROW));
                ui.end_row();
            });

        if self.form_num_balls > self.form_max_throw {
            ui.colored_label(
                Color32::from_rgb(240, 128, 128),
                "More balls than the max throw gives an empty graph.",
            );
        }

        ui.add_space(4.0);
        let generate = ui.add_enabled(!is_loading, egui::Button::new("Generate"));
        if generate.clicked() {
            *reload_request = Some(GraphRequest::new(self.form_num_balls, self.form_max_throw));
        }

        if let Some(error) = &self.load_error {
            ui.add_space(4.0);
            ui.colored_label(Color32::from_rgb(240, 128, 128), error.as_str());
        }

        ui.separator();
        ui.heading("Search");
        ui.add_space(4.0);
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.search).hint_text("state, e.g. xx-x"),
        );
        if search.changed() {
            self.search_miss = false;
        }
        if search.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            self.select_search_match();
        }
        if self.search_miss {
            ui.small("No matching state.");
        }

        ui.horizontal(|ui| {
            if ui.button("Find").clicked() {
                self.select_search_match();
            }
            if ui.button("Clear selection").clicked() {
                self.clear_selection();
            }
        });

        ui.separator();
        ui.heading("Pattern");
        ui.add_space(4.0);
        let pattern =
            ui.add(egui::TextEdit::singleline(&mut self.pattern).hint_text("siteswap, e.g. 531"));
        if pattern.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            self.trace_pattern();
        }
        ui.horizontal(|ui| {
            if ui.button("Trace").clicked() {
                self.trace_pattern();
            }
            if ui.button("Clear").clicked() {
                self.clear_pattern();
            }
        });
        match &self.pattern_status {
            Some(Ok(summary)) => {
                ui.small(summary.as_str());
            }
            Some(Err(error)) => {
                ui.colored_label(Color32::from_rgb(240, 128, 128), error.as_str());
            }
            None => {}
        }

        ui.separator();
        ui.heading("View");
        ui.add_space(4.0);
        ui.checkbox(&mut self.show_edge_labels, "Show throw labels");
        ui.add(egui::Slider::new(&mut self.ticks_per_frame, 1..=8).text("ticks per frame"));

        ui.separator();
        ui.label(RichText::new("Engine").strong());
        ui.label(format!("State: {}", self.engine_status()));
        if let Some(tick) = self.last_tick {
            ui.label(format!("Alpha: {:.4}", tick.alpha));
        }
        if let Some(id) = self.host.current_id() {
            ui.small(format!("Snapshot {id}"));
        }
    }

    fn select_search_match(&mut self) {
        let Some(session) = self.host.session() else {
            return;
        };
        let Some(&node) = session.graph().search(self.search.trim()).first() else {
            self.search_miss = true;
            return;
        };

        let event = InteractionEvent::NodeSelected {
            snapshot: session.id(),
            node,
        };
        self.search_miss = false;
        self.host.dispatch(event);
    }

    fn trace_pattern(&mut self) {
        let max_throw = self.request.max_throw;
        let Some(session) = self.host.session_mut() else {
            return;
        };
        let max_throw = session
            .graph()
            .nodes()
            .first()
            .map_or(max_throw, |node| node.id.chars().count());

        let traced = parse_pattern(&self.pattern).and_then(|throws| {
            let trace = session.trace_pattern(&throws, max_throw)?;
            Ok(format!(
                "{} {}, {} orbit(s), {} of {} beats on distinct states{}",
                if trace.excited { "Excited" } else { "Ground" },
                trace.notation(),
                trace.orbit_count,
                trace.state_count(),
                trace.beats.len(),
                if trace.is_prime() { ", prime" } else { "" },
            ))
        });
        self.pattern_status = Some(traced.map_err(|error: PatternError| error.to_string()));
    }

    fn clear_pattern(&mut self) {
        if let Some(session) = self.host.session_mut() {
            session.clear_trace();
        }
        self.pattern.clear();
        self.pattern_status = None;
    }

    fn clear_selection(&mut self) {
        if let Some(snapshot) = self.host.current_id() {
            self.host
                .dispatch(InteractionEvent::BackgroundCleared { snapshot });
        }
    }
}
