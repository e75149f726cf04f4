use eframe::egui::{self, Color32, RichText, Ui};
use siteswap_graph::InteractionEvent;

use super::super::ViewModel;
use super::super::render_utils::{INCOMING_COLOR, OUTGOING_COLOR};

struct Transition {
    node: usize,
    id: String,
    label: String,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(session) = self.host.session() else {
            ui.label("No graph loaded.");
            return;
        };
        let Some(selection) = session.selection() else {
            ui.label("Click a state in the graph or search for one.");
            return;
        };

        let graph = session.graph();
        let selected = selection.node;
        let Some(node) = graph.node(selected) else {
            ui.label("Selected state no longer exists in the graph.");
            return;
        };

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for edge in graph.edges() {
            if edge.target == selected {
                incoming.push(Transition {
                    node: edge.source,
                    id: graph.nodes()[edge.source].id.clone(),
                    label: edge.label.clone(),
                });
            }
            if edge.source == selected {
                outgoing.push(Transition {
                    node: edge.target,
                    id: graph.nodes()[edge.target].id.clone(),
                    label: edge.label.clone(),
                });
            }
        }

        let snapshot = session.id();
        ui.label(RichText::new(node.id.as_str()).monospace().strong());
        if session.ground_state() == Some(selected) {
            ui.small("ground state");
        }
        ui.add_space(6.0);

        let mut jump_to = None;
        egui::ScrollArea::vertical()
            .id_salt("transitions_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                transition_list(ui, "Incoming", INCOMING_COLOR, &incoming, &mut jump_to);
                ui.add_space(8.0);
                transition_list(ui, "Outgoing", OUTGOING_COLOR, &outgoing, &mut jump_to);
            });

        if let Some(node) = jump_to {
            self.host
                .dispatch(InteractionEvent::NodeSelected { snapshot, node });
        }
    }
}

fn transition_list(
    ui: &mut Ui,
    title: &str,
    color: Color32,
    transitions: &[Transition],
    jump_to: &mut Option<usize>,
) {
    ui.label(RichText::new(format!("{title} ({})", transitions.len())).color(color));
    if transitions.is_empty() {
        ui.small("none");
        return;
    }

    for transition in transitions {
        let text = format!("{}  via {}", transition.id, transition.label);
        if ui.link(RichText::new(text).monospace()).clicked() {
            *jump_to = Some(transition.node);
        }
    }
}
