use eframe::egui::{self, CursorIcon, PointerButton, Rect, Ui};
use log::debug;
use siteswap_graph::{EventOutcome, InteractionEvent};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

impl ViewModel {
    /// Turns primary-button clicks and drags on the canvas into interaction
    /// events for the active snapshot.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let Some(snapshot) = self.host.current_id() else {
            return;
        };

        if response.drag_started_by(PointerButton::Primary) && self.active_drag.is_none() {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            let node = origin.and_then(|origin| {
                self.host
                    .session()
                    .and_then(|session| session.node_at(screen_to_world(rect, origin)))
            });

            if let Some(node) = node {
                let outcome = self
                    .host
                    .dispatch(InteractionEvent::DragStarted { snapshot, node });
                if outcome == EventOutcome::Applied {
                    self.active_drag = Some((snapshot, node));
                }
            }
        }

        if let Some((drag_snapshot, node)) = self.active_drag {
            if response.dragged_by(PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let outcome = self.host.dispatch(InteractionEvent::DragMoved {
                    snapshot: drag_snapshot,
                    node,
                    pointer: screen_to_world(rect, pointer),
                });
                if outcome == EventOutcome::Stale {
                    debug!("abandoning drag of node {node} from snapshot {drag_snapshot}");
                    self.active_drag = None;
                }
            }

            if response.drag_stopped() {
                self.host.dispatch(InteractionEvent::DragEnded {
                    snapshot: drag_snapshot,
                    node,
                });
                self.active_drag = None;
            }
        }

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let event = self
                .host
                .session()
                .map(|session| session.click_at(screen_to_world(rect, pointer)));
            if let Some(event) = event {
                self.host.dispatch(event);
            }
        }

        if self.active_drag.is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if let Some(hover) = response.hover_pos()
            && self
                .host
                .session()
                .and_then(|session| session.node_at(screen_to_world(rect, hover)))
                .is_some()
        {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }
    }
}
