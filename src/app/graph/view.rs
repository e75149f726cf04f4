use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui};
use siteswap_graph::{EdgePath, Viewport};

use super::super::ViewModel;
use super::super::render_utils::{
    GROUND_STATE_COLOR, LABEL_COLOR, PATTERN_COLOR, arrowhead, draw_background, edge_color, node_fill,
    world_to_screen,
};

const NODE_LABEL_COLOR: Color32 = Color32::from_rgb(20, 24, 30);
const PATTERN_UNDERLAY_WIDTH: f32 = 6.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.host
            .set_viewport(Viewport::new(rect.width(), rect.height()));
        self.handle_graph_pointer(ui, rect, &response);
        self.last_tick = self.host.step(self.ticks_per_frame);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let Some(session) = self.host.session() else {
            return;
        };
        let graph = session.graph();
        if graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "This pattern family has no states.",
                FontId::proportional(16.0),
                LABEL_COLOR,
            );
            return;
        }

        let frame = session.frame();

        for glyph in &frame.edges {
            let edge = &graph.edges()[glyph.edge];
            let stroke = Stroke::new(glyph.style.width, edge_color(glyph.style.tone));
            let underlay = glyph
                .in_trace
                .then(|| Stroke::new(PATTERN_UNDERLAY_WIDTH, PATTERN_COLOR.gamma_multiply(0.6)));

            match glyph.path {
                EdgePath::Curve {
                    start,
                    control,
                    end,
                } => {
                    let points = [start, control, end].map(|point| world_to_screen(rect, point));
                    if let Some(underlay) = underlay {
                        painter.add(QuadraticBezierShape::from_points_stroke(
                            points,
                            false,
                            Color32::TRANSPARENT,
                            underlay,
                        ));
                    }
                    painter.add(QuadraticBezierShape::from_points_stroke(
                        points,
                        false,
                        Color32::TRANSPARENT,
                        stroke,
                    ));

                    if glyph.arrow
                        && let Some(direction) = glyph.path.end_tangent()
                    {
                        let target_radius = frame.nodes[edge.target].radius;
                        let tip = world_to_screen(rect, end - direction * target_radius);
                        painter.add(arrowhead(tip, direction, stroke.color));
                    }
                }
                EdgePath::Loop { center, radius, .. } => {
                    if let Some(underlay) = underlay {
                        painter.circle_stroke(world_to_screen(rect, center), radius, underlay);
                    }
                    painter.circle_stroke(world_to_screen(rect, center), radius, stroke);
                }
            }

            if self.show_edge_labels {
                painter.text(
                    world_to_screen(rect, glyph.label_position),
                    Align2::CENTER_CENTER,
                    edge.label.as_str(),
                    FontId::proportional(12.0),
                    LABEL_COLOR,
                );
            }
        }

        for glyph in &frame.nodes {
            let center = world_to_screen(rect, glyph.position);
            painter.circle_filled(center, glyph.radius, node_fill(glyph.tone));
            if glyph.in_trace {
                painter.circle_stroke(center, glyph.radius + 5.0, Stroke::new(2.0, PATTERN_COLOR));
            }
            if glyph.ground_state {
                painter.circle_stroke(
                    center,
                    glyph.radius + 2.0,
                    Stroke::new(2.0, GROUND_STATE_COLOR),
                );
            }
            painter.text(
                center,
                Align2::CENTER_CENTER,
                graph.nodes()[glyph.node].id.as_str(),
                FontId::monospace(10.0),
                NODE_LABEL_COLOR,
            );
        }

        if session.simulation().is_running() {
            ui.ctx().request_repaint();
        }
    }
}
