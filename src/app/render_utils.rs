use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use siteswap_graph::{EdgeTone, NodeTone};

pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 215, 0);
pub(super) const INCOMING_COLOR: Color32 = Color32::from_rgb(240, 128, 128);
pub(super) const OUTGOING_COLOR: Color32 = Color32::from_rgb(144, 238, 144);
pub(super) const NODE_COLOR: Color32 = Color32::from_rgb(70, 130, 180);
pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(153, 153, 153);
pub(super) const GROUND_STATE_COLOR: Color32 = Color32::from_rgb(220, 20, 60);
pub(super) const PATTERN_COLOR: Color32 = Color32::from_rgb(186, 85, 211);
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(210, 214, 220);

const ARROW_LENGTH: f32 = 9.0;
const ARROW_HALF_WIDTH: f32 = 4.5;

pub(super) fn node_fill(tone: NodeTone) -> Color32 {
    match tone {
        NodeTone::Default => NODE_COLOR,
        NodeTone::Selected => SELECTED_COLOR,
        NodeTone::Incoming => INCOMING_COLOR,
        NodeTone::Outgoing => OUTGOING_COLOR,
    }
}

pub(super) fn edge_color(tone: EdgeTone) -> Color32 {
    match tone {
        EdgeTone::Default => EDGE_COLOR,
        EdgeTone::Outgoing => OUTGOING_COLOR,
        EdgeTone::Incoming => INCOMING_COLOR,
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

/// Layout coordinates are relative to the canvas' top-left corner.
pub(super) fn world_to_screen(rect: Rect, world: Vec2) -> Pos2 {
    rect.min + world
}

pub(super) fn screen_to_world(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}

/// Filled triangle whose tip touches `tip`, pointing along `direction`.
pub(super) fn arrowhead(tip: Pos2, direction: Vec2, color: Color32) -> Shape {
    let back = tip - direction * ARROW_LENGTH;
    let side = direction.rot90() * ARROW_HALF_WIDTH;
    Shape::convex_polygon(vec![tip, back + side, back - side], color, Stroke::NONE)
}
