use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

const PHYLLOTAXIS_RADIUS: f32 = 10.0;

/// Deterministic initial scatter: the `index`-th point of a sunflower spiral.
pub(crate) fn phyllotaxis(index: usize) -> Vec2 {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let radius = PHYLLOTAXIS_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(angle.cos(), angle.sin()) * radius
}

/// Unit direction used when two points coincide and no real direction exists.
pub(crate) fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

pub fn node_radius(id: &str) -> f32 {
    8.0 + id.chars().count() as f32 * 2.0
}
