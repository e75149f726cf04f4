use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Clamps a point into the viewport inset by `margin` on every side.
    pub fn contain(self, point: Vec2, margin: f32) -> Vec2 {
        vec2(
            contain_axis(point.x, self.width, margin),
            contain_axis(point.y, self.height, margin),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

fn contain_axis(value: f32, extent: f32, margin: f32) -> f32 {
    let low = margin;
    let high = extent - margin;
    if high < low || !value.is_finite() {
        return extent * 0.5;
    }
    value.clamp(low, high)
}

/// Every tunable constant of the force model, the engine and the projection.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport: Viewport,
    pub boundary_margin: f32,
    pub link_distance: f32,
    pub focus_link_distance: f32,
    pub charge_strength: f32,
    pub focus_charge_strength: f32,
    pub background_charge_strength: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
    pub barnes_hut_theta: f32,
    pub distance_min: f32,
    pub loop_radius: f32,
    pub label_offset_factor: f32,
    pub loop_label_lift: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            viewport: Viewport::default(),
            boundary_margin: 20.0,
            link_distance: 150.0,
            focus_link_distance: 100.0,
            charge_strength: -300.0,
            focus_charge_strength: -50.0,
            background_charge_strength: -600.0,
            center_strength: 1.0,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            barnes_hut_theta: 0.9,
            distance_min: 1.0,
            loop_radius: 10.0,
            label_offset_factor: 0.1,
            loop_label_lift: 32.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid layout config JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = LayoutConfig::from_json(r#"{ "link_distance": 90.0 }"#).unwrap();
        assert_eq!(config.link_distance, 90.0);
        assert_eq!(config.boundary_margin, 20.0);
        assert_eq!(config.charge_strength, -300.0);
    }

    #[test]
    fn alpha_decay_reaches_alpha_min_in_three_hundred_ticks() {
        let config = LayoutConfig::default();
        let alpha = (1.0 - config.alpha_decay).powi(300);
        assert!((alpha - config.alpha_min).abs() < 1e-4);
    }

    #[test]
    fn contain_clamps_and_collapses_narrow_viewports() {
        let viewport = Viewport::new(200.0, 30.0);
        let point = viewport.contain(vec2(-50.0, 10.0), 20.0);
        assert_eq!(point, vec2(20.0, 15.0));

        let point = viewport.contain(vec2(500.0, 10.0), 20.0);
        assert_eq!(point.x, 180.0);
    }
}
