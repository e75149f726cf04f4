use eframe::egui::Vec2;
use log::debug;

use super::forces::ForceModel;
use crate::config::{LayoutConfig, Viewport};
use crate::graph::{GraphNode, GraphSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickResult {
    pub ticks: usize,
    pub alpha: f32,
    pub state: EngineState,
}

/// Alpha-driven integrator. Owns no graph state; every call borrows the
/// snapshot and force model it advances.
#[derive(Clone, Debug)]
pub struct Simulation {
    alpha: f32,
    alpha_target: f32,
    alpha_min: f32,
    alpha_decay: f32,
    velocity_decay: f32,
    boundary_margin: f32,
    viewport: Viewport,
    state: EngineState,
    positions: Vec<Vec2>,
}

impl Simulation {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            velocity_decay: config.velocity_decay,
            boundary_margin: config.boundary_margin,
            viewport: config.viewport,
            state: EngineState::Running,
            positions: Vec::new(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn boundary_margin(&self) -> f32 {
        self.boundary_margin
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.state = EngineState::Running;
    }

    pub fn restart(&mut self) {
        self.state = EngineState::Running;
    }

    /// Raises alpha to at least `alpha` without ever lowering it.
    pub fn warm_to(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.state = EngineState::Running;
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advances at most `budget` ticks and stops early once the engine idles.
    /// `forces` must have been built for `graph`.
    pub(crate) fn step(
        &mut self,
        graph: &mut GraphSnapshot,
        forces: &ForceModel,
        budget: usize,
    ) -> TickResult {
        debug_assert_eq!(
            forces.charges().len(),
            graph.node_count(),
            "force model does not match the graph"
        );
        debug_assert_eq!(forces.link_distances().len(), graph.edge_count());

        let mut ticks = 0;
        if graph.is_empty() {
            self.state = EngineState::Idle;
        }

        while ticks < budget && self.state == EngineState::Running {
            self.tick(graph, forces);
            ticks += 1;
        }

        TickResult {
            ticks,
            alpha: self.alpha,
            state: self.state,
        }
    }

    fn tick(&mut self, graph: &mut GraphSnapshot, forces: &ForceModel) {
        let alpha = self.alpha;
        let (nodes, edges) = graph.parts_mut();

        forces.apply_center(nodes);
        forces.apply_many_body(nodes, alpha, &mut self.positions);
        forces.apply_links(nodes, edges, alpha);

        let friction = 1.0 - self.velocity_decay;
        for node in nodes.iter_mut() {
            if let Some(fixed) = node.fixed {
                node.position = fixed;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= friction;
                node.position += node.velocity;
            }
        }

        self.contain(nodes);

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        if self.alpha < self.alpha_min {
            debug!("simulation idle at alpha {:.5}", self.alpha);
            self.state = EngineState::Idle;
        }
    }

    /// Hard clamp of every node into the viewport inset by the boundary margin.
    pub(crate) fn contain(&self, nodes: &mut [GraphNode]) {
        for node in nodes {
            node.position = self.viewport.contain(node.position, self.boundary_margin);
        }
    }
}
