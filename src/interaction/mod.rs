//! Pointer-driven control of a running layout.
//!
//! Every [`InteractionEvent`] names the snapshot it was produced against. A
//! [`SimulationSession`] applies events for its own snapshot and reports
//! anything else as [`EventOutcome::Stale`], so input that raced a graph reload
//! can never touch the new graph's nodes.

use std::collections::HashSet;
use std::fmt;

use eframe::egui::Vec2;
use log::{debug, info};

use crate::config::{LayoutConfig, Viewport};
use crate::error::PatternError;
use crate::graph::{GraphSnapshot, Neighbors};
use crate::layout::{ForceModel, Simulation, TickResult};
use crate::projection::{self, TickFrame};
use crate::util::node_radius;

mod highlight;
mod trace;

pub use highlight::{
    DEFAULT_EDGE_WIDTH, EdgeStyle, EdgeTone, FOCUSED_EDGE_WIDTH, HighlightState, NodeTone,
};
pub use trace::PatternTrace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(u64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    NodeSelected { snapshot: SnapshotId, node: usize },
    BackgroundCleared { snapshot: SnapshotId },
    DragStarted { snapshot: SnapshotId, node: usize },
    DragMoved { snapshot: SnapshotId, node: usize, pointer: Vec2 },
    DragEnded { snapshot: SnapshotId, node: usize },
}

impl InteractionEvent {
    pub fn snapshot(&self) -> SnapshotId {
        match *self {
            Self::NodeSelected { snapshot, .. }
            | Self::BackgroundCleared { snapshot }
            | Self::DragStarted { snapshot, .. }
            | Self::DragMoved { snapshot, .. }
            | Self::DragEnded { snapshot, .. } => snapshot,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The event was produced against a graph that is no longer loaded.
    Stale,
    /// The event names a node that is out of range or not in the required
    /// state (for example a drag move without a drag start).
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub node: usize,
    pub neighbors: Neighbors,
}

pub struct SimulationSession {
    id: SnapshotId,
    graph: GraphSnapshot,
    forces: ForceModel,
    simulation: Simulation,
    highlight: HighlightState,
    selection: Option<Selection>,
    dragging: HashSet<usize>,
    ground_state: Option<usize>,
    trace: Option<PatternTrace>,
    config: LayoutConfig,
}

impl SimulationSession {
    pub fn new(
        id: SnapshotId,
        mut graph: GraphSnapshot,
        config: &LayoutConfig,
        ground_state: Option<&str>,
    ) -> Self {
        graph.scatter_around(config.viewport.center());
        let forces = ForceModel::new(&graph, config);
        let simulation = Simulation::new(config);
        let highlight = HighlightState::cleared(&graph);
        let ground_state = ground_state.and_then(|id| graph.index_of(id));

        Self {
            id,
            graph,
            forces,
            simulation,
            highlight,
            selection: None,
            dragging: HashSet::new(),
            ground_state,
            trace: None,
            config: *config,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn graph(&self) -> &GraphSnapshot {
        &self.graph
    }

    pub fn forces(&self) -> &ForceModel {
        &self.forces
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn ground_state(&self) -> Option<usize> {
        self.ground_state
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn trace(&self) -> Option<&PatternTrace> {
        self.trace.as_ref()
    }

    /// Marks the states and throws of `pattern` in this graph. Layout forces
    /// and the current selection are left alone. A failed trace keeps the
    /// previous one.
    pub fn trace_pattern(
        &mut self,
        pattern: &[usize],
        max_throw: usize,
    ) -> Result<&PatternTrace, PatternError> {
        let trace = PatternTrace::resolve(&self.graph, pattern, max_throw)?;
        debug!(
            "traced {} over {} states in snapshot {}",
            trace.notation(),
            trace.state_count(),
            self.id
        );
        Ok(self.trace.insert(trace))
    }

    pub fn clear_trace(&mut self) {
        self.trace = None;
    }

    pub fn is_dragging(&self, node: usize) -> bool {
        self.dragging.contains(&node)
    }

    pub fn step(&mut self, budget: usize) -> TickResult {
        self.simulation.step(&mut self.graph, &self.forces, budget)
    }

    pub fn frame(&self) -> TickFrame {
        projection::project(
            &self.graph,
            &self.highlight,
            self.simulation.viewport(),
            &self.config,
            self.ground_state,
            self.trace.as_ref(),
        )
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.simulation.viewport() == viewport {
            return;
        }

        self.config.viewport = viewport;
        self.simulation.set_viewport(viewport);
        self.forces.set_center(viewport.center());
        self.simulation.contain(self.graph.nodes_mut());
        self.simulation.warm_to(self.config.drag_alpha_target);
    }

    /// Nearest node whose drawn disc contains `point`.
    pub fn node_at(&self, point: Vec2) -> Option<usize> {
        let viewport = self.simulation.viewport();
        let margin = self.simulation.boundary_margin();
        self.graph
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (viewport.contain(node.position, margin) - point).length();
                (distance <= node_radius(&node.id)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }

    /// Resolves a click: a hit selects that node and nothing else, a miss
    /// clears the selection.
    pub fn click_at(&self, point: Vec2) -> InteractionEvent {
        match self.node_at(point) {
            Some(node) => InteractionEvent::NodeSelected {
                snapshot: self.id,
                node,
            },
            None => InteractionEvent::BackgroundCleared { snapshot: self.id },
        }
    }

    pub fn handle(&mut self, event: InteractionEvent) -> EventOutcome {
        if event.snapshot() != self.id {
            debug!("dropping stale {event:?}, active snapshot is {}", self.id);
            return EventOutcome::Stale;
        }

        match event {
            InteractionEvent::NodeSelected { node, .. } => self.select(node),
            InteractionEvent::BackgroundCleared { .. } => {
                self.clear_selection();
                EventOutcome::Applied
            }
            InteractionEvent::DragStarted { node, .. } => self.start_drag(node),
            InteractionEvent::DragMoved { node, pointer, .. } => self.move_drag(node, pointer),
            InteractionEvent::DragEnded { node, .. } => self.end_drag(node),
        }
    }

    fn select(&mut self, node: usize) -> EventOutcome {
        if node >= self.graph.node_count() {
            return EventOutcome::Ignored;
        }

        let neighbors = self.graph.neighbors(node);
        self.highlight.apply_selection(&self.graph, node, &neighbors);
        self.forces.set_parameters_for_selection(&self.graph, Some(node));
        self.simulation.reheat();
        debug!(
            "selected {} ({} incoming, {} outgoing)",
            self.graph.nodes()[node].id,
            neighbors.incoming.len(),
            neighbors.outgoing.len()
        );
        self.selection = Some(Selection { node, neighbors });
        EventOutcome::Applied
    }

    fn clear_selection(&mut self) {
        self.highlight.clear();
        let had_selection = self.selection.take().is_some();
        self.forces.set_parameters_for_selection(&self.graph, None);
        if had_selection {
            debug!("selection cleared");
            self.simulation.reheat();
        }
    }

    fn start_drag(&mut self, node: usize) -> EventOutcome {
        let Some(position) = self.graph.node(node).map(|entry| entry.position) else {
            return EventOutcome::Ignored;
        };
        if self.dragging.contains(&node) {
            return EventOutcome::Ignored;
        }

        if self.dragging.is_empty() {
            self.simulation
                .set_alpha_target(self.config.drag_alpha_target);
            self.simulation.restart();
        }
        self.dragging.insert(node);
        self.graph.nodes_mut()[node].fixed = Some(position);
        EventOutcome::Applied
    }

    fn move_drag(&mut self, node: usize, pointer: Vec2) -> EventOutcome {
        if !self.dragging.contains(&node) {
            return EventOutcome::Ignored;
        }
        self.graph.nodes_mut()[node].fixed = Some(pointer);
        EventOutcome::Applied
    }

    fn end_drag(&mut self, node: usize) -> EventOutcome {
        if !self.dragging.remove(&node) {
            return EventOutcome::Ignored;
        }
        if self.dragging.is_empty() {
            self.simulation.set_alpha_target(0.0);
        }
        self.graph.nodes_mut()[node].fixed = None;
        EventOutcome::Applied
    }
}

/// Owns the single active session. Loading a graph drops the previous session
/// and everything that referenced its nodes.
pub struct SessionHost {
    config: LayoutConfig,
    next_id: u64,
    session: Option<SimulationSession>,
}

impl SessionHost {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            next_id: 0,
            session: None,
        }
    }

    pub fn load(&mut self, graph: GraphSnapshot, ground_state: Option<&str>) -> SnapshotId {
        self.next_id += 1;
        let id = SnapshotId(self.next_id);
        info!(
            "loaded snapshot {id}: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        self.session = Some(SimulationSession::new(id, graph, &self.config, ground_state));
        id
    }

    pub fn session(&self) -> Option<&SimulationSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SimulationSession> {
        self.session.as_mut()
    }

    pub fn current_id(&self) -> Option<SnapshotId> {
        self.session.as_ref().map(SimulationSession::id)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn dispatch(&mut self, event: InteractionEvent) -> EventOutcome {
        match self.session.as_mut() {
            Some(session) => session.handle(event),
            None => EventOutcome::Stale,
        }
    }

    pub fn step(&mut self, budget: usize) -> Option<TickResult> {
        self.session.as_mut().map(|session| session.step(budget))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        if let Some(session) = self.session.as_mut() {
            session.set_viewport(viewport);
        }
    }
}
