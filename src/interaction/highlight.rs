use crate::graph::{GraphSnapshot, Neighbors};

pub const DEFAULT_EDGE_WIDTH: f32 = 2.0;
pub const FOCUSED_EDGE_WIDTH: f32 = 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeTone {
    #[default]
    Default,
    Selected,
    Incoming,
    Outgoing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeTone {
    #[default]
    Default,
    Outgoing,
    Incoming,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub tone: EdgeTone,
    pub width: f32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            tone: EdgeTone::Default,
            width: DEFAULT_EDGE_WIDTH,
        }
    }
}

/// Per-node and per-edge styling for the current selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
    nodes: Vec<NodeTone>,
    edges: Vec<EdgeStyle>,
}

impl HighlightState {
    pub fn cleared(graph: &GraphSnapshot) -> Self {
        Self {
            nodes: vec![NodeTone::Default; graph.node_count()],
            edges: vec![EdgeStyle::default(); graph.edge_count()],
        }
    }

    pub fn clear(&mut self) {
        self.nodes.fill(NodeTone::Default);
        self.edges.fill(EdgeStyle::default());
    }

    pub(super) fn apply_selection(
        &mut self,
        graph: &GraphSnapshot,
        selected: usize,
        neighbors: &Neighbors,
    ) {
        self.clear();

        for (index, tone) in self.nodes.iter_mut().enumerate() {
            *tone = if index == selected {
                NodeTone::Selected
            } else if neighbors.incoming.contains(&index) {
                NodeTone::Incoming
            } else if neighbors.outgoing.contains(&index) {
                NodeTone::Outgoing
            } else {
                NodeTone::Default
            };
        }

        for (edge, style) in graph.edges().iter().zip(self.edges.iter_mut()) {
            style.tone = if edge.source == selected {
                EdgeTone::Outgoing
            } else if edge.target == selected {
                EdgeTone::Incoming
            } else {
                EdgeTone::Default
            };
            if edge.touches(selected) {
                style.width = FOCUSED_EDGE_WIDTH;
            }
        }
    }

    pub fn node_tone(&self, node: usize) -> NodeTone {
        self.nodes.get(node).copied().unwrap_or_default()
    }

    pub fn edge_style(&self, edge: usize) -> EdgeStyle {
        self.edges.get(edge).copied().unwrap_or_default()
    }

    pub fn is_clear(&self) -> bool {
        self.nodes.iter().all(|tone| *tone == NodeTone::Default)
            && self.edges.iter().all(|style| *style == EdgeStyle::default())
    }
}
