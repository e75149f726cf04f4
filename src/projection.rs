//! Per-tick drawable geometry.

use eframe::egui::{Vec2, vec2};

use crate::config::{LayoutConfig, Viewport};
use crate::graph::GraphSnapshot;
use crate::interaction::{EdgeStyle, HighlightState, NodeTone, PatternTrace};
use crate::util::node_radius;

/// Control-point offset, as a fraction of the chord, of a quadratic curve
/// that matches an SVG arc whose radius equals the chord length.
const ARC_BULGE: f32 = 2.0 - 1.732_050_8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGlyph {
    pub node: usize,
    /// Clamped centre; the label is drawn centred here too.
    pub position: Vec2,
    pub radius: f32,
    pub tone: NodeTone,
    pub ground_state: bool,
    pub in_trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
    Curve { start: Vec2, control: Vec2, end: Vec2 },
    Loop { anchor: Vec2, center: Vec2, radius: f32 },
}

impl EdgePath {
    pub fn svg_path(&self) -> String {
        match *self {
            Self::Curve {
                start,
                control,
                end,
            } => format!(
                "M{:.2},{:.2} Q{:.2},{:.2} {:.2},{:.2}",
                start.x, start.y, control.x, control.y, end.x, end.y
            ),
            Self::Loop { anchor, radius, .. } => format!(
                "M{:.2},{:.2} m 0,-{radius:.2} a {radius:.2},{radius:.2} 0 1,1 1,0.0001",
                anchor.x, anchor.y
            ),
        }
    }

    /// Unit direction of travel where the path arrives at its end.
    pub fn end_tangent(&self) -> Option<Vec2> {
        match *self {
            Self::Curve { control, end, .. } => {
                let direction = end - control;
                (direction.length_sq() > 0.0).then(|| direction.normalized())
            }
            Self::Loop { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeGlyph {
    pub edge: usize,
    pub path: EdgePath,
    pub label_position: Vec2,
    pub arrow: bool,
    pub style: EdgeStyle,
    pub in_trace: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickFrame {
    pub nodes: Vec<NodeGlyph>,
    pub edges: Vec<EdgeGlyph>,
}

pub fn project(
    graph: &GraphSnapshot,
    highlight: &HighlightState,
    viewport: Viewport,
    config: &LayoutConfig,
    ground_state: Option<usize>,
    trace: Option<&PatternTrace>,
) -> TickFrame {
    let margin = config.boundary_margin;
    let positions = graph
        .nodes()
        .iter()
        .map(|node| viewport.contain(node.position, margin))
        .collect::<Vec<_>>();

    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| NodeGlyph {
            node: index,
            position: positions[index],
            radius: node_radius(&node.id),
            tone: highlight.node_tone(index),
            ground_state: ground_state == Some(index),
            in_trace: trace.is_some_and(|trace| trace.contains_node(index)),
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let start = positions[edge.source];
            let style = highlight.edge_style(index);
            let in_trace = trace.is_some_and(|trace| trace.contains_edge(index));
            if edge.is_self_loop() {
                let radius = config.loop_radius;
                return EdgeGlyph {
                    edge: index,
                    path: EdgePath::Loop {
                        anchor: start,
                        center: start - vec2(0.0, radius * 2.0),
                        radius,
                    },
                    label_position: start - vec2(0.0, config.loop_label_lift),
                    arrow: false,
                    style,
                    in_trace,
                };
            }

            let end = positions[edge.target];
            let chord = end - start;
            let normal = vec2(chord.y, -chord.x);
            let mid = start + chord * 0.5;
            EdgeGlyph {
                edge: index,
                path: EdgePath::Curve {
                    start,
                    control: mid + normal * ARC_BULGE,
                    end,
                },
                label_position: mid + normal * config.label_offset_factor,
                arrow: true,
                style,
                in_trace,
            }
        })
        .collect();

    TickFrame { nodes, edges }
}
