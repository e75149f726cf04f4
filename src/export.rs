use serde::Serialize;

use crate::interaction::SimulationSession;
use crate::layout::EngineState;

#[derive(Clone, Debug, Serialize)]
pub struct LayoutExport {
    pub ticks: usize,
    pub alpha: f32,
    pub settled: bool,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub ground_state: bool,
    pub in_trace: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub path: String,
    pub label_x: f32,
    pub label_y: f32,
    pub in_trace: bool,
}

/// Runs the session until it idles or `max_ticks` have elapsed and captures
/// the resulting layout.
pub fn settle(session: &mut SimulationSession, max_ticks: usize) -> LayoutExport {
    let result = session.step(max_ticks);
    let frame = session.frame();
    let graph = session.graph();
    let viewport = session.simulation().viewport();

    let nodes = frame
        .nodes
        .iter()
        .map(|glyph| ExportNode {
            id: graph.nodes()[glyph.node].id.clone(),
            x: glyph.position.x,
            y: glyph.position.y,
            ground_state: glyph.ground_state,
            in_trace: glyph.in_trace,
        })
        .collect();

    let edges = frame
        .edges
        .iter()
        .map(|glyph| {
            let edge = &graph.edges()[glyph.edge];
            ExportEdge {
                source: graph.nodes()[edge.source].id.clone(),
                target: graph.nodes()[edge.target].id.clone(),
                label: edge.label.clone(),
                path: glyph.path.svg_path(),
                label_x: glyph.label_position.x,
                label_y: glyph.label_position.y,
                in_trace: glyph.in_trace,
            }
        })
        .collect();

    LayoutExport {
        ticks: result.ticks,
        alpha: result.alpha,
        settled: result.state == EngineState::Idle,
        width: viewport.width,
        height: viewport.height,
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutConfig, Viewport};
    use crate::graph::siteswap::build_state_graph;
    use crate::interaction::SessionHost;

    #[test]
    fn settled_layout_serializes_every_node_and_edge() {
        let config = LayoutConfig::default().with_viewport(Viewport::new(800.0, 600.0));
        let mut host = SessionHost::new(config);
        let graph = build_state_graph(3, 5).into_snapshot().unwrap();
        host.load(graph, Some("xxx--"));

        let session = host.session_mut().unwrap();
        let export = settle(session, 5_000);
        assert!(export.settled);
        assert_eq!(export.nodes.len(), 10);
        assert_eq!(export.nodes.iter().filter(|node| node.ground_state).count(), 1);
        for node in &export.nodes {
            assert!(node.x >= 20.0 && node.x <= 780.0);
            assert!(node.y >= 20.0 && node.y <= 580.0);
        }

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["edges"].as_array().unwrap().len(), export.edges.len());
        assert!(json["edges"][0]["path"].as_str().unwrap().starts_with('M'));
    }

    #[test]
    fn traced_pattern_is_marked_in_the_export() {
        let mut host = SessionHost::new(LayoutConfig::default());
        let graph = build_state_graph(3, 5).into_snapshot().unwrap();
        host.load(graph, Some("xxx--"));

        let session = host.session_mut().unwrap();
        session.trace_pattern(&[5, 1], 5).unwrap();
        let export = settle(session, 5_000);

        let mut traced: Vec<_> = export
            .nodes
            .iter()
            .filter(|node| node.in_trace)
            .map(|node| node.id.as_str())
            .collect();
        traced.sort_unstable();
        assert_eq!(traced, ["x-x-x", "xx-x-"]);
        assert_eq!(export.edges.iter().filter(|edge| edge.in_trace).count(), 2);
    }
}
