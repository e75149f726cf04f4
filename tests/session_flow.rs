use eframe::egui::vec2;
use siteswap_graph::export::settle;
use siteswap_graph::graph::siteswap::parse_pattern;
use siteswap_graph::{
    EdgeTone, EventOutcome, GraphPayload, GraphRequest, InteractionEvent, LayoutConfig, NodeTone,
    PatternError, SessionHost, Viewport,
};

const PAYLOAD: &str = r#"{
    "nodes": ["A", "B", "C"],
    "edges": [["A", "B"], ["B", "C"], ["C", "C"]],
    "tags": ["1", "2", "loop"]
}"#;

fn host_with_payload() -> SessionHost {
    let config = LayoutConfig::default().with_viewport(Viewport::new(600.0, 400.0));
    let mut host = SessionHost::new(config);
    let graph = GraphPayload::from_json(PAYLOAD)
        .unwrap()
        .into_snapshot()
        .unwrap();
    host.load(graph, Some("A"));
    host
}

fn distance(host: &SessionHost, a: &str, b: &str) -> f32 {
    let graph = host.session().unwrap().graph();
    let a = graph.index_of(a).unwrap();
    let b = graph.index_of(b).unwrap();
    (graph.nodes()[a].position - graph.nodes()[b].position).length()
}

#[test]
fn selecting_retunes_forces_and_highlights_neighbours() {
    let mut host = host_with_payload();
    let snapshot = host.current_id().unwrap();
    let a = host.session().unwrap().graph().index_of("A").unwrap();

    let outcome = host.dispatch(InteractionEvent::NodeSelected { snapshot, node: a });
    assert_eq!(outcome, EventOutcome::Applied);

    let session = host.session().unwrap();
    let selection = session.selection().unwrap();
    assert!(selection.neighbors.incoming.is_empty());
    assert_eq!(selection.neighbors.outgoing.len(), 1);

    let forces = session.forces();
    assert_eq!(forces.link_distance(0), Some(100.0));
    assert_eq!(forces.link_distance(1), Some(150.0));
    assert_eq!(forces.charge_strength(0), Some(-50.0));
    assert_eq!(forces.charge_strength(1), Some(-50.0));
    assert_eq!(forces.charge_strength(2), Some(-600.0));

    let highlight = session.highlight();
    assert_eq!(highlight.node_tone(0), NodeTone::Selected);
    assert_eq!(highlight.node_tone(1), NodeTone::Outgoing);
    assert_eq!(highlight.node_tone(2), NodeTone::Default);
    assert_eq!(highlight.edge_style(0).tone, EdgeTone::Outgoing);
    assert_eq!(highlight.edge_style(2).tone, EdgeTone::Default);
}

#[test]
fn background_click_clears_selection_and_reheats() {
    let mut host = host_with_payload();
    let snapshot = host.current_id().unwrap();
    host.dispatch(InteractionEvent::NodeSelected { snapshot, node: 1 });
    host.step(10_000);
    assert!(!host.session().unwrap().simulation().is_running());

    let event = host.session().unwrap().click_at(vec2(-1_000.0, -1_000.0));
    assert_eq!(host.dispatch(event), EventOutcome::Applied);

    let session = host.session().unwrap();
    assert!(session.selection().is_none());
    assert!(session.highlight().is_clear());
    assert!(session.simulation().is_running());
    assert_eq!(session.simulation().alpha(), 1.0);
    assert!(session.forces().charges().iter().all(|&charge| charge == -300.0));
}

#[test]
fn dragging_pins_until_release() {
    let mut host = host_with_payload();
    host.step(10_000);
    let snapshot = host.current_id().unwrap();

    host.dispatch(InteractionEvent::DragStarted { snapshot, node: 2 });
    let pointer = vec2(150.0, 120.0);
    host.dispatch(InteractionEvent::DragMoved {
        snapshot,
        node: 2,
        pointer,
    });
    host.step(3);
    let session = host.session().unwrap();
    assert_eq!(session.graph().nodes()[2].fixed, Some(pointer));
    assert_eq!(session.graph().nodes()[2].position, pointer);

    host.dispatch(InteractionEvent::DragEnded { snapshot, node: 2 });
    assert_eq!(host.session().unwrap().graph().nodes()[2].fixed, None);
    let result = host.step(10_000).unwrap();
    assert!(result.ticks > 0);
    assert!(!host.session().unwrap().simulation().is_running());
}

#[test]
fn reload_invalidates_outstanding_events() {
    let mut host = host_with_payload();
    let old = host.current_id().unwrap();

    let request = GraphRequest::new(2, 3);
    let graph = request.fetch().unwrap().into_snapshot().unwrap();
    let new = host.load(graph, Some(&request.ground_state()));
    assert_ne!(old, new);

    let outcome = host.dispatch(InteractionEvent::NodeSelected {
        snapshot: old,
        node: 0,
    });
    assert_eq!(outcome, EventOutcome::Stale);
    let session = host.session().unwrap();
    assert!(session.selection().is_none());
    assert_eq!(session.ground_state(), session.graph().index_of("xx-"));
    assert!(session.ground_state().is_some());
}

#[test]
fn generated_graph_settles_headless() {
    let config = LayoutConfig::default().with_viewport(Viewport::new(900.0, 700.0));
    let request = GraphRequest::new(3, 4);
    let mut host = SessionHost::new(config);
    host.load(
        request.fetch().unwrap().into_snapshot().unwrap(),
        Some(&request.ground_state()),
    );

    let export = settle(host.session_mut().unwrap(), 5_000);
    assert!(export.settled);
    assert_eq!(export.nodes.len(), 4);
    assert_eq!(export.edges.len(), 7);
    assert!(export.nodes.iter().any(|node| node.id == "xxx-" && node.ground_state));
    assert!(
        export
            .edges
            .iter()
            .filter(|edge| edge.source == edge.target)
            .all(|edge| edge.path.contains(" a "))
    );
}

#[test]
fn selection_pulls_the_focal_pair_together() {
    let mut host = host_with_payload();
    host.step(10_000);
    let ab = distance(&host, "A", "B");
    let bc = distance(&host, "B", "C");
    let ac = distance(&host, "A", "C");
    assert!(ab > 140.0 && ab < 170.0, "A-B settled at {ab}");
    assert!(bc > 140.0 && bc < 170.0, "B-C settled at {bc}");

    let snapshot = host.current_id().unwrap();
    host.dispatch(InteractionEvent::NodeSelected { snapshot, node: 0 });
    host.step(10_000);
    assert!(!host.session().unwrap().simulation().is_running());

    let focused = distance(&host, "A", "B");
    assert!(focused > 90.0 && focused < 115.0, "A-B retuned to {focused}");
    assert!(focused < ab - 30.0);
    let far = distance(&host, "B", "C");
    assert!(far > 140.0 && far < 170.0, "B-C retuned to {far}");
    assert!(distance(&host, "A", "C") < ac);
}

#[test]
fn traced_pattern_walks_the_generated_graph() {
    let request = GraphRequest::new(3, 5);
    let mut host = SessionHost::new(LayoutConfig::default());
    host.load(
        request.fetch().unwrap().into_snapshot().unwrap(),
        Some(&request.ground_state()),
    );
    let snapshot = host.current_id().unwrap();

    let session = host.session_mut().unwrap();
    let throws = parse_pattern("531").unwrap();
    let trace = session.trace_pattern(&throws, request.max_throw).unwrap();
    assert!(!trace.excited);
    assert_eq!(trace.state_count(), 3);
    let ground = session.ground_state().unwrap();
    assert!(session.trace().unwrap().contains_node(ground));

    let error = session.trace_pattern(&[6, 4, 2], request.max_throw).unwrap_err();
    assert_eq!(error, PatternError::ThrowTooHigh { throw: 6, max_throw: 5 });

    host.dispatch(InteractionEvent::NodeSelected { snapshot, node: ground });
    let frame = host.session().unwrap().frame();
    assert_eq!(frame.nodes[ground].tone, NodeTone::Selected);
    assert!(frame.nodes[ground].in_trace);

    let reloaded = GraphRequest::new(3, 4);
    host.load(
        reloaded.fetch().unwrap().into_snapshot().unwrap(),
        Some(&reloaded.ground_state()),
    );
    assert!(host.session().unwrap().trace().is_none());
}
