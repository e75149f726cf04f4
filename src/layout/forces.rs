use eframe::egui::Vec2;

use super::quadtree::QuadNode;
use crate::config::LayoutConfig;
use crate::graph::{GraphEdge, GraphNode, GraphSnapshot};
use crate::util::fallback_direction;

const COINCIDENT_LINK_OFFSET: f32 = 1e-3;

/// Live parameters of the link, many-body and centering forces.
#[derive(Clone, Debug)]
pub struct ForceModel {
    link_distance: Vec<f32>,
    link_strength: Vec<f32>,
    link_bias: Vec<f32>,
    charge: Vec<f32>,
    center: Vec2,
    selection: Option<usize>,
    config: LayoutConfig,
}

impl ForceModel {
    pub fn new(graph: &GraphSnapshot, config: &LayoutConfig) -> Self {
        let mut degree = vec![0usize; graph.node_count()];
        for edge in graph.edges().iter().filter(|edge| !edge.is_self_loop()) {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }

        let mut link_strength = Vec::with_capacity(graph.edge_count());
        let mut link_bias = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let source = degree[edge.source].max(1) as f32;
            let target = degree[edge.target].max(1) as f32;
            link_strength.push(1.0 / source.min(target));
            link_bias.push(source / (source + target));
        }

        let mut model = Self {
            link_distance: Vec::new(),
            link_strength,
            link_bias,
            charge: Vec::new(),
            center: config.viewport.center(),
            selection: None,
            config: *config,
        };
        model.set_parameters_for_selection(graph, None);
        model
    }

    /// Retunes every edge rest length and node charge for `selected`. `None`
    /// (or an index outside the graph) restores the uniform defaults.
    pub fn set_parameters_for_selection(&mut self, graph: &GraphSnapshot, selected: Option<usize>) {
        let selected = selected.filter(|&index| index < graph.node_count());
        self.selection = selected;
        self.link_distance.clear();
        self.charge.clear();

        let Some(focus) = selected else {
            self.link_distance
                .resize(graph.edge_count(), self.config.link_distance);
            self.charge
                .resize(graph.node_count(), self.config.charge_strength);
            return;
        };

        let neighbors = graph.neighbors(focus);
        self.charge.extend((0..graph.node_count()).map(|node| {
            if neighbors.is_related(focus, node) {
                self.config.focus_charge_strength
            } else {
                self.config.background_charge_strength
            }
        }));
        self.link_distance.extend(graph.edges().iter().map(|edge| {
            if edge.touches(focus) {
                self.config.focus_link_distance
            } else {
                self.config.link_distance
            }
        }));
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn link_distance(&self, edge: usize) -> Option<f32> {
        self.link_distance.get(edge).copied()
    }

    pub fn link_distances(&self) -> &[f32] {
        &self.link_distance
    }

    pub fn charge_strength(&self, node: usize) -> Option<f32> {
        self.charge.get(node).copied()
    }

    pub fn charges(&self) -> &[f32] {
        &self.charge
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub(super) fn apply_center(&self, nodes: &mut [GraphNode]) {
        if nodes.is_empty() {
            return;
        }

        let mut centroid = Vec2::ZERO;
        for node in nodes.iter() {
            centroid += node.position;
        }
        centroid /= nodes.len() as f32;

        let shift = (centroid - self.center) * self.config.center_strength;
        for node in nodes.iter_mut() {
            node.velocity -= shift;
        }
    }

    pub(super) fn apply_many_body(
        &self,
        nodes: &mut [GraphNode],
        alpha: f32,
        positions: &mut Vec<Vec2>,
    ) {
        positions.clear();
        positions.extend(nodes.iter().map(|node| node.position));

        let Some(quadtree) = QuadNode::build(positions, &self.charge) else {
            return;
        };

        let params = RepulsionParams {
            alpha,
            theta: self.config.barnes_hut_theta,
            distance_min_sq: self.config.distance_min * self.config.distance_min,
        };
        for (index, node) in nodes.iter_mut().enumerate() {
            node.velocity +=
                accumulate_repulsion_for_node(&quadtree, index, positions, &self.charge, params);
        }
    }

    pub(super) fn apply_links(&self, nodes: &mut [GraphNode], edges: &[GraphEdge], alpha: f32) {
        for (index, edge) in edges.iter().enumerate() {
            if edge.is_self_loop() {
                continue;
            }

            let source = &nodes[edge.source];
            let target = &nodes[edge.target];
            let mut delta =
                (target.position + target.velocity) - (source.position + source.velocity);
            if delta.length_sq() == 0.0 {
                delta = fallback_direction(edge.source, edge.target) * COINCIDENT_LINK_OFFSET;
            }
            let length = delta.length();
            let stretch =
                (length - self.link_distance[index]) / length * alpha * self.link_strength[index];
            let correction = delta * stretch;
            let bias = self.link_bias[index];

            nodes[edge.target].velocity -= correction * bias;
            nodes[edge.source].velocity += correction * (1.0 - bias);
        }
    }
}

#[derive(Clone, Copy)]
struct RepulsionParams {
    alpha: f32,
    theta: f32,
    distance_min_sq: f32,
}

fn repulsion_between(
    point: Vec2,
    other: Vec2,
    strength: f32,
    params: RepulsionParams,
    fallback: impl FnOnce() -> Vec2,
) -> Vec2 {
    let mut delta = other - point;
    let mut distance_sq = delta.length_sq();
    if distance_sq == 0.0 {
        delta = fallback() * params.distance_min_sq.sqrt();
        distance_sq = params.distance_min_sq;
    } else if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    delta * (strength * params.alpha / distance_sq)
}

fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strengths: &[f32],
    params: RepulsionParams,
) -> Vec2 {
    if node.strength == 0.0 && node.is_leaf() {
        return Vec2::ZERO;
    }

    let point = positions[index];

    if node.is_leaf() {
        let mut velocity = Vec2::ZERO;
        for &other in &node.indices {
            if other == index {
                continue;
            }
            velocity += repulsion_between(point, positions[other], strengths[other], params, || {
                fallback_direction(other, index)
            });
        }
        return velocity;
    }

    let distance = (node.center - point).length().max(0.0001);
    let can_approximate =
        !node.bounds.contains(point) && (node.bounds.side_length() / distance) < params.theta;
    if can_approximate {
        return repulsion_between(point, node.center, node.strength, params, || {
            fallback_direction(index, index)
        });
    }

    let mut velocity = Vec2::ZERO;
    for child in node.children.iter().flatten() {
        velocity += accumulate_repulsion_for_node(child, index, positions, strengths, params);
    }
    velocity
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn scenario() -> GraphSnapshot {
        GraphSnapshot::load(
            ["A", "B", "C"].map(String::from),
            [("A", "B", "1"), ("B", "C", "2"), ("C", "C", "loop")]
                .map(|(s, t, l)| (s.to_owned(), t.to_owned(), l.to_owned())),
        )
        .unwrap()
    }

    #[test]
    fn defaults_are_uniform() {
        let graph = scenario();
        let model = ForceModel::new(&graph, &LayoutConfig::default());
        assert_eq!(model.link_distances(), &[150.0, 150.0, 150.0]);
        assert_eq!(model.charges(), &[-300.0, -300.0, -300.0]);
        assert_eq!(model.selection(), None);
    }

    #[test]
    fn selection_tightens_the_focal_neighborhood() {
        let graph = scenario();
        let mut model = ForceModel::new(&graph, &LayoutConfig::default());
        model.set_parameters_for_selection(&graph, graph.index_of("A"));

        assert_eq!(model.link_distance(0), Some(100.0));
        assert_eq!(model.link_distance(1), Some(150.0));
        assert_eq!(model.charge_strength(0), Some(-50.0));
        assert_eq!(model.charge_strength(1), Some(-50.0));
        assert_eq!(model.charge_strength(2), Some(-600.0));
    }

    #[test]
    fn retuning_is_idempotent_and_not_cumulative() {
        let graph = scenario();
        let mut once = ForceModel::new(&graph, &LayoutConfig::default());
        once.set_parameters_for_selection(&graph, Some(2));

        let mut twice = ForceModel::new(&graph, &LayoutConfig::default());
        twice.set_parameters_for_selection(&graph, Some(0));
        twice.set_parameters_for_selection(&graph, Some(2));
        twice.set_parameters_for_selection(&graph, Some(2));

        assert_eq!(once.link_distances(), twice.link_distances());
        assert_eq!(once.charges(), twice.charges());

        twice.set_parameters_for_selection(&graph, None);
        assert_eq!(twice.charges(), &[-300.0, -300.0, -300.0]);
    }

    #[test]
    fn out_of_range_selection_falls_back_to_defaults() {
        let graph = scenario();
        let mut model = ForceModel::new(&graph, &LayoutConfig::default());
        model.set_parameters_for_selection(&graph, Some(17));
        assert_eq!(model.selection(), None);
        assert_eq!(model.link_distances(), &[150.0, 150.0, 150.0]);
    }

    #[test]
    fn self_loops_never_pull() {
        let graph = GraphSnapshot::load(
            vec!["C".to_owned()],
            vec![("C".to_owned(), "C".to_owned(), "loop".to_owned())],
        )
        .unwrap();
        let mut model = ForceModel::new(&graph, &LayoutConfig::default());
        let mut nodes = graph.nodes().to_vec();
        nodes[0].velocity = vec2(0.5, -0.25);

        model.apply_links(&mut nodes, graph.edges(), 1.0);
        assert_eq!(nodes[0].velocity, vec2(0.5, -0.25));

        model.set_parameters_for_selection(&graph, Some(0));
        assert_eq!(model.link_distance(0), Some(100.0));
        model.apply_links(&mut nodes, graph.edges(), 1.0);
        assert_eq!(nodes[0].velocity, vec2(0.5, -0.25));
        assert_eq!(nodes[0].position, graph.nodes()[0].position);
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let graph = GraphSnapshot::load(
            ["a", "b"].map(String::from),
            vec![("a".to_owned(), "b".to_owned(), "1".to_owned())],
        )
        .unwrap();
        let model = ForceModel::new(&graph, &LayoutConfig::default());
        let mut nodes = graph.nodes().to_vec();
        nodes[0].position = vec2(0.0, 0.0);
        nodes[1].position = vec2(400.0, 0.0);

        model.apply_links(&mut nodes, graph.edges(), 1.0);
        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[1].velocity.x < 0.0);
        assert!((nodes[0].velocity.x + nodes[1].velocity.x).abs() < 1e-3);
    }

    #[test]
    fn charges_push_nodes_apart() {
        let graph = GraphSnapshot::load(["a", "b"].map(String::from), Vec::new()).unwrap();
        let model = ForceModel::new(&graph, &LayoutConfig::default());
        let mut nodes = graph.nodes().to_vec();
        nodes[0].position = vec2(100.0, 100.0);
        nodes[1].position = vec2(110.0, 100.0);

        model.apply_many_body(&mut nodes, 1.0, &mut Vec::new());
        assert!(nodes[0].velocity.x < 0.0);
        assert!(nodes[1].velocity.x > 0.0);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let graph = GraphSnapshot::load(["a", "b"].map(String::from), Vec::new()).unwrap();
        let model = ForceModel::new(&graph, &LayoutConfig::default());
        let mut nodes = graph.nodes().to_vec();
        nodes[0].position = vec2(50.0, 50.0);
        nodes[1].position = vec2(50.0, 50.0);

        model.apply_many_body(&mut nodes, 1.0, &mut Vec::new());
        assert!(nodes[0].velocity.length() > 0.0);
        assert!(nodes.iter().all(|node| node.velocity.is_finite()));
    }

    #[test]
    fn approximation_tracks_exact_repulsion() {
        let names = (0..60).map(|index| format!("n{index}")).collect::<Vec<_>>();
        let graph = GraphSnapshot::load(names, Vec::new()).unwrap();
        let model = ForceModel::new(&graph, &LayoutConfig::default());
        let mut nodes = graph.nodes().to_vec();
        for (index, node) in nodes.iter_mut().enumerate() {
            node.position = vec2((index % 10) as f32 * 40.0, (index / 10) as f32 * 40.0);
        }
        let far = vec2(5000.0, 5000.0);
        nodes[0].position = far;

        let mut exact = Vec2::ZERO;
        for node in &nodes[1..] {
            let delta = node.position - far;
            exact += delta * (-300.0 / delta.length_sq());
        }

        model.apply_many_body(&mut nodes, 1.0, &mut Vec::new());
        let approx = nodes[0].velocity;
        assert!((approx - exact).length() / exact.length() < 0.05);
    }
}
