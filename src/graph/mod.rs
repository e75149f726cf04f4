use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

use crate::error::DataIntegrityError;
use crate::util::phyllotaxis;

pub mod payload;
pub mod search;
pub mod siteswap;

pub use payload::GraphPayload;

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub fixed: Option<Vec2>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub label: String,
}

impl GraphEdge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, node: usize) -> bool {
        self.source == node || self.target == node
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub incoming: HashSet<usize>,
    pub outgoing: HashSet<usize>,
}

impl Neighbors {
    /// Whether `node` is the focus itself or one hop away in either direction.
    pub fn is_related(&self, focus: usize, node: usize) -> bool {
        node == focus || self.incoming.contains(&node) || self.outgoing.contains(&node)
    }
}

/// One loaded graph. Node positions live here and are advanced in place by the
/// simulation; everything else only reads them.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
}

impl GraphSnapshot {
    pub fn load<N, E>(node_ids: N, edges: E) -> Result<Self, DataIntegrityError>
    where
        N: IntoIterator<Item = String>,
        E: IntoIterator<Item = (String, String, String)>,
    {
        let mut nodes = Vec::new();
        let mut index_by_id = HashMap::new();
        for id in node_ids {
            if index_by_id.contains_key(&id) {
                return Err(DataIntegrityError::DuplicateNode(id));
            }
            let index = nodes.len();
            index_by_id.insert(id.clone(), index);
            nodes.push(GraphNode {
                id,
                position: phyllotaxis(index),
                velocity: Vec2::ZERO,
                fixed: None,
            });
        }

        let mut resolved = Vec::new();
        for (edge, (source_id, target_id, label)) in edges.into_iter().enumerate() {
            let resolve = |id: String| {
                index_by_id
                    .get(&id)
                    .copied()
                    .ok_or(DataIntegrityError::UnknownEndpoint { edge, node: id })
            };
            let source = resolve(source_id)?;
            let target = resolve(target_id)?;
            resolved.push(GraphEdge {
                source,
                target,
                label,
            });
        }

        Ok(Self {
            nodes,
            edges: resolved,
            index_by_id,
        })
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [GraphNode], &[GraphEdge]) {
        (&mut self.nodes, &self.edges)
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn neighbors(&self, node: usize) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for edge in &self.edges {
            if edge.source == node {
                neighbors.outgoing.insert(edge.target);
            }
            if edge.target == node {
                neighbors.incoming.insert(edge.source);
            }
        }
        neighbors
    }

    /// Moves the initial scatter so that it is centred on `center`. Only
    /// meaningful before the first tick.
    pub(crate) fn scatter_around(&mut self, center: Vec2) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.position = center + phyllotaxis(index);
            node.velocity = Vec2::ZERO;
            node.fixed = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn edge(source: &str, target: &str, label: &str) -> (String, String, String) {
        (source.to_owned(), target.to_owned(), label.to_owned())
    }

    #[test]
    fn neighbors_scan_both_directions() {
        let graph = GraphSnapshot::load(
            ids(&["A", "B", "C"]),
            vec![edge("A", "B", "1"), edge("B", "C", "2"), edge("C", "C", "loop")],
        )
        .unwrap();

        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        let c = graph.index_of("C").unwrap();

        let of_a = graph.neighbors(a);
        assert_eq!(of_a.outgoing, HashSet::from([b]));
        assert!(of_a.incoming.is_empty());

        let of_c = graph.neighbors(c);
        assert_eq!(of_c.incoming, HashSet::from([b, c]));
        assert_eq!(of_c.outgoing, HashSet::from([c]));
        assert!(graph.edges()[2].is_self_loop());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error = GraphSnapshot::load(ids(&["A", "B", "A"]), Vec::new()).unwrap_err();
        assert_eq!(error, DataIntegrityError::DuplicateNode("A".into()));
    }

    #[test]
    fn dangling_endpoints_are_rejected() {
        let error =
            GraphSnapshot::load(ids(&["A"]), vec![edge("A", "A", "0"), edge("A", "Z", "1")])
                .unwrap_err();
        assert_eq!(
            error,
            DataIntegrityError::UnknownEndpoint {
                edge: 1,
                node: "Z".into()
            }
        );
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = GraphSnapshot::load(Vec::new(), Vec::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn initial_scatter_is_deterministic() {
        let first = GraphSnapshot::load(ids(&["A", "B"]), Vec::new()).unwrap();
        let second = GraphSnapshot::load(ids(&["A", "B"]), Vec::new()).unwrap();
        assert_eq!(first.nodes()[1].position, second.nodes()[1].position);
        assert_ne!(first.nodes()[0].position, first.nodes()[1].position);
    }
}
