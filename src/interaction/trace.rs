use std::collections::HashSet;

use crate::error::PatternError;
use crate::graph::GraphSnapshot;
use crate::graph::siteswap::{format_pattern, is_excited, orbits, pattern_states};

/// A siteswap laid over the loaded state graph: the state reached on every
/// beat and the edge taken by every throw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternTrace {
    pub pattern: Vec<usize>,
    /// Node index of the state before each throw.
    pub beats: Vec<usize>,
    /// Edge index of each throw, `None` when the graph lacks that edge.
    pub throws: Vec<Option<usize>>,
    pub excited: bool,
    /// Orbits that carry a ball. Empty-hand beats are not counted.
    pub orbit_count: usize,
    nodes: HashSet<usize>,
    edges: HashSet<usize>,
}

impl PatternTrace {
    pub fn resolve(
        graph: &GraphSnapshot,
        pattern: &[usize],
        max_throw: usize,
    ) -> Result<Self, PatternError> {
        let states = pattern_states(pattern, max_throw)?;
        let beats = states
            .iter()
            .map(|state| {
                graph
                    .index_of(state)
                    .ok_or_else(|| PatternError::StateNotInGraph(state.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let throws = pattern
            .iter()
            .enumerate()
            .map(|(beat, throw)| {
                let source = beats[beat];
                let target = beats[(beat + 1) % beats.len()];
                let label = throw.to_string();
                graph.edges().iter().position(|edge| {
                    edge.source == source && edge.target == target && edge.label == label
                })
            })
            .collect::<Vec<_>>();

        Ok(Self {
            pattern: pattern.to_vec(),
            nodes: beats.iter().copied().collect(),
            edges: throws.iter().flatten().copied().collect(),
            beats,
            throws,
            excited: is_excited(pattern),
            orbit_count: orbits(pattern)
                .iter()
                .filter(|orbit| orbit.iter().any(|&throw| throw > 0))
                .count(),
        })
    }

    pub fn contains_node(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_edge(&self, edge: usize) -> bool {
        self.edges.contains(&edge)
    }

    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_prime(&self) -> bool {
        self.state_count() == self.beats.len()
    }

    pub fn notation(&self) -> String {
        format_pattern(&self.pattern)
    }
}
