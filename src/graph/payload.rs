use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::GraphSnapshot;
use crate::error::DataIntegrityError;

/// Wire form of a graph as produced by the graph source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NodeEntry {
    Id(String),
    Record { id: String },
}

impl NodeEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Record { id } => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EdgeEntry {
    Pair(String, String),
    Record {
        source: String,
        target: String,
        #[serde(default, alias = "tag")]
        label: Option<String>,
    },
}

impl GraphPayload {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid graph JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read graph file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize graph")
    }

    pub fn into_snapshot(self) -> Result<GraphSnapshot, DataIntegrityError> {
        let pair_count = self
            .edges
            .iter()
            .filter(|edge| matches!(edge, EdgeEntry::Pair(..)))
            .count();
        let mut tags = match self.tags {
            Some(tags) if tags.len() != self.edges.len() && pair_count > 0 => {
                return Err(DataIntegrityError::TagCountMismatch {
                    edges: self.edges.len(),
                    tags: tags.len(),
                });
            }
            Some(tags) => tags.into_iter().map(Some).collect::<Vec<_>>(),
            None => Vec::new(),
        };
        tags.resize(self.edges.len(), None);

        let node_ids = self.nodes.into_iter().map(|node| match node {
            NodeEntry::Id(id) | NodeEntry::Record { id } => id,
        });
        let edges = self
            .edges
            .into_iter()
            .zip(tags)
            .map(|(edge, tag)| match edge {
                EdgeEntry::Pair(source, target) => (source, target, tag.unwrap_or_default()),
                EdgeEntry::Record {
                    source,
                    target,
                    label,
                } => (source, target, label.or(tag).unwrap_or_default()),
            })
            .collect::<Vec<_>>();

        GraphSnapshot::load(node_ids, edges)
    }
}
