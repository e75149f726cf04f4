use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::graph::GraphPayload;
use crate::graph::siteswap::{build_state_graph, ground_state};

/// Where the next graph comes from. Without a file the juggling state graph
/// for `num_balls` / `max_throw` is built in-process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphRequest {
    pub num_balls: usize,
    pub max_throw: usize,
    pub file: Option<PathBuf>,
}

impl GraphRequest {
    pub fn new(num_balls: usize, max_throw: usize) -> Self {
        Self {
            num_balls,
            max_throw,
            file: None,
        }
    }

    pub fn ground_state(&self) -> String {
        ground_state(self.num_balls, self.max_throw)
    }

    pub fn fetch(&self) -> Result<GraphPayload> {
        match &self.file {
            Some(path) => GraphPayload::from_path(path)
                .with_context(|| format!("failed to load graph from {}", path.display())),
            None => {
                info!(
                    "building state graph for {} balls, max throw {}",
                    self.num_balls, self.max_throw
                );
                Ok(build_state_graph(self.num_balls, self.max_throw))
            }
        }
    }
}
