use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("edge {edge} references unknown node `{node}`")]
    UnknownEndpoint { edge: usize, node: String },
    #[error("payload has {edges} positional edges but {tags} tags")]
    TagCountMismatch { edges: usize, tags: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("`{0}` is not a throw, use 0-9 then a-z")]
    InvalidThrow(char),
    #[error("`{0}` is not a valid siteswap")]
    NotValid(String),
    #[error("throw {throw} is higher than the max throw {max_throw}")]
    ThrowTooHigh { throw: usize, max_throw: usize },
    #[error("state `{0}` is not in the loaded graph")]
    StateNotInGraph(String),
}
