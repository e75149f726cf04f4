//! Force-directed layout engine and interaction state machine for juggling
//! state graphs.
//!
//! A [`GraphSnapshot`] is loaded from a [`GraphPayload`], wrapped in a
//! [`SimulationSession`] and driven one frame at a time through
//! [`SimulationSession::step`]. Pointer input arrives as
//! [`InteractionEvent`]s, which retune the force parameters and reheat the
//! simulation. [`SessionHost`] owns the active session and rejects events that
//! were produced against a graph that has since been replaced.

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod projection;
pub mod source;
mod util;

pub use config::{LayoutConfig, Viewport};
pub use error::{DataIntegrityError, PatternError};
pub use graph::{GraphEdge, GraphNode, GraphPayload, GraphSnapshot, Neighbors};
pub use interaction::{
    EdgeStyle, EdgeTone, EventOutcome, HighlightState, InteractionEvent, NodeTone, PatternTrace,
    SessionHost, SimulationSession, SnapshotId,
};
pub use layout::{EngineState, ForceModel, Simulation, TickResult};
pub use projection::{EdgeGlyph, EdgePath, NodeGlyph, TickFrame};
pub use source::GraphRequest;
