mod forces;
mod quadtree;
mod simulation;

pub use forces::ForceModel;
pub use simulation::{EngineState, Simulation, TickResult};
