pub mod edit_distance;
pub mod frequency;
pub mod ranker;
pub mod state;

pub use state::{EngineState, Update};
