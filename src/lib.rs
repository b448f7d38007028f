// Core engine as a library: prediction model, entry metrics, keystroke log,
// trial sequencing and report export. The terminal front-end lives in the
// binary (main.rs, app.rs, ui/).

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod phrases;
pub mod session;
pub mod store;
