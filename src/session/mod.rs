pub mod buffer;
pub mod clock;
pub mod entry;
pub mod log;
pub mod metrics;
pub mod trial;
