//! Configuration loading

mod loader;

pub use crate::types::QuiverConfig;
pub use loader::ConfigLoader;
