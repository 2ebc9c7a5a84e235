//! # quiver-core
//!
//! Core library for Quiver providing:
//! - Addon metadata (`package.json`) and descriptor types
//! - Addon lifecycle states
//! - Hierarchical configuration loading (embedded defaults, file, environment)

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, QuiverConfig};
pub use error::{Error, Result};
pub use utils::get_home_dir;
