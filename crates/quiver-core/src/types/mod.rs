//! Type definitions for Quiver addons and configuration

mod addon_types;
mod config_types;

pub use addon_types::*;
pub use config_types::*;
