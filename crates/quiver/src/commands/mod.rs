//! CLI command implementations

pub mod common;
pub mod config;
pub mod install;
pub mod list;
pub mod start;
pub mod sync;
pub mod uninstall;
