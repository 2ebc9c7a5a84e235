//! Common test utilities for quiver-addons
//!
//! This module provides shared test infrastructure including:
//! - Constants and sample metadata
//! - Filesystem fixtures (registry, template and source roots)
//! - Recording fakes for every external collaborator
//! - Assertion helpers for lifecycle testing

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod constants;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use constants::*;
pub use fixtures::*;
pub use mocks::*;
