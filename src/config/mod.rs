//! Configuration module for Inkpad
//!
//! This module handles application preferences, including
//! serialization to JSON and persistent storage in platform-specific
//! directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
