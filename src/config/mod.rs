//! Configuration module for NicTune
//!
//! Provides configuration management including CLI arguments,
//! mode selection, and runtime settings.

mod settings;

pub use settings::*;
