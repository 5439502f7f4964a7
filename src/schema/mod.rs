//! Schema module - Configuration and colour types for the backdrop animations.

mod color;
mod config;

pub use color::*;
pub use config::*;
