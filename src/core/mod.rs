//! Core types and constants for aircraft separation

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
