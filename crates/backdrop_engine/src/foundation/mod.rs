//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types, bounds and phase wrapping
//! - Frame timing
//! - Seedable randomness
//! - Logging utilities

pub mod math;
pub mod time;
pub mod random;
pub mod logging;
