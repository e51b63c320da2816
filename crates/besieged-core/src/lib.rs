//! Besieged Core - Core types and utilities for Besieged
//!
//! This crate provides the foundational types shared by the client and server:
//! - Mathematical primitives (re-exported from glam)
//! - Color for text and sprite tinting
//! - Game time and the fixed-step tick clock

pub mod time;
pub mod types;

pub use glam::Vec2;
pub use time::{GameTime, TimeConfig, TimeConfigError};
pub use types::Color;
