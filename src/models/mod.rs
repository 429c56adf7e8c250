//! Core data models for the score tracker.

mod game;
mod record;
mod stats;

pub use game::*;
pub use record::*;
pub use stats::*;
