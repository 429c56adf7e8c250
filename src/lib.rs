//! # MapTap Stats
//!
//! Score tracking and analytics for the daily MapTap geography game.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (score records, daily games, aggregates)
//! - **ingest**: Row normalization and chat-entry import
//! - **calculate**: Leaderboards, trends, streaks, achievements, comparisons
//! - **storage**: CSV data file and the swappable snapshot store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
