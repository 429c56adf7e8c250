pub mod analytics;
pub mod data;
pub mod leaderboard;
pub mod players;
pub mod refresh;
