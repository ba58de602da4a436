// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod history;
pub mod leaderboard;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timers;
pub mod ui;
pub mod util;
