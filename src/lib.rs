pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod records;
pub mod render;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tracker;
pub mod transfer;
pub mod ui;

pub use app::{fallback_router, router};
pub use config::Config;
pub use state::AppState;
pub use storage::{FileStore, MemoryStore, StorageAdapter};
pub use tracker::{LogOutcome, Tracker};
