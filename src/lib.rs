pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod library;
pub mod player;
pub mod scheduler;
pub mod timeline;
pub mod types;
pub mod workspace;
