//! # tilo - Interactive Terminal Log Viewer
//!
//! A pager for log files with vim-style navigation, regex-driven colorization, incremental
//! search, visual selection with clipboard copy, and a follow mode for growing files.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - TOML configuration discovery and normalisation
//! - [`highlight`] - Colorization rules and query matching
//! - [`file_handler`] - Input loading and the follow producer
//! - [`viewer`] - Cursor, scroll, search and selection state machine
//! - [`render`] - Frame composition and the terminal backend
//! - [`input`] - Raw key decoding and key bindings
//! - [`clipboard`] - Copy destination
//! - [`app`] - The interactive session loop

// Core modules
pub mod config;
pub mod error;
pub mod file_handler;
pub mod highlight;

// Session state and its surfaces
pub mod clipboard;
pub mod input;
pub mod render;
pub mod viewer;

pub mod app;

// Re-export commonly used types for convenience
pub use error::{Result, TiloError};

pub use app::Application;
pub use config::Config;
pub use highlight::Highlighter;
pub use viewer::{Viewer, ViewerOptions};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
