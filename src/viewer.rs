//! Viewer state machine.
//!
//! The [`Viewer`] owns the loaded lines and everything the user manipulates: cursor, scroll,
//! wrap and gutter toggles, search and selection. It knows nothing about terminals; the render
//! module reads it to compose frames and the app module feeds it input actions and followed
//! lines.

pub mod geometry;
pub mod motion;
pub mod search;
pub mod selection;
pub mod state;

pub use geometry::{digit_count, Viewport, FALLBACK_SIZE};
pub use search::SearchState;
pub use selection::{Position, Selection, SelectionMode};
pub use state::{StatusLine, Viewer, ViewerOptions};
