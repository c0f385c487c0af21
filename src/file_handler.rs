//! Line sources for the viewer.
//!
//! - [`line_store`] - the append-only line sequence the viewer reads from
//! - [`loader`] - whole-input reads from a file or stdin
//! - [`follow`] - the tailing producer feeding appended lines through a bounded channel

pub mod follow;
pub mod line_store;
pub mod loader;

pub use follow::{spawn_follow, FOLLOW_CHANNEL_CAPACITY, FOLLOW_POLL_INTERVAL};
pub use line_store::LineStore;
pub use loader::{load_and_follow, load_lines, split_lines, InputSource};
