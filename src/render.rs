//! Rendering subsystem.
//!
//! - [`text`] - ANSI-aware width, truncation and padding
//! - [`status`] - status line contents
//! - [`frame`] - composes viewer state into exact screen rows
//! - [`theme`] - SGR styling of the viewer chrome
//! - [`renderer`] / [`terminal`] - the `UIRenderer` seam and its crossterm implementation

pub mod frame;
pub mod renderer;
pub mod status;
pub mod terminal;
pub mod text;
pub mod theme;

pub use frame::{Frame, FrameComposer, StatusPosition};
pub use renderer::{MockState, MockUIRenderer, UIRenderer};
pub use terminal::TerminalUI;
pub use text::{ansi_line, pad_left, pad_right, strip_ansi, truncate_ansi, visible_width};
pub use theme::ColorTheme;
