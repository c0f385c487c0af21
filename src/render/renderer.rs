//! UI renderer trait and a recording mock.
//!
//! The application loop only talks to the terminal through [`UIRenderer`], so the whole loop
//! can run against [`MockUIRenderer`] in tests.

use crate::error::Result;
use crate::render::frame::Frame;
use std::sync::{Arc, Mutex};

/// Core trait for drawing frames and managing the terminal session
pub trait UIRenderer {
    /// Draw a composed frame, including cursor placement
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// Enter raw mode and the alternate screen, set the cursor shape
    fn initialize(&mut self) -> Result<()>;

    /// Restore the terminal; must be safe to call more than once
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal dimensions as `(width, height)`
    fn get_terminal_size(&self) -> Result<(u16, u16)>;
}

/// What a [`MockUIRenderer`] has observed.
#[derive(Debug, Default)]
pub struct MockState {
    pub frames: Vec<Frame>,
    pub is_initialized: bool,
    pub cleanup_count: usize,
}

/// Renderer that records frames instead of drawing them.
///
/// Clone the handle from [`MockUIRenderer::state`] before boxing the renderer to inspect it
/// afterwards.
#[derive(Debug, Clone)]
pub struct MockUIRenderer {
    state: Arc<Mutex<MockState>>,
    terminal_size: Option<(u16, u16)>,
}

impl Default for MockUIRenderer {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl MockUIRenderer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            state: Arc::default(),
            terminal_size: Some((width, height)),
        }
    }

    /// A renderer whose size query always fails.
    pub fn without_size() -> Self {
        Self {
            state: Arc::default(),
            terminal_size: None,
        }
    }

    pub fn state(&self) -> Arc<Mutex<MockState>> {
        Arc::clone(&self.state)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }
}

impl UIRenderer for MockUIRenderer {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.with_state(|state| state.frames.push(frame.clone()));
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        self.with_state(|state| state.is_initialized = true);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.with_state(|state| {
            state.is_initialized = false;
            state.cleanup_count += 1;
        });
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        self.terminal_size
            .ok_or_else(|| crate::error::TiloError::ui("terminal size unavailable"))
    }
}
