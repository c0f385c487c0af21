//! Application orchestration layer
//!
//! [`Application`] owns the viewer and every collaborator it needs for an interactive session.
//! A single loop multiplexes keyboard chunks and follow batches; all viewer mutation happens
//! inside that loop, and every iteration ends with a redraw.

pub mod runtime;

use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::input::{InputAction, InputService};
use crate::render::{ColorTheme, FrameComposer, StatusPosition, UIRenderer};
use crate::viewer::{Viewer, Viewport, FALLBACK_SIZE};
use log::debug;
use tokio::sync::mpsc::{Receiver, UnboundedReceiver};

pub use runtime::spawn_input_thread;

/// Application orchestrator - routes input actions and follow batches into the viewer
pub struct Application {
    viewer: Viewer,
    highlighter: Highlighter,
    theme: ColorTheme,
    input: InputService,
    ui_renderer: Box<dyn UIRenderer>,
    clipboard: Box<dyn Clipboard>,
    status_position: StatusPosition,
    following: bool,
}

impl Application {
    /// Wire a session together. A plain highlighter selects the monochrome theme.
    pub fn new(
        viewer: Viewer,
        highlighter: Highlighter,
        ui_renderer: Box<dyn UIRenderer>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let theme = if highlighter.is_plain() {
            ColorTheme::monochrome()
        } else {
            ColorTheme::default()
        };
        Self {
            viewer,
            highlighter,
            theme,
            input: InputService::new(),
            ui_renderer,
            clipboard,
            status_position: StatusPosition::default(),
            following: false,
        }
    }

    pub fn with_status_position(mut self, position: StatusPosition) -> Self {
        self.status_position = position;
        self
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Run the session until `q`, Ctrl-C or the end of keyboard input.
    ///
    /// `input` carries raw key bytes; `follow` carries appended lines. The renderer is cleaned
    /// up on every exit path, including errors from the loop itself.
    pub async fn run(
        &mut self,
        input: UnboundedReceiver<Vec<u8>>,
        follow: Option<Receiver<Vec<String>>>,
    ) -> Result<()> {
        self.ui_renderer.initialize()?;
        let result = self.event_loop(input, follow).await;
        let cleanup = self.ui_renderer.cleanup();
        result.and(cleanup)
    }

    async fn event_loop(
        &mut self,
        mut input: UnboundedReceiver<Vec<u8>>,
        mut follow: Option<Receiver<Vec<String>>>,
    ) -> Result<()> {
        self.following = follow.is_some();
        self.redraw()?;

        loop {
            // Prompt typing must never compete with appends.
            let accept_batches = follow.is_some() && !self.input.is_searching();
            tokio::select! {
                chunk = input.recv() => match chunk {
                    Some(bytes) => {
                        if !self.handle_input(&bytes) {
                            debug!("quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("keyboard input closed");
                        break;
                    }
                },
                batch = next_batch(&mut follow), if accept_batches => match batch {
                    Some(lines) => self.viewer.append_lines(lines),
                    None => {
                        debug!("follow channel closed");
                        follow = None;
                    }
                },
            }
            self.redraw()?;
        }
        Ok(())
    }

    /// Feed one chunk of key bytes through the input service. Returns false on quit.
    pub fn handle_input(&mut self, bytes: &[u8]) -> bool {
        for action in self.input.process_bytes(bytes) {
            if !self.apply_action(action) {
                return false;
            }
        }
        true
    }

    fn apply_action(&mut self, action: InputAction) -> bool {
        let viewer = &mut self.viewer;
        match action {
            InputAction::CursorUp => viewer.move_cursor(-1),
            InputAction::CursorDown => viewer.move_cursor(1),
            InputAction::CursorLeft => viewer.move_cursor_col(-1),
            InputAction::CursorRight => viewer.move_cursor_col(1),
            InputAction::PageUp => viewer.page(-1),
            InputAction::PageDown => viewer.page(1),
            InputAction::LineStart => viewer.line_start(),
            InputAction::LineEnd => viewer.line_end(),
            InputAction::WordForward => viewer.word_forward(),
            InputAction::WordBackward => viewer.word_backward(),
            InputAction::WordEnd => viewer.word_end(),
            InputAction::GoToStart => viewer.cursor_top(),
            InputAction::GoToEnd => viewer.cursor_bottom(),
            InputAction::StartSearch(direction) => {
                viewer.status_mut().set_search_prompt(direction, "");
            }
            InputAction::UpdateSearchBuffer { direction, buffer } => {
                viewer.status_mut().set_search_prompt(direction, buffer);
            }
            InputAction::CancelSearch => viewer.status_mut().clear_search_prompt(),
            InputAction::ExecuteSearch { pattern, direction } => {
                viewer.status_mut().clear_search_prompt();
                viewer.set_query(&pattern, direction);
            }
            InputAction::NextMatch => viewer.next_match(1),
            InputAction::PreviousMatch => viewer.next_match(-1),
            InputAction::ToggleSelection(mode) => viewer.toggle_selection(mode),
            InputAction::CopySelection => viewer.copy_selection(self.clipboard.as_mut()),
            InputAction::Escape => viewer.clear_selection(),
            InputAction::ToggleLineNumbers => viewer.toggle_line_numbers(),
            InputAction::ToggleWrap => viewer.toggle_wrap(),
            InputAction::Enter => {
                if self.following {
                    viewer.insert_marker();
                }
            }
            InputAction::Quit => return false,
            InputAction::NoAction | InputAction::InvalidInput => {}
        }
        true
    }

    /// Fit the viewer to the terminal and draw one frame.
    fn redraw(&mut self) -> Result<()> {
        let (width, height) = match self.ui_renderer.get_terminal_size() {
            Ok(size) => size,
            Err(err) => {
                debug!(
                    "terminal size unavailable ({err}), using {}x{}",
                    FALLBACK_SIZE.0, FALLBACK_SIZE.1
                );
                FALLBACK_SIZE
            }
        };
        self.viewer.set_viewport(Viewport::new(width, height));
        self.viewer.ensure_cursor_visible();

        let composer = FrameComposer {
            highlighter: &self.highlighter,
            theme: &self.theme,
            status_position: self.status_position,
        };
        let frame = composer.compose(&self.viewer);
        self.ui_renderer.render(&frame)
    }
}

/// Next follow batch; pends forever once there is no channel.
async fn next_batch(follow: &mut Option<Receiver<Vec<String>>>) -> Option<Vec<String>> {
    match follow {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
