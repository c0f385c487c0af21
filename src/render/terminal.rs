//! Terminal UI implementation using ratatui
//!
//! Composed frames are already laid out row by row, so drawing is a matter of converting each
//! SGR-styled row into a ratatui line and placing the cursor. ratatui's buffer diffing keeps
//! redraws down to the cells that changed.

use crate::error::Result;
use crate::render::frame::Frame;
use crate::render::renderer::UIRenderer;
use crate::render::text::ansi_line;
use log::debug;
use ratatui::crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Terminal};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI implementation with ratatui backend
///
/// Raw mode and the alternate screen are held from `initialize` until `cleanup`; dropping the
/// value also cleans up, so the terminal is restored on every exit path.
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    raw_mode: bool,
}

impl TerminalUI {
    pub fn new() -> Self {
        Self {
            terminal: None,
            raw_mode: false,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            terminal.draw(|f| {
                let area = f.size();
                for (y, row) in frame.rows.iter().enumerate().take(usize::from(area.height)) {
                    let rect = Rect::new(area.x, area.y + y as u16, area.width, 1);
                    f.render_widget(Paragraph::new(ansi_line(row)), rect);
                }
                f.set_cursor(frame.cursor.0, frame.cursor.1);
            })?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        self.raw_mode = true;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetCursorStyle::SteadyBlock)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        self.terminal = Some(terminal);
        debug!("terminal initialized");
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.take().is_some() {
            execute!(
                io::stdout(),
                SetCursorStyle::DefaultUserShape,
                LeaveAlternateScreen
            )?;
        }
        if self.raw_mode {
            self.raw_mode = false;
            disable_raw_mode()?;
            debug!("terminal restored");
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_ui_creation() {
        let mut ui = TerminalUI::new();
        assert!(ui.terminal.is_none());
        // nothing acquired yet, so cleanup is a no-op
        ui.cleanup().unwrap();
        // rendering before initialize draws nothing
        ui.render(&Frame::default()).unwrap();
    }
}
