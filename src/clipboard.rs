//! System clipboard access.
//!
//! The viewer only needs to write text. The arboard handle is created on first use and kept
//! for the rest of the session: on X11 the copied text is served by the process that owns
//! the handle, so dropping it right after `set_text` would lose the selection.

use crate::error::{Result, TiloError};
use log::debug;

/// Destination for copied selections.
pub trait Clipboard {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by the platform clipboard through arboard.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.handle.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| TiloError::clipboard(format!("cannot open clipboard: {e}")))?;
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| TiloError::clipboard("clipboard unavailable"))
    }
}

impl Clipboard for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        let first_try = self.handle()?.set_text(text.to_owned());
        if let Err(err) = first_try {
            // A stale handle (e.g. after the display server restarted) fails forever; retry
            // once with a fresh one.
            debug!("clipboard write failed ({err}), reopening clipboard");
            self.handle = None;
            self.handle()?
                .set_text(text.to_owned())
                .map_err(|e| TiloError::clipboard(e.to_string()))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.handle.is_some())
            .finish()
    }
}
