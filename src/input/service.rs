//! High-level input service.
//!
//! Decodes raw stdin chunks, runs the vim-style input state machine, and yields
//! domain-level `InputAction`s that the application loop applies to the viewer.

use crate::input::raw::{Key, KeyDecoder};
use crate::viewer::SelectionMode;

const CTRL_C: u8 = 0x03;
const CTRL_H: u8 = 0x08;
const CTRL_V: u8 = 0x16;
const DEL: u8 = 0x7f;

/// Current input mode (navigation vs search prompt).
#[derive(Debug, Clone, Copy, PartialEq)]
enum InputState {
    Navigation,
    SearchInput { direction: SearchDirection },
}

/// Direction for forward/backward search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// Character displayed in the search prompt.
    pub fn to_char(self) -> char {
        match self {
            SearchDirection::Forward => '/',
            SearchDirection::Backward => '?',
        }
    }
}

/// High-level input actions emitted by the state machine/service.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    WordForward,
    WordBackward,
    WordEnd,
    GoToStart,
    GoToEnd,
    StartSearch(SearchDirection),
    UpdateSearchBuffer {
        direction: SearchDirection,
        buffer: String,
    },
    CancelSearch,
    ExecuteSearch {
        pattern: String,
        direction: SearchDirection,
    },
    NextMatch,
    PreviousMatch,
    ToggleSelection(SelectionMode),
    CopySelection,
    /// Esc in navigation: drop the active selection
    Escape,
    ToggleLineNumbers,
    ToggleWrap,
    /// Enter in navigation; inserts a marker line while following
    Enter,
    Quit,
    NoAction,
    InvalidInput,
}

/// State machine for the key bindings and the search prompt.
pub struct InputStateMachine {
    state: InputState,
    search_buffer: String,
    /// Bytes of an incomplete UTF-8 character typed into the prompt
    pending_utf8: Vec<u8>,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self {
            state: InputState::Navigation,
            search_buffer: String::new(),
            pending_utf8: Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: Key) -> InputAction {
        match self.state {
            InputState::Navigation => self.handle_navigation(key),
            InputState::SearchInput { direction } => self.handle_search_input(direction, key),
        }
    }

    fn handle_navigation(&mut self, key: Key) -> InputAction {
        let byte = match key {
            Key::Up => return InputAction::CursorUp,
            Key::Down => return InputAction::CursorDown,
            Key::Left => return InputAction::CursorLeft,
            Key::Right => return InputAction::CursorRight,
            Key::PageUp => return InputAction::PageUp,
            Key::PageDown => return InputAction::PageDown,
            Key::Escape => return InputAction::Escape,
            Key::Byte(byte) => byte,
        };

        match byte {
            b'j' => InputAction::CursorDown,
            b'k' => InputAction::CursorUp,
            b'h' => InputAction::CursorLeft,
            b'l' => InputAction::CursorRight,
            b'w' => InputAction::WordForward,
            b'b' => InputAction::WordBackward,
            b'e' => InputAction::WordEnd,
            b'0' | b'I' => InputAction::LineStart,
            b'$' | b'A' => InputAction::LineEnd,
            b'g' => InputAction::GoToStart,
            b'G' => InputAction::GoToEnd,
            b'/' => self.start_search(SearchDirection::Forward),
            b'?' => self.start_search(SearchDirection::Backward),
            b'n' => InputAction::NextMatch,
            b'N' => InputAction::PreviousMatch,
            b'v' => InputAction::ToggleSelection(SelectionMode::Char),
            b'V' => InputAction::ToggleSelection(SelectionMode::Line),
            CTRL_V => InputAction::ToggleSelection(SelectionMode::Block),
            b'y' => InputAction::CopySelection,
            b'L' => InputAction::ToggleLineNumbers,
            b'W' => InputAction::ToggleWrap,
            b'\r' | b'\n' => InputAction::Enter,
            b'q' | CTRL_C => InputAction::Quit,
            _ => InputAction::InvalidInput,
        }
    }

    fn start_search(&mut self, direction: SearchDirection) -> InputAction {
        self.state = InputState::SearchInput { direction };
        self.search_buffer.clear();
        self.pending_utf8.clear();
        InputAction::StartSearch(direction)
    }

    fn leave_search(&mut self) {
        self.state = InputState::Navigation;
        self.search_buffer.clear();
        self.pending_utf8.clear();
    }

    fn handle_search_input(&mut self, direction: SearchDirection, key: Key) -> InputAction {
        let byte = match key {
            Key::Escape => {
                self.leave_search();
                return InputAction::CancelSearch;
            }
            Key::Byte(byte) => byte,
            _ => return InputAction::NoAction,
        };

        match byte {
            b'\r' | b'\n' => {
                let pattern = std::mem::take(&mut self.search_buffer);
                self.leave_search();
                InputAction::ExecuteSearch { pattern, direction }
            }
            CTRL_C => {
                self.leave_search();
                InputAction::CancelSearch
            }
            DEL | CTRL_H => {
                self.pending_utf8.clear();
                self.search_buffer.pop();
                self.buffer_update(direction)
            }
            byte if byte < 0x20 => InputAction::NoAction,
            byte => self.push_prompt_byte(direction, byte),
        }
    }

    /// Collect the bytes of one UTF-8 character before adding it to the prompt.
    fn push_prompt_byte(&mut self, direction: SearchDirection, byte: u8) -> InputAction {
        self.pending_utf8.push(byte);
        match std::str::from_utf8(&self.pending_utf8) {
            Ok(text) => {
                self.search_buffer.push_str(text);
                self.pending_utf8.clear();
                self.buffer_update(direction)
            }
            // incomplete sequence, wait for the remaining bytes
            Err(err) if err.error_len().is_none() => InputAction::NoAction,
            Err(_) => {
                self.pending_utf8.clear();
                InputAction::InvalidInput
            }
        }
    }

    fn buffer_update(&self, direction: SearchDirection) -> InputAction {
        InputAction::UpdateSearchBuffer {
            direction,
            buffer: self.search_buffer.clone(),
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, InputState::SearchInput { .. })
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Service turning raw stdin chunks into `InputAction`s.
#[derive(Default)]
pub struct InputService {
    decoder: KeyDecoder,
    state_machine: InputStateMachine,
}

impl InputService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk and run every key through the state machine.
    ///
    /// `NoAction` and `InvalidInput` are filtered out.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Vec<InputAction> {
        self.decoder
            .feed(bytes)
            .into_iter()
            .map(|key| self.state_machine.handle_key(key))
            .filter(|action| !matches!(action, InputAction::NoAction | InputAction::InvalidInput))
            .collect()
    }

    pub fn is_searching(&self) -> bool {
        self.state_machine.is_searching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(bytes: &[u8]) -> Vec<InputAction> {
        InputService::new().process_bytes(bytes)
    }

    #[test]
    fn navigation_keys_map_to_actions() {
        assert_eq!(
            actions(b"jkhlwbe0I$AgGnN"),
            vec![
                InputAction::CursorDown,
                InputAction::CursorUp,
                InputAction::CursorLeft,
                InputAction::CursorRight,
                InputAction::WordForward,
                InputAction::WordBackward,
                InputAction::WordEnd,
                InputAction::LineStart,
                InputAction::LineStart,
                InputAction::LineEnd,
                InputAction::LineEnd,
                InputAction::GoToStart,
                InputAction::GoToEnd,
                InputAction::NextMatch,
                InputAction::PreviousMatch,
            ]
        );
    }

    #[test]
    fn selection_and_toggles() {
        assert_eq!(
            actions(b"vV\x16yLW"),
            vec![
                InputAction::ToggleSelection(SelectionMode::Char),
                InputAction::ToggleSelection(SelectionMode::Line),
                InputAction::ToggleSelection(SelectionMode::Block),
                InputAction::CopySelection,
                InputAction::ToggleLineNumbers,
                InputAction::ToggleWrap,
            ]
        );
    }

    #[test]
    fn escape_sequences_map_to_motions() {
        assert_eq!(
            actions(b"\x1b[A\x1b[D\x1b[6~"),
            vec![
                InputAction::CursorUp,
                InputAction::CursorLeft,
                InputAction::PageDown
            ]
        );
    }

    #[test]
    fn modified_arrows_do_nothing() {
        assert!(actions(b"\x1b[1;5A").is_empty());
        assert!(actions(b"\x1b[1;2A").is_empty());
        assert_eq!(actions(b"\x1b[1;5Dj"), vec![InputAction::CursorDown]);
    }

    #[test]
    fn quit_on_q_and_ctrl_c() {
        assert_eq!(actions(b"q"), vec![InputAction::Quit]);
        assert_eq!(actions(b"\x03"), vec![InputAction::Quit]);
    }

    #[test]
    fn unbound_keys_are_filtered() {
        assert!(actions(b"xz\x01").is_empty());
    }

    #[test]
    fn search_prompt_flow() {
        let mut service = InputService::new();
        let result = service.process_bytes(b"/er");
        assert_eq!(
            result,
            vec![
                InputAction::StartSearch(SearchDirection::Forward),
                InputAction::UpdateSearchBuffer {
                    direction: SearchDirection::Forward,
                    buffer: "e".to_string(),
                },
                InputAction::UpdateSearchBuffer {
                    direction: SearchDirection::Forward,
                    buffer: "er".to_string(),
                },
            ]
        );
        assert!(service.is_searching());

        let result = service.process_bytes(b"\x7f\r");
        assert_eq!(
            result,
            vec![
                InputAction::UpdateSearchBuffer {
                    direction: SearchDirection::Forward,
                    buffer: "e".to_string(),
                },
                InputAction::ExecuteSearch {
                    pattern: "e".to_string(),
                    direction: SearchDirection::Forward,
                },
            ]
        );
        assert!(!service.is_searching());
    }

    #[test]
    fn prompt_keys_are_text_not_commands() {
        let mut service = InputService::new();
        let result = service.process_bytes(b"?qj");
        assert_eq!(result.len(), 3);
        assert_eq!(
            result[2],
            InputAction::UpdateSearchBuffer {
                direction: SearchDirection::Backward,
                buffer: "qj".to_string(),
            }
        );
    }

    #[test]
    fn escape_cancels_prompt() {
        let mut service = InputService::new();
        service.process_bytes(b"/abc");
        assert_eq!(service.process_bytes(b"\x1b"), vec![InputAction::CancelSearch]);
        assert!(!service.is_searching());
        // back in navigation
        assert_eq!(service.process_bytes(b"j"), vec![InputAction::CursorDown]);
    }

    #[test]
    fn empty_submit_still_executes() {
        let mut service = InputService::new();
        let result = service.process_bytes(b"/\r");
        assert_eq!(
            result[1],
            InputAction::ExecuteSearch {
                pattern: String::new(),
                direction: SearchDirection::Forward,
            }
        );
    }

    #[test]
    fn multibyte_characters_in_prompt() {
        let mut service = InputService::new();
        service.process_bytes(b"/");
        let bytes = "é".as_bytes();
        assert!(service.process_bytes(&bytes[..1]).is_empty());
        assert_eq!(
            service.process_bytes(&bytes[1..]),
            vec![InputAction::UpdateSearchBuffer {
                direction: SearchDirection::Forward,
                buffer: "é".to_string(),
            }]
        );
    }

    #[test]
    fn enter_in_navigation() {
        assert_eq!(actions(b"\r"), vec![InputAction::Enter]);
    }
}
