//! Low-level input decoding: raw terminal bytes into keys.
//!
//! The terminal runs in raw mode, so every key press arrives as one byte, a UTF-8 sequence or
//! an ANSI escape sequence. Only the cursor and page keys are recognised among escape
//! sequences; anything else starting with ESC is dropped. Decoder state survives across
//! reads so a sequence split between two chunks still decodes.

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any byte that is not part of an escape sequence
    Byte(u8),
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    /// A lone ESC press
    Escape,
}

pub const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    Ground,
    /// Saw ESC
    Escape,
    /// Inside `ESC [`, collecting parameter bytes until the final byte
    Csi,
}

/// Longest parameter run kept for matching; longer sequences are consumed but never match.
const MAX_CSI_PARAMS: usize = 8;

/// Stateful byte-to-key decoder.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    state: DecodeState,
    params: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk as returned by a single read.
    ///
    /// An ESC that ends the chunk is reported as [`Key::Escape`]: terminals write a whole
    /// escape sequence at once, so a trailing ESC is a key press of its own.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Key> {
        let mut keys = Vec::with_capacity(bytes.len());
        for &byte in bytes {
            if let Some(key) = self.step(byte) {
                keys.push(key);
            }
        }
        if self.state == DecodeState::Escape {
            self.state = DecodeState::Ground;
            keys.push(Key::Escape);
        }
        keys
    }

    fn step(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            DecodeState::Ground => {
                if byte == ESC {
                    self.state = DecodeState::Escape;
                    None
                } else {
                    Some(Key::Byte(byte))
                }
            }
            DecodeState::Escape => {
                self.state = if byte == b'[' {
                    self.params.clear();
                    DecodeState::Csi
                } else {
                    DecodeState::Ground
                };
                None
            }
            DecodeState::Csi => match byte {
                // parameter and intermediate bytes
                0x20..=0x3f => {
                    if self.params.len() <= MAX_CSI_PARAMS {
                        self.params.push(byte);
                    }
                    None
                }
                0x40..=0x7e => {
                    self.state = DecodeState::Ground;
                    let key = csi_key(&self.params, byte);
                    self.params.clear();
                    key
                }
                // anything else aborts the sequence
                _ => {
                    self.params.clear();
                    self.state = if byte == ESC {
                        DecodeState::Escape
                    } else {
                        DecodeState::Ground
                    };
                    None
                }
            },
        }
    }
}

/// Key for a complete CSI sequence. Only the bare arrow and page forms are recognised.
fn csi_key(params: &[u8], final_byte: u8) -> Option<Key> {
    match (params, final_byte) {
        (b"", b'A') => Some(Key::Up),
        (b"", b'B') => Some(Key::Down),
        (b"", b'C') => Some(Key::Right),
        (b"", b'D') => Some(Key::Left),
        (b"5", b'~') => Some(Key::PageUp),
        (b"6", b'~') => Some(Key::PageDown),
        _ => None,
    }
}
