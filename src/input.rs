//! Input subsystem.
//!
//! [`raw`] turns stdin bytes into keys, [`service`] maps keys to [`InputAction`]s.

pub mod raw;
pub mod service;

pub use raw::{Key, KeyDecoder};
pub use service::{InputAction, InputService, InputStateMachine, SearchDirection};
