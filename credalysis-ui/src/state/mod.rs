//! State Management
//!
//! Global application state: the signed-in identity and toast messages.

pub mod global;

pub use global::{provide_global_state, GlobalState, StoredSession};
