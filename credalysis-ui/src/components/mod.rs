//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod blocks;
pub mod loading;
pub mod nav;
pub mod toast;

pub use blocks::BlockList;
pub use loading::{Loading, TypingIndicator};
pub use nav::Nav;
pub use toast::Toast;
