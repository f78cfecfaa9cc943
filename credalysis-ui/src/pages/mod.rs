//! Pages
//!
//! Top-level page components for each route.

pub mod chat;
pub mod goals;
pub mod loans;

pub use chat::AskAi;
pub use goals::Goals;
pub use loans::Loans;
