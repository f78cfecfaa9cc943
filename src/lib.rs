//! # Credalysis
//!
//! Client for the Credalysis personal-finance backend: an AI chat
//! assistant, a financial-goal tracker with a goal assistant, and a loan
//! listing. All storage and inference live in the backend; this crate holds
//! the page state, the synchronization rules and the response formatting.
//!
//! ## Modules
//!
//! - [`models`]: Wire types shared with the browser frontend
//! - [`backend`]: The [`backend::FinanceBackend`] trait, routes and the reqwest client
//! - [`chat`]: Ask AI transcript
//! - [`goals`]: Goal CRUD and the review / advice / scenario panel
//! - [`loans`]: Loan listing
//! - [`format`]: Assistant text to display blocks
//! - [`render`]: Money, dates and plain-text tables
//!
//! The `native` feature (on by default) adds the reqwest client, the
//! configuration loader and the session file used by the `credalysis` CLI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use credalysis::backend::{BackendClient, BackendConfig};
//! use credalysis::goals::GoalTracker;
//! use credalysis::models::{GoalDraft, Identity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = BackendClient::new(BackendConfig::default())?;
//!     let mut goals = GoalTracker::new(Identity::new("ana@example.com"));
//!
//!     goals.new_goal = GoalDraft::new("Emergency fund", 5000.0).current_amount(1500.0);
//!     goals.create(&backend).await?;
//!
//!     for goal in goals.goals() {
//!         println!("{}: {}%", goal.goal_name, goal.progress_percent);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod chat;
#[cfg(feature = "native")]
pub mod config;
pub mod error;
pub mod format;
pub mod goals;
pub mod loans;
pub mod models;
pub mod render;
#[cfg(feature = "native")]
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{AppError, AppResult};
