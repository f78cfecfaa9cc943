//! Credalysis Web Client
//!
//! Browser frontend for the Credalysis backend built with Leptos (WASM).
//!
//! # Features
//!
//! - Ask AI chat
//! - Financial goals with review, advice and scenario analysis
//! - Loan overview
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! Page state and response formatting come from the `credalysis` crate; this
//! crate only wires them to signals and talks HTTP through gloo-net.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
