//! Navigation Component
//!
//! Header navigation bar with brand and page links.

use leptos::*;
use leptos_router::*;

use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Brand
                    <A href="/user/ask-ai" class="flex items-center space-x-3">
                        <span class="text-xl font-bold text-white">"Credalysis"</span>
                    </A>

                    // Navigation links
                    <div class="flex items-center space-x-1">
                        <NavLink href="/user/ask-ai" label="Ask AI" />
                        <NavLink href="/user/goals" label="Goals" />
                        <NavLink href="/user/loans" label="Loans" />
                    </div>

                    // Signed-in identity
                    <span class="text-sm text-gray-400">
                        {move || {
                            state.session.with(|s| s.email.clone())
                                .unwrap_or_else(|| "Not signed in".to_string())
                        }}
                    </span>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
