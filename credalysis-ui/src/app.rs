//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::pages::{AskAi, Goals, Loans};
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=AskAi />
                        <Route path="/user/ask-ai" view=AskAi />
                        <Route path="/user/goals" view=Goals />
                        <Route path="/user/loans" view=Loans />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// 404 page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="text-center py-16">
            <h1 class="text-4xl font-bold text-gray-300 mb-4">"404"</h1>
            <p class="text-gray-400 mb-8">"Page not found"</p>
            <A href="/user/ask-ai" class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 rounded-lg transition-colors">
                "Go to Ask AI"
            </A>
        </div>
    }
}
