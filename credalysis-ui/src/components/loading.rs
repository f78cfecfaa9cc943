//! Loading Component
//!
//! Spinners shown while a request is outstanding.

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="animate-spin rounded-full h-12 w-12 border-t-2 border-b-2 border-indigo-500" />
        </div>
    }
}

/// Three pulsing dots in an assistant bubble
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="mr-auto bg-gray-600 p-3 rounded-xl rounded-bl-none max-w-[80%] shadow-md">
            <div class="flex items-center">
                <span class="inline-block w-2 h-2 bg-gray-400 rounded-full mr-1 animate-pulse" />
                <span class="inline-block w-2 h-2 bg-gray-400 rounded-full mr-1 animate-pulse" />
                <span class="inline-block w-2 h-2 bg-gray-400 rounded-full animate-pulse" />
            </div>
        </div>
    }
}
