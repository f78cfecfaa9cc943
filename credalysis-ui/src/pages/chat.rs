//! Ask AI Page
//!
//! Chat with the Credalysis assistant. The question shows up in the
//! transcript right away; the reply (or an error line) follows when the
//! backend answers.

use leptos::*;

use credalysis::chat::ChatSession;
use credalysis::models::ChatMessage;

use crate::api;
use crate::components::TypingIndicator;
use crate::state::global::GlobalState;

/// Ask AI page component
#[component]
pub fn AskAi() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let session = create_rw_signal(ChatSession::new(state.identity()));
    let bottom = create_node_ref::<html::Div>();
    let messages = create_memo(move |_| session.with(|s| s.transcript().messages().to_vec()));
    let loading = create_memo(move |_| session.with(ChatSession::is_loading));

    // Keep the newest entry in view
    create_effect(move |_| {
        messages.with(Vec::len);
        if let Some(el) = bottom.get() {
            el.scroll_into_view();
        }
    });

    let send = move || {
        let Some(begun) = session.try_update(|s| s.begin()) else {
            return;
        };

        match begun {
            Ok(pending) => spawn_local(async move {
                let result = api::ask(pending.identity(), pending.query()).await;
                if let Err(e) = &result {
                    web_sys::console::error_1(&format!("Error asking AI: {}", e).into());
                }
                session.update(|s| {
                    s.complete(pending, result);
                });
            }),
            Err(e) if e.is_silent() => {}
            Err(e) => state.show_error(&e.to_string()),
        }
    };

    view! {
        <div class="flex justify-center items-start">
            <div class="w-full max-w-3xl bg-gray-800 rounded-lg shadow-xl h-[calc(100vh-10rem)] flex flex-col p-6">
                <h1 class="text-2xl sm:text-3xl font-bold mb-6 text-gray-100 text-center border-b border-gray-700 pb-4">
                    "Ask Credalysis AI"
                </h1>

                // Transcript
                <div class="flex-1 overflow-y-auto space-y-4 mb-4 pr-2">
                    {move || {
                        messages
                            .get()
                            .into_iter()
                            .map(|message| view! { <MessageBubble message=message /> })
                            .collect_view()
                    }}
                    <Show when=move || loading.get()>
                        <TypingIndicator />
                    </Show>
                    <div node_ref=bottom />
                </div>

                // Input
                <div class="flex items-end gap-2 pt-4 border-t border-gray-700">
                    <textarea
                        rows="1"
                        placeholder="Type your question..."
                        prop:value=move || session.with(|s| s.input().to_string())
                        on:input=move |ev| session.update(|s| s.set_input(event_target_value(&ev)))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send();
                            }
                        }
                        class="flex-1 bg-gray-700 border border-gray-600 text-gray-100 rounded-lg p-3
                               resize-none focus:ring-2 focus:ring-indigo-500 placeholder-gray-400"
                        style="max-height: 120px; overflow-y: auto"
                    />
                    <button
                        on:click=move |_| send()
                        disabled=move || session.with(|s| s.is_loading() || s.input().trim().is_empty())
                        class="bg-indigo-600 text-white px-5 py-3 rounded-lg hover:bg-indigo-700
                               disabled:opacity-50 disabled:cursor-not-allowed self-end"
                    >
                        "Send"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// One transcript entry
#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let class = if message.is_user() {
        "ml-auto bg-indigo-600 text-white rounded-br-none"
    } else {
        "mr-auto bg-gray-600 text-gray-100 rounded-bl-none"
    };

    view! {
        <div class=format!(
            "max-w-[85%] sm:max-w-[80%] p-3 rounded-xl whitespace-pre-wrap shadow-md break-words {}",
            class
        )>
            {message.text}
        </div>
    }
}
