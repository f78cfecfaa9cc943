//! Formatted Response Component
//!
//! Renders the blocks produced by `credalysis::format`.

use leptos::*;

use credalysis::format::Block;

/// Headings, paragraphs and bullet lists of an assistant response
#[component]
pub fn BlockList(
    #[prop(into)]
    blocks: Signal<Vec<Block>>,
) -> impl IntoView {
    view! {
        <div class="text-gray-300">
            {move || blocks.get().into_iter().map(render_block).collect_view()}
        </div>
    }
}

fn render_block(block: Block) -> View {
    match block {
        Block::Heading(text) => view! {
            <h3 class="font-bold text-lg text-indigo-400 mt-4 mb-2">{text}</h3>
        }.into_view(),
        Block::Prose(text) => view! {
            <p class="my-2 whitespace-pre-wrap">{text}</p>
        }.into_view(),
        Block::Emphasis(text) => view! {
            <p class="my-3 italic text-gray-200 whitespace-pre-wrap">{text}</p>
        }.into_view(),
        Block::List(items) => view! {
            <ul class="list-disc pl-5 py-2">
                {items.into_iter().map(|item| view! {
                    <li class="ml-2 py-1">{item}</li>
                }).collect_view()}
            </ul>
        }.into_view(),
    }
}
