//! Goals Page
//!
//! Goal list with create, edit and delete, plus the goal assistant panel.
//! Every change is followed by a refetch of the full list.

use leptos::*;

use credalysis::error::AppError;
use credalysis::goals::{GoalTracker, ADD_FAILED, DELETE_FAILED, DELETE_PROMPT, UPDATE_FAILED};
use credalysis::models::{AssistantAction, Goal, GoalDraft, ProgressBand, PRIORITIES};
use credalysis::render::{format_date, format_money};

use crate::api;
use crate::components::{BlockList, Loading};
use crate::state::global::{GlobalState, StoredSession};

/// Goals page component
#[component]
pub fn Goals() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    if let Err(e) = state.session.with_untracked(StoredSession::check_user) {
        state.report(&e);
        return view! { <AccessDenied /> }.into_view();
    }

    let tracker = create_rw_signal(GoalTracker::new(state.identity()));
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        reload(tracker, state).await;
        set_loading.set(false);
    });

    view! {
        <div class="max-w-5xl mx-auto space-y-8">
            <h1 class="text-3xl font-bold text-gray-100">"Financial Goals"</h1>

            <NewGoalForm tracker=tracker />

            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <GoalList tracker=tracker />
            </Show>

            <AssistantPanelView tracker=tracker />
        </div>
    }
    .into_view()
}

/// Refetch the goal list into the tracker
async fn reload(tracker: RwSignal<GoalTracker>, state: GlobalState) {
    let Some(identity) = tracker.with_untracked(|t| t.identity().cloned()) else {
        state.report(&AppError::MissingIdentity);
        return;
    };

    let result = api::list_goals(&identity).await;
    if let Some(Err(e)) = tracker.try_update(|t| t.apply_goals(result).map(|_| ())) {
        state.report(&e);
    }
}

#[component]
fn AccessDenied() -> impl IntoView {
    view! {
        <div class="max-w-md mx-auto mt-16 bg-gray-800 rounded-lg p-8 text-center">
            <h1 class="text-2xl font-bold text-red-400 mb-2">"Access denied"</h1>
            <p class="text-gray-400">"Sign in with a user account to manage goals."</p>
        </div>
    }
}

// ============================================
// Create
// ============================================

fn parse_amount(value: String) -> Option<f64> {
    value.trim().parse().ok()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[component]
fn NewGoalForm(tracker: RwSignal<GoalTracker>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (saving, set_saving) = create_signal(false);

    let draft = move || tracker.with(|t| t.new_goal.clone());
    let edit_draft = move |f: &dyn Fn(&mut GoalDraft)| tracker.update(|t| f(&mut t.new_goal));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let today = chrono::Utc::now().date_naive();
        let payload = match tracker.with_untracked(|t| t.prepare_create(today)) {
            Ok(payload) => payload,
            Err(e) => {
                state.report(&e);
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            let created = api::create_goal(&payload).await;
            reload(tracker, state).await;

            match created {
                Ok(()) => {
                    tracker.update(|t| t.new_goal = GoalDraft::default());
                    state.show_success("Goal added");
                }
                Err(e) => state.report(&AppError::backend(ADD_FAILED, e)),
            }
            set_saving.set(false);
        });
    };

    let input_class = "w-full bg-gray-700 border border-gray-600 text-gray-100 rounded-lg px-3 py-2 \
                       focus:ring-2 focus:ring-indigo-500 placeholder-gray-400";

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-lg p-6 grid grid-cols-1 sm:grid-cols-2 gap-4">
            <h2 class="sm:col-span-2 text-xl font-semibold text-gray-100">"Add a goal"</h2>

            <input
                type="text"
                placeholder="Goal name *"
                class=input_class
                prop:value=move || draft().goal_name
                on:input=move |ev| edit_draft(&|d| d.goal_name = event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Type (e.g. Savings)"
                class=input_class
                prop:value=move || draft().goal_type.unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| d.goal_type = non_empty(event_target_value(&ev)))
            />
            <input
                type="number"
                step="0.01"
                placeholder="Target amount *"
                class=input_class
                prop:value=move || draft().target_amount.map(|v| v.to_string()).unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| d.target_amount = parse_amount(event_target_value(&ev)))
            />
            <input
                type="number"
                step="0.01"
                placeholder="Saved so far"
                class=input_class
                prop:value=move || draft().current_amount.map(|v| v.to_string()).unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| d.current_amount = parse_amount(event_target_value(&ev)))
            />
            <input
                type="date"
                class=input_class
                prop:value=move || draft().target_date.unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| d.target_date = non_empty(event_target_value(&ev)))
            />
            <PrioritySelect
                value=Signal::derive(move || draft().priority.unwrap_or_default())
                on_change=Callback::new(move |p: String| edit_draft(&|d| d.priority = non_empty(p.clone())))
            />
            <input
                type="number"
                step="0.01"
                placeholder="Required monthly contribution"
                class=input_class
                prop:value=move || draft().required_monthly_contribution.map(|v| v.to_string()).unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| {
                    d.required_monthly_contribution = parse_amount(event_target_value(&ev))
                })
            />
            <input
                type="number"
                step="0.01"
                placeholder="Actual monthly contribution"
                class=input_class
                prop:value=move || draft().actual_monthly_contribution.map(|v| v.to_string()).unwrap_or_default()
                on:input=move |ev| edit_draft(&|d| {
                    d.actual_monthly_contribution = parse_amount(event_target_value(&ev))
                })
            />

            <button
                type="submit"
                disabled=move || saving.get()
                class="sm:col-span-2 bg-indigo-600 text-white px-5 py-2 rounded-lg hover:bg-indigo-700
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {move || if saving.get() { "Adding..." } else { "Add Goal" }}
            </button>
        </form>
    }
}

#[component]
fn PrioritySelect(
    #[prop(into)]
    value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="w-full bg-gray-700 border border-gray-600 text-gray-100 rounded-lg px-3 py-2"
            on:change=move |ev| on_change.call(event_target_value(&ev))
        >
            <option value="" selected=move || value.get().is_empty()>"Priority"</option>
            {PRIORITIES.iter().copied().map(|p| view! {
                <option value=p selected=move || value.get() == p>{p}</option>
            }).collect_view()}
        </select>
    }
}

// ============================================
// List, edit and delete
// ============================================

/// The goal list and the position of the goal being edited
///
/// Cards re-render only when one of these changes, not on every draft edit.
fn list_memos(tracker: RwSignal<GoalTracker>) -> (Memo<Vec<Goal>>, Memo<Option<usize>>) {
    (
        create_memo(move |_| tracker.with(|t| t.goals().to_vec())),
        create_memo(move |_| tracker.with(|t| t.edit().map(|e| e.index))),
    )
}

#[component]
fn GoalList(tracker: RwSignal<GoalTracker>) -> impl IntoView {
    let (goals, edit_index) = list_memos(tracker);

    view! {
        <Show
            when=move || goals.with(|g| !g.is_empty())
            fallback=|| view! { <p class="text-gray-400 text-center py-8">"No goals yet."</p> }
        >
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {move || goals.get().into_iter().enumerate().map(|(index, goal)| {
                    let editing = move || edit_index.get() == Some(index);
                    view! {
                        <Show
                            when=editing
                            fallback=move || view! { <GoalCard goal=goal.clone() index=index tracker=tracker /> }
                        >
                            <EditGoalCard tracker=tracker />
                        </Show>
                    }
                }).collect_view()}
            </div>
        </Show>
    }
}

fn band_class(band: ProgressBand) -> &'static str {
    match band {
        ProgressBand::Low => "bg-red-500",
        ProgressBand::Fair => "bg-yellow-500",
        ProgressBand::Good => "bg-blue-500",
        ProgressBand::Strong => "bg-green-500",
    }
}

#[component]
fn GoalCard(goal: Goal, index: usize, tracker: RwSignal<GoalTracker>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let name = goal.goal_name.clone();
    let on_delete = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(DELETE_PROMPT).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(identity) = tracker.with_untracked(|t| t.identity().cloned()) else {
            state.report(&AppError::MissingIdentity);
            return;
        };

        let name = name.clone();
        spawn_local(async move {
            match api::delete_goal(&identity, &name).await {
                Ok(()) => {
                    state.show_success("Goal deleted");
                    reload(tracker, state).await;
                }
                Err(e) => state.report(&AppError::backend(DELETE_FAILED, e)),
            }
        });
    };

    let on_edit = move |_| {
        if let Some(Err(e)) = tracker.try_update(|t| t.begin_edit(index).map(|_| ())) {
            state.report(&e);
        }
    };

    let width = goal.progress_percent.clamp(0.0, 100.0);
    let track = if goal.on_track { "On Track" } else { "Off Track" };
    let track_class = if goal.on_track { "text-green-400" } else { "text-red-400" };

    view! {
        <div class="bg-gray-800 rounded-lg p-5 shadow-md space-y-3">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="text-lg font-semibold text-gray-100">{goal.goal_name.clone()}</h3>
                    <p class="text-sm text-gray-400">
                        {format!("{} · {} priority · {}", goal.goal_type, goal.priority, goal.status)}
                    </p>
                </div>
                <span class=format!("text-sm font-medium {}", track_class)>{track}</span>
            </div>

            <div class="w-full bg-gray-700 rounded-full h-3">
                <div
                    class=format!("h-3 rounded-full {}", band_class(goal.progress_band()))
                    style=format!("width: {}%", width)
                />
            </div>
            <p class="text-sm text-gray-300">
                {format!(
                    "{} of {} ({}%)",
                    format_money(goal.current_amount),
                    format_money(goal.target_amount),
                    goal.progress_percent
                )}
            </p>
            <p class="text-sm text-gray-400">
                "Target date: " {format_date(&goal.target_date)}
                " · Monthly: " {format_money(goal.actual_monthly_contribution)}
                " / " {format_money(goal.required_monthly_contribution)}
            </p>

            <div class="flex gap-2 pt-2">
                <button on:click=on_edit class="px-3 py-1 rounded bg-gray-700 text-gray-200 hover:bg-gray-600">
                    "Edit"
                </button>
                <button on:click=on_delete class="px-3 py-1 rounded bg-red-700 text-white hover:bg-red-600">
                    "Delete"
                </button>
            </div>
        </div>
    }
}

#[component]
fn EditGoalCard(tracker: RwSignal<GoalTracker>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let draft = move || tracker.with(|t| t.edit().map(|e| e.draft.clone()).unwrap_or_default());
    let edit_draft = move |f: &dyn Fn(&mut Goal)| {
        tracker.update(|t| {
            if let Some(draft) = t.edit_draft_mut() {
                f(draft);
            }
        })
    };

    let on_save = move |_| {
        let (original_name, payload) = match tracker.with_untracked(GoalTracker::prepare_update) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => return,
            Err(e) => {
                state.report(&e);
                return;
            }
        };

        spawn_local(async move {
            match api::update_goal(&payload.customer_email, &original_name, &payload).await {
                Ok(()) => {
                    tracker.update(GoalTracker::cancel_edit);
                    state.show_success("Goal updated");
                    reload(tracker, state).await;
                }
                Err(e) => state.report(&AppError::backend(UPDATE_FAILED, e)),
            }
        });
    };

    let input_class = "w-full bg-gray-700 border border-gray-600 text-gray-100 rounded-lg px-3 py-2";

    view! {
        <div class="bg-gray-800 rounded-lg p-5 shadow-md space-y-3 ring-2 ring-indigo-500">
            <input
                type="text"
                class=input_class
                prop:value=move || draft().goal_name
                on:input=move |ev| edit_draft(&|g| g.goal_name = event_target_value(&ev))
            />
            <input
                type="text"
                class=input_class
                prop:value=move || draft().goal_type
                on:input=move |ev| edit_draft(&|g| g.goal_type = event_target_value(&ev))
            />
            <div class="grid grid-cols-2 gap-2">
                <input
                    type="number"
                    step="0.01"
                    class=input_class
                    prop:value=move || draft().current_amount.to_string()
                    on:input=move |ev| edit_draft(&|g| {
                        g.current_amount = parse_amount(event_target_value(&ev)).unwrap_or_default()
                    })
                />
                <input
                    type="number"
                    step="0.01"
                    class=input_class
                    prop:value=move || draft().target_amount.to_string()
                    on:input=move |ev| edit_draft(&|g| {
                        g.target_amount = parse_amount(event_target_value(&ev)).unwrap_or_default()
                    })
                />
            </div>
            <input
                type="date"
                class=input_class
                prop:value=move || draft().target_date
                on:input=move |ev| edit_draft(&|g| g.target_date = event_target_value(&ev))
            />
            <PrioritySelect
                value=Signal::derive(move || draft().priority)
                on_change=Callback::new(move |p: String| edit_draft(&|g| g.priority = p.clone()))
            />
            <input
                type="text"
                class=input_class
                prop:value=move || draft().status
                on:input=move |ev| edit_draft(&|g| g.status = event_target_value(&ev))
            />

            <div class="flex gap-2 pt-2">
                <button on:click=on_save class="px-3 py-1 rounded bg-indigo-600 text-white hover:bg-indigo-700">
                    "Save"
                </button>
                <button
                    on:click=move |_| tracker.update(GoalTracker::cancel_edit)
                    class="px-3 py-1 rounded bg-gray-700 text-gray-200 hover:bg-gray-600"
                >
                    "Cancel"
                </button>
            </div>
        </div>
    }
}

// ============================================
// Assistant
// ============================================

/// The selected assistant tab, unaffected by typing in the question boxes
fn active_tab(tracker: RwSignal<GoalTracker>) -> Memo<AssistantAction> {
    create_memo(move |_| tracker.with(|t| t.assistant.active_tab()))
}

#[component]
fn AssistantPanelView(tracker: RwSignal<GoalTracker>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (running, set_running) = create_signal(false);

    let active = active_tab(tracker);

    let run = move |_| {
        let action = active.get_untracked();
        let checked = tracker.with_untracked(|t| {
            t.assistant.check(action)?;
            let identity = t.identity().cloned().ok_or(AppError::MissingIdentity)?;
            Ok::<_, AppError>((
                identity,
                t.assistant.question.clone(),
                t.assistant.scenario_description.clone(),
            ))
        });
        let (identity, question, description) = match checked {
            Ok(inputs) => inputs,
            Err(e) => {
                state.report(&e);
                return;
            }
        };

        set_running.set(true);
        spawn_local(async move {
            let result = match action {
                AssistantAction::Review => api::goal_review(&identity, &question).await,
                AssistantAction::Advice => api::goal_advice(&identity).await,
                AssistantAction::Scenario => api::goal_scenario(&identity, &description).await,
            };
            if let Some(Err(e)) = tracker.try_update(|t| t.assistant.apply(action, result).map(|_| ())) {
                state.report(&e);
            }
            set_running.set(false);
        });
    };

    let blocks = create_memo(move |_| tracker.with(|t| t.assistant.visible_blocks()));

    view! {
        <div class="bg-gray-800 rounded-lg p-6 space-y-4">
            <h2 class="text-xl font-semibold text-gray-100">"Goal Assistant"</h2>

            <div class="flex gap-2 border-b border-gray-700 pb-2">
                {AssistantAction::all().iter().copied().map(|tab| view! {
                    <button
                        on:click=move |_| tracker.update(|t| t.assistant.select_tab(tab))
                        class=move || if active.get() == tab {
                            "px-4 py-2 rounded-lg bg-indigo-600 text-white"
                        } else {
                            "px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700"
                        }
                    >
                        {tab.label()}
                    </button>
                }).collect_view()}
            </div>

            {move || match active.get() {
                AssistantAction::Review => view! {
                    <input
                        type="text"
                        placeholder="Ask a question about your goals (optional)"
                        class="w-full bg-gray-700 border border-gray-600 text-gray-100 rounded-lg px-3 py-2"
                        prop:value=move || tracker.with(|t| t.assistant.question.clone())
                        on:input=move |ev| tracker.update(|t| t.assistant.question = event_target_value(&ev))
                    />
                }.into_view(),
                AssistantAction::Advice => ().into_view(),
                AssistantAction::Scenario => view! {
                    <textarea
                        rows="3"
                        placeholder="Describe a what-if scenario, e.g. I get a 10% raise next year"
                        class="w-full bg-gray-700 border border-gray-600 text-gray-100 rounded-lg px-3 py-2"
                        prop:value=move || tracker.with(|t| t.assistant.scenario_description.clone())
                        on:input=move |ev| {
                            tracker.update(|t| t.assistant.scenario_description = event_target_value(&ev))
                        }
                    />
                }.into_view(),
            }}

            <button
                on:click=run
                disabled=move || running.get()
                class="bg-indigo-600 text-white px-5 py-2 rounded-lg hover:bg-indigo-700
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {move || if running.get() { "Thinking...".to_string() } else { format!("Get {}", active.get().label()) }}
            </button>

            <Show when=move || running.get()>
                <Loading />
            </Show>
            <BlockList blocks=blocks />
        </div>
    }
}
