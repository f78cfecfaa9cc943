//! Loans Page
//!
//! Read-only table of the user's loans, fetched once on mount.

use leptos::*;

use credalysis::loans::{LoanBook, NO_LOANS_MESSAGE};
use credalysis::models::{Loan, LoanStatus};
use credalysis::render::{format_date, format_money, format_rate};
use credalysis::AppError;

use crate::api;
use crate::components::Loading;
use crate::state::global::GlobalState;

/// Loans page component
#[component]
pub fn Loans() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let book = create_rw_signal(LoanBook::new(state.identity()));
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        match book.with_untracked(|b| b.identity().cloned()) {
            Some(identity) => {
                let result = api::list_loans(&identity).await;
                if let Some(Err(e)) = book.try_update(|b| b.apply(result).map(|_| ())) {
                    state.report(&e);
                }
            }
            None => state.report(&AppError::MissingIdentity),
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-6xl mx-auto">
            <h1 class="text-3xl font-bold text-gray-100 mb-6">"My Loans"</h1>

            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || book.with(|b| !b.is_empty())
                    fallback=|| view! {
                        <p class="text-gray-400 text-center py-8">{NO_LOANS_MESSAGE}</p>
                    }
                >
                    <LoanTable loans=Signal::derive(move || book.with(|b| b.loans().to_vec())) />
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn LoanTable(loans: Signal<Vec<Loan>>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto bg-gray-800 rounded-lg shadow-xl">
            <table class="min-w-full text-sm text-left text-gray-300">
                <thead class="bg-gray-700 text-gray-100 uppercase text-xs">
                    <tr>
                        <th class="px-4 py-3">"Product"</th>
                        <th class="px-4 py-3">"Type"</th>
                        <th class="px-4 py-3 text-right">"Balance"</th>
                        <th class="px-4 py-3 text-right">"Credit Limit"</th>
                        <th class="px-4 py-3 text-right">"Rate"</th>
                        <th class="px-4 py-3 text-right">"Payment"</th>
                        <th class="px-4 py-3">"Start"</th>
                        <th class="px-4 py-3">"End"</th>
                        <th class="px-4 py-3">"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || loans.get().into_iter().map(|loan| view! { <LoanRow loan=loan /> }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

fn status_class(status: LoanStatus) -> &'static str {
    match status {
        LoanStatus::Active => "bg-green-700 text-green-100",
        LoanStatus::PaidOff => "bg-blue-700 text-blue-100",
        LoanStatus::Defaulted => "bg-red-700 text-red-100",
        LoanStatus::Pending => "bg-yellow-700 text-yellow-100",
        LoanStatus::Other => "bg-gray-600 text-gray-100",
    }
}

#[component]
fn LoanRow(loan: Loan) -> impl IntoView {
    let payment = if loan.payment_frequency.is_empty() {
        format_money(loan.payment_amount)
    } else {
        format!("{} / {}", format_money(loan.payment_amount), loan.payment_frequency)
    };

    view! {
        <tr class="border-b border-gray-700 hover:bg-gray-700/50">
            <td class="px-4 py-3 font-medium text-gray-100">{loan.product_name.clone()}</td>
            <td class="px-4 py-3">{loan.product_type.clone()}</td>
            <td class="px-4 py-3 text-right">{format_money(loan.balance)}</td>
            <td class="px-4 py-3 text-right">{format_money(loan.credit_limit)}</td>
            <td class="px-4 py-3 text-right">{format_rate(loan.interest_rate)}</td>
            <td class="px-4 py-3 text-right">{payment}</td>
            <td class="px-4 py-3">{format_date(&loan.start_date)}</td>
            <td class="px-4 py-3">{format_date(&loan.end_date)}</td>
            <td class="px-4 py-3">
                <span class=format!("px-2 py-1 rounded-full text-xs {}", status_class(loan.status_category()))>
                    {loan.status_label().to_string()}
                </span>
            </td>
        </tr>
    }
}
