//! The expense tracker page.
//!
//! A single page with the submission form, the category summary sidebar,
//! and the filterable expense table. The form posts to the JSON API with a
//! fresh idempotency key embedded at render time, so a double-clicked
//! submit or a retried request records one expense.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    AppState, Error, endpoints,
    expense::{
        Expense, ExpenseFilter, ExpenseSort, ListExpensesParams, SUGGESTED_CATEGORIES,
        list_expenses,
    },
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, HeadElement, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, base, format_rupees, format_rupees_rounded,
    },
    idempotency::generate_key,
    summary::{CategorySummary, summarize_by_category},
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection shared across handlers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expense tracker page.
///
/// Takes the same query parameters as the listing endpoint so the filter
/// bar can round-trip through plain links.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(params): Query<ListExpensesParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let visible_expenses = list_expenses(&params.filter(), params.sort(), &connection)
        .inspect_err(|error| tracing::error!("Failed to list expenses: {error}"))?;

    // The sidebar always summarizes all spending, not just the filtered view.
    let all_expenses = list_expenses(
        &ExpenseFilter::default(),
        ExpenseSort::CreatedDescending,
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to list expenses: {error}"))?;

    Ok(expenses_view(&visible_expenses, &all_expenses, &params).into_response())
}

// ==============
// VIEWS
// ==============

/// The script that submits the expense form to the JSON API.
///
/// A failed submission keeps the embedded key so a retry cannot create a
/// duplicate. A successful one reloads the page, which embeds a fresh key.
const FORM_SCRIPT: &str = r#"
document.addEventListener('DOMContentLoaded', () => {
    const form = document.getElementById('expense-form');
    const errorBox = document.getElementById('form-error');

    form.addEventListener('submit', async (event) => {
        event.preventDefault();
        errorBox.classList.add('hidden');

        const fields = new FormData(form);
        const payload = {
            amount: parseFloat(fields.get('amount')),
            category: fields.get('category'),
            description: fields.get('description'),
            date: fields.get('date'),
        };

        try {
            const response = await fetch(form.dataset.expensesEndpoint, {
                method: 'POST',
                headers: {
                    'Content-Type': 'application/json',
                    'Idempotency-Key': form.dataset.idempotencyKey,
                },
                body: JSON.stringify(payload),
            });

            if (response.ok) {
                window.location.reload();
                return;
            }

            const body = await response.json();
            errorBox.textContent = body.details
                ? Object.values(body.details).join(' ')
                : body.error;
            errorBox.classList.remove('hidden');
        } catch (error) {
            errorBox.textContent = 'Could not reach the server. Please try again.';
            errorBox.classList.remove('hidden');
        }
    });
});
"#;

fn expenses_view(
    visible_expenses: &[Expense],
    all_expenses: &[Expense],
    params: &ListExpensesParams,
) -> Markup {
    let summaries = summarize_by_category(all_expenses);
    let total_cents: i64 = all_expenses
        .iter()
        .map(|expense| expense.amount_cents)
        .sum();

    // The filter offers every category seen in the data, not just the
    // suggested ones, since categories are stored as plain text.
    let known_categories: BTreeSet<&str> = all_expenses
        .iter()
        .map(|expense| expense.category.as_str())
        .collect();

    let content = html!(
        div class="layout"
        {
            (sidebar_view(&summaries, total_cents, all_expenses.len()))

            main class="content"
            {
                header class="page-header"
                {
                    h1 { "Expenses" }
                    p class="subtitle" { "Record and review where your money goes" }
                }

                (expense_form_view(&generate_key()))

                (filter_bar_view(&known_categories, params))

                (expense_table_view(visible_expenses))
            }
        }
    );

    base(
        "Expenses",
        &[HeadElement::ScriptSource(PreEscaped(
            FORM_SCRIPT.to_owned(),
        ))],
        &content,
    )
}

fn sidebar_view(summaries: &[CategorySummary], total_cents: i64, expense_count: usize) -> Markup {
    html!(
        aside class="sidebar"
        {
            div class="brand"
            {
                h2 { "Paisa" }
                p { "expense tracker" }
            }

            div class="total-card"
            {
                p class="total-label" { "Total Spent" }
                p class="total-amount" { (format_rupees(total_cents)) }
                p class="total-count" {
                    (expense_count)
                    @if expense_count == 1 { " expense" } @else { " expenses" }
                }
            }

            div class="summary"
            {
                h3 { "By Category" }

                @if summaries.is_empty() {
                    p class="empty-state" { "No expenses yet. Add one to see your breakdown." }
                }

                @for summary in summaries {
                    div class="summary-row"
                    {
                        div class="summary-labels"
                        {
                            span { (summary.category) }
                            span {
                                (format_rupees_rounded(summary.total_cents))
                                " · "
                                (format!("{:.0}%", summary.percentage))
                            }
                        }

                        div class="bar-track"
                        {
                            div
                                class="bar-fill"
                                style=(format!("width: {:.2}%", summary.percentage.clamp(0.0, 100.0)))
                            {}
                        }
                    }
                }
            }
        }
    )
}

fn expense_form_view(idempotency_key: &str) -> Markup {
    html!(
        section class="card"
        {
            h2 { "Add Expense" }

            form
                id="expense-form"
                data-idempotency-key=(idempotency_key)
                data-expenses-endpoint=(endpoints::EXPENSES_API)
            {
                div class="form-grid"
                {
                    div class="form-field"
                    {
                        label for="amount" { "Amount (₹)" }
                        input
                            id="amount"
                            name="amount"
                            type="number"
                            min="0.01"
                            step="0.01"
                            placeholder="0.00"
                            required;
                    }

                    div class="form-field"
                    {
                        label for="category" { "Category" }
                        select id="category" name="category" required
                        {
                            option value="" { "Select category" }

                            @for category in SUGGESTED_CATEGORIES {
                                option value=(category) { (category) }
                            }
                        }
                    }

                    div class="form-field"
                    {
                        label for="date" { "Date" }
                        input id="date" name="date" type="date" required;
                    }

                    div class="form-field form-field-wide"
                    {
                        label for="description" { "Description" }
                        input
                            id="description"
                            name="description"
                            type="text"
                            placeholder="What was this for? (optional)";
                    }
                }

                p id="form-error" class="form-error hidden" {}

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
            }
        }
    )
}

fn filter_bar_view(known_categories: &BTreeSet<&str>, params: &ListExpensesParams) -> Markup {
    let selected_category = params.category.as_deref().unwrap_or("all");
    let selected_sort = params.sort.as_deref().unwrap_or("created_desc");

    html!(
        form class="filter-bar" method="get" action=(endpoints::ROOT)
        {
            label
            {
                "Category"
                select name="category" onchange="this.form.submit()"
                {
                    option value="all" selected[selected_category == "all"] { "All Categories" }

                    @for category in known_categories {
                        option value=(category) selected[*category == selected_category] {
                            (category)
                        }
                    }
                }
            }

            label
            {
                "Sort"
                select name="sort" onchange="this.form.submit()"
                {
                    option value="created_desc" selected[selected_sort == "created_desc"] {
                        "Added (newest first)"
                    }
                    option value="date_desc" selected[selected_sort == "date_desc"] {
                        "Date (newest first)"
                    }
                }
            }
        }
    )
}

fn expense_table_view(expenses: &[Expense]) -> Markup {
    // Totals the visible rows, so a filtered view totals the filter.
    let visible_total_cents: i64 = expenses.iter().map(|expense| expense.amount_cents).sum();

    html!(
        section class="card"
        {
            header class="table-header-row"
            {
                h2 {
                    "Expenses "
                    span class="entry-count" {
                        "(" (expenses.len())
                        @if expenses.len() == 1 { " entry)" } @else { " entries)" }
                    }
                }
                span class="table-total" { "Total: " (format_rupees(visible_total_cents)) }
            }

            @if expenses.is_empty() {
                p class="empty-state" { "No expenses found. Add one above." }
            } @else {
                table
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th class=(TABLE_CELL_STYLE) { "Date" }
                            th class=(TABLE_CELL_STYLE) { "Category" }
                            th class=(TABLE_CELL_STYLE) { "Description" }
                            th class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for expense in expenses {
                            tr
                            {
                                td class=(TABLE_CELL_STYLE) {
                                    (format_date_label(expense.date.date()))
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    @if expense.description.is_empty() {
                                        "—"
                                    } @else {
                                        (expense.description)
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    (format_rupees(expense.amount_cents))
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn format_date_label(date: Date) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_abbrev(date.month()),
        date.year()
    )
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

// ==============
// TESTS
// ==============
