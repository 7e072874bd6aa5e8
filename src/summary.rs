//! Category spending summaries.
//!
//! Aggregates stored expenses into per-category totals and percentage
//! shares for the summary sidebar.

use std::collections::HashMap;

use serde::Serialize;

use crate::expense::Expense;

/// A category's share of total spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// The category name.
    pub category: String,
    /// Total spending in this category, in paise.
    pub total_cents: i64,
    /// This category's share of all spending, from 0 to 100.
    pub percentage: f64,
}

/// Sum expense amounts by category.
///
/// Categories with no expenses do not appear in the result.
pub fn aggregate_by_category(expenses: &[Expense]) -> HashMap<String, i64> {
    let mut totals = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0) += expense.amount_cents;
    }

    totals
}

/// Summarize spending per category, largest total first.
///
/// Each category's percentage is its share of the grand total, or zero when
/// nothing has been spent at all. Categories with equal totals keep the
/// order in which they first appear in `expenses`.
pub fn summarize_by_category(expenses: &[Expense]) -> Vec<CategorySummary> {
    let totals = aggregate_by_category(expenses);
    let grand_total: i64 = totals.values().sum();

    // Walk the expenses again so ties keep first-appearance order, which a
    // HashMap iteration would not give us.
    let mut categories: Vec<&str> = Vec::with_capacity(totals.len());
    for expense in expenses {
        if !categories.contains(&expense.category.as_str()) {
            categories.push(&expense.category);
        }
    }

    let mut summaries: Vec<CategorySummary> = categories
        .into_iter()
        .map(|category| {
            let total_cents = totals[category];
            let percentage = if grand_total > 0 {
                total_cents as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            };

            CategorySummary {
                category: category.to_owned(),
                total_cents,
                percentage,
            }
        })
        .collect();

    summaries.sort_by_key(|summary| std::cmp::Reverse(summary.total_cents));

    summaries
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod aggregation_tests {
    use time::macros::datetime;

    use crate::expense::Expense;

    use super::{aggregate_by_category, summarize_by_category};

    fn create_test_expense(amount_cents: i64, category: &str) -> Expense {
        Expense {
            id: 0,
            amount_cents,
            category: category.to_owned(),
            description: String::new(),
            date: datetime!(2024-02-15 00:00 UTC),
            created_at: datetime!(2024-02-15 00:00 UTC),
            idempotency_key: String::new(),
        }
    }

    #[test]
    fn sums_amounts_by_category() {
        let expenses = vec![
            create_test_expense(500, "Food"),
            create_test_expense(300, "Food"),
            create_test_expense(200, "Transport"),
        ];

        let result = aggregate_by_category(&expenses);

        assert_eq!(result.len(), 2);
        assert_eq!(result["Food"], 800);
        assert_eq!(result["Transport"], 200);
    }

    #[test]
    fn aggregates_nothing_from_empty_input() {
        let result = aggregate_by_category(&[]);

        assert!(result.is_empty(), "got {result:?}, want an empty map");
    }

    #[test]
    fn aggregates_single_expense() {
        let expenses = vec![create_test_expense(1_500_000, "Rent")];

        let result = aggregate_by_category(&expenses);

        assert_eq!(result.len(), 1);
        assert_eq!(result["Rent"], 1_500_000);
    }

    #[test]
    fn summary_orders_by_total_descending() {
        let expenses = vec![
            create_test_expense(200, "Transport"),
            create_test_expense(500, "Food"),
            create_test_expense(300, "Food"),
        ];

        let result = summarize_by_category(&expenses);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, "Food");
        assert_eq!(result[0].total_cents, 800);
        assert_eq!(result[1].category, "Transport");
        assert_eq!(result[1].total_cents, 200);
    }

    #[test]
    fn summary_calculates_percentage_shares() {
        let expenses = vec![
            create_test_expense(800, "Food"),
            create_test_expense(200, "Transport"),
        ];

        let result = summarize_by_category(&expenses);

        assert_eq!(result[0].percentage, 80.0);
        assert_eq!(result[1].percentage, 20.0);
    }

    #[test]
    fn summary_of_no_expenses_is_empty() {
        let result = summarize_by_category(&[]);

        assert!(result.is_empty(), "got {result:?}, want an empty list");
    }

    #[test]
    fn equal_totals_keep_first_appearance_order() {
        let expenses = vec![
            create_test_expense(300, "Shopping"),
            create_test_expense(300, "Health"),
            create_test_expense(600, "Rent"),
        ];

        let result = summarize_by_category(&expenses);

        let got_categories: Vec<&str> = result
            .iter()
            .map(|summary| summary.category.as_str())
            .collect();
        assert_eq!(got_categories, ["Rent", "Shopping", "Health"]);
    }
}
