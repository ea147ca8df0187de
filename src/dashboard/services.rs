//! Dashboard aggregation over a user's transactions.
//!
//! Money is summed in whole cents so that the per-category totals always add
//! up to the expense total, whatever order the transactions arrive in.
//! Amounts are whole cents bounded by [`crate::money::MAX_AMOUNT`], so the
//! `i128` sums cannot overflow.

use std::collections::{BTreeMap, HashMap};

use time::Date;
use uuid::Uuid;

use super::dto::{CategoryTotal, DashboardSummary, MonthTotals};
use crate::{
    categories::repo_types::Category,
    money::{from_cents, to_cents},
    transactions::repo_types::{Transaction, TransactionKind},
};

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Builds the summary for `from..=to`. Transactions outside the range are
/// ignored.
pub fn summarize(
    transactions: &[Transaction],
    categories: &[Category],
    goal: f64,
    from: Date,
    to: Date,
) -> DashboardSummary {
    let lookup: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let mut income = 0i128;
    let mut expense = 0i128;
    let mut per_category: HashMap<Uuid, i128> = HashMap::new();
    let mut count = 0usize;

    for t in transactions.iter().filter(|t| t.date >= from && t.date <= to) {
        count += 1;
        let cents = to_cents(t.amount);
        match t.kind {
            TransactionKind::Income => income += cents,
            TransactionKind::Expense => {
                expense += cents;
                *per_category.entry(t.category_id).or_insert(0) += cents;
            }
        }
    }

    let mut totals: Vec<CategoryTotal> = per_category
        .into_iter()
        .map(|(id, cents)| {
            let (name, color) = match lookup.get(&id) {
                Some(c) => (c.name.clone(), c.color.clone()),
                None => (UNCATEGORIZED_LABEL.to_string(), None),
            };
            // Percentage of the expense total, rounded to two decimals.
            let share = if expense == 0 {
                0.0
            } else {
                (cents as f64 / expense as f64 * 10_000.0).round() / 100.0
            };
            CategoryTotal {
                category_id: id,
                name,
                color,
                total: from_cents(cents),
                share,
            }
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut by_category = BTreeMap::new();
    for t in &totals {
        *by_category.entry(t.name.clone()).or_insert(0.0) += t.total;
    }

    let goal_cents = to_cents(goal);
    DashboardSummary {
        from,
        to,
        total_income: from_cents(income),
        total_expense: from_cents(expense),
        balance: from_cents(income - expense),
        by_category,
        categories: totals,
        goal: from_cents(goal_cents),
        remaining: from_cents(goal_cents - expense),
        goal_exceeded: goal_cents > 0 && expense > goal_cents,
        transaction_count: count,
    }
}

/// Income and expense per calendar month for `months` months starting at
/// `first_month`, oldest first. Empty months are reported as zero.
pub fn monthly_totals(transactions: &[Transaction], first_month: Date, months: u32) -> Vec<MonthTotals> {
    let mut buckets: BTreeMap<(i32, u8), (i128, i128)> = BTreeMap::new();
    let mut cursor = first_month;
    for _ in 0..months {
        buckets.insert((cursor.year(), cursor.month() as u8), (0, 0));
        cursor = next_month(cursor);
    }

    for t in transactions {
        if let Some((income, expense)) = buckets.get_mut(&(t.date.year(), t.date.month() as u8)) {
            match t.kind {
                TransactionKind::Income => *income += to_cents(t.amount),
                TransactionKind::Expense => *expense += to_cents(t.amount),
            }
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (income, expense))| MonthTotals {
            month: format!("{year:04}-{month:02}"),
            income: from_cents(income),
            expense: from_cents(expense),
            balance: from_cents(income - expense),
        })
        .collect()
}

fn next_month(first_of_month: Date) -> Date {
    let (_, last) = crate::dates::month_bounds(first_of_month);
    last.next_day().unwrap_or(last)
}
