//! Spending analytics.
//!
//! [`aggregate`] turns a user's transactions into the views the dashboard
//! renders: totals per category, per month, per weekday and per part of the
//! day, plus the single largest transaction. It is a pure function: every
//! call recomputes everything from its input and reads no clock.

pub mod buckets;
pub mod insights;
pub mod planning;

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Transaction;
use crate::error::DomainError;

pub use buckets::{CategoryBucket, MonthBucket, TimeOfDay, TimeOfDayBucket, WeekdayBucket};
pub use insights::SpendingInsights;
pub use planning::{BudgetStatus, GoalStatus, financial_health_score};

/// Every derived view over one set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregateBundle {
    pub total_spent: f64,
    /// Descending by total
    pub categories: Vec<CategoryBucket>,
    /// Chronological
    pub months: Vec<MonthBucket>,
    /// Always 7 entries, Sunday first
    pub weekdays: Vec<WeekdayBucket>,
    /// Always 4 entries: morning, afternoon, evening, night
    pub time_of_day: Vec<TimeOfDayBucket>,
    pub largest_transaction: Option<Transaction>,
}

/// Computes the full aggregate bundle for `transactions`.
pub fn aggregate(transactions: &[Transaction]) -> AggregateBundle {
    let total_spent = total_spent(transactions);

    AggregateBundle {
        total_spent,
        categories: by_category(transactions, total_spent),
        months: by_month(transactions),
        weekdays: by_weekday(transactions),
        time_of_day: by_time_of_day(transactions),
        largest_transaction: largest(transactions).cloned(),
    }
}

pub fn total_spent(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

/// Groups by category. Equal totals keep first-seen order.
pub fn by_category(transactions: &[Transaction], total_spent: f64) -> Vec<CategoryBucket> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<CategoryBucket> = Vec::new();

    for tx in transactions {
        match index.get(tx.category.as_str()) {
            Some(&i) => buckets[i].total += tx.amount,
            None => {
                index.insert(tx.category.as_str(), buckets.len());
                buckets.push(CategoryBucket {
                    name: tx.category.clone(),
                    total: tx.amount,
                    percentage_of_total: 0.0,
                });
            }
        }
    }

    for bucket in &mut buckets {
        bucket.percentage_of_total = percentage(bucket.total, total_spent);
    }

    // sort_by is stable
    buckets.sort_by(|a, b| b.total.total_cmp(&a.total));
    buckets
}

/// Groups by calendar month, ordered on the (year, month) integers.
pub fn by_month(transactions: &[Transaction]) -> Vec<MonthBucket> {
    let mut months: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for tx in transactions {
        let (year, month) = (tx.date.year(), tx.date.month());
        months
            .entry((year, month))
            .or_insert_with(|| MonthBucket::empty(year, month))
            .add(tx.amount);
    }

    months.into_values().collect()
}

pub fn by_weekday(transactions: &[Transaction]) -> Vec<WeekdayBucket> {
    let mut week = WeekdayBucket::week();
    for tx in transactions {
        let day = tx.date.weekday().num_days_from_sunday() as usize;
        week[day].add(tx.amount);
    }
    week
}

pub fn by_time_of_day(transactions: &[Transaction]) -> Vec<TimeOfDayBucket> {
    let mut periods = TimeOfDayBucket::day();
    for tx in transactions {
        let period = TimeOfDay::from_hour(tx.date.hour());
        periods[period.index()].add(tx.amount);
    }
    periods
}

/// The transaction with the highest amount. The first one wins a tie.
pub fn largest(transactions: &[Transaction]) -> Option<&Transaction> {
    transactions.iter().fold(None, |max, tx| match max {
        Some(current) if tx.amount <= current.amount => Some(current),
        _ => Some(tx),
    })
}

/// Total and count of spending within a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RangeSummary {
    #[schema(example = 350.0)]
    pub total_spent: f64,
    #[schema(example = 3)]
    pub transaction_count: usize,
}

/// Sums transactions dated on any day from `start` through `end`, both
/// inclusive, optionally restricted to one category (exact match).
pub fn summarize_range(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
    category: Option<&str>,
) -> Result<RangeSummary, DomainError> {
    if start > end {
        return Err(DomainError::ValidationError(
            "start_date must not be after end_date".into(),
        ));
    }

    let (total_spent, transaction_count) = transactions
        .iter()
        .filter(|tx| {
            let day = tx.date.date();
            day >= start && day <= end
        })
        .filter(|tx| category.is_none_or(|c| tx.category == c))
        .fold((0.0, 0), |(total, count), tx| (total + tx.amount, count + 1));

    Ok(RangeSummary {
        total_spent,
        transaction_count,
    })
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round_to_tenth(part / whole * 100.0)
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
