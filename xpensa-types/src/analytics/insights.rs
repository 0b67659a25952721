//! Summary figures for the dashboard cards.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AggregateBundle, CategoryBucket, round_to_tenth};

/// Days per month used for the per-day frequency estimate.
const DAYS_PER_MONTH: f64 = 30.0;

/// Averages and frequencies derived from an [`AggregateBundle`].
///
/// Per-month figures divide by the number of months that have spending, not
/// by calendar distance. They are `None` when there is no spending at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpendingInsights {
    pub transaction_count: usize,
    pub average_per_month: Option<f64>,
    pub transactions_per_month: Option<u64>,
    /// Rounded to one decimal
    pub transactions_per_day: Option<f64>,
    pub top_category: Option<CategoryBucket>,
}

impl SpendingInsights {
    pub fn from_bundle(bundle: &AggregateBundle) -> Self {
        let transaction_count: usize = bundle.months.iter().map(|m| m.count).sum();
        let months = bundle.months.len() as f64;
        let active = !bundle.months.is_empty();

        let count = transaction_count as f64;
        Self {
            transaction_count,
            average_per_month: active.then(|| bundle.total_spent / months),
            transactions_per_month: active.then(|| (count / months).round() as u64),
            transactions_per_day: active.then(|| round_to_tenth(count / (months * DAYS_PER_MONTH))),
            top_category: bundle.categories.first().cloned(),
        }
    }
}
