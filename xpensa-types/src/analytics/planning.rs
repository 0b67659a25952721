//! Budget adherence, goal progress and the overall health score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Budget, Goal, Transaction};

/// Budgets above this share of their limit are flagged.
const NEAR_LIMIT_RATIO: f64 = 0.8;

const BUDGET_WEIGHT: f64 = 0.6;
const GOAL_WEIGHT: f64 = 0.4;

/// How much of a budget has been used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: f64,
    /// Sum of all transactions in the budget's category
    pub spent: f64,
    /// Negative once the budget is exceeded
    pub remaining: f64,
    pub percent_used: i64,
    pub near_limit: bool,
}

impl BudgetStatus {
    pub fn evaluate(budget: &Budget, transactions: &[Transaction]) -> Self {
        let spent: f64 = transactions
            .iter()
            .filter(|tx| tx.category == budget.category)
            .map(|tx| tx.amount)
            .sum();
        let ratio = spent / budget.limit;

        Self {
            category: budget.category.clone(),
            limit: budget.limit,
            spent,
            remaining: budget.limit - spent,
            percent_used: (ratio * 100.0).round() as i64,
            near_limit: ratio > NEAR_LIMIT_RATIO,
        }
    }

    /// Percentage of the limit still unspent, clamped to 0..=100.
    fn adherence(&self) -> f64 {
        (1.0 - (self.spent / self.limit).min(1.0)) * 100.0
    }
}

/// Progress towards a goal as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalStatus {
    pub title: String,
    pub target: f64,
    pub current: f64,
    #[schema(value_type = Option<String>)]
    pub deadline: Option<NaiveDate>,
    pub complete: bool,
    pub progress_percent: i64,
    /// Negative once the deadline has passed
    pub days_left: Option<i64>,
}

impl GoalStatus {
    pub fn evaluate(goal: &Goal, today: NaiveDate) -> Self {
        Self {
            title: goal.title.clone(),
            target: goal.target,
            current: goal.current,
            deadline: goal.deadline,
            complete: goal.complete,
            progress_percent: (progress(goal) * 100.0).round() as i64,
            days_left: goal.deadline.map(|d| (d - today).num_days()),
        }
    }
}

fn progress(goal: &Goal) -> f64 {
    goal.current / goal.target
}

/// Scores overall financial health from 0 upwards.
///
/// Budget adherence weighs 60% and goal progress 40%. A side with no entries
/// contributes zero; with neither budgets nor goals the score is zero.
pub fn financial_health_score(budgets: &[BudgetStatus], goals: &[Goal]) -> u32 {
    if budgets.is_empty() && goals.is_empty() {
        return 0;
    }

    let adherence = mean(budgets.iter().map(BudgetStatus::adherence));
    let goal_progress = mean(goals.iter().map(|g| progress(g) * 100.0));

    (adherence * BUDGET_WEIGHT + goal_progress * GOAL_WEIGHT)
        .round()
        .max(0.0) as u32
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}
