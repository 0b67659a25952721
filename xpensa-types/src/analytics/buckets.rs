//! Bucket types produced by the aggregation engine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Day labels indexed by `num_days_from_sunday`.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Spending for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryBucket {
    #[schema(example = "Rent")]
    pub name: String,
    #[schema(example = 200.0)]
    pub total: f64,
    /// Share of total spending, rounded to one decimal
    #[schema(example = 57.1)]
    pub percentage_of_total: f64,
}

/// Spending for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthBucket {
    #[schema(example = 2024)]
    pub year: i32,
    /// 1-based month number
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = "Jan '24")]
    pub label: String,
    pub total: f64,
    pub count: usize,
}

impl MonthBucket {
    pub(crate) fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            label: month_label(year, month),
            total: 0.0,
            count: 0,
        }
    }

    pub(crate) fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }
}

/// Formats a month as `Jan '24`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
        .unwrap_or("???");
    format!("{} '{:02}", name, year.rem_euclid(100))
}

/// Spending for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekdayBucket {
    /// 0 = Sunday .. 6 = Saturday
    pub day: u32,
    #[schema(example = "Sun")]
    pub label: String,
    pub total: f64,
    pub count: usize,
}

impl WeekdayBucket {
    /// All seven days, Sunday first, zeroed.
    pub(crate) fn week() -> Vec<Self> {
        WEEKDAY_LABELS
            .iter()
            .zip(0u32..)
            .map(|(label, day)| Self {
                day,
                label: (*label).to_string(),
                total: 0.0,
                count: 0,
            })
            .collect()
    }

    pub(crate) fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }
}

/// A coarse part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// [06:00, 12:00)
    Morning,
    /// [12:00, 17:00)
    Afternoon,
    /// [17:00, 22:00)
    Evening,
    /// [22:00, 06:00), wrapping past midnight
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Classifies an hour of the day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning (6-12)",
            TimeOfDay::Afternoon => "Afternoon (12-17)",
            TimeOfDay::Evening => "Evening (17-22)",
            TimeOfDay::Night => "Night (22-6)",
        }
    }

    /// Position in [`TimeOfDay::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
            TimeOfDay::Night => 3,
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Spending for one part of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeOfDayBucket {
    pub period: TimeOfDay,
    #[schema(example = "Morning (6-12)")]
    pub label: String,
    pub total: f64,
    pub count: usize,
}

impl TimeOfDayBucket {
    /// All four periods in [`TimeOfDay::ALL`] order, zeroed.
    pub(crate) fn day() -> Vec<Self> {
        TimeOfDay::ALL
            .iter()
            .map(|period| Self {
                period: *period,
                label: period.label().to_string(),
                total: 0.0,
                count: 0,
            })
            .collect()
    }

    pub(crate) fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }
}
