//! Transaction domain model.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A recorded spending transaction.
///
/// Transactions are immutable once created. `date` is the wall-clock time the
/// money was spent; weekday and hour-of-day analytics read it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Owner of the transaction
    pub user_id: UserId,
    /// Amount spent, currency-agnostic
    #[schema(example = 250.0)]
    pub amount: f64,
    /// Free-text category label
    #[schema(example = "Food")]
    pub category: String,
    /// When the money was spent (local wall-clock time)
    #[schema(value_type = String, example = "2024-01-05T08:00:00")]
    pub date: NaiveDateTime,
    /// When the record was stored
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction.
    ///
    /// # Validation
    /// - Amount must be finite and greater than zero
    /// - Category cannot be empty (it is stored trimmed)
    pub fn new(
        user_id: UserId,
        amount: f64,
        category: &str,
        date: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::ValidationError(
                "Amount must be a finite number".into(),
            ));
        }
        if amount < 0.0 {
            return Err(DomainError::NegativeAmount);
        }
        if amount == 0.0 {
            return Err(DomainError::ValidationError(
                "Amount must be greater than zero".into(),
            ));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(DomainError::EmptyCategory);
        }

        Ok(Self {
            id: TransactionId::new(),
            user_id,
            amount,
            category: category.to_string(),
            date,
            created_at: Utc::now(),
        })
    }

    /// Reconstructs a transaction from database fields.
    pub fn from_parts(
        id: TransactionId,
        user_id: UserId,
        amount: f64,
        category: String,
        date: NaiveDateTime,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            category,
            date,
            created_at,
        }
    }
}

/// Years outside this range do not fit the fixed-width stored date text.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parses a user-supplied transaction date.
///
/// Accepts a bare calendar day (`2024-01-05`, read as midnight), a local
/// date-time with minute or second precision (`T` or space separated,
/// optional fractional seconds), or RFC 3339 with an offset, in which case the
/// wall-clock time in that offset is kept. Only 4-digit years are accepted.
pub fn parse_transaction_date(input: &str) -> Result<NaiveDateTime, DomainError> {
    let s = input.trim();
    let invalid = || DomainError::InvalidDate(input.to_string());

    let parsed = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            [
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M",
            ]
            .into_iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|day| day.and_time(NaiveTime::MIN))
        })
        .ok_or_else(invalid)?;

    if !YEARS.contains(&parsed.year()) {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Parses a calendar day in `YYYY-MM-DD` form (4-digit years only).
pub fn parse_calendar_day(input: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .filter(|day| YEARS.contains(&day.year()))
        .ok_or_else(|| DomainError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn at(s: &str) -> NaiveDateTime {
        parse_transaction_date(s).unwrap()
    }

    #[test]
    fn test_transaction_creation() {
        let user = UserId::new();
        let tx = Transaction::new(user, 100.0, "  Food ", at("2024-01-05T08:00")).unwrap();

        assert_eq!(tx.user_id, user);
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.amount, 100.0);
    }

    #[test]
    fn test_negative_amount_fails() {
        let result = Transaction::new(UserId::new(), -1.0, "Food", at("2024-01-05"));
        assert!(matches!(result, Err(DomainError::NegativeAmount)));
    }

    #[test]
    fn test_zero_amount_fails() {
        let result = Transaction::new(UserId::new(), 0.0, "Food", at("2024-01-05"));
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_nan_amount_fails() {
        let result = Transaction::new(UserId::new(), f64::NAN, "Food", at("2024-01-05"));
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_empty_category_fails() {
        let result = Transaction::new(UserId::new(), 5.0, "   ", at("2024-01-05"));
        assert!(matches!(result, Err(DomainError::EmptyCategory)));
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(at("2024-01-05").hour(), 0);
        assert_eq!(at("2024-01-05T08:00").hour(), 8);
        assert_eq!(at("2024-01-05 23:30").minute(), 30);
        assert_eq!(at("2024-01-05T05:59:59").second(), 59);
        assert_eq!(at("2024-01-05T05:59:59.250").hour(), 5);
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let dt = at("2024-01-05T23:30:00+05:30");
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = parse_transaction_date("yesterday-ish");
        assert!(matches!(result, Err(DomainError::InvalidDate(s)) if s == "yesterday-ish"));
        assert!(parse_transaction_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_calendar_day() {
        assert_eq!(
            parse_calendar_day("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_calendar_day("2023-02-29").is_err());
    }

    #[test]
    fn test_parse_rejects_years_beyond_four_digits() {
        assert!(parse_transaction_date("+10000-01-01").is_err());
        assert!(parse_transaction_date("+10000-01-01T08:00").is_err());
        assert!(parse_calendar_day("+10000-01-01").is_err());
        assert_eq!(at("9999-12-31T23:59").year(), 9999);
    }
}
