//! User domain model with embedded budgets and goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Budget {
    #[schema(example = "Food")]
    pub category: String,
    #[schema(example = 5000.0)]
    pub limit: f64,
}

impl Budget {
    /// Creates a validated budget. The category is stored trimmed.
    pub fn new(category: &str, limit: f64) -> Result<Self, DomainError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(DomainError::EmptyCategory);
        }
        if !limit.is_finite() || limit <= 0.0 {
            return Err(DomainError::ValidationError(
                "Budget limit must be positive".into(),
            ));
        }

        Ok(Self {
            category: category.to_string(),
            limit,
        })
    }
}

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Goal {
    #[schema(example = "Emergency fund")]
    pub title: String,
    #[schema(example = 100000.0)]
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2025-12-31")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub complete: bool,
}

impl Goal {
    /// Creates a validated goal. The title is stored trimmed.
    pub fn new(
        title: &str,
        target: f64,
        current: f64,
        deadline: Option<NaiveDate>,
        complete: bool,
    ) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::ValidationError(
                "Goal title cannot be empty".into(),
            ));
        }
        if !target.is_finite() || target <= 0.0 {
            return Err(DomainError::ValidationError(
                "Goal target must be positive".into(),
            ));
        }
        if !current.is_finite() || current < 0.0 {
            return Err(DomainError::NegativeAmount);
        }

        Ok(Self {
            title: title.to_string(),
            target,
            current,
            deadline,
            complete,
        })
    }
}

/// A registered user.
///
/// Budgets and goals are embedded in the user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub profile_pic: String,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with no budgets or goals.
    ///
    /// # Validation
    /// - Full name cannot be empty
    /// - Email must look like an address; it is stored lowercase
    pub fn new(full_name: &str, email: &str, password_hash: String) -> Result<Self, DomainError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(DomainError::ValidationError(
                "Full name cannot be empty".into(),
            ));
        }

        let email = normalize_email(email);
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(DomainError::ValidationError("Invalid email address".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            email,
            full_name: full_name.to_string(),
            password_hash,
            profile_pic: String::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends budgets to the existing list.
    pub fn add_budgets(&mut self, budgets: Vec<Budget>) {
        self.budgets.extend(budgets);
        self.touch();
    }

    /// Inserts or replaces a goal, matching on title.
    ///
    /// A replaced goal moves to the end of the list.
    pub fn upsert_goal(&mut self, goal: Goal) {
        self.goals.retain(|existing| existing.title != goal.title);
        self.goals.push(goal);
        self.touch();
    }

    /// Replaces the profile picture URL.
    pub fn set_profile_pic(&mut self, url: String) {
        self.profile_pic = url;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Lowercases and trims an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("Asha Rao", "Asha@Example.com ", "hash".into()).unwrap()
    }

    #[test]
    fn test_user_creation_normalizes_email() {
        let u = user();
        assert_eq!(u.email, "asha@example.com");
        assert!(u.budgets.is_empty());
        assert!(u.profile_pic.is_empty());
    }

    #[test]
    fn test_invalid_email_fails() {
        let result = User::new("Asha", "not-an-email", "hash".into());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_empty_name_fails() {
        let result = User::new("  ", "a@b.c", "hash".into());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_add_budgets_appends() {
        let mut u = user();
        u.add_budgets(vec![Budget::new("Food", 100.0).unwrap()]);
        u.add_budgets(vec![Budget::new("Food", 200.0).unwrap()]);
        assert_eq!(u.budgets.len(), 2);
    }

    #[test]
    fn test_upsert_goal_replaces_by_title() {
        let mut u = user();
        u.upsert_goal(Goal::new("Car", 1000.0, 0.0, None, false).unwrap());
        u.upsert_goal(Goal::new("Trip", 500.0, 0.0, None, false).unwrap());
        u.upsert_goal(Goal::new("Car", 2000.0, 100.0, None, false).unwrap());

        assert_eq!(u.goals.len(), 2);
        assert_eq!(u.goals[0].title, "Trip");
        assert_eq!(u.goals[1].target, 2000.0);
    }

    #[test]
    fn test_budget_validation() {
        assert!(matches!(
            Budget::new("", 10.0),
            Err(DomainError::EmptyCategory)
        ));
        assert!(Budget::new("Food", 0.0).is_err());
    }

    #[test]
    fn test_goal_validation() {
        assert!(Goal::new("", 10.0, 0.0, None, false).is_err());
        assert!(Goal::new("Car", -5.0, 0.0, None, false).is_err());
        assert!(matches!(
            Goal::new("Car", 5.0, -1.0, None, false),
            Err(DomainError::NegativeAmount)
        ));
    }

    #[test]
    fn test_goal_defaults_when_deserialized() {
        let goal: Goal = serde_json::from_str(r#"{"title":"Car","target":100}"#).unwrap();
        assert_eq!(goal.current, 0.0);
        assert!(!goal.complete);
        assert!(goal.deadline.is_none());
    }
}
