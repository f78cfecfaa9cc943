//! Financial goal records and the create form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Identity;
use crate::error::AppError;

/// Default goal type for goals created without one
pub const DEFAULT_GOAL_TYPE: &str = "General";
/// Status assigned to every newly created goal
pub const DEFAULT_STATUS: &str = "Active";
/// Default priority for goals created without one
pub const DEFAULT_PRIORITY: &str = "Medium";
/// Progress at or above which a new goal counts as on track
pub const ON_TRACK_THRESHOLD: f64 = 50.0;
/// Priorities offered by the goal forms
pub const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

/// A financial goal as owned by the backend
///
/// The goal name is the key within a user's list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Goal {
    pub goal_name: String,
    pub goal_type: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub progress_percent: f64,
    /// `YYYY-MM-DD`
    pub target_date: String,
    pub required_monthly_contribution: f64,
    pub actual_monthly_contribution: f64,
    pub on_track: bool,
    pub status: String,
    pub priority: String,
    pub last_updated: String,
}

impl Goal {
    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::from_percent(self.progress_percent)
    }

    /// Recompute progress and the on-track flag from the amounts
    pub fn recompute_progress(&mut self) {
        self.progress_percent = progress_percent(self.current_amount, self.target_amount);
        self.on_track = self.progress_percent >= ON_TRACK_THRESHOLD;
    }
}

/// Progress percentage rounded half up, or 0 when either amount is unset
pub fn progress_percent(current: f64, target: f64) -> f64 {
    if current == 0.0 || target == 0.0 || current.is_nan() || target.is_nan() {
        return 0.0;
    }
    (current / target * 100.0 + 0.5).floor()
}

/// Display band for a goal's progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// Below 25%
    Low,
    /// 25% up to 50%
    Fair,
    /// 50% up to 75%
    Good,
    /// 75% and above
    Strong,
}

impl ProgressBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 25.0 {
            ProgressBand::Low
        } else if percent < 50.0 {
            ProgressBand::Fair
        } else if percent < 75.0 {
            ProgressBand::Good
        } else {
            ProgressBand::Strong
        }
    }
}

/// The create-goal form: everything the user may have left blank
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalDraft {
    pub goal_name: String,
    pub goal_type: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub target_date: Option<String>,
    pub required_monthly_contribution: Option<f64>,
    pub actual_monthly_contribution: Option<f64>,
    pub priority: Option<String>,
}

impl GoalDraft {
    pub fn new(goal_name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            goal_name: goal_name.into(),
            target_amount: Some(target_amount),
            ..Default::default()
        }
    }

    pub fn current_amount(mut self, amount: f64) -> Self {
        self.current_amount = Some(amount);
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn goal_type(mut self, goal_type: impl Into<String>) -> Self {
        self.goal_type = Some(goal_type.into());
        self
    }

    pub fn target_date(mut self, date: impl Into<String>) -> Self {
        self.target_date = Some(date.into());
        self
    }

    /// Check the required fields: a name and a non-zero target
    pub fn validate(&self) -> Result<(), AppError> {
        let has_target = self.target_amount.map(|t| t != 0.0 && !t.is_nan()).unwrap_or(false);
        if self.goal_name.is_empty() || !has_target {
            return Err(AppError::Validation(
                "Please fill in required fields".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill in every unspecified field and compute progress
    pub fn build(&self, today: NaiveDate) -> Result<Goal, AppError> {
        self.validate()?;

        let today = today.format("%Y-%m-%d").to_string();
        let target_amount = self.target_amount.unwrap_or_default();
        let current_amount = self.current_amount.unwrap_or_default();
        let progress = progress_percent(current_amount, target_amount);

        Ok(Goal {
            goal_name: self.goal_name.clone(),
            goal_type: non_empty_or(&self.goal_type, DEFAULT_GOAL_TYPE),
            target_amount,
            current_amount,
            progress_percent: progress,
            target_date: non_empty_or(&self.target_date, &today),
            required_monthly_contribution: self.required_monthly_contribution.unwrap_or_default(),
            actual_monthly_contribution: self.actual_monthly_contribution.unwrap_or_default(),
            on_track: progress >= ON_TRACK_THRESHOLD,
            status: DEFAULT_STATUS.to_string(),
            priority: non_empty_or(&self.priority, DEFAULT_PRIORITY),
            last_updated: today,
        })
    }
}

fn non_empty_or(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Body of create and update requests: a full goal plus its owner
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalPayload {
    pub customer_email: Identity,
    #[serde(flatten)]
    pub goal: Goal,
}

impl GoalPayload {
    pub fn new(identity: &Identity, goal: Goal) -> Self {
        Self {
            customer_email: identity.clone(),
            goal,
        }
    }
}

/// Decode the `goals` array of a list response
///
/// A missing or non-array field yields an empty list; records that do not
/// decode are skipped.
pub fn decode_goals(mut body: Value) -> Vec<Goal> {
    let items = match body.get_mut("goals").map(Value::take) {
        Some(Value::Array(items)) => items,
        other => {
            tracing::warn!(goals = ?other, "Goals field is not an array");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Goal>(item) {
            Ok(goal) => Some(goal),
            Err(e) => {
                tracing::warn!("Skipping malformed goal record: {}", e);
                None
            }
        })
        .collect()
}
