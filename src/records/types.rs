//! Record types stored in issue bodies
//!
//! - `Workout`: one logged activity
//! - `UserProfile`: a person workouts are attributed to
//! - `DailyStat`: steps and sleep for one day
//!
//! `id` is the issue number and never part of the body.

use super::dates::{parse_day, short_date};
use super::numeric::{self, NumberLike};
use super::{Record, RecordKind};
use crate::github::{Issue, IssueQuery};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A logged activity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    /// Issue number
    #[serde(skip)]
    pub id: u64,

    /// Free-text activity label ("Running", "Push-ups")
    #[serde(rename = "type", default)]
    pub activity: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_f64"
    )]
    pub amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Minutes; superseded by amount/unit but still written for time units
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_f64"
    )]
    pub duration: Option<f64>,

    #[serde(default, deserialize_with = "numeric::f64_or_zero")]
    pub calories: f64,

    /// ISO date or timestamp
    #[serde(default)]
    pub date: String,

    #[serde(
        rename = "userId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_u64"
    )]
    pub user_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workout {
    /// Create a workout measured in `unit`, with the legacy duration filled in
    pub fn new(
        activity: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        let mut workout = Self {
            activity: activity.into(),
            amount: Some(amount),
            unit: Some(unit.into()),
            date: date.into(),
            ..Self::default()
        };
        workout.sync_legacy_duration();
        workout
    }

    /// Builder method: set calories
    pub fn calories(mut self, calories: f64) -> Self {
        self.calories = calories;
        self
    }

    /// Builder method: attribute to a profile
    pub fn user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Builder method: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Recompute `duration` from amount/unit: minutes for `mins`,
    /// hours × 60 for `hrs`, absent for anything else.
    pub fn sync_legacy_duration(&mut self) {
        self.duration = match (self.amount, self.unit.as_deref()) {
            (Some(amount), Some("mins")) => Some(amount),
            (Some(amount), Some("hrs")) => Some(amount * 60.0),
            _ => None,
        };
    }

    /// Time spent in minutes, 0 for distance or count based entries
    pub fn minutes(&self) -> f64 {
        match self.unit.as_deref().filter(|u| !u.is_empty()) {
            Some("mins") => self.amount.unwrap_or(0.0),
            Some("hrs") => self.amount.unwrap_or(0.0) * 60.0,
            None => self.duration.unwrap_or(0.0),
            Some(_) => 0.0,
        }
    }

    /// Amount, falling back to the legacy duration
    pub fn display_amount(&self) -> Option<f64> {
        self.amount.or(self.duration)
    }

    /// Unit, "mins" when unset or empty
    pub fn display_unit(&self) -> &str {
        self.unit.as_deref().filter(|u| !u.is_empty()).unwrap_or("mins")
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

impl Record for Workout {
    const KIND: RecordKind = RecordKind::Workout;

    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> String {
        format!("Activity: {} - {}", self.activity, short_date(&self.date))
    }

    fn list_query() -> IssueQuery {
        IssueQuery::open().newest_first()
    }

    fn attach(&mut self, issue: &Issue) {
        self.id = issue.number;
        if self.date.is_empty() {
            self.date = issue.created_at.to_rfc3339();
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.activity.trim().is_empty() {
            return Err("Please select or enter an activity type".to_string());
        }
        Ok(())
    }
}

/// A person workouts are logged for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Issue number
    #[serde(skip)]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_f64"
    )]
    pub age: Option<f64>,

    /// Kilograms
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_f64"
    )]
    pub weight: Option<f64>,

    /// Centimetres
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_f64"
    )]
    pub height: Option<f64>,
}

/// Zero means "not entered"
fn entered(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder method: set age; zero clears it
    pub fn age(mut self, age: Option<f64>) -> Self {
        self.age = entered(age);
        self
    }

    /// Builder method: set weight; zero clears it
    pub fn weight(mut self, weight: Option<f64>) -> Self {
        self.weight = entered(weight);
        self
    }

    /// Builder method: set height; zero clears it
    pub fn height(mut self, height: Option<f64>) -> Self {
        self.height = entered(height);
        self
    }
}

impl Record for UserProfile {
    const KIND: RecordKind = RecordKind::Profile;

    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> String {
        format!("Profile: {}", self.name)
    }

    fn attach(&mut self, issue: &Issue) {
        self.id = issue.number;
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Profile name is required".to_string());
        }
        Ok(())
    }
}

/// Steps and sleep for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyStat {
    /// Issue number
    #[serde(skip)]
    pub id: u64,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_number_like"
    )]
    pub steps: Option<NumberLike>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_number_like"
    )]
    pub sleep_hours: Option<NumberLike>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Often `<date> at <time>`
    #[serde(default)]
    pub date: String,

    #[serde(
        rename = "userId",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric::option_u64"
    )]
    pub user_id: Option<u64>,
}

impl DailyStat {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Builder method: set steps
    pub fn steps(mut self, steps: f64) -> Self {
        self.steps = Some(NumberLike::Number(steps));
        self
    }

    /// Builder method: set hours slept
    pub fn sleep_hours(mut self, hours: f64) -> Self {
        self.sleep_hours = Some(NumberLike::Number(hours));
        self
    }

    /// Builder method: attribute to a profile
    pub fn user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn step_count(&self) -> Option<f64> {
        self.steps.as_ref().and_then(NumberLike::as_f64)
    }

    pub fn sleep_minutes(&self) -> Option<f64> {
        self.sleep_hours
            .as_ref()
            .and_then(NumberLike::as_f64)
            .map(|h| h * 60.0)
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

impl Record for DailyStat {
    const KIND: RecordKind = RecordKind::DailyStats;

    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> String {
        format!("Daily Stats: {}", self.date)
    }

    fn list_query() -> IssueQuery {
        IssueQuery::open().label(RecordKind::DailyStats.label())
    }

    fn attach(&mut self, issue: &Issue) {
        self.id = issue.number;
        if self.date.is_empty() {
            self.date = issue.created_at.to_rfc3339();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workout_body_shape() {
        let workout = Workout::new("Running", 5.0, "km", "2025-01-15")
            .calories(320.0)
            .user(2);
        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Running",
                "amount": 5.0,
                "unit": "km",
                "calories": 320.0,
                "date": "2025-01-15",
                "userId": 2
            })
        );
    }

    #[test]
    fn test_legacy_duration_follows_time_units() {
        assert_eq!(Workout::new("Yoga", 45.0, "mins", "2025-01-15").duration, Some(45.0));
        assert_eq!(Workout::new("Hike", 1.5, "hrs", "2025-01-15").duration, Some(90.0));
        assert_eq!(Workout::new("Run", 5.0, "km", "2025-01-15").duration, None);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(Workout::new("Yoga", 45.0, "mins", "d").minutes(), 45.0);
        assert_eq!(Workout::new("Hike", 2.0, "hrs", "d").minutes(), 120.0);
        assert_eq!(Workout::new("Run", 5.0, "km", "d").minutes(), 0.0);

        let legacy = Workout {
            activity: "Gym".into(),
            duration: Some(30.0),
            ..Workout::default()
        };
        assert_eq!(legacy.minutes(), 30.0);
        assert_eq!(legacy.display_amount(), Some(30.0));
        assert_eq!(legacy.display_unit(), "mins");
    }

    #[test]
    fn test_empty_unit_falls_back_to_duration() {
        let workout: Workout =
            serde_json::from_value(json!({ "type": "Gym", "unit": "", "duration": 25 })).unwrap();
        assert_eq!(workout.minutes(), 25.0);
        assert_eq!(workout.display_unit(), "mins");
    }

    #[test]
    fn test_profile_body_without_name_decodes() {
        let profile: UserProfile = serde_json::from_value(json!({ "age": 40 })).unwrap();
        assert_eq!(profile.name, "");
        assert_eq!(profile.age, Some(40.0));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            Workout::new("Gym", 1.0, "hrs", "2025-03-09").title(),
            "Activity: Gym - 3/9/2025"
        );
        assert_eq!(UserProfile::new("Ada").title(), "Profile: Ada");
        assert_eq!(DailyStat::new("2025-03-09").title(), "Daily Stats: 2025-03-09");
    }

    #[test]
    fn test_validation() {
        assert!(Workout::new(" ", 1.0, "mins", "d").validate().is_err());
        assert!(UserProfile::new("").validate().is_err());
        assert!(UserProfile::new("Ada").validate().is_ok());
        assert!(DailyStat::new("d").validate().is_ok());
    }

    #[test]
    fn test_profile_zero_means_absent() {
        let profile = UserProfile::new("Ada")
            .age(Some(0.0))
            .weight(Some(61.5))
            .height(None);
        assert_eq!(profile.age, None);
        assert_eq!(profile.weight, Some(61.5));
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({ "name": "Ada", "weight": 61.5 })
        );
    }

    #[test]
    fn test_daily_stat_numeric_like() {
        let stat: DailyStat = serde_json::from_value(json!({
            "steps": "8,412",
            "sleep_hours": 7.5,
            "date": "Jan 15, 2025 at 7:02 AM",
            "type": "daily-stats"
        }))
        .unwrap();
        assert_eq!(stat.step_count(), Some(8412.0));
        assert_eq!(stat.sleep_minutes(), Some(450.0));
        assert_eq!(stat.day(), NaiveDate::from_ymd_opt(2025, 1, 15));
    }
}
