//! Log and profile forms
//!
//! Turns the values given on the command line into a record to save.
//! A new entry fills gaps with defaults; an edit fills them from the
//! stored record, which is then replaced as a whole.

use crate::activity::activity_unit;
use crate::records::{UserProfile, Workout};
use chrono::NaiveDate;

/// Reasons a form is refused before anything is written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please select or enter an activity type")]
    MissingActivity,

    #[error("Create a profile first: gitfit profile save --name <NAME>")]
    MissingUser,

    #[error("--amount is required")]
    MissingAmount,
}

/// Values entered for a workout; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct WorkoutForm {
    pub activity: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<f64>,
    pub date: Option<NaiveDate>,
    pub user: Option<u64>,
    pub notes: Option<String>,
}

fn iso(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

impl WorkoutForm {
    /// Build the workout to save.
    ///
    /// With `base` (an edit) every missing field keeps its stored value and
    /// the unit falls back to the stored one, "mins" for legacy entries.
    /// Without it the unit comes from the activity type, the date is
    /// `today` and the user is `first_profile`.
    pub fn build(
        self,
        base: Option<&Workout>,
        first_profile: Option<u64>,
        today: NaiveDate,
    ) -> Result<Workout, FormError> {
        let activity = self
            .activity
            .or_else(|| base.map(|b| b.activity.clone()))
            .unwrap_or_default();
        if activity.trim().is_empty() {
            return Err(FormError::MissingActivity);
        }

        let user_id = self
            .user
            .or_else(|| base.and_then(|b| b.user_id))
            .or(first_profile)
            .ok_or(FormError::MissingUser)?;

        let amount = self
            .amount
            .or_else(|| base.and_then(Workout::display_amount))
            .ok_or(FormError::MissingAmount)?;

        let unit = match (self.unit, base) {
            (Some(unit), _) => unit,
            (None, Some(b)) => b.display_unit().to_string(),
            (None, None) => activity_unit(&activity).to_string(),
        };

        let date = match (self.date, base) {
            (Some(day), _) => iso(day),
            (None, Some(b)) if !b.date.is_empty() => b.date.clone(),
            (None, _) => iso(today),
        };

        let calories = self
            .calories
            .or_else(|| base.map(|b| b.calories))
            .unwrap_or(0.0);

        let mut workout = Workout::new(activity, amount, unit, date)
            .calories(calories)
            .user(user_id);
        workout.notes = self
            .notes
            .or_else(|| base.and_then(|b| b.notes.clone()))
            .filter(|n| !n.is_empty());
        Ok(workout)
    }
}

/// Values entered for a profile; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl ProfileForm {
    /// Merge over `base` when editing. Zero clears a stored value.
    pub fn build(self, base: Option<&UserProfile>) -> UserProfile {
        let name = self
            .name
            .or_else(|| base.map(|b| b.name.clone()))
            .unwrap_or_default();
        UserProfile::new(name)
            .age(self.age.or_else(|| base.and_then(|b| b.age)))
            .weight(self.weight.or_else(|| base.and_then(|b| b.weight)))
            .height(self.height.or_else(|| base.and_then(|b| b.height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 22).unwrap()
    }

    #[test]
    fn test_new_entry_defaults() {
        let form = WorkoutForm {
            activity: Some("Running".into()),
            amount: Some(5.0),
            ..WorkoutForm::default()
        };

        let workout = form.build(None, Some(4), today()).unwrap();
        assert_eq!(workout.unit.as_deref(), Some("km"));
        assert_eq!(workout.date, "2025-01-22");
        assert_eq!(workout.user_id, Some(4));
        assert_eq!(workout.calories, 0.0);
        assert_eq!(workout.notes, None);
    }

    #[test]
    fn test_new_entry_explicit_values() {
        let form = WorkoutForm {
            activity: Some("Push-ups".into()),
            amount: Some(30.0),
            date: NaiveDate::from_ymd_opt(2025, 1, 20),
            user: Some(9),
            notes: Some("".into()),
            ..WorkoutForm::default()
        };

        let workout = form.build(None, Some(4), today()).unwrap();
        assert_eq!(workout.unit.as_deref(), Some("reps"));
        assert_eq!(workout.date, "2025-01-20");
        assert_eq!(workout.user_id, Some(9));
        assert_eq!(workout.notes, None);
    }

    #[test]
    fn test_edit_legacy_duration_keeps_minutes() {
        let mut legacy: Workout =
            serde_json::from_str(r#"{"type":"Cycling","duration":40,"userId":2}"#).unwrap();
        legacy.date = "2025-01-21T08:00:00Z".into();

        let form = WorkoutForm {
            notes: Some("easy spin".into()),
            ..WorkoutForm::default()
        };
        let edited = form.build(Some(&legacy), Some(4), today()).unwrap();

        assert_eq!(edited.activity, "Cycling");
        assert_eq!(edited.amount, Some(40.0));
        assert_eq!(edited.unit.as_deref(), Some("mins"));
        assert_eq!(edited.duration, Some(40.0));
        assert_eq!(edited.minutes(), 40.0);
        assert_eq!(edited.date, "2025-01-21T08:00:00Z");
        assert_eq!(edited.user_id, Some(2));
        assert_eq!(edited.notes.as_deref(), Some("easy spin"));
    }

    #[test]
    fn test_edit_keeps_stored_unit() {
        let stored = Workout::new("Running", 5.0, "miles", "2025-01-15")
            .calories(300.0)
            .notes("hills");

        let form = WorkoutForm {
            amount: Some(6.0),
            ..WorkoutForm::default()
        };
        let edited = form.build(Some(&stored), Some(4), today()).unwrap();

        assert_eq!(edited.amount, Some(6.0));
        assert_eq!(edited.unit.as_deref(), Some("miles"));
        assert_eq!(edited.calories, 300.0);
        assert_eq!(edited.notes.as_deref(), Some("hills"));
        assert_eq!(edited.date, "2025-01-15");
    }

    #[test]
    fn test_rejections() {
        let no_type = WorkoutForm {
            activity: Some("  ".into()),
            amount: Some(1.0),
            ..WorkoutForm::default()
        };
        assert_eq!(
            no_type.build(None, Some(1), today()).unwrap_err(),
            FormError::MissingActivity
        );

        let no_user = WorkoutForm {
            activity: Some("Gym".into()),
            amount: Some(1.0),
            ..WorkoutForm::default()
        };
        assert_eq!(
            no_user.build(None, None, today()).unwrap_err(),
            FormError::MissingUser
        );

        let no_amount = WorkoutForm {
            activity: Some("Gym".into()),
            ..WorkoutForm::default()
        };
        assert_eq!(
            no_amount.build(None, Some(1), today()).unwrap_err(),
            FormError::MissingAmount
        );
    }

    #[test]
    fn test_profile_edit_merges_and_zero_clears() {
        let stored = UserProfile::new("Ada")
            .age(Some(36.0))
            .weight(Some(61.5))
            .height(Some(170.0));

        let form = ProfileForm {
            weight: Some(60.0),
            height: Some(0.0),
            ..ProfileForm::default()
        };
        let edited = form.build(Some(&stored));

        assert_eq!(edited.name, "Ada");
        assert_eq!(edited.age, Some(36.0));
        assert_eq!(edited.weight, Some(60.0));
        assert_eq!(edited.height, None);
    }

    #[test]
    fn test_new_profile_without_name_fails_validation() {
        use crate::records::Record;
        let profile = ProfileForm::default().build(None);
        assert!(profile.validate().is_err());
    }
}
