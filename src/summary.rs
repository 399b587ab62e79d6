//! Dashboard figures
//!
//! Everything the home and stats screens show is derived here from the
//! fetched record arrays; nothing is cached or stored.

use crate::activity::DEFAULT_ACTIVITIES;
use crate::records::{DailyStat, UserProfile, WithId, Workout};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Name shown in the greeting
pub fn greeting_name(profiles: &[UserProfile]) -> &str {
    profiles.first().map(|p| p.name.as_str()).unwrap_or("User")
}

/// Hours and minutes split of a minute total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HoursMinutes {
    pub hours: u64,
    pub minutes: u64,
}

impl HoursMinutes {
    pub fn from_minutes(total: f64) -> Self {
        let total = total.max(0.0).round() as u64;
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

impl std::fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Days covered by "this week": today and the six before it
fn in_last_week(day: NaiveDate, today: NaiveDate) -> bool {
    day <= today && day > today - Duration::days(7)
}

/// Workout time logged over the last seven days
pub fn weekly_workout_time(workouts: &[Workout], today: NaiveDate) -> HoursMinutes {
    let total: f64 = workouts
        .iter()
        .filter(|w| w.day().map(|d| in_last_week(d, today)).unwrap_or(false))
        .map(Workout::minutes)
        .sum();
    HoursMinutes::from_minutes(total)
}

/// Workouts logged on `day`
pub fn workouts_on(workouts: &[Workout], day: NaiveDate) -> Vec<&Workout> {
    workouts.iter().filter(|w| w.day() == Some(day)).collect()
}

/// Default activities followed by any other types found in history
pub fn activity_choices(workouts: &[Workout]) -> Vec<String> {
    let mut choices: Vec<String> = DEFAULT_ACTIVITIES.iter().map(|a| a.to_string()).collect();
    for workout in workouts {
        if !workout.activity.is_empty() && !choices.contains(&workout.activity) {
            choices.push(workout.activity.clone());
        }
    }
    choices
}

/// Steps and sleep totals for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub steps: Option<f64>,
    pub sleep_minutes: Option<f64>,
}

impl DayStats {
    pub fn sleep(&self) -> Option<HoursMinutes> {
        self.sleep_minutes.map(HoursMinutes::from_minutes)
    }
}

fn add(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a + v),
        (None, v) => v,
        (a, None) => a,
    }
}

/// Combined daily stats recorded for `day`
pub fn stats_for_day(stats: &[DailyStat], day: NaiveDate) -> DayStats {
    stats
        .iter()
        .filter(|s| s.day() == Some(day))
        .fold(
            DayStats {
                date: day,
                steps: None,
                sleep_minutes: None,
            },
            |acc, s| DayStats {
                date: day,
                steps: add(acc.steps, s.step_count()),
                sleep_minutes: add(acc.sleep_minutes, s.sleep_minutes()),
            },
        )
}

/// Today first, then the six days before
pub fn weekly_series(stats: &[DailyStat], today: NaiveDate) -> Vec<DayStats> {
    (0..7)
        .map(|i| stats_for_day(stats, today - Duration::days(i)))
        .collect()
}

/// Mean sleep over the days that have a sleep entry
pub fn average_sleep(series: &[DayStats]) -> Option<HoursMinutes> {
    let nights: Vec<f64> = series.iter().filter_map(|d| d.sleep_minutes).collect();
    if nights.is_empty() {
        return None;
    }
    Some(HoursMinutes::from_minutes(
        nights.iter().sum::<f64>() / nights.len() as f64,
    ))
}

/// Everything the home screen shows for one selected day
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub name: String,
    pub weekly_workout_time: HoursMinutes,
    pub selected: NaiveDate,
    pub is_today: bool,
    #[serde(serialize_with = "with_ids")]
    pub activities: Vec<Workout>,
    /// Only filled in when the selected day is today
    pub today: Option<DayStats>,
}

#[allow(clippy::ptr_arg)]
fn with_ids<S: serde::Serializer>(workouts: &Vec<Workout>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(workouts.iter().map(WithId::new))
}

impl Dashboard {
    pub fn build(
        workouts: &[Workout],
        profiles: &[UserProfile],
        stats: &[DailyStat],
        selected: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let is_today = selected == today;
        Self {
            name: greeting_name(profiles).to_string(),
            weekly_workout_time: weekly_workout_time(workouts, today),
            selected,
            is_today,
            activities: workouts_on(workouts, selected).into_iter().cloned().collect(),
            today: is_today.then(|| stats_for_day(stats, today)),
        }
    }

    /// "Today's activities" or "Activities for Jan 5"
    pub fn heading(&self) -> String {
        if self.is_today {
            "Today's activities".to_string()
        } else {
            format!("Activities for {}", self.selected.format("%b %-d"))
        }
    }
}
