//! Activity classification
//!
//! Maps a free-text activity label to an icon category and a default unit
//! by case-insensitive substring matching. Rules are checked in order and
//! the first match wins, so "run-bike-combo" is foot-based.

use serde::Serialize;

/// Icon category for an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityIcon {
    /// Running, walking, hiking
    Footprints,
    Bike,
    /// Swimming and pool sessions
    Waves,
    /// Gym and weights
    Dumbbell,
    /// Yoga, pilates
    Person,
    /// Everything else
    Activity,
}

impl ActivityIcon {
    pub fn name(&self) -> &'static str {
        match self {
            ActivityIcon::Footprints => "footprints",
            ActivityIcon::Bike => "bike",
            ActivityIcon::Waves => "waves",
            ActivityIcon::Dumbbell => "dumbbell",
            ActivityIcon::Person => "person",
            ActivityIcon::Activity => "activity",
        }
    }

    /// Terminal glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            ActivityIcon::Footprints => "👣",
            ActivityIcon::Bike => "🚲",
            ActivityIcon::Waves => "🌊",
            ActivityIcon::Dumbbell => "🏋",
            ActivityIcon::Person => "🧘",
            ActivityIcon::Activity => "⚡",
        }
    }
}

impl std::fmt::Display for ActivityIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

const ICON_RULES: &[(&[&str], ActivityIcon)] = &[
    (&["run", "walk", "hike"], ActivityIcon::Footprints),
    (&["cycl", "bike"], ActivityIcon::Bike),
    (&["swim", "pool"], ActivityIcon::Waves),
    (&["gym", "weight", "lift"], ActivityIcon::Dumbbell),
    (&["yoga", "pilates"], ActivityIcon::Person),
    (&["hiit", "cardio"], ActivityIcon::Activity),
    (&["tennis", "sport"], ActivityIcon::Activity),
];

const REP_KEYWORDS: &[&str] = &[
    "push-up", "pushup", "pull-up", "pullup", "sit-up", "situp", "dip", "squat", "crunch",
];

const DISTANCE_KEYWORDS: &[&str] = &["run", "cycl", "bike", "swim"];

/// Units offered when logging
pub const UNIT_SUGGESTIONS: &[&str] = &["mins", "hrs", "km", "miles", "steps", "reps"];

/// Activities always offered, ahead of ones found in history
pub const DEFAULT_ACTIVITIES: &[&str] = &["Running", "Cycling", "Gym", "Swimming"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Icon category for an activity label
pub fn activity_icon(label: &str) -> ActivityIcon {
    let lower = label.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, icon)| *icon)
        .unwrap_or(ActivityIcon::Activity)
}

/// Default unit for an activity label: "reps", "km" or "mins"
pub fn activity_unit(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    if contains_any(&lower, REP_KEYWORDS) {
        "reps"
    } else if contains_any(&lower, DISTANCE_KEYWORDS) {
        "km"
    } else {
        "mins"
    }
}
