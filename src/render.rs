//! Terminal output
//!
//! Listings render as a padded table, JSON or CSV. Dashboard, calendar and
//! stats have a text form and fall back to JSON for the other formats.

use crate::activity::activity_icon;
use crate::calendar::{CalendarMonth, WEEKDAY_HEADERS};
use crate::records::{short_date, DailyStat, Record, UserProfile, WithId, Workout};
use crate::summary::{average_sleep, Dashboard, DayStats};
use serde::Serialize;
use std::fmt::Write;

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

fn profile_name(profiles: &[UserProfile], user_id: Option<u64>) -> String {
    user_id
        .and_then(|id| profiles.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Pretty JSON of records, each carrying its issue number
pub fn records_json<T: Record>(records: &[T]) -> Result<String, RenderError> {
    let tagged: Vec<WithId<'_, T>> = records.iter().map(WithId::new).collect();
    Ok(serde_json::to_string_pretty(&tagged)?)
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// CSV with a header row taken from the field names of `R`
pub fn to_csv<R: Serialize>(rows: &[R]) -> Result<String, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Serialize)]
struct WorkoutRow<'a> {
    id: u64,
    #[serde(rename = "type")]
    activity: &'a str,
    amount: Option<f64>,
    unit: &'a str,
    minutes: f64,
    calories: f64,
    date: &'a str,
    user_id: Option<u64>,
    notes: &'a str,
}

#[derive(Serialize)]
struct ProfileRow<'a> {
    id: u64,
    name: &'a str,
    age: Option<f64>,
    weight: Option<f64>,
    height: Option<f64>,
}

#[derive(Serialize)]
struct DailyRow<'a> {
    id: u64,
    date: &'a str,
    steps: Option<f64>,
    sleep_hours: Option<f64>,
    user_id: Option<u64>,
}

pub fn workouts_csv(workouts: &[Workout]) -> Result<String, RenderError> {
    let rows: Vec<WorkoutRow<'_>> = workouts
        .iter()
        .map(|w| WorkoutRow {
            id: w.id,
            activity: &w.activity,
            amount: w.display_amount(),
            unit: w.display_unit(),
            minutes: w.minutes(),
            calories: w.calories,
            date: &w.date,
            user_id: w.user_id,
            notes: w.notes.as_deref().unwrap_or(""),
        })
        .collect();
    to_csv(&rows)
}

pub fn profiles_csv(profiles: &[UserProfile]) -> Result<String, RenderError> {
    let rows: Vec<ProfileRow<'_>> = profiles
        .iter()
        .map(|p| ProfileRow {
            id: p.id,
            name: &p.name,
            age: p.age,
            weight: p.weight,
            height: p.height,
        })
        .collect();
    to_csv(&rows)
}

pub fn daily_csv(stats: &[DailyStat]) -> Result<String, RenderError> {
    let rows: Vec<DailyRow<'_>> = stats
        .iter()
        .map(|s| DailyRow {
            id: s.id,
            date: &s.date,
            steps: s.step_count(),
            sleep_hours: s.sleep_minutes().map(|m| m / 60.0),
            user_id: s.user_id,
        })
        .collect();
    to_csv(&rows)
}

pub fn workout_table(workouts: &[Workout], profiles: &[UserProfile]) -> String {
    if workouts.is_empty() {
        return "No activities logged.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<3} {:<18} {:>8} {:<6} {:>8} {:<10} {:<12} {}",
        "ID", "", "Type", "Amount", "Unit", "Calories", "Date", "User", "Notes"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for w in workouts {
        let _ = writeln!(
            out,
            "{:<6} {:<3} {:<18} {:>8} {:<6} {:>8} {:<10} {:<12} {}",
            w.id,
            activity_icon(&w.activity).glyph(),
            w.activity,
            number(w.display_amount()),
            w.display_unit(),
            number(Some(w.calories)),
            short_date(&w.date),
            profile_name(profiles, w.user_id),
            w.notes.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn profile_table(profiles: &[UserProfile]) -> String {
    if profiles.is_empty() {
        return "No profiles yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<20} {:>6} {:>8} {:>8}",
        "ID", "Name", "Age", "Kg", "Cm"
    );
    let _ = writeln!(out, "{}", "-".repeat(52));

    for p in profiles {
        let _ = writeln!(
            out,
            "{:<6} {:<20} {:>6} {:>8} {:>8}",
            p.id,
            p.name,
            number(p.age),
            number(p.weight),
            number(p.height)
        );
    }
    out
}

pub fn daily_table(stats: &[DailyStat]) -> String {
    if stats.is_empty() {
        return "No daily stats recorded.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<26} {:>8} {:>8}", "ID", "Date", "Steps", "Sleep");
    let _ = writeln!(out, "{}", "-".repeat(52));

    for s in stats {
        let sleep = s
            .sleep_minutes()
            .map(|m| crate::summary::HoursMinutes::from_minutes(m).to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<6} {:<26} {:>8} {:>8}",
            s.id,
            s.date,
            number(s.step_count()),
            sleep
        );
    }
    out
}

/// Month grid. `*` marks workout days, `[..]` the selected day, `>` today.
pub fn calendar_text(month: &CalendarMonth) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", month.title());
    for header in WEEKDAY_HEADERS {
        let _ = write!(out, "{:^5}", header);
    }
    out.push('\n');

    for week in month.weeks() {
        for cell in week {
            let text = match cell {
                None => String::new(),
                Some(day) => {
                    let n = chrono::Datelike::day(&day.date);
                    let mark = if day.has_workout { "*" } else { "" };
                    let core = format!("{}{}", n, mark);
                    if day.is_selected {
                        format!("[{}]", core)
                    } else if day.is_today {
                        format!(">{}", core)
                    } else {
                        core
                    }
                }
            };
            let _ = write!(out, "{:^5}", text);
        }
        out.push('\n');
    }
    out
}

fn day_stats_lines(out: &mut String, stats: &DayStats) {
    let sleep = stats
        .sleep()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Sleep: {}", sleep);
    let _ = writeln!(out, "Steps: {}", number(stats.steps));
}

pub fn dashboard_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hello, {}!", dashboard.name);
    let _ = writeln!(out, "This week: {}", dashboard.weekly_workout_time);
    out.push('\n');

    if let Some(today) = &dashboard.today {
        day_stats_lines(&mut out, today);
        out.push('\n');
    }

    let _ = writeln!(out, "{}", dashboard.heading());
    if dashboard.activities.is_empty() {
        let _ = writeln!(out, "  No activities logged.");
    }
    for w in &dashboard.activities {
        let _ = write!(
            out,
            "  {} {} {} {}",
            activity_icon(&w.activity).glyph(),
            w.activity,
            number(w.display_amount()),
            w.display_unit()
        );
        if let Some(notes) = w.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = write!(out, " ({})", notes);
        }
        let _ = writeln!(out, "  #{}", w.id);
    }
    out
}

/// Last-7-day steps and sleep, today first
pub fn stats_text(series: &[DayStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>8} {:>8}", "Date", "Steps", "Sleep");
    let _ = writeln!(out, "{}", "-".repeat(30));
    for day in series {
        let sleep = day
            .sleep()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>8}",
            day.date.format("%Y-%m-%d"),
            number(day.steps),
            sleep
        );
    }
    if let Some(avg) = average_sleep(series) {
        let _ = writeln!(out, "\nAverage sleep: {}", avg);
    }
    out
}
