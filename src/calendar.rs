//! Month calendar
//!
//! Sunday-first month grid with leading padding, marking today, the
//! selected day and days that have at least one workout.

use crate::records::Workout;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

pub const WEEKDAY_HEADERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_workout: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    /// First day of the month
    pub first: NaiveDate,
    /// Empty cells before the 1st; Sunday = 0
    pub padding: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Build the grid for the month containing `month`
    pub fn build(
        month: NaiveDate,
        workouts: &[Workout],
        selected: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let first = month.with_day(1).unwrap_or(month);
        let next = first + Months::new(1);

        let workout_days: HashSet<NaiveDate> = workouts.iter().filter_map(Workout::day).collect();

        let days = first
            .iter_days()
            .take_while(|d| *d < next)
            .map(|date| CalendarDay {
                date,
                is_today: date == today,
                is_selected: date == selected,
                has_workout: workout_days.contains(&date),
            })
            .collect();

        Self {
            first,
            padding: first.weekday().num_days_from_sunday(),
            days,
        }
    }

    /// "January 2025"
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn previous_month(&self) -> NaiveDate {
        self.first - Months::new(1)
    }

    pub fn next_month(&self) -> NaiveDate {
        self.first + Months::new(1)
    }

    /// Rows of seven cells, `None` for padding and trailing blanks
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay>>> {
        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.padding as usize];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|w| w.to_vec()).collect()
    }
}
