//! Month-grid math for the calendar view.
//!
//! The grid always spans whole weeks: it starts on the week containing
//! the first of the month and ends on the week containing the last, so
//! its length is a multiple of seven and leading/trailing cells belong
//! to the neighboring months.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::task::Task;

/// First day of the displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Parses a configured week-start name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<WeekStart> {
        match name.to_lowercase().as_str() {
            "sunday" => Some(WeekStart::Sunday),
            "monday" => Some(WeekStart::Monday),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        }
    }

    /// Weekday labels in grid order, for column headers.
    pub fn labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// The most recent day on or before `date` that starts a week.
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let back = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date - Duration::days(i64::from(back))
}

/// Every cell of the month grid containing `reference`, in order.
pub fn month_grid(reference: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let first = first_of_month(reference);
    let last = last_of_month(reference);
    let first_cell = start_of_week(first, week_start);
    let last_cell = start_of_week(last, week_start) + Duration::days(6);
    first_cell
        .iter_days()
        .take_while(|day| *day <= last_cell)
        .collect()
}

/// Tasks due on `day`. Tasks without a due date, or with one that does
/// not parse, are skipped.
pub fn tasks_for_day(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.due_day() == Some(day))
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first)
}

/// Which month the calendar currently shows. The anchor is always the
/// first of the month, so month stepping never has to clamp days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    anchor: NaiveDate,
}

impl MonthCursor {
    pub fn new(today: NaiveDate) -> MonthCursor {
        MonthCursor {
            anchor: first_of_month(today),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Header label, e.g. "March 2024".
    pub fn label(&self) -> String {
        self.anchor.format("%B %Y").to_string()
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.anchor.checked_add_months(Months::new(1)) {
            self.anchor = next;
        }
    }

    pub fn prev_month(&mut self) {
        if let Some(prev) = self.anchor.checked_sub_months(Months::new(1)) {
            self.anchor = prev;
        }
    }

    /// Jumps back to the month containing `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        self.anchor = first_of_month(today);
    }

    /// Whether a grid cell belongs to the displayed month.
    pub fn in_month(&self, day: NaiveDate) -> bool {
        day.year() == self.anchor.year() && day.month() == self.anchor.month()
    }

    pub fn grid(&self, week_start: WeekStart) -> Vec<NaiveDate> {
        month_grid(self.anchor, week_start)
    }
}
