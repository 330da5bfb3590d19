//! taskflow calendar command implementations.

use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::calendar::{tasks_for_day, MonthCursor, WeekStart};
use crate::cli::load_context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{parse_calendar_date, TaskStatus, DATE_FORMAT};

/// Options for calendar month
pub struct MonthOptions {
    pub date: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct DayTask {
    id: String,
    title: String,
    status: TaskStatus,
}

#[derive(Serialize)]
struct DayCell {
    date: String,
    in_month: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tasks: Vec<DayTask>,
}

#[derive(Serialize)]
struct MonthOutput {
    month: String,
    week_start: &'static str,
    days: Vec<DayCell>,
}

pub fn run_month(options: MonthOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;

    let anchor = match options.date.as_deref() {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            Error::InvalidArgument(format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
        })?,
        None => Local::now().date_naive(),
    };
    let cursor = MonthCursor::new(anchor);
    let week_start = WeekStart::parse(&ctx.config.calendar.week_start).unwrap_or_default();
    let display_limit = ctx.config.calendar.day_display_limit;

    let days: Vec<DayCell> = cursor
        .grid(week_start)
        .into_iter()
        .map(|day| {
            let due = tasks_for_day(ctx.store.tasks(), day);
            DayCell {
                date: day.format(DATE_FORMAT).to_string(),
                in_month: cursor.in_month(day),
                tasks: due
                    .into_iter()
                    .map(|task| DayTask {
                        id: task.id.clone(),
                        title: task.title.clone(),
                        status: task.status,
                    })
                    .collect(),
            }
        })
        .collect();

    let due_total: usize = days.iter().map(|cell| cell.tasks.len()).sum();
    let mut human = HumanOutput::new(cursor.label());
    human.push_summary("Days", days.len().to_string());
    human.push_summary("Tasks due", due_total.to_string());
    for cell in &days {
        if cell.tasks.is_empty() {
            continue;
        }
        let mut titles: Vec<String> = cell
            .tasks
            .iter()
            .take(display_limit)
            .map(|task| task.title.clone())
            .collect();
        let hidden = cell.tasks.len().saturating_sub(display_limit);
        if hidden > 0 {
            titles.push(format!("+{hidden} more"));
        }
        human.push_detail(format!("{}: {}", cell.date, titles.join(", ")));
    }

    let output = MonthOutput {
        month: cursor.label(),
        week_start: week_start.as_str(),
        days,
    };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "calendar month",
        &output,
        Some(&human),
    )
}
