//! taskflow analytics command implementations.

use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::analytics::{productivity_trend, summarize, TrendPoint};
use crate::calendar::{start_of_week, WeekStart};
use crate::cli::load_context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{parse_calendar_date, DATE_FORMAT};

/// Options for analytics summary
pub struct SummaryOptions {
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for analytics trend
pub struct TrendOptions {
    pub date: Option<String>,
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct TrendOutput {
    week_start: &'static str,
    week_of: String,
    days: Vec<TrendPoint>,
}

pub fn run_summary(options: SummaryOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;
    let summary = summarize(ctx.store.tasks(), &ctx.catalog);

    let mut human = HumanOutput::new("Analytics");
    human.push_summary("Tasks", summary.total_tasks.to_string());
    human.push_summary(
        "Completion rate",
        format!("{:.1}%", summary.completion_rate),
    );
    human.push_summary("Total time", format!("{}h", summary.total_time_spent));
    human.push_summary("Avg per task", format!("{:.1}h", summary.avg_time_per_task));
    for slice in &summary.status_distribution {
        human.push_detail(format!("Status {}: {}", slice.name, slice.count));
    }
    for slice in &summary.priority_distribution {
        human.push_detail(format!("Priority {}: {}", slice.name, slice.count));
    }
    for progress in &summary.project_progress {
        human.push_detail(format!(
            "Project {}: {}/{} ({}%)",
            progress.name, progress.completed, progress.total, progress.completion_rate
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "analytics summary",
        &summary,
        Some(&human),
    )
}

pub fn run_trend(options: TrendOptions) -> Result<()> {
    let ctx = load_context(options.data.as_deref(), options.config.as_deref())?;

    let today = match options.date.as_deref() {
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            Error::InvalidArgument(format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
        })?,
        None => Local::now().date_naive(),
    };
    let week_start = WeekStart::parse(&ctx.config.calendar.week_start).unwrap_or_default();
    let days = productivity_trend(ctx.store.tasks(), today, week_start);

    let week_of = start_of_week(today, week_start)
        .format(DATE_FORMAT)
        .to_string();
    let mut human = HumanOutput::new("Weekly trend");
    human.push_summary("Week of", week_of.clone());
    for point in &days {
        human.push_detail(format!(
            "{}: {}h ({} tasks)",
            point.day, point.hours, point.tasks
        ));
    }

    let output = TrendOutput {
        week_start: week_start.as_str(),
        week_of,
        days,
    };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "analytics trend",
        &output,
        Some(&human),
    )
}
