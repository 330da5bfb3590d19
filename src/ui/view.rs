use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::analytics::{self, AnalyticsSummary, TrendPoint};
use crate::attachment::{format_size, icon_for};
use crate::calendar::tasks_for_day;
use crate::filter::StatusFilter;
use crate::task::{Priority, Task, TaskStatus};

use super::app::{
    AppState, AttachmentBrowser, DeleteConfirm, StatusKind, TimeEntryBrowser, UploadPrompt,
    ViewMode,
};
use super::editor::{FieldId, FormKind, PriorityPicker, ProjectPicker, TaskForm, TimeEntryForm};

const STATUS_WIDTH: usize = 6;
const ID_WIDTH: usize = 12;
const PRIORITY_WIDTH: usize = 6;
const HELP_KEY_WIDTH: usize = 14;
const TREND_BAR_WIDTH: usize = 16;

/// Terminal color set for one theme. Status and priority accents come
/// from the fixed hex palette shared with the analytics output, so the
/// same task is tinted identically everywhere.
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub muted_dark: Color,
    pub bg_muted: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    pub accent: Color,
    pub border_list: Color,
    pub border_detail: Color,
    pub magenta: Color,
}

const DARK: Palette = Palette {
    text: Color::Rgb(234, 236, 239),
    muted: Color::Rgb(160, 165, 172),
    muted_dark: Color::Rgb(118, 124, 130),
    bg_muted: Color::Rgb(52, 56, 60),
    info: Color::Rgb(116, 198, 219),
    warning: Color::Rgb(244, 200, 98),
    error: Color::Rgb(255, 107, 107),
    success: Color::Rgb(126, 210, 146),
    accent: Color::Rgb(122, 170, 255),
    border_list: Color::Rgb(92, 126, 166),
    border_detail: Color::Rgb(180, 156, 92),
    magenta: Color::Rgb(214, 140, 230),
};

const LIGHT: Palette = Palette {
    text: Color::Rgb(30, 33, 36),
    muted: Color::Rgb(95, 102, 110),
    muted_dark: Color::Rgb(140, 146, 152),
    bg_muted: Color::Rgb(214, 218, 223),
    info: Color::Rgb(12, 116, 137),
    warning: Color::Rgb(156, 101, 0),
    error: Color::Rgb(179, 38, 30),
    success: Color::Rgb(22, 128, 57),
    accent: Color::Rgb(28, 78, 166),
    border_list: Color::Rgb(70, 110, 160),
    border_detail: Color::Rgb(158, 128, 54),
    magenta: Color::Rgb(142, 68, 173),
};

pub fn palette_for(theme: &str) -> &'static Palette {
    match theme {
        "light" => &LIGHT,
        _ => &DARK,
    }
}

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);
    let tabs = chunks[0];
    let main = chunks[1];
    let footer = chunks[2];

    render_tabs(frame, app, tabs);

    match app.view {
        ViewMode::List => render_tasks(frame, app, main),
        ViewMode::Calendar => render_calendar(frame, app, main),
        ViewMode::Analytics => render_analytics(frame, app, main),
    }

    render_footer(frame, app, footer);

    if let Some(browser) = app.time_browser.as_ref() {
        render_time_browser_modal(frame, area, app, browser);
    }
    if let Some(browser) = app.attach_browser.as_ref() {
        render_attach_browser_modal(frame, area, app, browser);
    }
    if let Some(form) = app.time_form.as_ref() {
        render_time_form_modal(frame, area, app, form);
    }
    if let Some(prompt) = app.upload_prompt.as_ref() {
        render_upload_modal(frame, area, app, prompt);
    }
    if let Some(picker) = app.priority_picker.as_ref() {
        render_priority_modal(frame, area, app, picker);
    }
    if let Some(picker) = app.project_picker.as_ref() {
        render_project_modal(frame, area, app, picker);
    }
    if let Some(confirm) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, app, confirm);
    }
    if app.show_help {
        render_help_modal(frame, area, app);
    }
}

fn render_tabs(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let colors = [palette.info, palette.accent, palette.success];
    let mut spans = Vec::new();
    for (idx, mode) in ViewMode::ALL.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default().fg(palette.muted_dark)));
        }
        let text = match mode {
            ViewMode::List => format!("{} {} ({})", idx + 1, mode.label(), app.store.len()),
            _ => format!("{} {}", idx + 1, mode.label()),
        };
        let style = if app.view == mode {
            Style::default()
                .fg(colors[idx])
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(text, style));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.bg_muted)),
    );
    frame.render_widget(widget, area);
}

fn render_tasks(frame: &mut Frame, app: &AppState, area: Rect) {
    if app.is_narrow() && !app.show_detail {
        render_list(frame, app, area);
    } else if app.is_narrow() {
        render_detail(frame, app, area);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
            .split(area);
        render_list(frame, app, chunks[0]);
        render_detail(frame, app, chunks[1]);
    }
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();

    if app.filter_active || !app.filter.is_empty() || app.status_filter != StatusFilter::All {
        let filter_label = if app.filter_active && app.filter.is_empty() {
            "filter: _".to_string()
        } else if app.filter.is_empty() {
            "filter:".to_string()
        } else {
            format!("filter: {}", app.filter)
        };
        let status_label = format!("status: {}", app.status_filter.label());
        lines.push(Line::from(vec![
            Span::styled(filter_label, Style::default().fg(palette.info)),
            Span::raw("  "),
            Span::styled(status_label, Style::default().fg(palette.warning)),
        ]));
        lines.push(Line::from(""));
    }

    if app.filtered.is_empty() {
        if !app.filter.is_empty() || app.status_filter != StatusFilter::All {
            lines.push(Line::from("No matches"));
        } else {
            lines.push(Line::from("No tasks"));
        }
    } else {
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(lines.len() as u16) as usize;
        let selected_pos = app
            .selected
            .and_then(|idx| app.filtered.iter().position(|candidate| *candidate == idx));
        let (start, end) = list_window(app.filtered.len(), selected_pos, list_height);
        for pos in start..end {
            let idx = app.filtered[pos];
            if let Some(task) = app.store.tasks().get(idx) {
                let selected = app.selected == Some(idx);
                lines.push(render_list_row(palette, task, selected, content_width));
            }
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks")
                .border_style(Style::default().fg(palette.border_list)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_list_row(palette: &Palette, task: &Task, selected: bool, width: usize) -> Line<'static> {
    let status_text = pad_text_center(status_label(task.status), STATUS_WIDTH);
    let id_text = pad_text(&task.id, ID_WIDTH);
    let priority_text = pad_text(task.priority.as_str(), PRIORITY_WIDTH);
    let used = STATUS_WIDTH + ID_WIDTH + PRIORITY_WIDTH + 5;
    let title = truncate_text(&task.title, width.saturating_sub(used));

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            status_text,
            status_style(palette, task.status).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(id_text, id_style(palette)),
        Span::raw(" "),
        Span::styled(
            priority_text,
            priority_text_style(palette, task.priority).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(title, Style::default().fg(palette.text)),
    ];

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn render_detail(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(2) as usize;
    let (title, content) = if let Some(form) = app.task_form.as_ref() {
        let title = match form.kind() {
            FormKind::NewTask => "New Task",
            FormKind::EditTask => "Edit Task",
        };
        (title, build_form_lines(app, form, content_width))
    } else {
        ("Details", build_detail_lines(app, content_width))
    };
    let widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, Style::default().fg(palette.info));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(palette.warning),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(palette.accent),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(palette.border_list)),
        );
    frame.render_widget(widget, area);
}

fn build_form_lines(app: &AppState, form: &TaskForm, width: usize) -> Vec<Line<'static>> {
    let palette = app.palette;
    if form.confirming() {
        return build_confirm_lines(app, form, width);
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, field) in form.fields().iter().enumerate() {
        let is_active = idx == form.active_index();
        let label = format!("{:<12}", field.label);
        let mut value = field.value.clone();
        let placeholder = if value.trim().is_empty() {
            match field.id {
                FieldId::Priority => form
                    .default_priority()
                    .map(|priority| format!("(default {})", priority.as_str())),
                FieldId::DueDate => Some("(YYYY-MM-DD)".to_string()),
                _ if field.required => Some("<required>".to_string()),
                _ => Some("(optional)".to_string()),
            }
        } else {
            None
        };
        let value_style = if placeholder.is_some() {
            Style::default().fg(palette.muted)
        } else {
            Style::default().fg(palette.text)
        };
        if let Some(place) = placeholder {
            value = place;
        }
        let mut spans = vec![
            Span::styled(label, Style::default().fg(palette.text)),
            Span::raw(" "),
            Span::styled(truncate_text(&value, width.saturating_sub(14)), value_style),
        ];
        if is_active {
            for span in &mut spans {
                span.style = span.style.add_modifier(Modifier::REVERSED);
            }
        }
        lines.push(Line::from(spans));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter on priority/project opens a picker",
        Style::default().fg(palette.muted_dark),
    )));
    lines
}

fn build_confirm_lines(app: &AppState, form: &TaskForm, width: usize) -> Vec<Line<'static>> {
    let palette = app.palette;
    let action = match form.kind() {
        FormKind::NewTask => "Create this task?",
        FormKind::EditTask => "Save these changes?",
    };
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        action,
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    for field in form.fields() {
        let label = format!("{:<12}", field.label);
        let value = if field.value.trim().is_empty() {
            match field.id {
                FieldId::Priority => form
                    .default_priority()
                    .map(|priority| priority.as_str().to_string())
                    .unwrap_or_else(|| "-".to_string()),
                _ => "-".to_string(),
            }
        } else {
            field.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(palette.muted_dark)),
            Span::raw(" "),
            Span::styled(
                truncate_text(&value, width.saturating_sub(14)),
                Style::default().fg(palette.text),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y/enter save  e edit  esc cancel",
        Style::default().fg(palette.muted_dark),
    )));
    lines
}

fn build_detail_lines(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let palette = app.palette;
    let Some(task) = app.selected_task() else {
        return vec![Line::from(Span::styled(
            "No task selected",
            Style::default().fg(palette.muted_dark),
        ))];
    };

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("# {}", task.id),
        id_style(palette),
    )));
    lines.push(Line::from(Span::styled(
        truncate_text(&task.title, width),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        label_span(palette, "Status: "),
        Span::styled(
            task.status.display_name().to_string(),
            status_text_style(palette, task.status).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        label_span(palette, "Priority: "),
        Span::styled(
            task.priority.display_name().to_string(),
            priority_text_style(palette, task.priority).add_modifier(Modifier::BOLD),
        ),
    ]));

    let project_color = hex_color(&app.catalog.color_for(task.project_id.as_deref()))
        .unwrap_or(palette.muted);
    lines.push(Line::from(vec![
        label_span(palette, "Project: "),
        Span::styled("■ ", Style::default().fg(project_color)),
        Span::styled(
            app.catalog.name_for(task.project_id.as_deref()),
            Style::default().fg(palette.text),
        ),
    ]));

    if let Some(due) = task.due_date.as_deref() {
        let today = Local::now().date_naive();
        let overdue = task
            .due_day()
            .map(|day| day < today)
            .unwrap_or(false)
            && !task.is_completed();
        let mut spans = vec![
            label_span(palette, "Due: "),
            Span::styled(due.to_string(), Style::default().fg(palette.warning)),
        ];
        if overdue {
            spans.push(Span::styled(
                " (overdue)",
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(spans));
    }

    if !task.tags.is_empty() {
        lines.push(Line::from(vec![
            label_span(palette, "Tags: "),
            Span::styled(task.tags.join(", "), Style::default().fg(palette.info)),
        ]));
    }

    lines.push(Line::from(vec![
        label_span(palette, "Updated: "),
        Span::styled(
            format_timestamp(task.updated_at),
            Style::default().fg(palette.warning),
        ),
        Span::raw("  "),
        label_span(palette, "Created: "),
        Span::styled(
            format_timestamp(task.created_at),
            Style::default().fg(palette.warning),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(section_header(palette, "## Description"));
    let description = task
        .description
        .as_deref()
        .map(|value| value.trim_end())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("No description.");
    for line in description.lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(palette.text),
        )));
    }
    lines.push(Line::from(""));

    lines.push(section_header(
        palette,
        &format!(
            "## Time entries (total {}h)",
            fmt_hours(task.total_hours())
        ),
    ));
    if task.time_entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "None",
            Style::default().fg(palette.muted_dark),
        )));
    } else {
        for entry in &task.time_entries {
            let note = entry.description.clone().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("- ", Style::default().fg(palette.muted_dark)),
                Span::styled(entry.date.clone(), Style::default().fg(palette.warning)),
                Span::raw("  "),
                Span::styled(
                    format!("{}h", fmt_hours(entry.hours)),
                    Style::default().fg(palette.text),
                ),
                Span::raw("  "),
                Span::styled(note, Style::default().fg(palette.muted)),
            ]));
        }
    }
    lines.push(Line::from(""));

    lines.push(section_header(
        palette,
        &format!("## Attachments ({})", task.attachments.len()),
    ));
    if task.attachments.is_empty() {
        lines.push(Line::from(Span::styled(
            "None",
            Style::default().fg(palette.muted_dark),
        )));
    } else {
        for attachment in &task.attachments {
            lines.push(Line::from(vec![
                Span::styled("- ", Style::default().fg(palette.muted_dark)),
                Span::styled(
                    attachment.name.clone(),
                    Style::default().fg(palette.text),
                ),
                Span::styled(
                    format!(
                        " ({}, {})",
                        icon_for(&attachment.mime_type).label(),
                        format_size(attachment.size)
                    ),
                    Style::default().fg(palette.muted),
                ),
            ]));
        }
    }

    lines
}

fn render_calendar(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(7),
                Constraint::Length(8),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        app.month.label(),
        Style::default()
            .fg(palette.info)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let label_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, 7); 7])
        .split(chunks[1]);
    for (idx, label) in app.week_start.labels().iter().enumerate() {
        let widget = Paragraph::new(Line::from(Span::styled(
            label.to_string(),
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(widget, label_cols[idx]);
    }

    let days = app.month.grid(app.week_start);
    let weeks = days.len() / 7;
    if weeks > 0 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, weeks as u32); weeks])
            .split(chunks[2]);
        for week in 0..weeks {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, 7); 7])
                .split(rows[week]);
            for col in 0..7 {
                render_day_cell(frame, app, days[week * 7 + col], cols[col]);
            }
        }
    }

    render_day_panel(frame, app, chunks[3]);
}

fn render_day_cell(frame: &mut Frame, app: &AppState, day: NaiveDate, area: Rect) {
    let palette = app.palette;
    let today = Local::now().date_naive();
    let border = if day == app.selected_day {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else if day == today {
        Style::default().fg(palette.success)
    } else {
        Style::default().fg(palette.bg_muted)
    };
    let day_style = if app.month.in_month(day) {
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted_dark)
    };

    let width = area.width.saturating_sub(2) as usize;
    let mut lines = vec![Line::from(Span::styled(
        day.day().to_string(),
        day_style,
    ))];
    let due = tasks_for_day(app.store.tasks(), day);
    let limit = app.config.calendar.day_display_limit;
    for task in due.iter().take(limit) {
        lines.push(Line::from(Span::styled(
            truncate_text(&task.title, width),
            status_text_style(palette, task.status),
        )));
    }
    if due.len() > limit {
        lines.push(Line::from(Span::styled(
            format!("+{} more", due.len() - limit),
            Style::default().fg(palette.muted_dark),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(widget, area);
}

fn render_day_panel(frame: &mut Frame, app: &AppState, area: Rect) {
    let palette = app.palette;
    let width = area.width.saturating_sub(2) as usize;
    let due = tasks_for_day(app.store.tasks(), app.selected_day);
    let mut lines: Vec<Line<'static>> = Vec::new();
    if due.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks due",
            Style::default().fg(palette.muted_dark),
        )));
    } else {
        for task in &due {
            let status_text = pad_text_center(status_label(task.status), STATUS_WIDTH);
            let title_width = width.saturating_sub(STATUS_WIDTH + PRIORITY_WIDTH + 3);
            lines.push(Line::from(vec![
                Span::styled(
                    status_text,
                    status_style(palette, task.status).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    pad_text(task.priority.as_str(), PRIORITY_WIDTH),
                    priority_text_style(palette, task.priority),
                ),
                Span::raw(" "),
                Span::styled(
                    truncate_text(&task.title, title_width),
                    Style::default().fg(palette.text),
                ),
            ]));
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Tasks on {}", app.selected_day.format("%Y-%m-%d")))
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_analytics(frame: &mut Frame, app: &AppState, area: Rect) {
    let summary = analytics::summarize(app.store.tasks(), &app.catalog);
    let trend = analytics::productivity_trend(
        app.store.tasks(),
        Local::now().date_naive(),
        app.week_start,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)].as_ref())
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(columns[1]);

    render_overview(frame, app, &summary, left[0]);
    render_distributions(frame, app, &summary, left[1]);
    render_project_progress(frame, app, &summary, right[0]);
    render_week_trend(frame, app, &trend, right[1]);
}

fn render_overview(frame: &mut Frame, app: &AppState, summary: &AnalyticsSummary, area: Rect) {
    let palette = app.palette;
    let lines = vec![
        Line::from(vec![
            label_span(palette, "Total tasks: "),
            Span::styled(
                summary.total_tasks.to_string(),
                Style::default().fg(palette.info),
            ),
        ]),
        Line::from(vec![
            label_span(palette, "Completion rate: "),
            Span::styled(
                format!("{:.1}%", summary.completion_rate),
                Style::default().fg(palette.success),
            ),
        ]),
        Line::from(vec![
            label_span(palette, "Time spent: "),
            Span::styled(
                format!("{}h", fmt_hours(summary.total_time_spent)),
                Style::default().fg(palette.warning),
            ),
        ]),
        Line::from(vec![
            label_span(palette, "Avg per task: "),
            Span::styled(
                format!("{}h", fmt_hours(summary.avg_time_per_task)),
                Style::default().fg(palette.accent),
            ),
        ]),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Overview")
            .border_style(Style::default().fg(app.palette.border_list)),
    );
    frame.render_widget(widget, area);
}

fn render_distributions(frame: &mut Frame, app: &AppState, summary: &AnalyticsSummary, area: Rect) {
    let palette = app.palette;
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(section_header(palette, "By status"));
    for slice in &summary.status_distribution {
        lines.push(distribution_line(palette, &slice.name, slice.count, &slice.color));
    }
    lines.push(Line::from(""));
    lines.push(section_header(palette, "By priority"));
    for slice in &summary.priority_distribution {
        lines.push(distribution_line(palette, &slice.name, slice.count, &slice.color));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Distributions")
            .border_style(Style::default().fg(palette.border_list)),
    );
    frame.render_widget(widget, area);
}

fn distribution_line(palette: &Palette, name: &str, count: usize, color: &str) -> Line<'static> {
    let chip = hex_color(color).unwrap_or(palette.text);
    Line::from(vec![
        Span::styled("■ ", Style::default().fg(chip)),
        Span::styled(pad_text(name, 12), Style::default().fg(palette.text)),
        Span::styled(count.to_string(), Style::default().fg(palette.muted)),
    ])
}

fn render_project_progress(
    frame: &mut Frame,
    app: &AppState,
    summary: &AnalyticsSummary,
    area: Rect,
) {
    let palette = app.palette;
    let width = area.width.saturating_sub(2) as usize;
    let bar_width = width.saturating_sub(6).max(4);
    let mut lines: Vec<Line<'static>> = Vec::new();
    if summary.project_progress.is_empty() {
        lines.push(Line::from(Span::styled(
            "No projects",
            Style::default().fg(palette.muted_dark),
        )));
    }
    for progress in &summary.project_progress {
        let color = hex_color(&progress.color).unwrap_or(palette.accent);
        lines.push(Line::from(vec![
            Span::styled(
                truncate_text(&progress.name, width.saturating_sub(10)),
                Style::default().fg(palette.text),
            ),
            Span::styled(
                format!("  {}/{}", progress.completed, progress.total),
                Style::default().fg(palette.muted_dark),
            ),
        ]));
        let filled = (progress.completion_rate as usize * bar_width) / 100;
        let filled = filled.min(bar_width);
        lines.push(Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::styled(
                "░".repeat(bar_width - filled),
                Style::default().fg(palette.bg_muted),
            ),
            Span::styled(
                format!(" {}%", progress.completion_rate),
                Style::default().fg(color),
            ),
        ]));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Project Progress")
            .border_style(Style::default().fg(palette.border_detail)),
    );
    frame.render_widget(widget, area);
}

fn render_week_trend(frame: &mut Frame, app: &AppState, trend: &[TrendPoint], area: Rect) {
    let palette = app.palette;
    let max_hours = trend.iter().map(|point| point.hours).fold(0.0f64, f64::max);
    let mut lines: Vec<Line<'static>> = Vec::new();
    for point in trend {
        let filled = if max_hours > 0.0 {
            ((point.hours / max_hours) * TREND_BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let filled = filled.min(TREND_BAR_WIDTH);
        lines.push(Line::from(vec![
            Span::styled(pad_text(&point.day, 4), Style::default().fg(palette.muted)),
            Span::styled("█".repeat(filled), Style::default().fg(palette.info)),
            Span::styled(
                "░".repeat(TREND_BAR_WIDTH - filled),
                Style::default().fg(palette.bg_muted),
            ),
            Span::styled(
                format!(" {}h ({})", fmt_hours(point.hours), point.tasks),
                Style::default().fg(palette.muted),
            ),
        ]));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("This Week")
            .border_style(Style::default().fg(palette.border_detail)),
    );
    frame.render_widget(widget, area);
}

fn render_time_browser_modal(
    frame: &mut Frame,
    area: Rect,
    app: &AppState,
    browser: &TimeEntryBrowser,
) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(6).min(64);
    let max_height = area.height.saturating_sub(4).max(8);
    let task = app.store.find(&browser.task_id);
    let entry_count = task.map(|task| task.time_entries.len()).unwrap_or(0);
    let height = (entry_count as u16 + 7).min(max_height);
    let list_height = height.saturating_sub(7) as usize;
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    if let Some(task) = task {
        lines.push(Line::from(Span::styled(
            truncate_text(&task.title, width),
            Style::default().fg(palette.text),
        )));
        lines.push(Line::from(vec![
            label_span(palette, "Total: "),
            Span::styled(
                format!("{}h", fmt_hours(task.total_hours())),
                Style::default().fg(palette.accent),
            ),
        ]));
        lines.push(Line::from(""));
        if task.time_entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "No time entries",
                Style::default().fg(palette.muted_dark),
            )));
        } else {
            let (start, end) = list_window(
                task.time_entries.len(),
                Some(browser.selected),
                list_height.max(1),
            );
            for (pos, entry) in task
                .time_entries
                .iter()
                .enumerate()
                .take(end)
                .skip(start)
            {
                let note = entry.description.clone().unwrap_or_default();
                let mut spans = vec![
                    Span::styled("- ", Style::default().fg(palette.muted_dark)),
                    Span::styled(entry.date.clone(), Style::default().fg(palette.warning)),
                    Span::raw("  "),
                    Span::styled(
                        format!("{}h", fmt_hours(entry.hours)),
                        Style::default().fg(palette.text),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        truncate_text(&note, width.saturating_sub(20)),
                        Style::default().fg(palette.muted),
                    ),
                ];
                if pos == browser.selected {
                    for span in &mut spans {
                        span.style = span.style.add_modifier(Modifier::REVERSED);
                    }
                }
                lines.push(Line::from(spans));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Task no longer exists",
            Style::default().fg(palette.error),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "a add  e edit  d delete  esc close",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Time Entries")
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_attach_browser_modal(
    frame: &mut Frame,
    area: Rect,
    app: &AppState,
    browser: &AttachmentBrowser,
) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(6).min(68);
    let max_height = area.height.saturating_sub(4).max(8);
    let attachments = app
        .store
        .attachments(&browser.task_id)
        .unwrap_or(&[]);
    let rejected_reserved = if browser.rejected.is_empty() {
        0
    } else {
        browser.rejected.len() + 2
    };
    let height = (attachments.len() as u16 + rejected_reserved as u16 + 6).min(max_height);
    let list_height = height.saturating_sub(4 + rejected_reserved as u16) as usize;
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    if attachments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No attachments",
            Style::default().fg(palette.muted_dark),
        )));
    } else {
        let (start, end) = list_window(
            attachments.len(),
            Some(browser.selected),
            list_height.max(1),
        );
        for (pos, attachment) in attachments.iter().enumerate().take(end).skip(start) {
            let meta = format!(
                " ({}, {})",
                icon_for(&attachment.mime_type).label(),
                format_size(attachment.size)
            );
            let name_width = width.saturating_sub(meta.len() + 2);
            let mut spans = vec![
                Span::styled("- ", Style::default().fg(palette.muted_dark)),
                Span::styled(
                    truncate_text(&attachment.name, name_width),
                    Style::default().fg(palette.text),
                ),
                Span::styled(meta, Style::default().fg(palette.muted)),
            ];
            if pos == browser.selected {
                for span in &mut spans {
                    span.style = span.style.add_modifier(Modifier::REVERSED);
                }
            }
            lines.push(Line::from(spans));
        }
    }

    if !browser.rejected.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Rejected:",
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        )));
        for reason in &browser.rejected {
            lines.push(Line::from(Span::styled(
                truncate_text(reason, width),
                Style::default().fg(palette.warning),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "u upload  o download  d delete  esc close",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Attachments")
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_time_form_modal(frame: &mut Frame, area: Rect, app: &AppState, form: &TimeEntryForm) {
    let palette = app.palette;
    let content_width = 46u16.min(area.width.saturating_sub(6));
    let height = (form.fields().len() as u16 + 6).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, field) in form.fields().iter().enumerate() {
        let is_active = idx == form.active_index();
        let label = format!("{:<7}", field.label);
        let empty = field.value.trim().is_empty();
        let value = if empty {
            if field.required {
                "<required>".to_string()
            } else {
                "(optional)".to_string()
            }
        } else {
            field.value.clone()
        };
        let value_style = if empty {
            Style::default().fg(palette.muted)
        } else {
            Style::default().fg(palette.text)
        };
        let mut spans = vec![
            Span::styled(label, Style::default().fg(palette.text)),
            Span::raw(" "),
            Span::styled(truncate_text(&value, width.saturating_sub(9)), value_style),
        ];
        if is_active {
            for span in &mut spans {
                span.style = span.style.add_modifier(Modifier::REVERSED);
            }
        }
        lines.push(Line::from(spans));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter from last field submits  esc cancel",
        Style::default().fg(palette.muted_dark),
    )));

    let title = if form.is_edit() {
        "Edit Time Entry"
    } else {
        "Log Time"
    };
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_upload_modal(frame: &mut Frame, area: Rect, app: &AppState, prompt: &UploadPrompt) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(8).min(60);
    let height = 9u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("path: ", Style::default().fg(palette.muted_dark)),
        Span::styled(
            format!("{}_", prompt.value),
            Style::default().fg(palette.info),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "allowed: images, pdf, word, excel, csv, txt",
        Style::default().fg(palette.muted),
    )));
    lines.push(Line::from(Span::styled(
        format!("max size: {}MB per file", app.config.attachments.max_size_mb),
        Style::default().fg(palette.muted),
    )));
    if let Some(error) = prompt.error.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            truncate_text(error, width),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter upload  esc cancel",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Upload Files")
                .border_style(Style::default().fg(palette.border_detail)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_priority_modal(frame: &mut Frame, area: Rect, app: &AppState, picker: &PriorityPicker) {
    let palette = app.palette;
    let content_width = 24u16.min(area.width.saturating_sub(6));
    let height = (picker.options().len() as u16 + 4).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, option) in picker.options().iter().enumerate() {
        let mut span = Span::styled(
            format!("{} {}", idx + 1, option.display_name()),
            priority_text_style(palette, *option).add_modifier(Modifier::BOLD),
        );
        if idx == picker.selected_index() {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Priority"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_project_modal(frame: &mut Frame, area: Rect, app: &AppState, picker: &ProjectPicker) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(6).min(44);
    let height = (picker.options().len() as u16 + 4).min(area.height.saturating_sub(4));
    let list_height = height.saturating_sub(4) as usize;
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(4);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let (start, end) = list_window(
        picker.options().len(),
        Some(picker.selected_index()),
        list_height.max(1),
    );
    for (idx, option) in picker.options().iter().enumerate().take(end).skip(start) {
        let chip = if option.id.is_empty() {
            palette.muted_dark
        } else {
            hex_color(&app.catalog.color_for(Some(&option.id))).unwrap_or(palette.text)
        };
        let mut spans = vec![
            Span::styled("■ ", Style::default().fg(chip)),
            Span::styled(
                truncate_text(&option.name, width),
                Style::default().fg(palette.text),
            ),
        ];
        if idx == picker.selected_index() {
            for span in &mut spans {
                span.style = span.style.add_modifier(Modifier::REVERSED);
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Project"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_delete_confirm_modal(
    frame: &mut Frame,
    area: Rect,
    app: &AppState,
    confirm: &DeleteConfirm,
) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 10u16.min(area.height.saturating_sub(6).max(8));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(4);
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        confirm.prompt(),
        Style::default()
            .fg(palette.error)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    match confirm {
        DeleteConfirm::Task { task_id } => {
            lines.push(Line::from(vec![
                label_span(palette, "ID: "),
                Span::styled(task_id.clone(), id_style(palette)),
            ]));
            if let Some(task) = app.store.find(task_id) {
                lines.push(Line::from(vec![
                    label_span(palette, "Title: "),
                    Span::styled(
                        truncate_text(&task.title, width),
                        Style::default().fg(palette.text),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Time entries and attachments go with it.",
                Style::default().fg(palette.warning),
            )));
        }
        DeleteConfirm::Attachment { name, .. } => {
            lines.push(Line::from(vec![
                label_span(palette, "File: "),
                Span::styled(
                    truncate_text(name, width),
                    Style::default().fg(palette.text),
                ),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y/enter confirm  n/esc cancel",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .border_style(Style::default().fg(palette.error)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_help_modal(frame: &mut Frame, area: Rect, app: &AppState) {
    let palette = app.palette;
    let content_width = area.width.saturating_sub(8).min(58);
    let height = area.height.saturating_sub(4).min(26);
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines = vec![
        help_header(palette, "Views"),
        help_line(palette, "1/2/3", "tasks / calendar / analytics", width),
        help_line(palette, "v", "cycle views", width),
        help_line(palette, "T", "toggle dark/light theme", width),
        help_line(palette, "q/esc", "quit", width),
        Line::from(""),
        help_header(palette, "Tasks"),
        help_line(palette, "j/k or up/down", "move selection", width),
        help_line(palette, "ctrl+d/u", "page down/up", width),
        help_line(palette, "/", "search; tab cycles status", width),
        help_line(palette, "s", "cycle status filter", width),
        help_line(palette, "n", "new task", width),
        help_line(palette, "e", "edit task", width),
        help_line(palette, "d", "delete task", width),
        help_line(palette, "t/space", "toggle completed", width),
        help_line(palette, "p", "change priority", width),
        help_line(palette, "h", "time entries", width),
        help_line(palette, "f", "attachments", width),
        help_line(palette, "enter", "toggle details in narrow view", width),
        Line::from(""),
        help_header(palette, "Calendar"),
        help_line(palette, "h/l", "previous/next day", width),
        help_line(palette, "j/k", "next/previous week", width),
        help_line(palette, "[/]", "previous/next month", width),
        help_line(palette, "t", "jump to today", width),
        Line::from(""),
    ];
    lines.push(Line::from(Span::styled(
        "press any key to close",
        Style::default().fg(palette.muted_dark),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PEND",
        TaskStatus::InProgress => "PROG",
        TaskStatus::Completed => "DONE",
    }
}

fn status_style(palette: &Palette, status: TaskStatus) -> Style {
    status_text_style(palette, status).bg(palette.bg_muted)
}

fn status_text_style(palette: &Palette, status: TaskStatus) -> Style {
    let fg = hex_color(analytics::status_color(status)).unwrap_or(palette.text);
    Style::default().fg(fg)
}

fn priority_text_style(palette: &Palette, priority: Priority) -> Style {
    let fg = hex_color(analytics::priority_color(priority)).unwrap_or(palette.text);
    Style::default().fg(fg)
}

fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.len() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn pad_text_center(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.len() > width {
        text = truncate_text(&text, width);
    }
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let total_pad = width - len;
    let left = total_pad / 2;
    let right = total_pad - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

/// Hours rendered without a trailing ".0" on whole numbers.
fn fmt_hours(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn label_span(palette: &Palette, label: &str) -> Span<'static> {
    Span::styled(label.to_string(), Style::default().fg(palette.muted_dark))
}

fn section_header(palette: &Palette, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(palette.magenta)
            .add_modifier(Modifier::BOLD),
    ))
}

fn id_style(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.muted)
        .add_modifier(Modifier::BOLD)
}

fn help_header(palette: &Palette, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(palette.info)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_line(palette: &Palette, keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(palette.muted)),
    ])
}
