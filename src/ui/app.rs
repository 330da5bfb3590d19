use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::editor::{
    FieldId, FormKind, PickerAction, PriorityPicker, ProjectPicker, TaskForm, TaskFormAction,
    TimeEntryForm, TimeFormAction,
};
use super::view;
use crate::attachment::{
    complete_upload, expand_paths, validate_batch, Attachment, AttachmentPolicy, DownloadHandle,
    UploadCandidate, UPLOAD_LATENCY_MS,
};
use crate::calendar::{MonthCursor, WeekStart};
use crate::config::Config;
use crate::error::Result;
use crate::filter::{filter_task_indices, StatusFilter, TaskFilter};
use crate::project::ProjectCatalog;
use crate::task::{Priority, Task, TaskPatch, TaskStore, DATE_FORMAT};

const EVENT_POLL_MS: u64 = 120;
const NARROW_WIDTH: u16 = 90;
const TOAST_MS: u64 = 3000;

enum UiMsg {
    UploadDone {
        task_id: String,
        attachments: Vec<Attachment>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Calendar,
    Analytics,
}

impl ViewMode {
    pub(crate) const ALL: [ViewMode; 3] = [ViewMode::List, ViewMode::Calendar, ViewMode::Analytics];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "Tasks",
            ViewMode::Calendar => "Calendar",
            ViewMode::Analytics => "Analytics",
        }
    }

    fn cycled(&self) -> ViewMode {
        match self {
            ViewMode::List => ViewMode::Calendar,
            ViewMode::Calendar => ViewMode::Analytics,
            ViewMode::Analytics => ViewMode::List,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Info,
}

#[derive(Debug, Clone)]
struct Toast {
    text: String,
    kind: StatusKind,
    at: Instant,
}

/// Pending destructive action. Nothing is removed until the user
/// answers the prompt.
#[derive(Debug, Clone)]
pub enum DeleteConfirm {
    Task {
        task_id: String,
    },
    Attachment {
        task_id: String,
        attachment_id: String,
        name: String,
    },
}

impl DeleteConfirm {
    pub(crate) fn prompt(&self) -> String {
        match self {
            DeleteConfirm::Task { .. } => {
                "Are you sure you want to delete this task?".to_string()
            }
            DeleteConfirm::Attachment { name, .. } => {
                format!("Are you sure you want to delete \"{name}\"?")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeEntryBrowser {
    pub(crate) task_id: String,
    pub(crate) selected: usize,
}

#[derive(Debug, Clone)]
pub struct AttachmentBrowser {
    pub(crate) task_id: String,
    pub(crate) selected: usize,
    /// Rejection reasons from the most recent upload batch.
    pub(crate) rejected: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadPrompt {
    pub(crate) task_id: String,
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Viewport {
    width: u16,
    height: u16,
}

pub struct AppState {
    pub(crate) catalog: ProjectCatalog,
    pub(crate) config: Config,
    pub(crate) view: ViewMode,
    pub(crate) filtered: Vec<usize>,
    pub(crate) selected: Option<usize>,
    pub(crate) filter: String,
    pub(crate) filter_active: bool,
    pub(crate) status_filter: StatusFilter,
    pub(crate) month: MonthCursor,
    pub(crate) selected_day: NaiveDate,
    pub(crate) week_start: WeekStart,
    pub(crate) task_form: Option<TaskForm>,
    pub(crate) time_form: Option<TimeEntryForm>,
    pub(crate) time_browser: Option<TimeEntryBrowser>,
    pub(crate) attach_browser: Option<AttachmentBrowser>,
    pub(crate) upload_prompt: Option<UploadPrompt>,
    pub(crate) priority_picker: Option<PriorityPicker>,
    pub(crate) project_picker: Option<ProjectPicker>,
    pub(crate) delete_confirm: Option<DeleteConfirm>,
    pub(crate) show_help: bool,
    pub(crate) show_detail: bool,
    pub(crate) uploading: bool,
    toast: Option<Toast>,
    viewport: Viewport,
    pub(crate) palette: &'static view::Palette,
    pub(crate) store: TaskStore,
}

impl AppState {
    fn new(store: TaskStore, catalog: ProjectCatalog, config: Config) -> Self {
        let today = Local::now().date_naive();
        let week_start = WeekStart::parse(&config.calendar.week_start).unwrap_or_default();
        let palette = view::palette_for(&config.ui.theme);
        let mut state = Self {
            catalog,
            config,
            view: ViewMode::List,
            filtered: Vec::new(),
            selected: None,
            filter: String::new(),
            filter_active: false,
            status_filter: StatusFilter::All,
            month: MonthCursor::new(today),
            selected_day: today,
            week_start,
            task_form: None,
            time_form: None,
            time_browser: None,
            attach_browser: None,
            upload_prompt: None,
            priority_picker: None,
            project_picker: None,
            delete_confirm: None,
            show_help: false,
            show_detail: false,
            uploading: false,
            toast: None,
            viewport: Viewport::default(),
            palette,
            store,
        };
        state.apply_filter(None);
        state
    }

    fn update_viewport(&mut self, width: u16, height: u16) {
        let changed = self.viewport.width != width || self.viewport.height != height;
        self.viewport = Viewport { width, height };
        if changed && width >= NARROW_WIDTH {
            self.show_detail = true;
        }
    }

    pub(crate) fn is_narrow(&self) -> bool {
        self.viewport.width > 0 && self.viewport.width < NARROW_WIDTH
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.store.tasks().get(idx))
    }

    fn selected_task_id(&self) -> Option<String> {
        self.selected_task().map(|task| task.id.clone())
    }

    /// Recompute the visible rows. `keep` names the task that should stay
    /// selected when it is still visible; otherwise selection falls back
    /// to the first row.
    fn apply_filter(&mut self, keep: Option<String>) {
        let filter = TaskFilter::new(self.status_filter, self.filter.clone());
        self.filtered = filter_task_indices(self.store.tasks(), &filter);
        let target = keep.and_then(|id| {
            self.store
                .tasks()
                .iter()
                .position(|task| task.id == id)
                .filter(|idx| self.filtered.contains(idx))
        });
        self.selected = target.or_else(|| self.filtered.first().copied());
    }

    fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.selected = None;
            return;
        }
        let position = self
            .selected
            .and_then(|idx| self.filtered.iter().position(|candidate| *candidate == idx));
        let next = match position {
            Some(pos) => {
                let max = self.filtered.len() as isize - 1;
                (pos as isize + delta).clamp(0, max) as usize
            }
            None => 0,
        };
        self.selected = Some(self.filtered[next]);
    }

    fn move_day(&mut self, days: i64) {
        if let Some(next) = self
            .selected_day
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.selected_day = next;
            if !self.month.in_month(next) {
                self.month.reset(next);
            }
        }
    }

    fn set_error(&mut self, message: String) {
        self.toast = Some(Toast {
            text: message,
            kind: StatusKind::Error,
            at: Instant::now(),
        });
    }

    fn set_info(&mut self, message: String) {
        self.toast = Some(Toast {
            text: message,
            kind: StatusKind::Info,
            at: Instant::now(),
        });
    }

    fn clear_expired_toast(&mut self) -> bool {
        match self.toast.as_ref() {
            Some(toast) if toast.at.elapsed() >= Duration::from_millis(TOAST_MS) => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(toast) = self.toast.as_ref() {
            if toast.at.elapsed() < Duration::from_millis(TOAST_MS) {
                return Some((toast.text.clone(), toast.kind));
            }
        }
        if self.uploading {
            return Some(("Uploading files...".to_string(), StatusKind::Info));
        }
        let mut segments = Vec::new();
        if !self.filter.is_empty() {
            segments.push(format!("filter: {}", self.filter));
        }
        if self.status_filter != StatusFilter::All {
            segments.push(format!("status: {}", self.status_filter.label()));
        }
        if !segments.is_empty() {
            return Some((segments.join("  "), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.delete_confirm.is_some() {
            return "y/enter confirm delete  n/esc cancel".to_string();
        }
        if self.priority_picker.is_some() || self.project_picker.is_some() {
            return "j/k move  enter apply  esc cancel".to_string();
        }
        if self.upload_prompt.is_some() {
            return "type path or glob  enter upload  esc cancel".to_string();
        }
        if self.time_form.is_some() {
            return "tab next  enter next/submit  ctrl-u clear  esc cancel".to_string();
        }
        if let Some(form) = self.task_form.as_ref() {
            if form.confirming() {
                return "y/enter save  e edit  esc cancel".to_string();
            }
            return "tab next  enter pick/confirm  ctrl-u clear  esc cancel".to_string();
        }
        if self.attach_browser.is_some() {
            return "j/k move  u upload  o download  d delete  esc close".to_string();
        }
        if self.time_browser.is_some() {
            return "j/k move  a add  e edit  d delete  esc close".to_string();
        }
        if self.filter_active {
            return "type filter  tab status  enter done  esc clear".to_string();
        }
        match self.view {
            ViewMode::List => {
                "j/k move  / search  s status  n new  e edit  d delete  t toggle  h hours  f files  ? help  q quit"
                    .to_string()
            }
            ViewMode::Calendar => {
                "h/l day  j/k week  [/] month  t today  1/2/3 view  ? help  q quit".to_string()
            }
            ViewMode::Analytics => "1/2/3 view  v cycle  ? help  q quit".to_string(),
        }
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let mut pending = 0usize;
        let mut in_progress = 0usize;
        let mut completed = 0usize;
        for task in self.store.tasks() {
            match task.status {
                crate::task::TaskStatus::Pending => pending += 1,
                crate::task::TaskStatus::InProgress => in_progress += 1,
                crate::task::TaskStatus::Completed => completed += 1,
            }
        }
        format!("pending: {pending}  in progress: {in_progress}  completed: {completed}")
    }

    fn default_priority(&self) -> Priority {
        Priority::parse(&self.config.defaults.priority).unwrap_or_default()
    }

    fn list_jump(&self) -> isize {
        let mut height = self.viewport.height.saturating_sub(6);
        if self.filter_active || !self.filter.is_empty() || self.status_filter != StatusFilter::All
        {
            height = height.saturating_sub(2);
        }
        let jump = (height / 2).max(1);
        jump as isize
    }
}

/// Run the interactive dashboard until the user quits.
pub fn run(store: TaskStore, catalog: ProjectCatalog, config: Config) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::channel();
    let mut app = AppState::new(store, catalog, config);
    run_terminal(&mut app, ui_rx, ui_tx)
}

fn run_terminal(app: &mut AppState, ui_rx: Receiver<UiMsg>, ui_tx: Sender<UiMsg>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.width, size.height);

    let result = run_loop(&mut terminal, app, ui_rx, ui_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
    ui_tx: Sender<UiMsg>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if app.clear_expired_toast() {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().width, frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, &ui_tx, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(width, height) => {
                    app.update_viewport(width, height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::UploadDone {
            task_id,
            attachments,
        } => {
            app.uploading = false;
            match app.store.add_attachments(&task_id, attachments) {
                Ok(added) => {
                    app.set_info(format!("Successfully uploaded {added} file(s)"));
                    let count = app
                        .store
                        .attachments(&task_id)
                        .map(|list| list.len())
                        .unwrap_or(0);
                    if let Some(browser) = app.attach_browser.as_mut() {
                        if browser.task_id == task_id && count > 0 {
                            browser.selected = count - 1;
                        }
                    }
                }
                Err(err) => app.set_error(err.to_string()),
            }
        }
    }
}

/// Returns true when the app should quit. Modal surfaces are checked
/// front to back, so a key only ever reaches one consumer.
fn handle_key(app: &mut AppState, ui_tx: &Sender<UiMsg>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.show_help {
        app.show_help = false;
        return false;
    }

    if let Some(confirm) = app.delete_confirm.take() {
        handle_confirm_key(app, confirm, key);
        return false;
    }

    if let Some(mut picker) = app.priority_picker.take() {
        match picker.handle_key(key) {
            PickerAction::None => app.priority_picker = Some(picker),
            PickerAction::Cancel => {}
            PickerAction::Confirm => apply_priority_choice(app, picker.selected_priority()),
        }
        return false;
    }

    if let Some(mut picker) = app.project_picker.take() {
        match picker.handle_key(key) {
            PickerAction::None => app.project_picker = Some(picker),
            PickerAction::Cancel => {}
            PickerAction::Confirm => {
                let value = picker.selected_id().unwrap_or("").to_string();
                if let Some(form) = app.task_form.as_mut() {
                    form.set_field_value(FieldId::Project, value);
                }
            }
        }
        return false;
    }

    if let Some(mut prompt) = app.upload_prompt.take() {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => start_upload(app, ui_tx, prompt),
            KeyCode::Backspace => {
                prompt.value.pop();
                prompt.error = None;
                app.upload_prompt = Some(prompt);
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                    prompt.value.push(ch);
                    prompt.error = None;
                }
                app.upload_prompt = Some(prompt);
            }
            _ => app.upload_prompt = Some(prompt),
        }
        return false;
    }

    if let Some(mut form) = app.time_form.take() {
        match form.handle_key(key) {
            TimeFormAction::None => app.time_form = Some(form),
            TimeFormAction::Cancel => {}
            TimeFormAction::Submit => submit_time_form(app, form),
        }
        return false;
    }

    if let Some(mut form) = app.task_form.take() {
        match form.handle_key(key) {
            TaskFormAction::None => app.task_form = Some(form),
            TaskFormAction::Cancel => {}
            TaskFormAction::OpenPriorityPicker => {
                let current = Priority::parse(form.field_value(FieldId::Priority))
                    .ok()
                    .or(form.default_priority());
                app.priority_picker = Some(PriorityPicker::new(current));
                app.task_form = Some(form);
            }
            TaskFormAction::OpenProjectPicker => {
                let current = form.field_value(FieldId::Project).trim().to_string();
                let current = if current.is_empty() {
                    None
                } else {
                    Some(current)
                };
                app.project_picker = Some(ProjectPicker::new(&app.catalog, current.as_deref()));
                app.task_form = Some(form);
            }
            TaskFormAction::Submit => submit_task_form(app, form),
        }
        return false;
    }

    if app.time_browser.is_some() {
        handle_time_browser_key(app, key);
        return false;
    }

    if app.attach_browser.is_some() {
        handle_attach_browser_key(app, key);
        return false;
    }

    if app.filter_active {
        match key.code {
            KeyCode::Esc => {
                app.filter.clear();
                app.filter_active = false;
            }
            KeyCode::Enter => app.filter_active = false,
            KeyCode::Tab => app.status_filter = app.status_filter.cycled(),
            KeyCode::Backspace => {
                app.filter.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                    app.filter.push(ch);
                }
            }
            _ => {}
        }
        let keep = app.selected_task_id();
        app.apply_filter(keep);
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('?') => {
            app.show_help = true;
            return false;
        }
        KeyCode::Char('1') => {
            app.view = ViewMode::List;
            return false;
        }
        KeyCode::Char('2') => {
            app.view = ViewMode::Calendar;
            return false;
        }
        KeyCode::Char('3') => {
            app.view = ViewMode::Analytics;
            return false;
        }
        KeyCode::Char('v') => {
            app.view = app.view.cycled();
            return false;
        }
        KeyCode::Char('T') => {
            app.config.ui.theme = if app.config.ui.theme == "light" {
                "dark".to_string()
            } else {
                "light".to_string()
            };
            app.palette = view::palette_for(&app.config.ui.theme);
            return false;
        }
        _ => {}
    }

    match app.view {
        ViewMode::List => handle_list_key(app, key),
        ViewMode::Calendar => handle_calendar_key(app, key),
        ViewMode::Analytics => {}
    }
    false
}

fn handle_confirm_key(app: &mut AppState, confirm: DeleteConfirm, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => match confirm {
            DeleteConfirm::Task { task_id } => match app.store.delete(&task_id) {
                Ok(_) => {
                    app.set_info("Task deleted successfully!".to_string());
                    app.apply_filter(None);
                }
                Err(err) => app.set_error(err.to_string()),
            },
            DeleteConfirm::Attachment {
                task_id,
                attachment_id,
                ..
            } => match app.store.delete_attachment(&task_id, &attachment_id) {
                Ok(_) => {
                    app.set_info("Attachment deleted successfully".to_string());
                    let count = app
                        .store
                        .attachments(&task_id)
                        .map(|list| list.len())
                        .unwrap_or(0);
                    if let Some(browser) = app.attach_browser.as_mut() {
                        browser.selected = browser.selected.min(count.saturating_sub(1));
                    }
                }
                Err(err) => app.set_error(err.to_string()),
            },
        },
        KeyCode::Char('n') | KeyCode::Esc => {}
        _ => app.delete_confirm = Some(confirm),
    }
}

fn apply_priority_choice(app: &mut AppState, priority: Priority) {
    if let Some(form) = app.task_form.as_mut() {
        form.set_field_value(FieldId::Priority, priority.as_str().to_string());
        return;
    }
    let Some(task_id) = app.selected_task_id() else {
        return;
    };
    let patch = TaskPatch {
        priority: Some(priority),
        ..TaskPatch::default()
    };
    match app.store.update(&task_id, patch).map(|_| ()) {
        Ok(()) => {
            app.set_info("Task updated successfully!".to_string());
            app.apply_filter(Some(task_id));
        }
        Err(err) => app.set_error(err.to_string()),
    }
}

fn submit_task_form(app: &mut AppState, mut form: TaskForm) {
    let project = form.field_value(FieldId::Project).trim().to_string();
    if !project.is_empty() {
        if let Err(err) = app.catalog.get(&project) {
            form.set_error(err.to_string());
            app.task_form = Some(form);
            return;
        }
    }
    match form.kind() {
        FormKind::NewTask => {
            let draft = match form.build_draft() {
                Ok(draft) => draft,
                Err(err) => {
                    form.set_error(err);
                    app.task_form = Some(form);
                    return;
                }
            };
            match app.store.create(draft).map(|task| task.id.clone()) {
                Ok(id) => {
                    app.set_info("Task created successfully!".to_string());
                    app.apply_filter(Some(id));
                }
                Err(err) => {
                    form.set_error(err.to_string());
                    app.task_form = Some(form);
                }
            }
        }
        FormKind::EditTask => {
            let Some(task_id) = form.task_id().map(|id| id.to_string()) else {
                return;
            };
            let patch = match form.build_patch() {
                Ok(patch) => patch,
                Err(err) => {
                    form.set_error(err);
                    app.task_form = Some(form);
                    return;
                }
            };
            match app.store.update(&task_id, patch).map(|_| ()) {
                Ok(()) => {
                    app.set_info("Task updated successfully!".to_string());
                    app.apply_filter(Some(task_id));
                }
                Err(err) => {
                    form.set_error(err.to_string());
                    app.task_form = Some(form);
                }
            }
        }
    }
}

fn submit_time_form(app: &mut AppState, mut form: TimeEntryForm) {
    let draft = match form.build_draft() {
        Ok(draft) => draft,
        Err(err) => {
            form.set_error(err);
            app.time_form = Some(form);
            return;
        }
    };
    let task_id = form.task_id().to_string();
    let is_edit = form.is_edit();
    let result = match form.entry_id() {
        Some(entry_id) => app
            .store
            .update_time_entry(&task_id, entry_id, draft)
            .map(|_| ()),
        None => app.store.add_time_entry(&task_id, draft).map(|_| ()),
    };
    match result {
        Ok(()) => {
            let count = app
                .store
                .find(&task_id)
                .map(|task| task.time_entries.len())
                .unwrap_or(0);
            if let Some(browser) = app.time_browser.as_mut() {
                if browser.task_id == task_id && count > 0 {
                    browser.selected = if is_edit {
                        browser.selected.min(count - 1)
                    } else {
                        count - 1
                    };
                }
            }
        }
        Err(err) => {
            form.set_error(err.to_string());
            app.time_form = Some(form);
        }
    }
}

fn handle_time_browser_key(app: &mut AppState, key: KeyEvent) {
    let Some(mut browser) = app.time_browser.take() else {
        return;
    };
    let count = app
        .store
        .find(&browser.task_id)
        .map(|task| task.time_entries.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return,
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 {
                browser.selected = (browser.selected + 1).min(count - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            browser.selected = browser.selected.saturating_sub(1);
        }
        KeyCode::Char('a') => {
            let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
            app.time_form = Some(TimeEntryForm::new_entry(browser.task_id.clone(), today));
        }
        KeyCode::Char('e') => {
            let entry = app
                .store
                .find(&browser.task_id)
                .and_then(|task| task.time_entries.get(browser.selected))
                .cloned();
            match entry {
                Some(entry) => {
                    app.time_form = Some(TimeEntryForm::edit_entry(browser.task_id.clone(), &entry));
                }
                None => app.set_error("No time entry selected".to_string()),
            }
        }
        KeyCode::Char('d') => {
            let entry_id = app
                .store
                .find(&browser.task_id)
                .and_then(|task| task.time_entries.get(browser.selected))
                .map(|entry| entry.id.clone());
            match entry_id {
                Some(entry_id) => {
                    match app.store.delete_time_entry(&browser.task_id, &entry_id) {
                        Ok(_) => {
                            let remaining = count.saturating_sub(1);
                            browser.selected = browser.selected.min(remaining.saturating_sub(1));
                        }
                        Err(err) => app.set_error(err.to_string()),
                    }
                }
                None => app.set_error("No time entry selected".to_string()),
            }
        }
        _ => {}
    }
    app.time_browser = Some(browser);
}

fn handle_attach_browser_key(app: &mut AppState, key: KeyEvent) {
    let Some(mut browser) = app.attach_browser.take() else {
        return;
    };
    let count = app
        .store
        .attachments(&browser.task_id)
        .map(|list| list.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return,
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 {
                browser.selected = (browser.selected + 1).min(count - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            browser.selected = browser.selected.saturating_sub(1);
        }
        KeyCode::Char('u') => {
            if app.uploading {
                app.set_error("Upload already in progress".to_string());
            } else {
                app.upload_prompt = Some(UploadPrompt {
                    task_id: browser.task_id.clone(),
                    value: String::new(),
                    error: None,
                });
            }
        }
        KeyCode::Char('o') => {
            let attachment_id = app
                .store
                .attachments(&browser.task_id)
                .ok()
                .and_then(|list| list.get(browser.selected))
                .map(|attachment| attachment.id.clone());
            match attachment_id {
                Some(id) => download_attachment(app, &browser.task_id, &id),
                None => app.set_error("No attachment selected".to_string()),
            }
        }
        KeyCode::Char('d') => {
            let target = app
                .store
                .attachments(&browser.task_id)
                .ok()
                .and_then(|list| list.get(browser.selected))
                .map(|attachment| (attachment.id.clone(), attachment.name.clone()));
            match target {
                Some((attachment_id, name)) => {
                    app.delete_confirm = Some(DeleteConfirm::Attachment {
                        task_id: browser.task_id.clone(),
                        attachment_id,
                        name,
                    });
                }
                None => app.set_error("No attachment selected".to_string()),
            }
        }
        _ => {}
    }
    app.attach_browser = Some(browser);
}

fn download_attachment(app: &mut AppState, task_id: &str, attachment_id: &str) {
    let result = app
        .store
        .find_attachment(task_id, attachment_id)
        .and_then(|attachment| {
            let handle = DownloadHandle::new(attachment)?;
            let dest = PathBuf::from(handle.name());
            handle.save_to(&dest)?;
            Ok(attachment.name.clone())
        });
    match result {
        Ok(name) => app.set_info(format!("Downloaded {name}")),
        Err(err) => app.set_error(err.to_string()),
    }
}

fn start_upload(app: &mut AppState, ui_tx: &Sender<UiMsg>, mut prompt: UploadPrompt) {
    let pattern = prompt.value.trim().to_string();
    if pattern.is_empty() {
        prompt.error = Some("Enter a file path or glob".to_string());
        app.upload_prompt = Some(prompt);
        return;
    }
    let paths = match expand_paths(&[pattern]) {
        Ok(paths) => paths,
        Err(err) => {
            prompt.error = Some(err.to_string());
            app.upload_prompt = Some(prompt);
            return;
        }
    };
    let mut candidates = Vec::with_capacity(paths.len());
    for path in &paths {
        match UploadCandidate::from_path(path) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => {
                prompt.error = Some(err.to_string());
                app.upload_prompt = Some(prompt);
                return;
            }
        }
    }
    let policy = match AttachmentPolicy::from_config(&app.config.attachments) {
        Ok(policy) => policy,
        Err(err) => {
            app.set_error(err.to_string());
            return;
        }
    };
    let outcome = validate_batch(candidates, &policy);
    if let Some(browser) = app.attach_browser.as_mut() {
        browser.rejected = outcome.rejected.clone();
    }
    if outcome.all_rejected() {
        app.set_error("Failed to upload files".to_string());
        return;
    }
    app.uploading = true;
    spawn_upload(ui_tx.clone(), prompt.task_id, outcome.accepted);
}

fn spawn_upload(ui_tx: Sender<UiMsg>, task_id: String, accepted: Vec<UploadCandidate>) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(UPLOAD_LATENCY_MS));
        let attachments = complete_upload(accepted);
        let _ = ui_tx.send(UiMsg::UploadDone {
            task_id,
            attachments,
        });
    });
}

fn handle_list_key(app: &mut AppState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('d') => app.move_selection(app.list_jump()),
            KeyCode::Char('u') => app.move_selection(-app.list_jump()),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('/') => app.filter_active = true,
        KeyCode::Char('s') => {
            app.status_filter = app.status_filter.cycled();
            let keep = app.selected_task_id();
            app.apply_filter(keep);
        }
        KeyCode::Char('n') => {
            app.task_form = Some(TaskForm::new_task(app.default_priority()));
            app.show_detail = true;
        }
        KeyCode::Char('e') => match app.selected_task() {
            Some(task) => {
                let form = TaskForm::edit_task(task);
                app.task_form = Some(form);
                app.show_detail = true;
            }
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Char('d') => match app.selected_task_id() {
            Some(task_id) => app.delete_confirm = Some(DeleteConfirm::Task { task_id }),
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Char('t') | KeyCode::Char(' ') => match app.selected_task_id() {
            Some(task_id) => match app.store.toggle_status(&task_id) {
                Ok(status) => {
                    app.set_info(format!("Task marked as {status}!"));
                    app.apply_filter(Some(task_id));
                }
                Err(err) => app.set_error(err.to_string()),
            },
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Char('p') => match app.selected_task() {
            Some(task) => {
                app.priority_picker = Some(PriorityPicker::new(Some(task.priority)));
            }
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Char('h') => match app.selected_task_id() {
            Some(task_id) => {
                app.time_browser = Some(TimeEntryBrowser {
                    task_id,
                    selected: 0,
                });
            }
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Char('f') => match app.selected_task_id() {
            Some(task_id) => {
                app.attach_browser = Some(AttachmentBrowser {
                    task_id,
                    selected: 0,
                    rejected: Vec::new(),
                });
            }
            None => app.set_error("No task selected".to_string()),
        },
        KeyCode::Enter => {
            if app.is_narrow() {
                app.show_detail = !app.show_detail;
            }
        }
        _ => {}
    }
}

fn handle_calendar_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_day(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_day(1),
        KeyCode::Char('j') | KeyCode::Down => app.move_day(7),
        KeyCode::Char('k') | KeyCode::Up => app.move_day(-7),
        KeyCode::Char('[') => {
            app.month.prev_month();
            app.selected_day = app.month.anchor();
        }
        KeyCode::Char(']') => {
            app.month.next_month();
            app.selected_day = app.month.anchor();
        }
        KeyCode::Char('t') => {
            let today = Local::now().date_naive();
            app.month.reset(today);
            app.selected_day = today;
        }
        _ => {}
    }
}
