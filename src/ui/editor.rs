use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::project::{ProjectCatalog, NO_PROJECT_LABEL};
use crate::task::{
    parse_calendar_date, parse_hours, Priority, Task, TaskDraft, TaskPatch, TimeEntry,
    TimeEntryDraft,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Title,
    Description,
    Priority,
    DueDate,
    Project,
    Tags,
    Hours,
    Date,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormAction {
    None,
    Cancel,
    OpenPriorityPicker,
    OpenProjectPicker,
    Submit,
}

/// Create/edit form for a task. Fields are walked with tab/enter; the
/// priority and project fields open pickers instead of taking free text
/// on enter, and the last field leads into a confirm screen.
#[derive(Debug, Clone)]
pub struct TaskForm {
    kind: FormKind,
    task_id: Option<String>,
    fields: Vec<FormField>,
    active: usize,
    confirming: bool,
    error: Option<String>,
    default_priority: Option<Priority>,
}

impl TaskForm {
    pub fn new_task(default_priority: Priority) -> Self {
        Self {
            kind: FormKind::NewTask,
            task_id: None,
            fields: vec![
                FormField {
                    id: FieldId::Title,
                    label: "Title",
                    value: String::new(),
                    required: true,
                },
                FormField {
                    id: FieldId::Description,
                    label: "Description",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FieldId::Priority,
                    label: "Priority",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FieldId::DueDate,
                    label: "Due date",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FieldId::Project,
                    label: "Project",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FieldId::Tags,
                    label: "Tags",
                    value: String::new(),
                    required: false,
                },
            ],
            active: 0,
            confirming: false,
            error: None,
            default_priority: Some(default_priority),
        }
    }

    pub fn edit_task(task: &Task) -> Self {
        Self {
            kind: FormKind::EditTask,
            task_id: Some(task.id.clone()),
            fields: vec![
                FormField {
                    id: FieldId::Title,
                    label: "Title",
                    value: task.title.clone(),
                    required: true,
                },
                FormField {
                    id: FieldId::Description,
                    label: "Description",
                    value: task.description.clone().unwrap_or_default(),
                    required: false,
                },
                FormField {
                    id: FieldId::Priority,
                    label: "Priority",
                    value: task.priority.as_str().to_string(),
                    required: false,
                },
                FormField {
                    id: FieldId::DueDate,
                    label: "Due date",
                    value: task.due_date.clone().unwrap_or_default(),
                    required: false,
                },
                FormField {
                    id: FieldId::Project,
                    label: "Project",
                    value: task.project_id.clone().unwrap_or_default(),
                    required: false,
                },
                FormField {
                    id: FieldId::Tags,
                    label: "Tags",
                    value: task.tags.join(", "),
                    required: false,
                },
            ],
            active: 0,
            confirming: false,
            error: None,
            default_priority: None,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn confirming(&self) -> bool {
        self.confirming
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn default_priority(&self) -> Option<Priority> {
        self.default_priority
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.confirming = false;
    }

    pub fn field_value(&self, id: FieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    pub fn set_field_value(&mut self, id: FieldId, value: String) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.id == id) {
            field.value = value;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TaskFormAction {
        if self.confirming {
            return self.handle_confirm_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            if let Some(field) = self.current_field_mut() {
                field.value.clear();
            }
            self.error = None;
            return TaskFormAction::None;
        }

        match key.code {
            KeyCode::Esc => return TaskFormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => self.move_active(1),
            KeyCode::BackTab | KeyCode::Up => self.move_active(-1),
            KeyCode::Enter => {
                match self.current_field_id() {
                    Some(FieldId::Priority) => return TaskFormAction::OpenPriorityPicker,
                    Some(FieldId::Project) => return TaskFormAction::OpenProjectPicker,
                    _ => {}
                }
                if self.active + 1 >= self.fields.len() {
                    return self.attempt_confirm();
                }
                self.move_active(1);
            }
            KeyCode::Backspace => {
                if let Some(field) = self.current_field_mut() {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return TaskFormAction::None;
                }
                if !ch.is_control() {
                    if let Some(field) = self.current_field_mut() {
                        field.value.push(ch);
                    }
                }
            }
            _ => {}
        }

        self.error = None;
        TaskFormAction::None
    }

    /// Input for store creation; an untouched priority field falls back to
    /// the configured default.
    pub fn build_draft(&self) -> Result<TaskDraft, String> {
        self.validate()?;
        let priority = match non_empty(self.field_value(FieldId::Priority)) {
            Some(value) => Some(Priority::parse(&value).map_err(|err| err.to_string())?),
            None => self.default_priority,
        };
        Ok(TaskDraft {
            title: self.field_value(FieldId::Title).trim().to_string(),
            description: non_empty(self.field_value(FieldId::Description)),
            priority,
            due_date: non_empty(self.field_value(FieldId::DueDate)),
            project_id: non_empty(self.field_value(FieldId::Project)),
            tags: non_empty(self.field_value(FieldId::Tags)),
        })
    }

    /// Patch for store updates. The form was prefilled with the current
    /// values, so every field is written back; emptied optional fields
    /// clear their targets.
    pub fn build_patch(&self) -> Result<TaskPatch, String> {
        self.validate()?;
        let priority = match non_empty(self.field_value(FieldId::Priority)) {
            Some(value) => Some(Priority::parse(&value).map_err(|err| err.to_string())?),
            None => None,
        };
        Ok(TaskPatch {
            title: Some(self.field_value(FieldId::Title).trim().to_string()),
            description: Some(self.field_value(FieldId::Description).trim().to_string()),
            priority,
            due_date: Some(self.field_value(FieldId::DueDate).trim().to_string()),
            project_id: Some(self.field_value(FieldId::Project).trim().to_string()),
            tags: Some(self.field_value(FieldId::Tags).trim().to_string()),
        })
    }

    fn attempt_confirm(&mut self) -> TaskFormAction {
        match self.validate() {
            Ok(()) => {
                self.confirming = true;
            }
            Err(err) => {
                self.error = Some(err);
                self.confirming = false;
            }
        }
        TaskFormAction::None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> TaskFormAction {
        match key.code {
            KeyCode::Esc => TaskFormAction::Cancel,
            KeyCode::Backspace | KeyCode::Char('e') => {
                self.confirming = false;
                self.error = None;
                TaskFormAction::None
            }
            KeyCode::Char('y') | KeyCode::Enter => TaskFormAction::Submit,
            _ => TaskFormAction::None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.field_value(FieldId::Title).trim().is_empty() {
            return Err("Please enter a task title".to_string());
        }
        let priority = self.field_value(FieldId::Priority).trim();
        if !priority.is_empty() && Priority::parse(priority).is_err() {
            return Err("Priority must be low, medium, or high".to_string());
        }
        let due = self.field_value(FieldId::DueDate).trim();
        if !due.is_empty() && parse_calendar_date(due).is_none() {
            return Err("Due date must be YYYY-MM-DD".to_string());
        }
        Ok(())
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
    }

    fn current_field_id(&self) -> Option<FieldId> {
        self.fields.get(self.active).map(|field| field.id)
    }

    fn current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormAction {
    None,
    Cancel,
    Submit,
}

/// Small three-field form for logging time against a task. Submits
/// straight from the last field; there is no confirm screen.
#[derive(Debug, Clone)]
pub struct TimeEntryForm {
    task_id: String,
    entry_id: Option<String>,
    fields: Vec<FormField>,
    active: usize,
    error: Option<String>,
}

impl TimeEntryForm {
    pub fn new_entry(task_id: String, today: String) -> Self {
        Self {
            task_id,
            entry_id: None,
            fields: vec![
                FormField {
                    id: FieldId::Hours,
                    label: "Hours",
                    value: String::new(),
                    required: true,
                },
                FormField {
                    id: FieldId::Date,
                    label: "Date",
                    value: today,
                    required: true,
                },
                FormField {
                    id: FieldId::Description,
                    label: "Note",
                    value: String::new(),
                    required: false,
                },
            ],
            active: 0,
            error: None,
        }
    }

    pub fn edit_entry(task_id: String, entry: &TimeEntry) -> Self {
        Self {
            task_id,
            entry_id: Some(entry.id.clone()),
            fields: vec![
                FormField {
                    id: FieldId::Hours,
                    label: "Hours",
                    value: format_hours(entry.hours),
                    required: true,
                },
                FormField {
                    id: FieldId::Date,
                    label: "Date",
                    value: entry.date.clone(),
                    required: true,
                },
                FormField {
                    id: FieldId::Description,
                    label: "Note",
                    value: entry.description.clone().unwrap_or_default(),
                    required: false,
                },
            ],
            active: 0,
            error: None,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.entry_id.is_some()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TimeFormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            if let Some(field) = self.fields.get_mut(self.active) {
                field.value.clear();
            }
            self.error = None;
            return TimeFormAction::None;
        }

        match key.code {
            KeyCode::Esc => return TimeFormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => self.move_active(1),
            KeyCode::BackTab | KeyCode::Up => self.move_active(-1),
            KeyCode::Enter => {
                if self.active + 1 >= self.fields.len() {
                    return match self.build_draft() {
                        Ok(_) => TimeFormAction::Submit,
                        Err(err) => {
                            self.error = Some(err);
                            TimeFormAction::None
                        }
                    };
                }
                self.move_active(1);
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.active) {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return TimeFormAction::None;
                }
                if !ch.is_control() {
                    if let Some(field) = self.fields.get_mut(self.active) {
                        field.value.push(ch);
                    }
                }
            }
            _ => {}
        }

        self.error = None;
        TimeFormAction::None
    }

    pub fn build_draft(&self) -> Result<TimeEntryDraft, String> {
        let hours = parse_hours(self.field_value(FieldId::Hours)).map_err(|err| err.to_string())?;
        let date = self.field_value(FieldId::Date).trim();
        if date.is_empty() {
            return Err("Please select a date".to_string());
        }
        Ok(TimeEntryDraft {
            hours,
            date: date.to_string(),
            description: non_empty(self.field_value(FieldId::Description)),
        })
    }

    fn field_value(&self, id: FieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    None,
    Cancel,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct PriorityPicker {
    options: [Priority; 3],
    selected: usize,
}

impl PriorityPicker {
    pub fn new(current: Option<Priority>) -> Self {
        let options = Priority::ALL;
        let selected = current
            .and_then(|value| options.iter().position(|option| *option == value))
            .unwrap_or(1);
        Self { options, selected }
    }

    pub fn options(&self) -> &[Priority] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_priority(&self) -> Priority {
        self.options
            .get(self.selected)
            .copied()
            .unwrap_or(Priority::Medium)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerAction {
        match key.code {
            KeyCode::Esc => return PickerAction::Cancel,
            KeyCode::Enter => return PickerAction::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(idx) = ch.to_digit(10).and_then(|value| value.checked_sub(1)) {
                    let idx = idx as usize;
                    if idx < self.options.len() {
                        self.selected = idx;
                    }
                }
            }
            _ => {}
        }
        PickerAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

#[derive(Debug, Clone)]
pub struct ProjectOption {
    pub id: String,
    pub name: String,
}

/// Project chooser for the task form. The leading row clears the
/// assignment.
#[derive(Debug, Clone)]
pub struct ProjectPicker {
    options: Vec<ProjectOption>,
    selected: usize,
}

impl ProjectPicker {
    pub fn new(catalog: &ProjectCatalog, current: Option<&str>) -> Self {
        let mut options = vec![ProjectOption {
            id: String::new(),
            name: NO_PROJECT_LABEL.to_string(),
        }];
        for project in catalog.projects() {
            options.push(ProjectOption {
                id: project.id.clone(),
                name: project.name.clone(),
            });
        }
        let selected = current
            .and_then(|id| options.iter().position(|option| option.id == id))
            .unwrap_or(0);
        Self { options, selected }
    }

    pub fn options(&self) -> &[ProjectOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The chosen project id; None for the "No Project" row.
    pub fn selected_id(&self) -> Option<&str> {
        self.options
            .get(self.selected)
            .map(|option| option.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerAction {
        match key.code {
            KeyCode::Esc => return PickerAction::Cancel,
            KeyCode::Enter => return PickerAction::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            _ => {}
        }
        PickerAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Hours rendered the way they were typed: no trailing ".0" on whole
/// numbers.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{hours}")
    }
}
