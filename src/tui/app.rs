use chrono::{Duration, Local, NaiveDate};
use ratatui::widgets::TableState;
use uuid::Uuid;

use crate::commands::{cmd_add, cmd_complete, cmd_edit, cmd_mood, cmd_morning, cmd_reflect};
use crate::models::{DayRecord, Task};
use crate::recurrence::{parse_minutes, resolve_day};
use crate::storage::Store;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

pub enum InputField {
    None,
    Text,
    Start,
    End,
    Goal,
    Recur,
    Morning,
    Reflection,
    Mood,
}

pub struct App {
    store: Store,
    pub selected_date: NaiveDate,
    pub record: DayRecord,
    /// Resolved view of the selected day: explicit tasks plus virtual
    /// occurrences, sorted by start time.
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<Uuid>,
    // For adding tasks, we need to store partial data
    pub add_state: AddState,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub text: String,
    pub start: String,
    pub end: String,
    pub recur: Option<String>,
    pub days: Option<String>,
    pub until: Option<String>,
    pub step: usize, // 0: Text, 1: Start, 2: End, 3: Recur, 4: Days, 5: Until
}

impl App {
    /// Creates a new App instance pointed at today and loads initial data.
    pub fn new(store: Store) -> App {
        let mut app = App {
            store,
            selected_date: Local::now().date_naive(),
            record: DayRecord::new(Local::now().date_naive()),
            tasks: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
        };
        app.reload();
        app
    }

    /// Reloads the selected day from storage and re-resolves occurrences.
    pub fn reload(&mut self) {
        let day = self.selected_date;
        self.record = self
            .store
            .load_day(day)
            .unwrap_or_else(|| DayRecord::new(day));
        let history = self.store.load_history(day);
        let mut tasks = resolve_day(&self.record.tasks, &history, day);
        tasks.sort_by_key(|t| parse_minutes(&t.start).unwrap_or(u32::MAX));
        self.tasks = tasks;

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task.
    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Moves the view one day back.
    pub fn previous_day(&mut self) {
        self.selected_date = self.selected_date - Duration::days(1);
        self.state.select(None);
        self.reload();
    }

    /// Moves the view one day forward.
    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date + Duration::days(1);
        self.state.select(None);
        self.reload();
    }

    /// Jumps the view back to today.
    pub fn today(&mut self) {
        self.selected_date = Local::now().date_naive();
        self.state.select(None);
        self.reload();
    }

    /// Toggles completion of the selected task. A virtual occurrence gets
    /// persisted into the day's explicit list by this touch.
    pub fn toggle_selected(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(t) = self.tasks.get(i) {
                let id = t.id.to_string();
                cmd_complete(
                    &self.store,
                    id,
                    Some(self.selected_date.to_string()),
                    true,
                );
                self.reload();
            }
        }
    }

    /// Deletes the selected task if it is stored on this day. Virtual
    /// occurrences live on their template's day and are left alone.
    pub fn delete_selected(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(t) = self.tasks.get(i) {
                let id = t.id;
                if !self.record.tasks.iter().any(|e| e.id == id) {
                    return;
                }
                self.record.tasks.retain(|e| e.id != id);
                let _ = self.store.upsert_day(&self.record);
                self.reload();
            }
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field, for the selected task or for
    /// the day's journal fields.
    pub fn start_edit(&mut self, field: InputField) {
        match field {
            InputField::Morning | InputField::Reflection | InputField::Mood => {
                self.target_id = None;
                self.input_buffer = match field {
                    InputField::Morning => self.record.morning.clone(),
                    InputField::Reflection => self.record.reflection.clone(),
                    _ => self.record.mood.clone(),
                };
                self.input_mode = InputMode::Editing;
                self.input_field = field;
            }
            _ => {
                if let Some(i) = self.state.selected() {
                    if let Some(t) = self.tasks.get(i) {
                        self.target_id = Some(t.id);
                        self.input_buffer = match field {
                            InputField::Text => t.text.clone(),
                            InputField::Start => t.start.clone(),
                            InputField::End => t.end.clone(),
                            InputField::Goal => t.goal_id.clone().unwrap_or_default(),
                            InputField::Recur => t
                                .recurring
                                .as_ref()
                                .map(|r| r.describe())
                                .unwrap_or_default(),
                            _ => String::new(),
                        };
                        self.input_mode = InputMode::Editing;
                        self.input_field = field;
                    }
                }
            }
        }
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            _ => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Text
                if !self.input_buffer.is_empty() {
                    self.add_state.text = self.input_buffer.clone();
                    self.add_state.step = 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                // Start time; stay on the step until it parses
                if parse_minutes(&self.input_buffer).is_some() {
                    self.add_state.start = self.input_buffer.clone();
                    self.add_state.step = 2;
                    self.input_buffer.clear();
                }
            }
            2 => {
                // End time
                if parse_minutes(&self.input_buffer).is_some() {
                    self.add_state.end = self.input_buffer.clone();
                    self.add_state.step = 3;
                    self.input_buffer.clear();
                }
            }
            3 => {
                // Recurrence unit (blank = one-off task)
                if self.input_buffer.is_empty() {
                    self.finish_add();
                    return;
                }
                let spec = self.input_buffer.clone();
                let weekly = spec.to_lowercase().starts_with("week");
                self.add_state.recur = Some(spec);
                self.add_state.step = if weekly { 4 } else { 5 };
                self.input_buffer.clear();
            }
            4 => {
                // Weekdays (blank = the viewed day's weekday)
                if !self.input_buffer.is_empty() {
                    self.add_state.days = Some(self.input_buffer.clone());
                }
                self.add_state.step = 5;
                self.input_buffer.clear();
            }
            5 => {
                // Until date (blank = no end)
                if !self.input_buffer.is_empty() {
                    self.add_state.until = Some(self.input_buffer.clone());
                }
                self.finish_add();
            }
            _ => {}
        }
    }

    fn finish_add(&mut self) {
        cmd_add(
            &self.store,
            self.add_state.text.clone(),
            Some(self.selected_date.to_string()),
            self.add_state.start.clone(),
            self.add_state.end.clone(),
            None,
            self.add_state.recur.clone(),
            self.add_state.days.clone(),
            None,
            self.add_state.until.clone(),
            true,
        );
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload();
    }

    /// Handles input for the "Edit" mode.
    fn handle_editing_input(&mut self) {
        let date = Some(self.selected_date.to_string());
        match self.input_field {
            InputField::Morning => {
                cmd_morning(&self.store, self.input_buffer.clone(), date, true)
            }
            InputField::Reflection => {
                cmd_reflect(&self.store, self.input_buffer.clone(), date, true)
            }
            InputField::Mood => cmd_mood(&self.store, self.input_buffer.clone(), date, true),
            _ => {
                if let Some(id) = self.target_id {
                    let id = id.to_string();
                    match self.input_field {
                        InputField::Text => cmd_edit(
                            &self.store, id, date,
                            Some(self.input_buffer.clone()),
                            None, None, None, None, None, None, None, true,
                        ),
                        InputField::Start => cmd_edit(
                            &self.store, id, date, None,
                            Some(self.input_buffer.clone()),
                            None, None, None, None, None, None, true,
                        ),
                        InputField::End => cmd_edit(
                            &self.store, id, date, None, None,
                            Some(self.input_buffer.clone()),
                            None, None, None, None, None, true,
                        ),
                        InputField::Goal => cmd_edit(
                            &self.store, id, date, None, None, None,
                            Some(self.input_buffer.clone()),
                            None, None, None, None, true,
                        ),
                        InputField::Recur => {
                            // Blank keeps the current rule; "none" clears it.
                            if !self.input_buffer.is_empty() {
                                cmd_edit(
                                    &self.store, id, date, None, None, None, None,
                                    Some(self.input_buffer.clone()),
                                    None, None, None, true,
                                );
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload();
    }
}
