use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display names for weekday indices 0 (Sunday) through 6 (Saturday).
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// How often a recurring task repeats.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurUnit {
    /// Repeats every day.
    Day,
    /// Repeats on specific weekdays.
    Week,
    /// Any unit this version does not understand. Never matches.
    #[serde(other)]
    Unknown,
}

/// A recurrence rule attached to a task.
///
/// A task carrying a rule is a template: it stays on the day it was created
/// and spawns virtual occurrences on later days that match the rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Recurrence {
    /// Multiplier on the unit. Stored and displayed but not consulted when
    /// matching: a rule with `interval = 2` and `unit = Week` still fires
    /// every week.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// The repeat unit.
    pub unit: RecurUnit,
    /// Weekday indices (0 = Sunday .. 6 = Saturday) the rule fires on.
    /// Only consulted when `unit` is `Week`; an empty set never matches.
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    /// Last date (inclusive) the rule fires on.
    #[serde(default)]
    pub until: Option<NaiveDate>,
}

fn default_interval() -> u32 {
    1
}

impl Recurrence {
    /// Renders the rule in the same mini-language the CLI and TUI accept,
    /// e.g. `daily`, `weekly mon,wed until 2024-06-01`, `every 2 weekly fri`.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.interval > 1 {
            parts.push(format!("every {}", self.interval));
        }
        match self.unit {
            RecurUnit::Day => parts.push("daily".to_string()),
            RecurUnit::Week => {
                parts.push("weekly".to_string());
                let names: Vec<String> = self
                    .days_of_week
                    .iter()
                    .filter(|d| **d < 7)
                    .map(|d| DAY_NAMES[*d as usize].to_lowercase())
                    .collect();
                if !names.is_empty() {
                    parts.push(names.join(","));
                }
            }
            RecurUnit::Unknown => parts.push("unknown".to_string()),
        }
        if let Some(until) = self.until {
            parts.push(format!("until {}", until));
        }
        parts.join(" ")
    }
}

/// A block of scheduled time on one calendar day.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Task {
    /// Unique identifier, stable per concrete occurrence.
    pub id: Uuid,
    /// What the task is.
    pub text: String,
    /// Start time of day, `HH:MM`.
    pub start: String,
    /// End time of day, `HH:MM`.
    pub end: String,
    /// Whether the task has been marked done. Never shared across repeats.
    #[serde(default)]
    pub completed: bool,
    /// Informational link to an external goal.
    #[serde(default)]
    pub goal_id: Option<String>,
    /// Recurrence rule. Present on templates, absent on concrete occurrences.
    #[serde(default)]
    pub recurring: Option<Recurrence>,
}

impl Task {
    /// Creates a concrete task with a fresh random identifier.
    pub fn new(text: String, start: String, end: String) -> Task {
        Task {
            id: Uuid::new_v4(),
            text,
            start,
            end,
            completed: false,
            goal_id: None,
            recurring: None,
        }
    }
}

/// Everything the planner persists for one calendar day: the explicit task
/// list plus the free-text fields.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DayRecord {
    /// The calendar date this record belongs to.
    pub day: NaiveDate,
    /// Tasks explicitly saved on this day. Mixes concrete occurrences and
    /// recurrence templates; a template lives on the day it was created.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Morning intention.
    #[serde(default)]
    pub morning: String,
    /// Evening reflection.
    #[serde(default)]
    pub reflection: String,
    /// Mood note.
    #[serde(default)]
    pub mood: String,
    /// Write counter used to reject stale whole-record upserts.
    #[serde(default)]
    pub revision: u64,
}

impl DayRecord {
    /// Creates an empty record for `day` at revision zero.
    pub fn new(day: NaiveDate) -> DayRecord {
        DayRecord {
            day,
            tasks: Vec::new(),
            morning: String::new(),
            reflection: String::new(),
            mood: String::new(),
            revision: 0,
        }
    }
}
