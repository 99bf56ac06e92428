use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::{DayRecord, RecurUnit, Task};

/// Parses an `HH:MM` time-of-day string into minutes since midnight.
///
/// Returns `None` for anything that is not a valid wall-clock time.
pub fn parse_minutes(time: &str) -> Option<u32> {
    let (h, m) = time.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    if h < 24 && m < 60 {
        Some(h * 60 + m)
    } else {
        None
    }
}

/// Whether `task`'s recurrence rule fires on `date`.
///
/// Non-templates never repeat. Expired rules (`date` strictly after `until`),
/// weekly rules whose weekday set does not contain `date`'s weekday, and
/// rules with an unrecognized unit all degrade to "does not fire" rather
/// than erroring.
pub fn repeats_on(task: &Task, date: NaiveDate) -> bool {
    let Some(rule) = &task.recurring else {
        return false;
    };
    if let Some(until) = rule.until {
        if date > until {
            return false;
        }
    }
    match rule.unit {
        RecurUnit::Day => true,
        RecurUnit::Week => {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            rule.days_of_week.contains(&weekday)
        }
        RecurUnit::Unknown => false,
    }
}

/// Derives the identifier a virtual occurrence of `template` gets on `date`.
///
/// The id is a UUID v5 over the template id and the date, so the same
/// template always materializes with the same id on a given day. Once the
/// occurrence has been saved into that day's explicit list, suppression can
/// match on identity even after the user edits its text or times.
pub fn occurrence_id(template: &Task, date: NaiveDate) -> Uuid {
    let name = format!("{}:{}", template.id, date);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Converts a template match into a concrete occurrence for `date`:
/// derived identity, completion reset, recurrence rule stripped.
///
/// Stripping the rule guarantees an occurrence is never itself treated as a
/// further template.
pub fn materialize(template: &Task, date: NaiveDate) -> Task {
    Task {
        id: occurrence_id(template, date),
        completed: false,
        recurring: None,
        ..template.clone()
    }
}

/// Whether `date`'s explicit list already covers an occurrence of `template`.
///
/// Matches either by derived identity (the occurrence was materialized and
/// saved, possibly edited since) or by value (same text, start and end, the
/// user typed an identical task in by hand).
fn suppressed(explicit: &[Task], template: &Task, date: NaiveDate) -> bool {
    let derived = occurrence_id(template, date);
    explicit.iter().any(|t| {
        t.id == derived
            || (t.text == template.text && t.start == template.start && t.end == template.end)
    })
}

/// Computes the full set of tasks visible on `date`: the tasks explicitly
/// stored on that day plus virtual occurrences of every recurrence template
/// stored on any earlier day.
///
/// Pure and deterministic; performs no I/O and never fails. Virtual
/// occurrences are recomputed on every call and only become permanent when a
/// caller writes them back into the day's explicit list. Output order is not
/// guaranteed; callers sort by start time for display.
pub fn resolve_day(explicit: &[Task], history: &[DayRecord], date: NaiveDate) -> Vec<Task> {
    let mut resolved: Vec<Task> = explicit.to_vec();
    for record in history {
        // Templates only fire strictly after the day they were saved on.
        if record.day >= date {
            continue;
        }
        for task in &record.tasks {
            if !repeats_on(task, date) || suppressed(explicit, task, date) {
                continue;
            }
            let id = occurrence_id(task, date);
            if resolved.iter().any(|t| t.id == id) {
                continue;
            }
            resolved.push(materialize(task, date));
        }
    }
    resolved
}
