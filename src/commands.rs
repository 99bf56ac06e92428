use std::io::{self, Write};

use chrono::{Datelike, Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{DayRecord, RecurUnit, Recurrence, Task};
use crate::recurrence::{parse_minutes, resolve_day};
use crate::storage::Store;

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today.
fn resolve_date(date: &Option<String>, silent: bool) -> Option<NaiveDate> {
    match date {
        None => Some(Local::now().date_naive()),
        Some(d) => match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                if !silent {
                    eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e);
                }
                None
            }
        },
    }
}

/// Parses a comma-separated weekday list (`mon,wed,fri` or `1,3,5`) into
/// indices 0 (Sunday) through 6 (Saturday).
pub fn parse_weekdays(list: &str) -> Result<Vec<u8>, String> {
    let mut days = Vec::new();
    for token in list.split(',') {
        let day = match token.trim().to_lowercase().as_str() {
            "sun" | "sunday" | "0" => 0,
            "mon" | "monday" | "1" => 1,
            "tue" | "tuesday" | "2" => 2,
            "wed" | "wednesday" | "3" => 3,
            "thu" | "thursday" | "4" => 4,
            "fri" | "friday" | "5" => 5,
            "sat" | "saturday" | "6" => 6,
            other => return Err(format!("unknown weekday '{}'", other)),
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Parses a one-line recurrence spec into a rule.
///
/// Grammar: `none` | `[every N] (daily|weekly) [DAYS] [until YYYY-MM-DD]`,
/// where `DAYS` is a comma-separated weekday list. A weekly rule with no day
/// list defaults to `day`'s weekday. An empty spec means no recurrence.
pub fn parse_recur_spec(spec: &str, day: NaiveDate) -> Result<Option<Recurrence>, String> {
    let mut tokens = spec.split_whitespace().peekable();
    let Some(first) = tokens.peek().copied() else {
        return Ok(None);
    };
    if first.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let mut interval = 1u32;
    if first.eq_ignore_ascii_case("every") {
        tokens.next();
        let n = tokens.next().ok_or("expected a number after 'every'")?;
        interval = n.parse().map_err(|_| format!("invalid interval '{}'", n))?;
        if interval == 0 {
            return Err("interval must be positive".to_string());
        }
    }
    let unit_token = tokens.next().ok_or("expected 'daily' or 'weekly'")?;
    let unit = match unit_token.to_lowercase().as_str() {
        "daily" | "day" => RecurUnit::Day,
        "weekly" | "week" => RecurUnit::Week,
        other => {
            return Err(format!(
                "unknown recurrence '{}'. Supported: daily, weekly.",
                other
            ))
        }
    };
    let mut days_of_week = Vec::new();
    let mut until = None;
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case("until") {
            let d = tokens.next().ok_or("expected a date after 'until'")?;
            let date = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| format!("invalid until date '{}': {}", d, e))?;
            until = Some(date);
        } else {
            days_of_week = parse_weekdays(token)?;
        }
    }
    if unit == RecurUnit::Week && days_of_week.is_empty() {
        days_of_week.push(day.weekday().num_days_from_sunday() as u8);
    }
    Ok(Some(Recurrence {
        interval,
        unit,
        days_of_week,
        until,
    }))
}

/// Builds a recurrence rule from the CLI flags: the `--recur` spec string
/// plus optional `--on` / `--every` / `--until` overrides.
pub fn build_rule(
    recur: &str,
    on: Option<&str>,
    every: Option<u32>,
    until: Option<&str>,
    day: NaiveDate,
) -> Result<Option<Recurrence>, String> {
    let mut rule = parse_recur_spec(recur, day)?;
    if let Some(rule) = rule.as_mut() {
        if let Some(on) = on {
            rule.days_of_week = parse_weekdays(on)?;
        }
        if let Some(n) = every {
            if n == 0 {
                return Err("interval must be positive".to_string());
            }
            rule.interval = n;
        }
        if let Some(u) = until {
            let date = NaiveDate::parse_from_str(u, "%Y-%m-%d")
                .map_err(|e| format!("invalid until date '{}': {}", u, e))?;
            rule.until = Some(date);
        }
    }
    Ok(rule)
}

/// Finds a task in the resolved day by id prefix.
fn find_task(tasks: &[Task], prefix: &str, silent: bool) -> Option<Task> {
    let prefix = prefix.to_lowercase();
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.to_string().starts_with(&prefix))
        .collect();
    match matches.len() {
        0 => {
            if !silent {
                eprintln!("No task matching id '{}'.", prefix);
            }
            None
        }
        1 => Some(matches[0].clone()),
        n => {
            if !silent {
                eprintln!("Id '{}' is ambiguous ({} matches). Give more characters.", prefix, n);
            }
            None
        }
    }
}

/// Writes `task` into the day's explicit list, replacing an existing entry
/// with the same id or appending it. Appending is how a virtual occurrence
/// becomes permanent on first touch.
fn touch(record: &mut DayRecord, task: Task) {
    if let Some(existing) = record.tasks.iter_mut().find(|t| t.id == task.id) {
        *existing = task;
    } else {
        record.tasks.push(task);
    }
}

/// Adds a new task to a day. With a recurrence spec the task is saved as a
/// template on that day and will spawn occurrences on later matching days.
pub fn cmd_add(
    store: &Store,
    text: String,
    date: Option<String>,
    start: String,
    end: String,
    goal: Option<String>,
    recur: Option<String>,
    on: Option<String>,
    every: Option<u32>,
    until: Option<String>,
    silent: bool,
) {
    let Some(day) = resolve_date(&date, silent) else {
        return;
    };
    for time in [&start, &end] {
        if parse_minutes(time).is_none() {
            if !silent {
                eprintln!("Invalid time '{}'. Use HH:MM.", time);
            }
            return;
        }
    }
    let rule = match &recur {
        None => None,
        Some(spec) => match build_rule(spec, on.as_deref(), every, until.as_deref(), day) {
            Ok(rule) => rule,
            Err(e) => {
                if !silent {
                    eprintln!("Invalid recurrence: {}", e);
                }
                return;
            }
        },
    };

    let mut record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let mut task = Task::new(text, start, end);
    task.goal_id = goal;
    task.recurring = rule;
    let id = task.id;
    record.tasks.push(task);
    if let Err(e) = store.upsert_day(&record) {
        if !silent {
            eprintln!("Failed to save day: {}", e);
        }
    } else if !silent {
        println!("Task added on {} (id = {})", day, &id.to_string()[..8]);
    }
}

/// Shows the resolved day: explicit tasks plus virtual occurrences from
/// earlier templates, in a table sorted by start time.
pub fn cmd_show(store: &Store, date: Option<String>) {
    let Some(day) = resolve_date(&date, false) else {
        return;
    };
    let record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let history = store.load_history(day);
    let mut tasks = resolve_day(&record.tasks, &history, day);
    tasks.sort_by_key(|t| parse_minutes(&t.start).unwrap_or(u32::MAX));

    println!("{}", day.format("%Y-%m-%d (%a)"));
    if !record.morning.is_empty() {
        println!("Morning: {}", record.morning);
    }
    if !record.mood.is_empty() {
        println!("Mood: {}", record.mood);
    }

    if tasks.is_empty() {
        println!("No tasks for {}.", day);
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Time").add_attribute(Attribute::Bold),
                Cell::new("Task").add_attribute(Attribute::Bold),
                Cell::new("Goal").add_attribute(Attribute::Bold),
                Cell::new("Recurs").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
            ]);

        for t in tasks {
            let status = if t.completed { "Done" } else { "Pending" };
            let status_color = if t.completed { Color::Green } else { Color::Yellow };
            let recurs = t
                .recurring
                .as_ref()
                .map(|r| r.describe())
                .unwrap_or_default();

            table.add_row(vec![
                Cell::new(&t.id.to_string()[..8]),
                Cell::new(format!("{} - {}", t.start, t.end)),
                Cell::new(&t.text),
                Cell::new(t.goal_id.unwrap_or_default()),
                Cell::new(recurs).fg(Color::Cyan),
                Cell::new(status).fg(status_color),
            ]);
        }
        println!("{table}");
    }

    if !record.reflection.is_empty() {
        println!("Reflection: {}", record.reflection);
    }
}

/// Toggles completion of a task on a day, by id prefix.
///
/// Works on virtual occurrences too: the first touch writes the occurrence
/// into the day's explicit list, after which duplicate suppression keeps a
/// second virtual copy from appearing.
pub fn cmd_complete(store: &Store, id: String, date: Option<String>, silent: bool) {
    let Some(day) = resolve_date(&date, silent) else {
        return;
    };
    let mut record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let history = store.load_history(day);
    let resolved = resolve_day(&record.tasks, &history, day);
    let Some(mut task) = find_task(&resolved, &id, silent) else {
        return;
    };
    task.completed = !task.completed;
    let done = task.completed;
    let short = task.id.to_string()[..8].to_string();
    touch(&mut record, task);
    if let Err(e) = store.upsert_day(&record) {
        if !silent {
            eprintln!("Failed to save day: {}", e);
        }
    } else if !silent {
        if done {
            println!("Task {} marked as complete.", short);
        } else {
            println!("Task {} reopened.", short);
        }
    }
}

/// Edits a task's fields on a day, by id prefix. Editing a virtual
/// occurrence persists it, edited, into the day's explicit list.
pub fn cmd_edit(
    store: &Store,
    id: String,
    date: Option<String>,
    text: Option<String>,
    start: Option<String>,
    end: Option<String>,
    goal: Option<String>,
    recur: Option<String>,
    on: Option<String>,
    every: Option<u32>,
    until: Option<String>,
    silent: bool,
) {
    let Some(day) = resolve_date(&date, silent) else {
        return;
    };
    let mut record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let history = store.load_history(day);
    let resolved = resolve_day(&record.tasks, &history, day);
    let Some(mut task) = find_task(&resolved, &id, silent) else {
        return;
    };

    if let Some(t) = text {
        task.text = t;
    }
    if let Some(s) = start {
        if parse_minutes(&s).is_none() {
            if !silent {
                eprintln!("Invalid time '{}'. Use HH:MM.", s);
            }
            return;
        }
        task.start = s;
    }
    if let Some(e) = end {
        if parse_minutes(&e).is_none() {
            if !silent {
                eprintln!("Invalid time '{}'. Use HH:MM.", e);
            }
            return;
        }
        task.end = e;
    }
    if let Some(g) = goal {
        task.goal_id = if g.is_empty() { None } else { Some(g) };
    }
    if let Some(spec) = recur {
        match build_rule(&spec, on.as_deref(), every, until.as_deref(), day) {
            Ok(rule) => task.recurring = rule,
            Err(e) => {
                if !silent {
                    eprintln!("Invalid recurrence: {}", e);
                }
                return;
            }
        }
    }

    let short = task.id.to_string()[..8].to_string();
    touch(&mut record, task);
    if let Err(e) = store.upsert_day(&record) {
        if !silent {
            eprintln!("Failed to save day: {}", e);
        }
    } else if !silent {
        println!("Task {} updated.", short);
    }
}

/// Removes a task explicitly stored on a day.
///
/// Virtual occurrences are not stored on the day being viewed and cannot be
/// removed here; the template on its original day has to be edited instead.
pub fn cmd_remove(store: &Store, id: String, date: Option<String>, silent: bool) {
    let Some(day) = resolve_date(&date, silent) else {
        return;
    };
    let mut record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let Some(task) = find_task(&record.tasks, &id, true) else {
        let history = store.load_history(day);
        let resolved = resolve_day(&record.tasks, &history, day);
        if !silent {
            if find_task(&resolved, &id, true).is_some() {
                eprintln!(
                    "Task '{}' repeats from an earlier day. Edit its template (--recur none) to stop it.",
                    id
                );
            } else {
                eprintln!("No task matching id '{}'.", id);
            }
        }
        return;
    };
    record.tasks.retain(|t| t.id != task.id);
    if let Err(e) = store.upsert_day(&record) {
        if !silent {
            eprintln!("Failed to save day: {}", e);
        }
    } else if !silent {
        println!("Task {} removed.", &task.id.to_string()[..8]);
    }
}

fn set_day_field(
    store: &Store,
    date: Option<String>,
    silent: bool,
    label: &str,
    apply: impl FnOnce(&mut DayRecord),
) {
    let Some(day) = resolve_date(&date, silent) else {
        return;
    };
    let mut record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    apply(&mut record);
    if let Err(e) = store.upsert_day(&record) {
        if !silent {
            eprintln!("Failed to save day: {}", e);
        }
    } else if !silent {
        println!("{} saved for {}.", label, day);
    }
}

/// Sets the day's morning intention.
pub fn cmd_morning(store: &Store, text: String, date: Option<String>, silent: bool) {
    set_day_field(store, date, silent, "Morning intention", |r| r.morning = text);
}

/// Sets the day's evening reflection.
pub fn cmd_reflect(store: &Store, text: String, date: Option<String>, silent: bool) {
    set_day_field(store, date, silent, "Reflection", |r| r.reflection = text);
}

/// Sets the day's mood note.
pub fn cmd_mood(store: &Store, text: String, date: Option<String>, silent: bool) {
    set_day_field(store, date, silent, "Mood", |r| r.mood = text);
}

/// Resets the database by deleting all day records.
pub fn cmd_reset(store: &Store, force: bool) {
    if !force {
        print!("Are you sure you want to delete all planner days? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = store.delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
