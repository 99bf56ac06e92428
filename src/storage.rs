use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::PlannerError;
use crate::models::DayRecord;

/// Handle to the on-disk day store. Constructed once and passed to whatever
/// needs it; commands and the TUI never open their own.
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens the default store.
    ///
    /// The path is determined in the following order:
    /// 1. `DAYPLAN_DB` environment variable.
    /// 2. `~/.local/share/dayplan/days.json` (on Linux).
    /// 3. `./days.json` (fallback).
    pub fn open() -> Store {
        let path = std::env::var("DAYPLAN_DB").map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("dayplan");
            if !p.exists() {
                let _ = fs::create_dir_all(&p);
            }
            p.push("days.json");
            p
        });
        Store { path }
    }

    /// Opens a store at an explicit path. Used by tests.
    pub fn at(path: impl Into<PathBuf>) -> Store {
        Store { path: path.into() }
    }

    /// Loads every day record from the storage file.
    ///
    /// Returns an empty vector if the file does not exist or cannot be read.
    pub fn load_days(&self) -> Vec<DayRecord> {
        if !self.path.exists() {
            return Vec::new();
        }
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };
        let mut s = String::new();
        if f.read_to_string(&mut s).is_err() {
            return Vec::new();
        }
        serde_json::from_str(&s).unwrap_or_else(|_| Vec::new())
    }

    /// Loads the single record for `day`, if one has been saved.
    pub fn load_day(&self, day: NaiveDate) -> Option<DayRecord> {
        self.load_days().into_iter().find(|r| r.day == day)
    }

    /// Loads every record dated strictly before `day`. This is the resolver's
    /// historical input; templates saved on these days may fire on `day`.
    pub fn load_history(&self, day: NaiveDate) -> Vec<DayRecord> {
        self.load_days().into_iter().filter(|r| r.day < day).collect()
    }

    /// Writes `record` back wholesale, keyed by its date.
    ///
    /// The record's `revision` must match the stored one (zero for a day not
    /// yet on disk); otherwise the write is rejected with `StaleWrite` and
    /// the caller should reload and retry. On success the stored revision is
    /// bumped by one.
    pub fn upsert_day(&self, record: &DayRecord) -> Result<(), PlannerError> {
        let mut days = self.load_days();
        let mut stored = record.clone();
        stored.revision = record.revision + 1;
        match days.iter().position(|r| r.day == record.day) {
            Some(i) => {
                if days[i].revision != record.revision {
                    return Err(PlannerError::StaleWrite {
                        day: record.day,
                        expected: record.revision,
                        found: days[i].revision,
                    });
                }
                days[i] = stored;
            }
            None => {
                if record.revision != 0 {
                    return Err(PlannerError::StaleWrite {
                        day: record.day,
                        expected: record.revision,
                        found: 0,
                    });
                }
                days.push(stored);
            }
        }
        self.save_days(&days)
    }

    /// Saves the given list of day records to the storage file.
    ///
    /// Overwrites the existing file.
    fn save_days(&self, days: &[DayRecord]) -> Result<(), PlannerError> {
        let s = serde_json::to_string_pretty(days)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Deletes the planner database file.
    pub fn delete_database(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
