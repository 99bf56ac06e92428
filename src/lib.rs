//! # Dayplan
//!
//! A terminal daily planner written in Rust. Dayplan keeps one record per
//! calendar day — a task list plus morning intention, evening reflection and
//! mood — and supports recurring tasks: a task saved with a recurrence rule
//! becomes a template that re-appears on later matching days until you touch
//! it, complete it, or let it expire.
//!
//! ## Features
//!
//! *   **Recurring tasks**: daily or weekly rules with weekday selection and
//!     an optional end date. Occurrences are computed on view, never stored
//!     until you interact with them.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive single-day dashboard.
//! *   **Day journal**: morning intention, evening reflection and mood per day.
//! *   **Data Persistence**: days are stored in standard XDG data directories
//!     (JSON format), with stale concurrent writes rejected by a per-day
//!     revision counter.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Simply run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! dayplan
//! # or explicitly
//! dayplan ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `Left`/`Right`: Previous / next day, `t`: Today
//! *   `j`/`k`: Select task
//! *   `a`: Add task (wizard), `Space`: Toggle done, `d`: Delete
//! *   `n`: Edit text, `s`: Start time, `e`: End time, `g`: Goal, `r`: Recurrence
//! *   `m`: Morning intention, `f`: Reflection, `o`: Mood
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # One-off task for today
//! dayplan add "Write report" --start 09:00 --end 10:30
//!
//! # Recurring task: every Monday and Wednesday until June
//! dayplan add "Gym" --start 07:00 --end 08:00 \
//!     --recur weekly --on mon,wed --until 2026-06-01
//!
//! # Show a day (explicit tasks plus recurring occurrences)
//! dayplan show --date 2026-01-05
//!
//! # Toggle completion by id prefix
//! dayplan complete 3fa85f64
//!
//! # Journal fields
//! dayplan morning "Deep work before lunch"
//! dayplan reflect "Good day, gym done"
//! dayplan mood "calm"
//! ```
//!
//! ## Data Storage
//!
//! Days are saved in your local data directory:
//! *   Linux: `~/.local/share/dayplan/days.json`
//! *   macOS: `~/Library/Application Support/dayplan/days.json`
//! *   Windows: `%APPDATA%\dayplan\days.json`
//!
//! You can override this by setting the `DAYPLAN_DB` environment variable.
//!
//! ## Recurrence
//!
//! A rule is written as `[every N] (daily|weekly) [DAYS] [until YYYY-MM-DD]`,
//! e.g. `daily`, `weekly mon,wed,fri`, `weekly sat until 2026-06-01`. The
//! `every N` multiplier is stored and displayed but not yet applied when
//! matching: a `every 2 weekly` rule currently fires every week.

pub mod commands;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod storage;
pub mod tui;
