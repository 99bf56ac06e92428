use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use dayplan::commands::*;
use dayplan::storage::Store;
use dayplan::tui::run_tui;

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(about = "Terminal daily planner with recurring tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task to a day
    Add {
        /// Task text (quoted if it has spaces)
        text: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Start time in HH:MM
        #[arg(short, long)]
        start: String,
        /// End time in HH:MM
        #[arg(short, long)]
        end: String,
        /// Linked goal
        #[arg(short, long)]
        goal: Option<String>,
        /// Recurrence (daily, weekly, or a full spec like "weekly mon,wed")
        #[arg(short, long)]
        recur: Option<String>,
        /// Weekdays for a weekly rule, e.g. mon,wed,fri
        #[arg(short, long)]
        on: Option<String>,
        /// Interval multiplier (stored, not yet applied to matching)
        #[arg(long)]
        every: Option<u32>,
        /// Last day (inclusive) the rule fires, YYYY-MM-DD
        #[arg(short, long)]
        until: Option<String>,
    },
    /// Show a day's resolved task list and journal fields
    Show {
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Toggle a task's completion by id prefix
    Complete {
        id: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit a task by id prefix
    Edit {
        id: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// New text
        #[arg(short, long)]
        text: Option<String>,
        /// New start time in HH:MM
        #[arg(short, long)]
        start: Option<String>,
        /// New end time in HH:MM
        #[arg(short, long)]
        end: Option<String>,
        /// New linked goal (empty string to clear)
        #[arg(short, long)]
        goal: Option<String>,
        /// New recurrence spec ("none" to clear)
        #[arg(short, long)]
        recur: Option<String>,
        /// Weekdays for a weekly rule
        #[arg(short, long)]
        on: Option<String>,
        /// Interval multiplier
        #[arg(long)]
        every: Option<u32>,
        /// Last day (inclusive) the rule fires
        #[arg(short, long)]
        until: Option<String>,
    },
    /// Remove a task stored on a day
    Remove {
        id: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Set a day's morning intention
    Morning {
        text: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Set a day's evening reflection
    Reflect {
        text: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Set a day's mood note
    Mood {
        text: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Reset the database (delete all planner days)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    let store = Store::open();
    match cli.command {
        Some(Commands::Add { text, date, start, end, goal, recur, on, every, until }) => {
            cmd_add(&store, text, date, start, end, goal, recur, on, every, until, false)
        }
        Some(Commands::Show { date }) => cmd_show(&store, date),
        Some(Commands::Complete { id, date }) => cmd_complete(&store, id, date, false),
        Some(Commands::Edit { id, date, text, start, end, goal, recur, on, every, until }) => {
            cmd_edit(&store, id, date, text, start, end, goal, recur, on, every, until, false)
        }
        Some(Commands::Remove { id, date }) => cmd_remove(&store, id, date, false),
        Some(Commands::Morning { text, date }) => cmd_morning(&store, text, date, false),
        Some(Commands::Reflect { text, date }) => cmd_reflect(&store, text, date, false),
        Some(Commands::Mood { text, date }) => cmd_mood(&store, text, date, false),
        Some(Commands::Reset { force }) => cmd_reset(&store, force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "dayplan", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(store) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
