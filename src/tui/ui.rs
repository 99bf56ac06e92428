use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use super::app::{App, InputField, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Morning / mood
            Constraint::Min(0),    // Task table
            Constraint::Length(4), // Reflection
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let title = format!("Dayplan - {}", app.selected_date.format("%Y-%m-%d (%a)"));
    let header_text = format!(
        "Morning: {}\nMood: {}",
        app.record.morning, app.record.mood
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(header, chunks[0]);

    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::Green)
            } else if t.recurring.is_some() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(t.id.to_string()[..8].to_string()),
                Cell::from(t.start.clone()),
                Cell::from(t.end.clone()),
                Cell::from(t.text.clone()),
                Cell::from(t.goal_id.clone().unwrap_or_default()),
                Cell::from(t.recurring.as_ref().map(|r| r.describe()).unwrap_or_default()),
                Cell::from(if t.completed { "Done" } else { "Pending" }),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(22),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Start", "End", "Task", "Goal", "Recurs", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let reflection = Paragraph::new(app.record.reflection.as_str())
        .block(Block::default().borders(Borders::ALL).title("Reflection"));
    f.render_widget(reflection, chunks[2]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | Left/Right: Day | t: Today | a: Add | Space: Done | d: Del | n: Text | s: Start | e: End | g: Goal | r: Recur | m: Morning | f: Reflect | o: Mood",
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[3]);

    // Render Input Box if needed
    match app.input_mode {
        InputMode::Editing | InputMode::Adding => {
            let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
            f.render_widget(Clear, area); // Clear the area first

            let title = match app.input_mode {
                InputMode::Adding => match app.add_state.step {
                    0 => "Add Task: Enter Text",
                    1 => "Add Task: Enter Start Time (HH:MM)",
                    2 => "Add Task: Enter End Time (HH:MM)",
                    3 => "Add Task: Recurrence (daily/weekly, blank for none)",
                    4 => "Add Task: Weekdays (e.g. mon,wed; blank for this weekday)",
                    5 => "Add Task: Repeat Until (YYYY-MM-DD, blank for no end)",
                    _ => "Add Task",
                },
                InputMode::Editing => match app.input_field {
                    InputField::Text => "Edit Text",
                    InputField::Start => "Edit Start Time (HH:MM)",
                    InputField::End => "Edit End Time (HH:MM)",
                    InputField::Goal => "Edit Goal (blank to clear)",
                    InputField::Recur => "Edit Recurrence ('none' to clear)",
                    InputField::Morning => "Edit Morning Intention",
                    InputField::Reflection => "Edit Reflection",
                    InputField::Mood => "Edit Mood",
                    _ => "Edit",
                },
                _ => "",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
