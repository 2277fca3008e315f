// Output formatting utilities

use crate::models::{Priority, ReferenceItem, Stage};
use crate::stages::{Notice, NoticeLevel, Notifier, ReferenceData};
use crate::utils::date::format_date;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

const MIN_TITLE_WIDTH: usize = 10;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

fn paint(text: &str, color: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", color, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Prints notices the way toasts would appear: one line each,
/// errors on stderr.
pub struct ConsoleNotifier {
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", paint(&notice.message, ANSI_FG_GREEN, self.color)),
            NoticeLevel::Info => println!("{}", paint(&notice.message, ANSI_FG_CYAN, self.color)),
            NoticeLevel::Error => eprintln!("{}", paint(&notice.message, ANSI_FG_RED, self.color)),
        }
    }

    /// Progress line on stderr, only when attached to a terminal
    fn loading(&self, subject: &str) {
        if let Some(line) = loading_line(subject, self.color) {
            eprintln!("{}", line);
        }
    }
}

fn loading_line(subject: &str, interactive: bool) -> Option<String> {
    interactive.then(|| paint(&format!("Loading {}...", subject), ANSI_FG_YELLOW, true))
}

/// Truncate to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => ANSI_FG_RED,
        Priority::Medium => ANSI_FG_YELLOW,
        Priority::Low => ANSI_FG_BRIGHT_BLACK,
    }
}

/// Keep the stages matching the optional priority and status filters.
/// Filtering is for display only; order values are left as they are.
pub fn filter_stages<'a>(
    stages: &'a [Stage],
    priority: Option<Priority>,
    status_id: Option<&str>,
) -> Vec<&'a Stage> {
    stages
        .iter()
        .filter(|s| priority.map_or(true, |p| s.priority == p))
        .filter(|s| status_id.map_or(true, |id| s.status_id == id))
        .collect()
}

/// Format stages as a table sized to the terminal
pub fn format_stage_table(stages: &[&Stage], refs: &ReferenceData, width: usize, is_tty: bool) -> String {
    if stages.is_empty() {
        return "No stages.".to_string();
    }

    let headers = ["#", "ID", "Title", "Status", "Type", "Priority", "Progress", "Start", "End"];
    let rows: Vec<[String; 9]> = stages
        .iter()
        .map(|s| {
            [
                s.order.to_string(),
                s.id.clone(),
                s.title.clone(),
                refs.status_label(&s.status_id).to_string(),
                refs.stage_type_label(&s.stage_type_id).to_string(),
                s.priority.as_str().to_string(),
                format!("{}%", s.progress_percent),
                format_date(s.start_date),
                format_date(s.end_date),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    // Give the title whatever the other columns leave over
    let others: usize = widths
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .map(|(_, w)| w + 1)
        .sum();
    let available = width.saturating_sub(others + 1).max(MIN_TITLE_WIDTH);
    widths[2] = widths[2].min(available);

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect();
    let header_line = header_line.join(" ");
    out.push_str(&paint(header_line.trim_end(), ANSI_BOLD, is_tty));
    out.push('\n');

    for (stage, row) in stages.iter().zip(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = pad(&truncate(cell, widths[i]), widths[i]);
                if i == 5 {
                    paint(&text, priority_color(stage.priority), is_tty)
                } else {
                    text
                }
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    out
}

/// Format the detail view of a single stage
pub fn format_stage_summary(stage: &Stage, refs: &ReferenceData) -> String {
    let description = if stage.description.trim().is_empty() {
        "-"
    } else {
        stage.description.as_str()
    };
    let mut out = String::new();
    out.push_str(&format!("Stage {}: {}\n", stage.id, stage.title));
    out.push_str(&format!("  Order:       {}\n", stage.order));
    out.push_str(&format!("  Status:      {}\n", refs.status_label(&stage.status_id)));
    out.push_str(&format!("  Type:        {}\n", refs.stage_type_label(&stage.stage_type_id)));
    out.push_str(&format!("  Priority:    {}\n", stage.priority.as_str()));
    out.push_str(&format!("  Progress:    {}%\n", stage.progress_percent));
    out.push_str(&format!("  Start:       {}\n", format_date(stage.start_date)));
    out.push_str(&format!("  End:         {}\n", format_date(stage.end_date)));
    out.push_str(&format!("  Description: {}\n", description));
    out
}

/// Format a reference enumeration as an id/description listing
pub fn format_reference_table(items: &[ReferenceItem]) -> String {
    if items.is_empty() {
        return "No entries.".to_string();
    }
    let id_width = items
        .iter()
        .map(|i| i.id.chars().count())
        .max()
        .unwrap_or(2)
        .max(2);
    let mut out = format!("{} Description\n", pad("ID", id_width));
    for item in items {
        out.push_str(&format!("{} {}\n", pad(&item.id, id_width), item.description));
    }
    out
}
