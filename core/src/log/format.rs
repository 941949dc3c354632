use crossterm::style::Stylize;

use super::{Level, LogMessage};

pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Render a message as a single diagnostic line, newline included.
pub fn format_line(msg: &LogMessage, color: bool) -> String {
    let mut line = format!(
        "[{}] {} {}",
        msg.time.format(TIME_FORMAT),
        level_text(msg.level, color),
        msg.message
    );
    for (key, value) in &msg.tags {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(value);
    }
    line.push('\n');
    line
}

fn level_text(level: Level, color: bool) -> String {
    let text = level.as_str();
    if !color {
        return text.to_string();
    }
    match level {
        Level::Error => text.red().bold().to_string(),
        Level::Warning => text.yellow().bold().to_string(),
        Level::Info => text.bold().to_string(),
        Level::Debug => text.cyan().to_string(),
    }
}
