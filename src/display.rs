//! Terminal rendering of the countdown

use colored::Colorize;
use prettytable::{color, format, Attr, Cell, Row, Table};

use crate::time::RemainingDuration;

/// Left-pad a value to at least two digits
///
/// Values with more than two digits are left as they are.
pub fn pad2(value: u64) -> String {
    format!("{:02}", value)
}

/// Single-line `DD:HH:MM:SS` rendering, suitable for redrawing in place
pub fn inline(remaining: &RemainingDuration) -> String {
    remaining
        .units()
        .iter()
        .map(|unit| pad2(unit.value))
        .collect::<Vec<_>>()
        .join(":")
}

/// The four unit blocks, values over labels
pub fn table(remaining: &RemainingDuration) -> Table {
    let units = remaining.units();

    let mut table = Table::new();

    table.add_row(Row::new(
        units
            .iter()
            .map(|unit| {
                Cell::new(&pad2(unit.value))
                    .style_spec("c")
                    .with_style(Attr::Bold)
                    .with_style(Attr::ForegroundColor(color::YELLOW))
            })
            .collect(),
    ));
    table.add_row(Row::new(
        units
            .iter()
            .map(|unit| Cell::new(unit.label).style_spec("c").with_style(Attr::Dim))
            .collect(),
    ));
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table
}

/// Line shown while watching the countdown
pub fn status_line(title: &str, remaining: &RemainingDuration) -> String {
    if remaining.is_zero() {
        format!("{} {}", title.bold(), "We're live!".green().bold())
    } else {
        format!("{} {}", title.bold(), inline(remaining).yellow())
    }
}
