//! CLI output formatting
//!
//! Provides colored output, spinners, and formatting utilities.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::platform::PrStatus;

/// Output helper for consistent CLI formatting
pub struct Output;

impl Output {
    /// Disable ANSI colors for the rest of the process (`NO_COLOR`)
    pub fn disable_colors() {
        colored::control::set_override(false);
    }

    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print an action that dry-run mode did not perform
    pub fn dry_run(message: &str) {
        println!("{} {}", "[dry-run]".cyan().bold(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!("\n{}", message.bold());
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!("  {}", message.dimmed());
    }

    /// Print a key-value pair
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", key.dimmed(), value);
    }

    /// Print a list item
    pub fn list_item(item: &str) {
        println!("  • {}", item);
    }

    /// Create a spinner with a message
    pub fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("hardcoded template must be valid")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Format a repo name consistently
    pub fn repo_name(name: &str) -> String {
        name.cyan().bold().to_string()
    }

    /// Format a branch name consistently
    pub fn branch_name(name: &str) -> String {
        name.magenta().to_string()
    }

    /// Format a PR status
    pub fn pr_status(status: PrStatus) -> String {
        let text = status.to_string();
        match status {
            PrStatus::Open => text.green().to_string(),
            PrStatus::Merged => text.magenta().to_string(),
            PrStatus::Closed => text.red().to_string(),
            PrStatus::None => text.dimmed().to_string(),
        }
    }
}

/// Table builder for formatted output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with headers
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| h.len()).collect();
        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.column_widths.len() {
                self.column_widths[i] = self.column_widths[i].max(cell.chars().count());
            }
        }
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as lines (header, separator, rows)
    pub fn render(&self) -> Vec<String> {
        let pad = |cell: &str, width: usize| format!("{:width$}", cell, width = width);

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(
            self.headers
                .iter()
                .enumerate()
                .map(|(i, h)| pad(h, self.column_widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string(),
        );
        lines.push(
            self.column_widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let width = self.column_widths.get(i).copied().unwrap_or(cell.len());
                        pad(cell, width)
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string(),
            );
        }
        lines
    }

    /// Print the table, indented under the current section
    pub fn print(&self) {
        let lines = self.render();
        for (i, line) in lines.iter().enumerate() {
            match i {
                0 => println!("    {}", line.bold()),
                1 => println!("    {}", line.dimmed()),
                _ => println!("    {}", line),
            }
        }
    }
}
