//! Terminal output helpers.

use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::CliError;
use crate::OutputFormat;

/// Render rows as a table, JSON or YAML.
pub fn render_data<T: Serialize + Tabled>(
    rows: &[T],
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("  (none)".to_string());
            }
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        _ => render_item(&rows, format),
    }
}

/// Render a single value as JSON or YAML. Tables fall back to JSON.
pub fn render_item<T: Serialize + ?Sized>(
    item: &T,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml_ng::to_string(item).map_err(|e| CliError::output_error(e.to_string()))
        }
        OutputFormat::Json | OutputFormat::Table => {
            serde_json::to_string_pretty(item).map_err(|e| CliError::output_error(e.to_string()))
        }
    }
}

pub fn print_data<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> Result<(), CliError> {
    println!("{}", render_data(rows, format)?);
    Ok(())
}

pub fn print_item<T: Serialize + ?Sized>(item: &T, format: OutputFormat) -> Result<(), CliError> {
    println!("{}", render_item(item, format)?);
    Ok(())
}

pub fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
