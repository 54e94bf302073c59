// Output formatting for CLI

use std::io::{self, Write};

use super::OutputFormat;
use super::CliResult;

/// Format and output results
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Output one result record
    pub fn output_record(&self, record: &serde_json::Value, writer: &mut impl Write) -> CliResult<()> {
        match self.format {
            OutputFormat::Pretty => self.output_key_value(record, writer, 0)?,
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(record)?)?,
        }
        Ok(())
    }

    /// Output as indented key-value pairs
    fn output_key_value(&self, value: &serde_json::Value, writer: &mut impl Write, depth: usize) -> CliResult<()> {
        let indent = "  ".repeat(depth);
        if let Some(obj) = value.as_object() {
            for (key, value) in obj {
                if value.is_object() {
                    writeln!(writer, "{}{}:", indent, key)?;
                    self.output_key_value(value, writer, depth + 1)?;
                } else {
                    writeln!(writer, "{}{}: {}", indent, key, self.format_value(value))?;
                }
            }
        }
        Ok(())
    }

    /// Format a JSON value for display
    fn format_value(&self, value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "(none)".to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Array(arr) => format!("[{} items]", arr.len()),
            serde_json::Value::Object(obj) => format!("{{{} items}}", obj.len()),
        }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet && !self.is_json() {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print a progress or timing line to stderr, keeping stdout for results
    pub fn print_status(&self, message: &str) {
        let _ = self.write_status(message, &mut io::stderr());
    }

    fn write_status(&self, message: &str, writer: &mut impl Write) -> io::Result<()> {
        if !self.quiet && !self.is_json() {
            writeln!(writer, "{}", message)?;
        }
        Ok(())
    }
}
