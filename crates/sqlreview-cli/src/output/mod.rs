//! Output formatting

use sqlreview_core::{Advice, Status};

use crate::args::OutputFormat;

/// Output formatter for review findings
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print a review report in the configured format
    pub fn print_advice(&self, advice: &[Advice]) {
        match self.format {
            OutputFormat::Human => self.print_human(advice),
            OutputFormat::Json => self.print_json(advice),
        }
    }

    fn print_human(&self, advice: &[Advice]) {
        for item in advice {
            let status_str = match item.status {
                Status::Error => "\x1b[31merror\x1b[0m",
                Status::Warning => "\x1b[33mwarning\x1b[0m",
                Status::Success => "\x1b[32mok\x1b[0m",
            };

            if item.status == Status::Success {
                eprintln!("{}[{}]", status_str, item.code.name());
                continue;
            }

            eprintln!("{}[{}]: {}", status_str, item.code.name(), item.title);
            if item.line > 0 {
                eprintln!("  --> {}:{}", self.file_name, item.line);
            }
            eprintln!("   = {}", item.content);
            eprintln!();
        }
    }

    fn print_json(&self, advice: &[Advice]) {
        let output = serde_json::json!({
            "file": self.file_name,
            "advice": advice,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: failed to serialize report: {}", e),
        }
    }
}
