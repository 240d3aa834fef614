//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use rezip_core::ListingEntry;
use rezip_core::SaveReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct EntryOutput<'a> {
    name: &'a str,
    staged: bool,
    source: &'a str,
}

impl<'a> From<&'a ListingEntry> for EntryOutput<'a> {
    fn from(entry: &'a ListingEntry) -> Self {
        Self {
            name: &entry.name,
            staged: entry.origin.is_staged(),
            source: entry.origin.location(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_listing(&self, archive: &Path, entries: &[ListingEntry]) -> Result<()> {
        #[derive(Serialize)]
        struct ListingOutput<'a> {
            archive: String,
            total_entries: usize,
            entries: Vec<EntryOutput<'a>>,
        }

        let data = ListingOutput {
            archive: archive.display().to_string(),
            total_entries: entries.len(),
            entries: entries.iter().map(EntryOutput::from).collect(),
        };

        let output = JsonOutput::success("list", data);
        Self::output(&output)
    }

    fn format_save_result(&self, output_path: &Path, report: &SaveReport) -> Result<()> {
        #[derive(Serialize)]
        struct SaveOutput {
            output_path: String,
            entries_copied: usize,
            entries_replaced: usize,
            entries_added: usize,
            entries_removed: usize,
            total_entries: usize,
            bytes_streamed: u64,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = SaveOutput {
            output_path: output_path.display().to_string(),
            entries_copied: report.entries_copied,
            entries_replaced: report.entries_replaced,
            entries_added: report.entries_added,
            entries_removed: report.entries_removed,
            total_entries: report.total_entries(),
            bytes_streamed: report.bytes_streamed,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        let output = JsonOutput::success("modify", data);
        Self::output(&output)
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        // stdout carries exactly one JSON document per run
        let output = JsonOutput::warning("warning", WarningData { message });
        if let Ok(json) = serde_json::to_string(&output) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}
