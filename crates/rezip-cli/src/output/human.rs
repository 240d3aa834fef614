//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use rezip_core::ListingEntry;
use rezip_core::SaveReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    /// One `name [location]` line; staged entries are highlighted.
    fn listing_line(&self, entry: &ListingEntry) -> String {
        if self.use_colors && entry.origin.is_staged() {
            format!(
                "{} [{}]",
                style(&entry.name).cyan(),
                entry.origin.location()
            )
        } else {
            format!("{} [{}]", entry.name, entry.origin.location())
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_listing(&self, archive: &Path, entries: &[ListingEntry]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            self.term.write_line(&self.listing_line(entry))?;
        }

        if self.verbose {
            let staged = entries.iter().filter(|e| e.origin.is_staged()).count();
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries ({} staged) from {}",
                Self::format_number(entries.len()),
                Self::format_number(staged),
                archive.display()
            ));
        }

        Ok(())
    }

    fn format_save_result(&self, output_path: &Path, report: &SaveReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive written: {}",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Archive written: {}", output_path.display()));
        }

        let _ = self.term.write_line(&format!(
            "  Entries copied:   {}",
            Self::format_number(report.entries_copied)
        ));
        let _ = self.term.write_line(&format!(
            "  Entries replaced: {}",
            Self::format_number(report.entries_replaced)
        ));
        let _ = self.term.write_line(&format!(
            "  Entries added:    {}",
            Self::format_number(report.entries_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Entries removed:  {}",
            Self::format_number(report.entries_removed)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Bytes streamed:   {}",
                Self::format_size(report.bytes_streamed)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
