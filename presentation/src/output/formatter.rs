//! Output formatter trait

use sideview_domain::{AnalysisRun, OutputFormat};

/// Trait for formatting analysis runs
pub trait OutputFormatter {
    /// Scores, comments and summary for every persona
    fn format(&self, run: &AnalysisRun) -> String;

    /// Format as JSON
    fn format_json(&self, run: &AnalysisRun) -> String;

    /// One line per persona
    fn format_summary(&self, run: &AnalysisRun) -> String;

    /// Dispatch on the configured output format
    fn format_as(&self, run: &AnalysisRun, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(run),
            OutputFormat::Summary => self.format_summary(run),
            OutputFormat::Json => self.format_json(run),
        }
    }
}
