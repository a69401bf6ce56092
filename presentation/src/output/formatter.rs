//! Output formatter trait

use council_domain::{CouncilRun, OutputFormat};

/// Trait for formatting council results
pub trait OutputFormatter {
    /// Format every stage of the run
    fn format(&self, run: &CouncilRun) -> String;

    /// Format as JSON
    fn format_json(&self, run: &CouncilRun) -> String;

    /// Format the chairman's answer only (concise output)
    fn format_final_only(&self, run: &CouncilRun) -> String;

    /// Format according to `format`
    fn render(&self, run: &CouncilRun, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(run),
            OutputFormat::Final => self.format_final_only(run),
            OutputFormat::Json => self.format_json(run),
        }
    }
}
