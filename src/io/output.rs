use crate::io::writers::{JsonWriter, MarkdownWriter, TerminalWriter};
use crate::pipeline::AuditReport;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()>;
}

pub fn create_writer<'a>(format: OutputFormat, writer: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

/// `12.3%` for a percentage.
pub(crate) fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `-` for an unknown count.
pub(crate) fn format_count(count: Option<usize>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}
