use crate::audit::{AuditRecord, AuditStatus};
use crate::io::output::{format_count, format_percent, OutputWriter};
use crate::pipeline::AuditReport;
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_top_offenders(report)?;
        self.write_files(report)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Refactor Audit Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", report.metadata.tool_version)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        let rows = [
            ("Files audited", summary.total_files.to_string()),
            ("Parse failures", summary.degraded_files.to_string()),
            ("Methods", summary.total_methods.to_string()),
            ("Methods missing tests", summary.missing_tests.to_string()),
            ("High-complexity methods", summary.high_complexity_methods.to_string()),
            ("Average coverage", format_percent(summary.average_coverage)),
            (
                "Tiers (High / Medium / Low)",
                format!(
                    "{} / {} / {}",
                    summary.tiers.high, summary.tiers.medium, summary.tiers.low
                ),
            ),
        ];
        for (metric, value) in rows {
            writeln!(self.writer, "| {metric} | {value} |")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_top_offenders(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        if report.top_offenders.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Top Offenders")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Rank | File | Score | Tier |")?;
        writeln!(self.writer, "|------|------|-------|------|")?;
        for (rank, entry) in report.top_offenders.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | `{}` | {:.1} | {} |",
                rank + 1,
                entry.path.display(),
                entry.score,
                entry.tier
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_files(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Files")?;
        writeln!(self.writer)?;
        for record in report.records.values() {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn write_record(&mut self, record: &AuditRecord) -> anyhow::Result<()> {
        writeln!(self.writer, "### `{}`", record.path.display())?;
        writeln!(self.writer)?;

        if let AuditStatus::ParseFailed {
            side,
            line,
            message,
        } = &record.status
        {
            let at = line.map(|l| format!(" at line {l}")).unwrap_or_default();
            writeln!(self.writer, "**Parse failed** ({side} side{at}): {message}")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        if let Some(severity) = &record.severity {
            writeln!(
                self.writer,
                "- Severity: **{}** ({:.1})",
                severity.tier, severity.score
            )?;
        }
        writeln!(
            self.writer,
            "- Average complexity: {:.1}, average coverage: {}{}",
            record.average_complexity(),
            format_percent(record.average_coverage()),
            if record.coverage_fallback { " (no coverage data)" } else { "" }
        )?;
        writeln!(
            self.writer,
            "- mypy: {}, lint: {}, docstrings: {}",
            format_count(record.counts.mypy),
            format_count(record.counts.lint),
            format_count(record.counts.docstrings)
        )?;

        let diff = record.diff();
        let missing: Vec<String> = diff
            .classes
            .iter()
            .flat_map(|(class, d)| d.methods.missing.iter().map(move |m| format!("{class}.{m}")))
            .chain(diff.functions.missing.iter().cloned())
            .collect();
        if !missing.is_empty() {
            writeln!(self.writer, "- Removed: {}", backticked(&missing))?;
        }
        let added: Vec<String> = diff
            .classes
            .iter()
            .flat_map(|(class, d)| d.methods.added.iter().map(move |m| format!("{class}.{m}")))
            .chain(diff.functions.added.iter().cloned())
            .collect();
        if !added.is_empty() {
            writeln!(self.writer, "- Added: {}", backticked(&added))?;
        }
        if !record.missing_tests.is_empty() {
            let names: Vec<String> = record.missing_tests.iter().map(|m| m.qualified_name()).collect();
            writeln!(self.writer, "- Missing tests: {}", backticked(&names))?;
        }
        for warning in &record.warnings {
            writeln!(self.writer, "- Warning: {warning}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn backticked(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
