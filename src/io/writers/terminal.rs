use crate::audit::AuditRecord;
use crate::io::output::{format_count, format_percent, OutputWriter};
use crate::pipeline::AuditReport;
use crate::priority::PriorityTier;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        self.print_header()?;
        self.print_summary(report)?;
        self.print_top_offenders(report)?;
        self.print_degraded(report)?;
        self.print_missing_tests(report)?;
        Ok(())
    }
}

fn tier_label(tier: PriorityTier) -> ColoredString {
    match tier {
        PriorityTier::High => tier.label().red().bold(),
        PriorityTier::Medium => tier.label().yellow(),
        PriorityTier::Low => tier.label().green(),
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self) -> anyhow::Result<()> {
        let divider = "═══════════════════════════════════════════";
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", divider.cyan())?;
        writeln!(self.writer, "{}", "           REFACTOR AUDIT REPORT".bold().cyan())?;
        writeln!(self.writer, "{}", divider.cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_summary(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        writeln!(self.writer, "📊 {}", "Summary".bold())?;
        writeln!(self.writer, "───────────────────────────────────────────")?;
        writeln!(self.writer, "Files audited: {}", summary.total_files)?;
        if summary.degraded_files > 0 {
            writeln!(
                self.writer,
                "Parse failures: {}",
                summary.degraded_files.to_string().red()
            )?;
        }
        writeln!(self.writer, "Methods: {}", summary.total_methods)?;
        writeln!(self.writer, "Methods missing tests: {}", summary.missing_tests)?;
        writeln!(
            self.writer,
            "High-complexity methods: {}",
            summary.high_complexity_methods
        )?;
        writeln!(
            self.writer,
            "Average coverage: {}",
            format_percent(summary.average_coverage)
        )?;
        writeln!(
            self.writer,
            "Tiers: {} {} / {} {} / {} {}",
            summary.tiers.high,
            tier_label(PriorityTier::High),
            summary.tiers.medium,
            tier_label(PriorityTier::Medium),
            summary.tiers.low,
            tier_label(PriorityTier::Low)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_top_offenders(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        if report.top_offenders.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "🔥 {}", "Top Offenders".bold())?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "#", "File", "Score", "Tier", "Complexity", "Coverage", "mypy", "lint",
            ]);

        for (rank, entry) in report.top_offenders.iter().enumerate() {
            let Some(record) = report.records.get(&entry.path) else {
                continue;
            };
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(entry.path.display()),
                Cell::new(format!("{:.1}", entry.score)),
                Cell::new(tier_label(entry.tier)),
                Cell::new(format!("{:.1}", record.average_complexity())),
                Cell::new(format_percent(record.average_coverage())),
                Cell::new(format_count(record.counts.mypy)),
                Cell::new(format_count(record.counts.lint)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_degraded(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let degraded: Vec<&AuditRecord> = report.records.values().filter(|r| r.is_degraded()).collect();
        if degraded.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "⚠️  {}", "Parse failures".bold().red())?;
        for record in degraded {
            writeln!(self.writer, "  {}: {:?}", record.path.display(), record.status)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_missing_tests(&mut self, report: &AuditReport) -> anyhow::Result<()> {
        let with_gaps: Vec<&AuditRecord> = report
            .records
            .values()
            .filter(|r| !r.missing_tests.is_empty())
            .collect();
        if with_gaps.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "🧪 {}", "Methods without tests".bold())?;
        for record in with_gaps {
            let names: Vec<String> = record.missing_tests.iter().map(|m| m.qualified_name()).collect();
            writeln!(
                self.writer,
                "  {} {}",
                record.path.display().to_string().bold(),
                names.join(", ").dimmed()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
