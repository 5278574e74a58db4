use super::{CoverageSource, LineHit};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parse an LCOV tracefile. Only `SF` and `DA` records matter here; function
/// and branch records are ignored.
pub fn parse_lcov_file(path: &Path) -> Result<CoverageSource> {
    use lcov::{Reader, Record};

    let reader = Reader::open_file(path)
        .with_context(|| format!("Failed to open LCOV file: {}", path.display()))?;

    let mut source = CoverageSource::new(path.display().to_string());
    let mut current_file: Option<PathBuf> = None;
    let mut file_lines: BTreeMap<usize, u64> = BTreeMap::new();

    for record in reader {
        let record = record.with_context(|| "Failed to parse LCOV record")?;

        match record {
            Record::SourceFile { path } => {
                flush(&mut source, current_file.take(), &mut file_lines);
                current_file = Some(path);
            }

            Record::LineData { line, count, .. } => {
                // Multiple DA lines for one line (merged tracefiles) add up.
                *file_lines.entry(line as usize).or_insert(0) += count;
            }

            Record::EndOfRecord => {
                flush(&mut source, current_file.take(), &mut file_lines);
            }

            _ => {}
        }
    }

    flush(&mut source, current_file.take(), &mut file_lines);
    Ok(source)
}

fn flush(source: &mut CoverageSource, file: Option<PathBuf>, lines: &mut BTreeMap<usize, u64>) {
    if let Some(file) = file {
        let entry = source.files.entry(file).or_default();
        entry.extend(
            std::mem::take(lines)
                .into_iter()
                .map(|(line, hits)| LineHit { line, hits }),
        );
    } else {
        lines.clear();
    }
}
