use anyhow::{Context, Result};
use refdoc_core::BatchSummary;
use std::fmt::Write;
use std::fs;

/// Human-readable end-of-run report: one line per rule that fired, then the
/// failure tally by category.
pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    let verb = if summary.dry_run { "would change" } else { "changed" };

    let _ = writeln!(
        out,
        "📊 Scanned {} files in {}, {} {}",
        summary.files_scanned,
        summary.directory.display(),
        verb,
        summary.files_modified
    );
    if summary.rules.is_empty() {
        let _ = writeln!(out, "   ✅ Nothing to fix");
    }
    for tally in &summary.rules {
        let _ = writeln!(out, "   - {} in {} files", tally.label, tally.files);
    }

    if summary.total_failures() > 0 {
        let _ = writeln!(out, "⚠️  {} files skipped:", summary.total_failures());
        for (category, count) in &summary.failure_counts {
            let _ = writeln!(out, "   - {category}: {count}");
        }
    }
    out
}

pub fn save_report(summary: &BatchSummary, output_path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize run report")?;
    fs::write(output_path, json).with_context(|| format!("write report {output_path}"))?;
    Ok(())
}
