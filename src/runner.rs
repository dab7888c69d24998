use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::time::Instant;

use crate::config::TaskConfig;
use crate::error::RunOutcome;
use crate::pipeline::process_rows;
use crate::table::{read_rows, write_records};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub show_progress: bool,
}

/// Reads one input table, flattens it and writes the output when anything survived.
///
/// A missing input or an empty result is reported and returned as a [`RunOutcome`];
/// only unexpected I/O or CSV failures come back as errors.
pub fn run_task(task: &TaskConfig, options: RunOptions) -> Result<RunOutcome> {
    let start_time = Instant::now();
    if !task.input.exists() {
        error!("File '{}' not found.", task.input.display());
        return Ok(RunOutcome::SourceNotFound { input: task.input.clone() });
    }

    info!("Reading input from: {}", task.input.display());
    let rows = read_rows(&task.input)?;
    info!("Loaded {} rows.", rows.len());

    let progress_bar = make_progress_bar(rows.len() as u64, options.show_progress)?;
    progress_bar.set_message("Processing records");
    let batch = process_rows(rows, &progress_bar);
    progress_bar.finish_with_message(format!("{} records parsed, {} skipped", batch.records.len(), batch.skipped.total()));

    let skipped = batch.skipped.total();
    if batch.records.is_empty() {
        warn!("No valid records to write.");
        return Ok(RunOutcome::NoValidRecords { skipped });
    }

    let output = task.output_path();
    write_records(&output, &batch.records)?;
    info!("Done! Exported {} records to '{}' in {}.", batch.records.len(), output.display(), format_elapsed(start_time.elapsed()));
    if skipped > 0 {
        warn!("Skipped {} record(s) due to issues ({} missing required fields, {} invalid campaign cookie data).",
            skipped, batch.skipped.missing_fields, batch.skipped.decode_failures);
    }
    Ok(RunOutcome::Written { output, records: batch.records.len(), skipped })
}

fn make_progress_bar(len: u64, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let progress_bar = ProgressBar::new(len);
    progress_bar.set_style(ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta} @ {per_sec}) {msg}")?
        .progress_chars("=> "));
    Ok(progress_bar)
}

pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_formats_by_magnitude() {
        assert_eq!(format_elapsed(Duration::from_millis(1_250)), "1.250s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "1h 2m 5s");
    }

    #[test]
    fn missing_input_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let task = TaskConfig::new(dir.path().join("absent.csv"), Some(dir.path().join("out.csv")));
        let outcome = run_task(&task, RunOptions::default()).unwrap();
        assert!(matches!(outcome, RunOutcome::SourceNotFound { .. }));
        assert!(outcome.is_failure());
        assert!(!dir.path().join("out.csv").exists());
    }
}
