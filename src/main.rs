use anyhow::{bail, Result};
use campaign_parsing::config::{load_run_config, TaskConfig};
use campaign_parsing::runner::{format_elapsed, run_task, RunOptions};
use campaign_parsing::RunOutcome;
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use time::macros::format_description;

#[derive(Parser, Clone)]
#[command(name = "Campaign CSV Parser")]
#[command(about = "Flattens URL-encoded campaign cookie data from CSV exports into analytics-ready CSV files.")]
#[command(version = "1.0.0")]
struct Cli {
    #[arg(short, long, help = "Input CSV file (.csv or .csv.gz); prompted for when omitted")]
    input: Option<PathBuf>,
    #[arg(short, long, help = "Output CSV file (defaults to parsed_<input name>.csv next to the input)", conflicts_with = "run_config")]
    output: Option<PathBuf>,
    #[arg(long, help = "Path to a run configuration YAML file listing several input files", conflicts_with = "input")]
    run_config: Option<PathBuf>,
    #[arg(short, long, default_value = "INFO", help = "Logging level (DEBUG, INFO, WARN, ERROR)")]
    log_level: String,
    #[arg(short, long, help = "Verbose output (same as --log-level DEBUG)")]
    verbose: bool,
    #[arg(long, help = "Hide the progress bar")]
    no_progress: bool,
}

fn prompt_for_input() -> Result<PathBuf> {
    print!("Enter the input CSV file name (e.g., input.csv): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        bail!("No input file name given");
    }
    Ok(PathBuf::from(name))
}

fn collect_tasks(cli: &Cli) -> Result<Vec<TaskConfig>> {
    if let Some(run_config_path) = &cli.run_config {
        info!("Loading run configuration from: {}", run_config_path.display());
        let run_config = load_run_config(run_config_path)?;
        info!("Run config loaded ({}): {} tasks.", run_config.description.as_deref().unwrap_or("No description"), run_config.tasks.len());
        return Ok(run_config.tasks);
    }
    let input = match &cli.input {
        Some(path) => path.clone(),
        None => prompt_for_input()?,
    };
    Ok(vec![TaskConfig::new(input, cli.output.clone())])
}

/// Runs every task, containing unexpected failures per task. Returns whether all tasks succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let tasks = collect_tasks(cli)?;
    let options = RunOptions { show_progress: !cli.no_progress };
    let mut all_ok = true;
    let mut total_written = 0;

    for (i, task) in tasks.iter().enumerate() {
        info!("Processing Task {} ({})", i + 1, task.description.as_deref().unwrap_or("No description"));
        match run_task(task, options) {
            Ok(RunOutcome::Written { records, .. }) => total_written += records,
            Ok(RunOutcome::NoValidRecords { skipped }) => info!("Task {}: nothing written, {} row(s) skipped.", i + 1, skipped),
            Ok(outcome) => all_ok &= !outcome.is_failure(),
            Err(e) => {
                error!("An unexpected error occurred: {:#}", e);
                all_ok = false;
            }
        }
    }
    if tasks.len() > 1 {
        info!("Exported {} records across {} tasks.", total_written, tasks.len());
    }
    Ok(all_ok)
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_uppercase().as_str() {
        _ if cli.verbose => LevelFilter::Debug,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => { eprintln!("Invalid log level '{}', defaulting to INFO.", cli.log_level); LevelFilter::Info }
    };
    SimpleLogger::new()
        .with_level(log_level)
        .with_timestamp_format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .init()?;

    info!("Starting Campaign CSV Parser");
    info!("Run Timestamp: {}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let succeeded = match run(&cli) {
        Ok(all_ok) => all_ok,
        Err(e) => {
            error!("An unexpected error occurred: {:#}", e);
            false
        }
    };
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));

    if !succeeded {
        warn!("Finished with errors.");
        std::process::exit(1);
    }
    Ok(())
}
