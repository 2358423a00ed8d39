//! jobtrack - builds a job application table from your mailbox.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use jobtrack::config::default_config_path;
use jobtrack::pipeline::{BroadcastProgress, ProgressUpdate};
use jobtrack::telemetry::{init_logging, LogFormat};
use jobtrack::{load_config, Config, Pipeline, RunRequest, TableStore, WriteMode, XlsxTable};

use cli::{Cli, Command, RunArgs, ShowArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_logging("info", format);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let config = load_config_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Run(args) => execute_run(args, config).await,
        Command::Show(args) => execute_show(args, &config),
    }
}

fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    match default_config_path() {
        Ok(path) if path.exists() => load_config(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        Ok(path) => {
            debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => {
            debug!("{}, using defaults", e);
            Ok(Config::default())
        }
    }
}

async fn execute_run(args: RunArgs, mut config: Config) -> Result<bool> {
    if let Some(dir) = &args.eml_dir {
        config.mail.imap = None;
        config.mail.eml_dir = Some(dir.to_string_lossy().into_owned());
    }
    if args.no_summary {
        config.summarizer.enabled = false;
    }

    let pipeline = Pipeline::from_config(&config).context("failed to set up pipeline")?;

    let mut request = RunRequest::from_config(&config, args.since);
    if let Some(until) = args.until {
        request = request.with_before(until);
    }
    if let Some(output) = args.output {
        request = request.with_output_path(output);
    }
    if args.append {
        request = request.with_mode(WriteMode::Append);
    } else if args.overwrite {
        request = request.with_mode(WriteMode::Overwrite);
    }

    let (progress, mut updates) = BroadcastProgress::channel(64);
    let printer = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => print_progress(&update),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Progress printer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let report = pipeline.run(&request, &progress).await;
    drop(progress);
    let _ = printer.await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.summary());
    }
    info!(run_id = %report.run_id, success = report.success, "Run finished");
    Ok(report.success)
}

fn print_progress(update: &ProgressUpdate) {
    eprintln!("[{:>3}%] {}: {}", update.percent, update.stage, update.message);
}

fn execute_show(args: ShowArgs, config: &Config) -> Result<bool> {
    let sheet = args
        .sheet
        .unwrap_or_else(|| config.output.sheet_name.clone());
    let records = XlsxTable::new(sheet)
        .read_table(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(true);
    }

    if records.is_empty() {
        println!("No applications in {}", args.file.display());
        return Ok(true);
    }
    for record in &records {
        println!(
            "{}  {:<12}  {} | {} | {}",
            record.applied_date,
            record.status.as_str(),
            record.company,
            record.position,
            record.source
        );
    }
    println!("{} applications", records.len());
    Ok(true)
}
