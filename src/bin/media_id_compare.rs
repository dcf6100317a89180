// src/bin/media_id_compare.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use linkage_lib::models::stats_models::LinkageStage;
use linkage_lib::pipeline::{run_adjudication_stage, write_summary};
use linkage_lib::utils::env::load_env;
use linkage_lib::utils::linkage_config::LinkageConfig;
use linkage_lib::utils::progress_bars::progress_callback::create_stage_callback;
use linkage_lib::utils::progress_bars::progress_config::ProgressConfig;

/// Confirms name candidates with the media both sides have credited and
/// writes a labelled match report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct MediaIdCompareArgs {
    /// Candidate file written by title_compare
    candidate_file: PathBuf,

    /// Media credited to source companies
    source_media_file: PathBuf,

    /// Media credited to target organizations
    target_media_file: PathBuf,

    /// Where to write the match report
    report_out: PathBuf,

    /// Also write the run summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    load_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = MediaIdCompareArgs::parse();

    let config = LinkageConfig::from_env();
    config.validate()?;
    config.log_config();
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build_global()
        .context("Failed to start worker threads")?;

    let progress_config = if args.no_progress {
        ProgressConfig::disabled()
    } else {
        ProgressConfig::from_env()
    };
    let stage = LinkageStage::Adjudication;
    let callback = create_stage_callback(&progress_config, stage.name(), stage.emoji());

    let run = run_adjudication_stage(
        &args.candidate_file,
        &args.source_media_file,
        &args.target_media_file,
        &args.report_out,
        &config,
        Some(callback),
    )?;

    if let Some(counts) = &run.label_counts {
        info!("COUNTS: {} ({} rows written)", counts.summary_line(), run.rows_written);
    }
    if let Some(path) = &args.summary {
        write_summary(path, &run)?;
    }
    Ok(())
}
