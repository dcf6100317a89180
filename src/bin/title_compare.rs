// src/bin/title_compare.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use linkage_lib::models::stats_models::LinkageStage;
use linkage_lib::pipeline::{run_candidate_stage, write_summary};
use linkage_lib::utils::env::load_env;
use linkage_lib::utils::linkage_config::LinkageConfig;
use linkage_lib::utils::progress_bars::progress_callback::create_stage_callback;
use linkage_lib::utils::progress_bars::progress_config::ProgressConfig;

/// Finds, for every media-catalog company, the closest knowledge-base
/// organizations by name.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct TitleCompareArgs {
    /// Source companies, one JSON object per line
    source_entities: PathBuf,

    /// Target organizations as CSV (item URI, label)
    target_entities: PathBuf,

    /// Where to write the candidate file
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
    let args = TitleCompareArgs::parse();

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
    let stage = LinkageStage::Candidates;
    let callback = create_stage_callback(&progress_config, stage.name(), stage.emoji());

    let run = run_candidate_stage(
        &args.source_entities,
        &args.target_entities,
        &args.report_out,
        &config,
        Some(callback),
    )?;

    if let Some(matcher) = &run.matcher {
        info!(
            "COUNTS: {} sources, {} candidate lists, {} below floor, {} targets retired",
            matcher.sources_scanned, matcher.lists_emitted, matcher.discarded_below_floor, matcher.targets_retired
        );
    }
    if let Some(path) = &args.summary {
        write_summary(path, &run)?;
    }
    Ok(())
}
