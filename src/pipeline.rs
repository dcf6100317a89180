// src/pipeline.rs - The two linkage stages, from input files to written reports
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::data::atomic::write_atomic;
use crate::data::candidate_file::{read_candidate_file, write_candidate_file};
use crate::data::entities::{load_source_entities, load_target_entities};
use crate::data::media_file::load_media_catalog;
use crate::data::report::write_report;
use crate::error::LinkageError;
use crate::matching::adjudicator::MatchAdjudicator;
use crate::matching::candidates::{CandidateMatcher, TargetPool};
use crate::models::stats_models::{LinkageStage, RunStats};
use crate::utils::linkage_config::LinkageConfig;
use crate::utils::progress_bars::logging::LinkageLogger;
use crate::utils::progress_bars::progress_callback::ProgressCallback;

/// Stage 1: scores every source name against the target names and writes the
/// candidate file.
pub fn run_candidate_stage(
    source_path: &Path,
    target_path: &Path,
    output_path: &Path,
    config: &LinkageConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<RunStats> {
    let logger = LinkageLogger::new(LinkageStage::Candidates);
    let mut run = RunStats::new(LinkageStage::Candidates, output_path.display().to_string());
    logger.log_start(&run.run_id);

    logger.log_phase("Loading entities", None);
    let sources = load_source_entities(source_path)
        .with_context(|| format!("Failed to load source entities from {}", source_path.display()))?;
    logger.log_data_loaded(sources.loaded, "source entity", &source_path.display().to_string());
    logger.log_skipped_records(sources.skipped, &source_path.display().to_string());
    run.inputs.push(sources.input_stats(source_path));

    let targets = load_target_entities(target_path)
        .with_context(|| format!("Failed to load target entities from {}", target_path.display()))?;
    logger.log_data_loaded(targets.loaded, "target entity", &target_path.display().to_string());
    logger.log_skipped_records(targets.skipped, &target_path.display().to_string());
    run.inputs.push(targets.input_stats(target_path));

    let mut pool = TargetPool::new(targets.records);
    let matcher = CandidateMatcher::new(config.matcher.clone());
    let (lists, matcher_stats) = matcher.match_all(&sources.records, &mut pool, progress_callback);

    logger.log_phase("Writing candidate file", Some(&output_path.display().to_string()));
    let written = write_candidate_file(output_path, &lists, config.matcher.max_results)
        .with_context(|| format!("Failed to write candidate file {}", output_path.display()))?;
    logger.log_report_written(written.rows, &output_path.display().to_string(), &written.sha256);

    run.rows_written = written.rows;
    run.output_sha256 = written.sha256;
    run.matcher = Some(matcher_stats);
    run.elapsed_secs = logger.get_elapsed().as_secs_f64();
    logger.log_completion(&run);
    Ok(run)
}

/// Stage 2: weighs each candidate list against the shared media of both
/// sides and writes the labelled match report.
pub fn run_adjudication_stage(
    candidate_path: &Path,
    source_media_path: &Path,
    target_media_path: &Path,
    output_path: &Path,
    config: &LinkageConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<RunStats> {
    let logger = LinkageLogger::new(LinkageStage::Adjudication);
    let mut run = RunStats::new(LinkageStage::Adjudication, output_path.display().to_string());
    logger.log_start(&run.run_id);

    logger.log_phase("Loading candidates and media", None);
    let lists = read_candidate_file(candidate_path)
        .with_context(|| format!("Failed to read candidate file {}", candidate_path.display()))?;
    logger.log_data_loaded(lists.loaded, "candidate list", &candidate_path.display().to_string());
    logger.log_skipped_records(lists.skipped, &candidate_path.display().to_string());
    run.inputs.push(lists.input_stats(candidate_path));

    let mut catalogs = Vec::with_capacity(2);
    for path in [source_media_path, target_media_path] {
        let media = load_media_catalog(path)
            .with_context(|| format!("Failed to load media file {}", path.display()))?;
        logger.log_data_loaded(media.loaded, "media", &path.display().to_string());
        logger.log_skipped_records(media.skipped, &path.display().to_string());
        run.inputs.push(media.input_stats(path));
        catalogs.push(media.records);
    }
    let target_media = catalogs.pop().unwrap_or_default();
    let source_media = catalogs.pop().unwrap_or_default();

    let adjudicator = MatchAdjudicator::new(config.labels);
    let outcome = adjudicator.adjudicate_all(&lists.records, &source_media, &target_media, progress_callback);

    logger.log_phase("Writing match report", Some(&output_path.display().to_string()));
    let written = write_report(output_path, &outcome.decisions)
        .with_context(|| format!("Failed to write match report {}", output_path.display()))?;
    logger.log_report_written(written.rows, &output_path.display().to_string(), &written.sha256);

    run.rows_written = written.rows;
    run.output_sha256 = written.sha256;
    run.adjudication = Some(outcome.stats);
    run.label_counts = Some(outcome.label_counts);
    run.elapsed_secs = logger.get_elapsed().as_secs_f64();
    logger.log_completion(&run);
    Ok(run)
}

/// Writes the run summary as pretty JSON, atomically.
pub fn write_summary(path: &Path, run: &RunStats) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(run).map_err(|e| LinkageError::json(path, e))?;
    bytes.push(b'\n');
    write_atomic(path, &bytes).with_context(|| format!("Failed to write run summary {}", path.display()))?;
    info!("📝 Run summary written to {}", path.display());
    Ok(())
}
