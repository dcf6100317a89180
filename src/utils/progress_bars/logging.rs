// src/utils/progress_bars/logging.rs - Logging helpers shared by both linkage stages
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::matching::MatchLabel;
use crate::models::stats_models::{AdjudicationStats, LabelCounts, LinkageStage, MatcherStats, RunStats};

#[derive(Clone)]
pub struct LinkageLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl LinkageLogger {
    pub fn new(stage: LinkageStage) -> Self {
        Self {
            stage_name: stage.name(),
            stage_emoji: stage.emoji(),
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str) {
        info!(
            "[{}] {} 🚀 Starting {} stage (run ID: {})",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            run_id
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str, path: &str) {
        info!(
            "[{}] {} 📊 Loaded {} {} records from {}",
            self.stage_name, self.stage_emoji, count, data_type, path
        );
    }

    pub fn log_skipped_records(&self, count: usize, path: &str) {
        if count > 0 {
            warn!(
                "[{}] {} ⚠️  Skipped {} malformed records in {}",
                self.stage_name, self.stage_emoji, count, path
            );
        }
    }

    pub fn log_progress_update(&self, current: usize, total: usize, additional_info: Option<&str>) {
        // every 5000 items, plus every 10%
        let should_log = current % 5000 == 0
            || current == total
            || (total >= 100 && current % (total / 10) == 0);

        if should_log && current > 0 {
            let percent = (current as f64 / total as f64) * 100.0;
            let msg = if let Some(info) = additional_info {
                format!("Progress: {}/{} ({:.1}%) - {}", current, total, percent, info)
            } else {
                format!("Progress: {}/{} ({:.1}%)", current, total, percent)
            };
            info!("[{}] {} 📊 {}", self.stage_name, self.stage_emoji, msg);
        }
    }

    pub fn log_matcher_summary(&self, stats: &MatcherStats) {
        info!(
            "[{}] {} ✅ Scan complete in {:.2?}: {} sources → {} candidate lists",
            self.stage_name,
            self.stage_emoji,
            self.start_time.elapsed(),
            stats.sources_scanned,
            stats.lists_emitted
        );
        info!(
            "[{}] {} 🚫 {} sources below the candidate floor, {} targets retired by exact matches",
            self.stage_name, self.stage_emoji, stats.discarded_below_floor, stats.targets_retired
        );
    }

    pub fn log_adjudication_summary(&self, stats: &AdjudicationStats, label_counts: &LabelCounts) {
        info!(
            "[{}] {} ✅ Adjudicated {} candidate lists in {:.2?}: {} decisions",
            self.stage_name,
            self.stage_emoji,
            stats.lists_considered,
            self.start_time.elapsed(),
            stats.decisions
        );
        if stats.sources_without_media > 0 || stats.lists_without_target_media > 0 {
            info!(
                "[{}] {} ⏭️  No decision: {} sources without media, {} lists without candidate media",
                self.stage_name, self.stage_emoji, stats.sources_without_media, stats.lists_without_target_media
            );
        }
        info!(
            "[{}] {} 🎯 Labels: {}",
            self.stage_name,
            self.stage_emoji,
            label_counts.summary_line()
        );
        let nope = label_counts.get(MatchLabel::Nope);
        if nope > 0 {
            debug!(
                "[{}] {} {} NOPE decisions left out of the report",
                self.stage_name, self.stage_emoji, nope
            );
        }
    }

    pub fn log_report_written(&self, rows: usize, path: &str, sha256: &str) {
        info!(
            "[{}] {} 💾 Wrote {} rows to {} (sha256 {})",
            self.stage_name, self.stage_emoji, rows, path, sha256
        );
    }

    pub fn log_completion(&self, stats: &RunStats) {
        info!(
            "[{}] {} 🎉 COMPLETED run {} in {:.2}s",
            self.stage_name, self.stage_emoji, stats.run_id, stats.elapsed_secs
        );
    }

    pub fn get_elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_stage_name(&self) -> &'static str {
        self.stage_name
    }
}
