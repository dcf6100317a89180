// src/models/stats_models.rs
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::matching::MatchLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageStage {
    Candidates,
    Adjudication,
}

impl LinkageStage {
    pub fn name(&self) -> &'static str {
        match self {
            LinkageStage::Candidates => "CANDIDATES",
            LinkageStage::Adjudication => "ADJUDICATE",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LinkageStage::Candidates => "👤",
            LinkageStage::Adjudication => "🎬",
        }
    }
}

/// Counters produced by the candidate matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherStats {
    pub sources_scanned: usize,
    pub lists_emitted: usize,
    pub discarded_below_floor: usize,
    pub targets_retired: usize,
}

/// Counters produced by the adjudicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationStats {
    pub lists_considered: usize,
    pub sources_without_media: usize,
    pub lists_without_target_media: usize,
    pub decisions: usize,
}

/// Decisions per label, NOPE included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts(BTreeMap<MatchLabel, usize>);

impl Default for LabelCounts {
    fn default() -> Self {
        Self(MatchLabel::ALL.iter().map(|&label| (label, 0)).collect())
    }
}

impl LabelCounts {
    pub fn record(&mut self, label: MatchLabel) {
        *self.0.entry(label).or_insert(0) += 1;
    }

    pub fn get(&self, label: MatchLabel) -> usize {
        self.0.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn reported(&self) -> usize {
        self.0
            .iter()
            .filter(|(label, _)| label.is_reported())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn summary_line(&self) -> String {
        MatchLabel::ALL
            .iter()
            .map(|label| format!("{}={}", label, self.get(*label)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Per-file load bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputStats {
    pub path: String,
    pub records_loaded: usize,
    pub records_skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub stage: LinkageStage,
    pub inputs: Vec<InputStats>,
    pub output_path: String,
    pub rows_written: usize,
    pub output_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<MatcherStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjudication: Option<AdjudicationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_counts: Option<LabelCounts>,
    pub elapsed_secs: f64,
}

impl RunStats {
    pub fn new(stage: LinkageStage, output_path: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            run_timestamp: Utc::now().naive_utc(),
            stage,
            inputs: Vec::new(),
            output_path: output_path.into(),
            rows_written: 0,
            output_sha256: String::new(),
            matcher: None,
            adjudication: None,
            label_counts: None,
            elapsed_secs: 0.0,
        }
    }
}
