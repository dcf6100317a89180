// src/models/matching.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::core::NamedEntity;

/// A tentative target for one source entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub score: f64,
    pub target_id: String,
    pub target_name: String,
}

impl Candidate {
    pub fn for_target(score: f64, target: &NamedEntity) -> Self {
        Self {
            score,
            target_id: target.id.clone(),
            target_name: target.display_name.clone(),
        }
    }
}

/// Best-first candidates for one source entity. Never longer than the
/// selector capacity it was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList {
    pub source_id: String,
    pub source_name: String,
    pub candidates: Vec<Candidate>,
}

impl CandidateList {
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn best_score(&self) -> f64 {
        self.best().map(|c| c.score).unwrap_or(0.0)
    }

    pub fn is_sorted(&self) -> bool {
        self.candidates.windows(2).all(|w| w[0].score >= w[1].score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchLabel {
    Probably,
    Maybe,
    Unlikely,
    Nope,
}

impl MatchLabel {
    pub const ALL: [MatchLabel; 4] = [
        MatchLabel::Probably,
        MatchLabel::Maybe,
        MatchLabel::Unlikely,
        MatchLabel::Nope,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Probably => "PROBABLY",
            MatchLabel::Maybe => "MAYBE",
            MatchLabel::Unlikely => "UNLIKELY",
            MatchLabel::Nope => "NOPE",
        }
    }

    /// NOPE decisions are counted but never written to the report.
    pub fn is_reported(&self) -> bool {
        !matches!(self, MatchLabel::Nope)
    }

    /// Confidence label for a pair of component scores.
    ///
    /// Name evidence is "good" above `name_match`; media evidence is good when
    /// any media is shared. A very strong name (above `strong_name`) without
    /// shared media is still worth a look.
    pub fn classify(name_score: f64, overlap_score: f64, thresholds: &LabelThresholds) -> Self {
        let name_good = name_score > thresholds.name_match;
        let media_good = overlap_score > 0.0;

        match (name_good, media_good) {
            (true, true) => MatchLabel::Probably,
            (false, true) => MatchLabel::Maybe,
            (true, false) if name_score > thresholds.strong_name => MatchLabel::Maybe,
            (true, false) => MatchLabel::Unlikely,
            (false, false) => MatchLabel::Nope,
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelThresholds {
    pub name_match: f64,
    pub strong_name: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            name_match: 0.72,
            strong_name: 0.9,
        }
    }
}

/// Final adjudicated outcome for one source entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDecision {
    pub source_id: String,
    pub source_name: String,
    pub target_id: String,
    pub target_name: String,
    pub name_score: f64,
    pub overlap_score: f64,
    pub matched_media_count: usize,
    pub source_media_count: usize,
    pub target_media_count: usize,
    pub total_score: f64,
    pub label: MatchLabel,
}
