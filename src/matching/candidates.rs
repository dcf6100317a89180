// src/matching/candidates.rs - Stage 1: name-based candidate generation
use log::debug;
use rayon::prelude::*;

use crate::matching::similarity::{NameScorer, DEFAULT_MAX_LENGTH_DIFF};
use crate::matching::top_n::{Scored, TopN};
use crate::models::core::NamedEntity;
use crate::models::matching::{Candidate, CandidateList};
use crate::models::stats_models::{LinkageStage, MatcherStats};
use crate::update_detailed_progress;
use crate::utils::constants::{PROGRESS_LOG_INTERVAL, SCAN_CHUNK_SIZE};
use crate::utils::progress_bars::logging::LinkageLogger;
use crate::utils::progress_bars::progress_callback::ProgressCallback;

pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Scores below this never reach the selector.
pub const DEFAULT_MIN_CANDIDATE_SCORE: f64 = 0.5;
/// Source items whose best candidate scores below this are dropped.
pub const DEFAULT_CANDIDATE_FLOOR: f64 = 0.65;

#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub max_results: usize,
    pub min_score: f64,
    pub floor: f64,
    pub max_length_diff: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            min_score: DEFAULT_MIN_CANDIDATE_SCORE,
            floor: DEFAULT_CANDIDATE_FLOOR,
            max_length_diff: DEFAULT_MAX_LENGTH_DIFF,
        }
    }
}

/// Target entities still open for matching.
///
/// Entities are stored once; `available` lists the indices that have not
/// been retired, in load order. Retirement is the only mutation.
#[derive(Debug, Clone)]
pub struct TargetPool {
    entities: Vec<NamedEntity>,
    available: Vec<usize>,
}

impl TargetPool {
    pub fn new(entities: Vec<NamedEntity>) -> Self {
        let available = (0..entities.len()).collect();
        Self {
            entities,
            available,
        }
    }

    pub fn entity(&self, index: usize) -> &NamedEntity {
        &self.entities[index]
    }

    pub fn available(&self) -> &[usize] {
        &self.available
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn total_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.available.binary_search(&index).is_ok()
    }

    /// Removes a target from further consideration. Returns false if it was
    /// already retired.
    pub fn retire(&mut self, index: usize) -> bool {
        match self.available.binary_search(&index) {
            Ok(pos) => {
                self.available.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

/// A pool index with its similarity to the current source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredTarget {
    pub score: f64,
    pub index: usize,
}

impl Scored for ScoredTarget {
    fn score(&self) -> f64 {
        self.score
    }
}

pub struct CandidateMatcher {
    config: MatcherConfig,
    scorer: NameScorer,
}

impl CandidateMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        let scorer = NameScorer::new(config.max_length_diff);
        Self { config, scorer }
    }

    /// Best targets for one source among those still available.
    ///
    /// The pool is split into fixed-size chunks scored in parallel; local
    /// selections are merged in chunk order so the result does not depend on
    /// scheduling.
    pub fn scan(&self, source: &NamedEntity, pool: &TargetPool) -> TopN<ScoredTarget> {
        let key = source.normalized_key.chars();
        let capacity = self.config.max_results;

        let partials: Vec<TopN<ScoredTarget>> = pool
            .available()
            .par_chunks(SCAN_CHUNK_SIZE)
            .map(|chunk| {
                let mut local = TopN::new(capacity);
                for &index in chunk {
                    let target = pool.entity(index);
                    let score = self.scorer.score_chars(key, target.normalized_key.chars());
                    if score < self.config.min_score {
                        continue;
                    }
                    local.push(ScoredTarget { score, index });
                }
                local
            })
            .collect();

        let mut top = TopN::new(capacity);
        for partial in partials {
            top.merge(partial);
        }
        top
    }

    /// Runs stage 1 over every source in order, retiring targets that were
    /// the sole exact match of an earlier source.
    pub fn match_all(
        &self,
        sources: &[NamedEntity],
        pool: &mut TargetPool,
        progress_callback: Option<ProgressCallback>,
    ) -> (Vec<CandidateList>, MatcherStats) {
        let logger = LinkageLogger::new(LinkageStage::Candidates);
        logger.log_phase(
            "Scanning",
            Some(&format!(
                "{} sources against {} targets",
                sources.len(),
                pool.available_count()
            )),
        );

        let mut stats = MatcherStats::default();
        let mut lists = Vec::with_capacity(sources.len() / 2);

        for (idx, source) in sources.iter().enumerate() {
            stats.sources_scanned += 1;
            if idx % PROGRESS_LOG_INTERVAL == 0 {
                update_detailed_progress!(progress_callback, "Scanning", idx, sources.len());
                logger.log_progress_update(idx, sources.len(), Some(source.display_name.as_str()));
            }

            let top = self.scan(source, pool);
            let best = match top.best() {
                Some(best) if best.score >= self.config.floor => *best,
                _ => {
                    stats.discarded_below_floor += 1;
                    continue;
                }
            };

            if best.score == 1.0 && top.len() == 1 && pool.retire(best.index) {
                stats.targets_retired += 1;
                debug!(
                    "Retired target {} after unique exact match with source {}",
                    pool.entity(best.index).id,
                    source.id
                );
            }

            let candidates = top
                .into_vec()
                .into_iter()
                .map(|scored| Candidate::for_target(scored.score, pool.entity(scored.index)))
                .collect();

            lists.push(CandidateList {
                source_id: source.id.clone(),
                source_name: source.display_name.clone(),
                candidates,
            });
        }

        stats.lists_emitted = lists.len();
        update_detailed_progress!(progress_callback, "Scanning", sources.len(), sources.len());
        logger.log_matcher_summary(&stats);
        (lists, stats)
    }
}
