// src/matching/adjudicator.rs - Stage 2: fuse name and media evidence
use log::debug;
use rayon::prelude::*;

use crate::matching::media::overlap_coefficient;
use crate::models::core::MediaCatalog;
use crate::models::matching::{CandidateList, LabelThresholds, LinkDecision, MatchLabel};
use crate::models::stats_models::{AdjudicationStats, LabelCounts, LinkageStage};
use crate::update_detailed_progress;
use crate::utils::progress_bars::logging::LinkageLogger;
use crate::utils::progress_bars::progress_callback::ProgressCallback;

/// What adjudicating one candidate list produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Adjudication {
    /// The source entity has no known media collection.
    NoSourceMedia,
    /// None of the candidates has a known media collection.
    NoTargetMedia,
    Decided(LinkDecision),
}

#[derive(Debug, Clone)]
pub struct AdjudicationOutcome {
    /// Every decision in candidate-list order, NOPE included.
    pub decisions: Vec<LinkDecision>,
    pub stats: AdjudicationStats,
    pub label_counts: LabelCounts,
}

#[derive(Debug, Clone, Default)]
pub struct MatchAdjudicator {
    thresholds: LabelThresholds,
}

impl MatchAdjudicator {
    pub fn new(thresholds: LabelThresholds) -> Self {
        Self { thresholds }
    }

    /// Picks the candidate with the highest combined score, preferring the
    /// higher name score on ties; the first one seen wins a full tie.
    pub fn adjudicate(
        &self,
        list: &CandidateList,
        source_media: &MediaCatalog,
        target_media: &MediaCatalog,
    ) -> Adjudication {
        let source_set = match source_media.get(&list.source_id) {
            Some(set) => set,
            None => return Adjudication::NoSourceMedia,
        };

        let mut best: Option<LinkDecision> = None;
        for candidate in &list.candidates {
            let target_set = match target_media.get(&candidate.target_id) {
                Some(set) => set,
                None => continue,
            };

            let overlap = overlap_coefficient(source_set, target_set);
            let total_score = candidate.score * overlap.coefficient;

            let replace = match &best {
                None => true,
                Some(current) => {
                    total_score > current.total_score
                        || (total_score == current.total_score && candidate.score > current.name_score)
                }
            };
            if !replace {
                continue;
            }

            best = Some(LinkDecision {
                source_id: list.source_id.clone(),
                source_name: list.source_name.clone(),
                target_id: candidate.target_id.clone(),
                target_name: candidate.target_name.clone(),
                name_score: candidate.score,
                overlap_score: overlap.coefficient,
                matched_media_count: overlap.intersection,
                source_media_count: source_set.len(),
                target_media_count: target_set.len(),
                total_score,
                label: MatchLabel::classify(candidate.score, overlap.coefficient, &self.thresholds),
            });
        }

        match best {
            Some(decision) => Adjudication::Decided(decision),
            None => Adjudication::NoTargetMedia,
        }
    }

    pub fn adjudicate_all(
        &self,
        lists: &[CandidateList],
        source_media: &MediaCatalog,
        target_media: &MediaCatalog,
        progress_callback: Option<ProgressCallback>,
    ) -> AdjudicationOutcome {
        let logger = LinkageLogger::new(LinkageStage::Adjudication);
        logger.log_phase(
            "Adjudicating",
            Some(&format!(
                "{} candidate lists, {} source / {} target media collections",
                lists.len(),
                source_media.len(),
                target_media.len()
            )),
        );
        update_detailed_progress!(progress_callback, "Adjudicating", 0, lists.len());

        // independent per list; collect keeps input order
        let results: Vec<Adjudication> = lists
            .par_iter()
            .map(|list| self.adjudicate(list, source_media, target_media))
            .collect();

        let mut stats = AdjudicationStats {
            lists_considered: lists.len(),
            ..AdjudicationStats::default()
        };
        let mut label_counts = LabelCounts::default();
        let mut decisions = Vec::with_capacity(results.len());

        for (list, result) in lists.iter().zip(results) {
            match result {
                Adjudication::NoSourceMedia => {
                    stats.sources_without_media += 1;
                    debug!("No media collection for source {} ({})", list.source_id, list.source_name);
                }
                Adjudication::NoTargetMedia => {
                    stats.lists_without_target_media += 1;
                    debug!("No candidate of source {} has a media collection", list.source_id);
                }
                Adjudication::Decided(decision) => {
                    label_counts.record(decision.label);
                    decisions.push(decision);
                }
            }
        }
        stats.decisions = decisions.len();

        update_detailed_progress!(progress_callback, "Adjudicating", lists.len(), lists.len());
        logger.log_adjudication_summary(&stats, &label_counts);

        AdjudicationOutcome {
            decisions,
            stats,
            label_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::MediaRef;
    use crate::models::matching::Candidate;

    fn candidate(score: f64, id: &str) -> Candidate {
        Candidate {
            score,
            target_id: id.to_string(),
            target_name: format!("Target {}", id),
        }
    }

    fn list(source_id: &str, candidates: Vec<Candidate>) -> CandidateList {
        CandidateList {
            source_id: source_id.to_string(),
            source_name: format!("Source {}", source_id),
            candidates,
        }
    }

    fn catalog(entries: Vec<(&str, Vec<MediaRef>)>) -> MediaCatalog {
        let mut catalog = MediaCatalog::new();
        for (id, refs) in entries {
            for media in refs {
                catalog.insert(id, media);
            }
        }
        catalog
    }

    fn decided(result: Adjudication) -> LinkDecision {
        match result {
            Adjudication::Decided(decision) => decision,
            other => panic!("expected a decision, got {:?}", other),
        }
    }

    #[test]
    fn test_media_evidence_outweighs_name() {
        let sources = catalog(vec![("1", vec![MediaRef::movie(10), MediaRef::movie(20), MediaRef::tv(5)])]);
        let targets = catalog(vec![
            ("Q1", vec![MediaRef::movie(500)]),
            ("Q2", vec![MediaRef::movie(10), MediaRef::movie(99)]),
        ]);
        let input = list("1", vec![candidate(0.95, "Q1"), candidate(0.8, "Q2")]);

        let decision = decided(MatchAdjudicator::default().adjudicate(&input, &sources, &targets));
        assert_eq!(decision.target_id, "Q2");
        assert_eq!(decision.overlap_score, 0.5);
        assert_eq!(decision.matched_media_count, 1);
        assert_eq!(decision.source_media_count, 3);
        assert_eq!(decision.target_media_count, 2);
        assert!((decision.total_score - 0.4).abs() < 1e-12);
        assert_eq!(decision.label, MatchLabel::Probably);
    }

    #[test]
    fn test_tie_on_total_prefers_name_score() {
        let sources = catalog(vec![("1", vec![MediaRef::movie(1)])]);
        let targets = catalog(vec![("Q1", vec![MediaRef::movie(2)]), ("Q2", vec![MediaRef::movie(3)])]);
        // both totals are zero; Q2 has the better name
        let input = list("1", vec![candidate(0.7, "Q1"), candidate(0.95, "Q2")]);

        let decision = decided(MatchAdjudicator::default().adjudicate(&input, &sources, &targets));
        assert_eq!(decision.target_id, "Q2");
        assert_eq!(decision.total_score, 0.0);
        assert_eq!(decision.label, MatchLabel::Maybe);
    }

    #[test]
    fn test_candidates_without_media_are_skipped() {
        let sources = catalog(vec![("1", vec![MediaRef::movie(1)])]);
        let targets = catalog(vec![("Q2", vec![MediaRef::movie(1)])]);
        let input = list("1", vec![candidate(1.0, "Q1"), candidate(0.7, "Q2")]);

        let decision = decided(MatchAdjudicator::default().adjudicate(&input, &sources, &targets));
        assert_eq!(decision.target_id, "Q2");
        assert_eq!(decision.label, MatchLabel::Maybe);
    }

    #[test]
    fn test_unknown_media_produces_no_decision() {
        let sources = catalog(vec![("1", vec![MediaRef::movie(1)])]);
        let targets = catalog(vec![]);
        let adjudicator = MatchAdjudicator::default();

        let input = list("1", vec![candidate(0.9, "Q1")]);
        assert_eq!(adjudicator.adjudicate(&input, &sources, &targets), Adjudication::NoTargetMedia);

        let input = list("2", vec![candidate(0.9, "Q1")]);
        assert_eq!(adjudicator.adjudicate(&input, &sources, &targets), Adjudication::NoSourceMedia);
    }

    #[test]
    fn test_adjudicate_all_counts_every_label() {
        let sources = catalog(vec![
            ("1", vec![MediaRef::movie(1)]),
            ("2", vec![MediaRef::movie(2)]),
            ("3", vec![MediaRef::movie(3)]),
            ("4", vec![MediaRef::movie(4)]),
        ]);
        let targets = catalog(vec![
            ("Q1", vec![MediaRef::movie(1)]),
            ("Q2", vec![MediaRef::movie(200)]),
            ("Q3", vec![MediaRef::movie(300)]),
        ]);
        let lists = vec![
            list("1", vec![candidate(0.8, "Q1")]),
            list("2", vec![candidate(0.8, "Q2")]),
            list("3", vec![candidate(0.66, "Q3")]),
            list("4", vec![candidate(0.9, "Q404")]),
            list("5", vec![candidate(0.9, "Q1")]),
        ];

        let outcome = MatchAdjudicator::default().adjudicate_all(&lists, &sources, &targets, None);

        let ids: Vec<&str> = outcome.decisions.iter().map(|d| d.source_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(outcome.label_counts.get(MatchLabel::Probably), 1);
        assert_eq!(outcome.label_counts.get(MatchLabel::Unlikely), 1);
        assert_eq!(outcome.label_counts.get(MatchLabel::Nope), 1);
        assert_eq!(outcome.stats.lists_considered, 5);
        assert_eq!(outcome.stats.lists_without_target_media, 1);
        assert_eq!(outcome.stats.sources_without_media, 1);
        assert_eq!(outcome.stats.decisions, 3);
    }

    #[test]
    fn test_total_is_product_of_components() {
        let sources = catalog(vec![("1", vec![MediaRef::movie(1), MediaRef::movie(2), MediaRef::movie(3), MediaRef::movie(4)])]);
        let targets = catalog(vec![("Q1", vec![MediaRef::movie(1), MediaRef::movie(2), MediaRef::movie(3), MediaRef::tv(9)])]);
        let input = list("1", vec![candidate(0.7, "Q1")]);

        let decision = decided(MatchAdjudicator::default().adjudicate(&input, &sources, &targets));
        assert_eq!(decision.overlap_score, 0.75);
        assert_eq!(decision.total_score, decision.name_score * decision.overlap_score);
        assert!((0.0..=1.0).contains(&decision.total_score));
    }
}
