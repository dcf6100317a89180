// src/utils/linkage_config.rs - Matching thresholds and worker settings
use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::LinkageError;
use crate::matching::candidates::MatcherConfig;
use crate::models::matching::LabelThresholds;

#[derive(Debug, Clone)]
pub struct LinkageConfig {
    pub matcher: MatcherConfig,
    pub labels: LabelThresholds,
    /// Threads used for the parallel scan and adjudication.
    pub workers: usize,
}

impl Default for LinkageConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            labels: LabelThresholds::default(),
            workers: num_cpus::get(),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring {}={:?}: not a valid value, using {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

impl LinkageConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            matcher: MatcherConfig {
                max_results: env_or("LINKAGE_MAX_RESULTS", defaults.matcher.max_results),
                min_score: env_or("LINKAGE_CANDIDATE_MIN_SCORE", defaults.matcher.min_score),
                floor: env_or("LINKAGE_CANDIDATE_FLOOR", defaults.matcher.floor),
                max_length_diff: env_or("LINKAGE_MAX_LENGTH_DIFF", defaults.matcher.max_length_diff),
            },
            labels: LabelThresholds {
                name_match: env_or("LINKAGE_NAME_MATCH_THRESHOLD", defaults.labels.name_match),
                strong_name: env_or("LINKAGE_STRONG_NAME_THRESHOLD", defaults.labels.strong_name),
            },
            workers: env_or("LINKAGE_WORKERS", defaults.workers),
        }
    }

    pub fn validate(&self) -> Result<(), LinkageError> {
        if self.matcher.max_results == 0 {
            return Err(LinkageError::Config("LINKAGE_MAX_RESULTS must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(LinkageError::Config("LINKAGE_WORKERS must be at least 1".into()));
        }
        let unit_checks = [
            ("LINKAGE_CANDIDATE_MIN_SCORE", self.matcher.min_score),
            ("LINKAGE_CANDIDATE_FLOOR", self.matcher.floor),
            ("LINKAGE_NAME_MATCH_THRESHOLD", self.labels.name_match),
            ("LINKAGE_STRONG_NAME_THRESHOLD", self.labels.strong_name),
        ];
        for (key, value) in unit_checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(LinkageError::Config(format!("{} must lie in [0, 1], got {}", key, value)));
            }
        }
        if self.matcher.floor < self.matcher.min_score {
            return Err(LinkageError::Config(format!(
                "candidate floor {} is below the minimum candidate score {}",
                self.matcher.floor, self.matcher.min_score
            )));
        }
        Ok(())
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("⚙️  Linkage configuration:");
        info!(
            "   Candidates: top {} per source, keep >= {:.2}, floor {:.2}, max length difference {}",
            self.matcher.max_results, self.matcher.min_score, self.matcher.floor, self.matcher.max_length_diff
        );
        info!(
            "   Labels: name match > {:.2}, strong name > {:.2}",
            self.labels.name_match, self.labels.strong_name
        );
        info!("   Workers: {}", self.workers);
    }
}
