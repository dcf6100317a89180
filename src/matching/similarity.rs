// src/matching/similarity.rs - Bounded weighted edit-distance similarity
use crate::models::core::NormalizedKey;

/// Keys whose lengths differ by more than this are scored 0 without
/// computing a distance.
pub const DEFAULT_MAX_LENGTH_DIFF: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCosts {
    pub insert: usize,
    pub delete: usize,
    pub substitute: usize,
}

/// Substitution costs as much as a delete plus an insert.
pub const NAME_EDIT_COSTS: EditCosts = EditCosts {
    insert: 1,
    delete: 1,
    substitute: 2,
};

/// Weighted Levenshtein distance over characters. Case-sensitive.
pub fn weighted_levenshtein(a: &[char], b: &[char], costs: &EditCosts) -> usize {
    if a.is_empty() {
        return costs.insert * b.len();
    }
    if b.is_empty() {
        return costs.delete * a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).map(|j| j * costs.insert).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = (i + 1) * costs.delete;
        for (j, &cb) in b.iter().enumerate() {
            let delete = prev[j + 1] + costs.delete;
            let insert = curr[j] + costs.insert;
            let substitute = if ca == cb { prev[j] } else { prev[j] + costs.substitute };
            curr[j + 1] = delete.min(insert).min(substitute);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity scorer for normalized keys.
#[derive(Debug, Clone, Copy)]
pub struct NameScorer {
    pub max_length_diff: usize,
    pub costs: EditCosts,
}

impl Default for NameScorer {
    fn default() -> Self {
        Self {
            max_length_diff: DEFAULT_MAX_LENGTH_DIFF,
            costs: NAME_EDIT_COSTS,
        }
    }
}

impl NameScorer {
    pub fn new(max_length_diff: usize) -> Self {
        Self {
            max_length_diff,
            ..Self::default()
        }
    }

    /// Score in [0, 1]; 1.0 means identical keys.
    pub fn score_chars(&self, a: &[char], b: &[char]) -> f64 {
        let (len_a, len_b) = (a.len(), b.len());
        if len_a.abs_diff(len_b) > self.max_length_diff {
            return 0.0;
        }
        let max_len = len_a.max(len_b);
        if max_len == 0 {
            return 1.0;
        }
        let distance = weighted_levenshtein(a, b, &self.costs);
        (1.0 - distance as f64 / max_len as f64).max(0.0)
    }

    pub fn score(&self, a: &NormalizedKey, b: &NormalizedKey) -> f64 {
        self.score_chars(a.chars(), b.chars())
    }

    pub fn score_str(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.score_chars(&a, &b)
    }
}
