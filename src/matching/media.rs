// src/matching/media.rs - Shared-media evidence between two entities
use crate::models::core::{MediaKind, MediaSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaOverlap {
    /// |A ∩ B| / min(|A|, |B|), or 0 when either side is empty.
    pub coefficient: f64,
    pub intersection: usize,
}

/// Overlap coefficient of two media collections. Elements are equal only
/// when both the id and the kind agree.
pub fn overlap_coefficient(a: &MediaSet, b: &MediaSet) -> MediaOverlap {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return MediaOverlap {
            coefficient: 0.0,
            intersection: 0,
        };
    }

    let intersection: usize = [MediaKind::Movie, MediaKind::Tv]
        .iter()
        .map(|&kind| a.ids(kind).intersection(b.ids(kind)).count())
        .sum();

    MediaOverlap {
        coefficient: intersection as f64 / smaller as f64,
        intersection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::MediaRef;

    fn set(refs: &[MediaRef]) -> MediaSet {
        refs.iter().copied().collect()
    }

    #[test]
    fn test_overlap_against_smaller_set() {
        let source = set(&[MediaRef::movie(10), MediaRef::movie(20), MediaRef::tv(5)]);
        let target = set(&[MediaRef::movie(10), MediaRef::movie(99)]);
        let overlap = overlap_coefficient(&source, &target);
        assert_eq!(overlap.intersection, 1);
        assert_eq!(overlap.coefficient, 0.5);
        assert_eq!(overlap_coefficient(&target, &source), overlap);
    }

    #[test]
    fn test_empty_sets_score_zero() {
        let empty = MediaSet::new();
        let some = set(&[MediaRef::movie(1)]);
        for (a, b) in [(&empty, &some), (&some, &empty), (&empty, &empty)] {
            let overlap = overlap_coefficient(a, b);
            assert_eq!(overlap.coefficient, 0.0);
            assert_eq!(overlap.intersection, 0);
        }
    }

    #[test]
    fn test_self_overlap_is_one() {
        let a = set(&[MediaRef::movie(1), MediaRef::tv(1), MediaRef::tv(77)]);
        assert_eq!(overlap_coefficient(&a, &a).coefficient, 1.0);
        assert_eq!(overlap_coefficient(&a, &a).intersection, 3);
    }

    #[test]
    fn test_kind_is_part_of_identity() {
        let movies = set(&[MediaRef::movie(5), MediaRef::movie(6)]);
        let shows = set(&[MediaRef::tv(5), MediaRef::tv(6)]);
        assert_eq!(overlap_coefficient(&movies, &shows).coefficient, 0.0);
    }

    #[test]
    fn test_subset_scores_one() {
        let big = set(&[MediaRef::movie(1), MediaRef::movie(2), MediaRef::movie(3), MediaRef::tv(4)]);
        let small = set(&[MediaRef::movie(2), MediaRef::tv(4)]);
        let overlap = overlap_coefficient(&big, &small);
        assert_eq!(overlap.coefficient, 1.0);
        assert!((0.0..=1.0).contains(&overlap.coefficient));
    }
}
