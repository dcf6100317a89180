// src/matching/top_n.rs - Bounded best-N selection
//
// Candidates are carried down the list: a newcomer takes the first slot
// holding a strictly lower score and the displaced entry continues the scan.
// Starting from an empty list this keeps the entries sorted best-first.

pub trait Scored {
    fn score(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct TopN<T> {
    capacity: usize,
    entries: Vec<T>,
}

impl<T: Scored> TopN<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&T> {
        self.entries.first()
    }

    pub fn push(&mut self, candidate: T) {
        let mut carried = candidate;
        for slot in self.entries.iter_mut() {
            if slot.score() < carried.score() {
                std::mem::swap(slot, &mut carried);
            }
        }
        if self.entries.len() < self.capacity {
            self.entries.push(carried);
        }
    }

    /// Folds another selector's entries into this one.
    pub fn merge(&mut self, other: TopN<T>) {
        for entry in other.entries {
            self.push(entry);
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T: Scored> Extend<T> for TopN<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl Scored for f64 {
    fn score(&self) -> f64 {
        *self
    }
}
