// src/models/core.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::matching::name::normalize_name;

/// Comparison form of a display name. The character vector is kept alongside
/// the text so the scorer never re-decodes UTF-8 inside the cross product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKey {
    text: String,
    chars: Vec<char>,
}

impl NormalizedKey {
    pub fn from_display_name(display_name: &str) -> Self {
        Self::from_normalized(normalize_name(display_name))
    }

    /// Wraps text that is already normalized.
    pub fn from_normalized(text: String) -> Self {
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub id: String,
    pub display_name: String,
    pub normalized_key: NormalizedKey,
}

impl NamedEntity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let normalized_key = NormalizedKey::from_display_name(&display_name);
        Self {
            id: id.into(),
            display_name,
            normalized_key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            other => Err(format!("invalid media kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaRef {
    pub media_id: u64,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn movie(media_id: u64) -> Self {
        Self {
            media_id,
            kind: MediaKind::Movie,
        }
    }

    pub fn tv(media_id: u64) -> Self {
        Self {
            media_id,
            kind: MediaKind::Tv,
        }
    }
}

/// Media credited to one entity, deduplicated and partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSet {
    movies: BTreeSet<u64>,
    tv: BTreeSet<u64>,
}

impl MediaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the reference was already present.
    pub fn insert(&mut self, media: MediaRef) -> bool {
        match media.kind {
            MediaKind::Movie => self.movies.insert(media.media_id),
            MediaKind::Tv => self.tv.insert(media.media_id),
        }
    }

    pub fn ids(&self, kind: MediaKind) -> &BTreeSet<u64> {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.tv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.tv.is_empty()
    }
}

impl FromIterator<MediaRef> for MediaSet {
    fn from_iter<I: IntoIterator<Item = MediaRef>>(iter: I) -> Self {
        let mut set = MediaSet::new();
        for media in iter {
            set.insert(media);
        }
        set
    }
}

/// Media collections for one side, keyed by entity id. An entity is known
/// once it has at least one media item; absent entities are unknown.
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    sets: HashMap<String, MediaSet>,
}

impl MediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_id: &str, media: MediaRef) -> bool {
        self.sets.entry(entity_id.to_string()).or_default().insert(media)
    }

    pub fn get(&self, entity_id: &str) -> Option<&MediaSet> {
        self.sets.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn media_count(&self) -> usize {
        self.sets.values().map(MediaSet::len).sum()
    }
}
