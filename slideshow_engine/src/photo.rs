// Photos and their tag sets.
//
// Tag strings are interned per dataset into compact `TagId`s by a
// `TagInterner`, and a photo's tags are stored as a `TagSet`: a sorted,
// deduplicated `Vec<TagId>`. Every set operation the scorer and the slide
// builder need (intersection size, union size, union) is a single linear
// merge over two sorted slices, so the hot scoring loop never hashes or
// allocates.
//
// `PhotoCollection` is the validated input the engine consumes. Building one
// checks the declared photo count and that each photo's id is its position;
// both failures are `IntegrityViolation`s.

use crate::error::{IntegrityKind, IntegrityViolation};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identity of a photo: its position in the input dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoId(pub u32);

impl PhotoId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interned tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub u32);

/// Photo orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

// ---------------------------------------------------------------------------
// Tag sets
// ---------------------------------------------------------------------------

/// A set of tags, kept sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSet(Vec<TagId>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from ids in any order; duplicates collapse.
    pub fn from_ids(ids: impl IntoIterator<Item = TagId>) -> Self {
        let mut ids: Vec<TagId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[TagId] {
        &self.0
    }

    pub fn contains(&self, tag: TagId) -> bool {
        self.0.binary_search(&tag).is_ok()
    }

    /// Number of tags present in both sets.
    pub fn intersection_len(&self, other: &TagSet) -> usize {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    /// Size of the union, without building it.
    pub fn union_len(&self, other: &TagSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// The union of both sets.
    pub fn union(&self, other: &TagSet) -> TagSet {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        TagSet(out)
    }
}

/// Maps tag strings to dense `TagId`s, first come first numbered.
#[derive(Debug, Default)]
pub struct TagInterner {
    ids: FxHashMap<String, TagId>,
}

impl TagInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, tag: &str) -> TagId {
        if let Some(&id) = self.ids.get(tag) {
            return id;
        }
        let id = TagId(self.ids.len() as u32);
        self.ids.insert(tag.to_string(), id);
        id
    }

    /// Intern every tag and collect them into a set.
    pub fn tag_set<'a>(&mut self, tags: impl IntoIterator<Item = &'a str>) -> TagSet {
        TagSet::from_ids(tags.into_iter().map(|t| self.intern(t)))
    }

    /// Number of distinct tags seen.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

/// An input photo. Never mutated after loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub orientation: Orientation,
    pub tags: TagSet,
}

impl Photo {
    pub fn new(id: u32, orientation: Orientation, tags: TagSet) -> Self {
        Self {
            id: PhotoId(id),
            orientation,
            tags,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }
}

/// The validated photo collection of one dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhotoCollection {
    photos: Vec<Photo>,
}

impl PhotoCollection {
    /// Validate parsed photos against the count the dataset declared.
    pub fn new(declared_count: usize, photos: Vec<Photo>) -> Result<Self, IntegrityViolation> {
        if declared_count != photos.len() {
            return Err(IntegrityViolation::new(
                IntegrityKind::CountMismatch,
                format!(
                    "dataset declares {declared_count} photos but {} were read",
                    photos.len()
                ),
            ));
        }
        if let Some((pos, photo)) = photos
            .iter()
            .enumerate()
            .find(|(pos, p)| p.id.index() != *pos)
        {
            return Err(IntegrityViolation::new(
                IntegrityKind::IndexMismatch,
                format!("photo at position {pos} carries id {}", photo.id),
            ));
        }
        Ok(Self { photos })
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}
