// Slides and the slideshow sequence.
//
// A `Slide` holds one horizontal photo, or one or two vertical photos, plus
// the union of their tags. Slides are built once and never edited: the
// optimizers reorder them inside the `Slideshow` by swapping or overwriting
// whole slides.
//
// The photo-coverage invariant (every input photo in exactly one slide) is
// checked by `Slideshow::validate`; the result writer re-checks the
// no-duplicate half of it with `ensure_unique` just before emitting.

use crate::error::{IntegrityKind, IntegrityViolation};
use crate::photo::{Photo, PhotoId, TagSet};
use crate::scoring;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// One unit of display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    photos: SmallVec<[PhotoId; 2]>,
    tags: TagSet,
}

impl Slide {
    /// A slide showing a single photo of either orientation.
    pub fn single(photo: &Photo) -> Self {
        Self {
            photos: smallvec![photo.id],
            tags: photo.tags.clone(),
        }
    }

    /// A slide showing two vertical photos side by side.
    pub fn pair(first: &Photo, second: &Photo) -> Result<Self, IntegrityViolation> {
        if !first.is_vertical() || !second.is_vertical() {
            return Err(IntegrityViolation::new(
                IntegrityKind::InvalidSlide,
                format!(
                    "photos {} and {} cannot share a slide: both must be vertical",
                    first.id, second.id
                ),
            ));
        }
        if first.id == second.id {
            return Err(IntegrityViolation::new(
                IntegrityKind::InvalidSlide,
                format!("photo {} paired with itself", first.id),
            ));
        }
        Ok(Self {
            photos: smallvec![first.id, second.id],
            tags: first.tags.union(&second.tags),
        })
    }

    pub fn photos(&self) -> &[PhotoId] {
        &self.photos
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }
}

/// The ordered sequence of slides being optimized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slideshow {
    slides: Vec<Slide>,
}

impl Slideshow {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Mutable access for the optimizers. Slides are moved, never edited.
    pub(crate) fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Total interest score of the current ordering.
    pub fn score(&self) -> u64 {
        scoring::total_score(&self.slides)
    }

    /// Fail if any photo appears in more than one slide.
    pub fn ensure_unique(&self) -> Result<(), IntegrityViolation> {
        let highest = self
            .slides
            .iter()
            .flat_map(|s| s.photos.iter())
            .map(|p| p.index())
            .max();
        let Some(highest) = highest else {
            return Ok(());
        };
        self.check_coverage(highest + 1).map(|_| ())
    }

    /// Fail unless photos `0..photo_count` each appear in exactly one slide.
    pub fn validate(&self, photo_count: usize) -> Result<(), IntegrityViolation> {
        let seen = self.check_coverage(photo_count)?;
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(IntegrityViolation::new(
                IntegrityKind::MissingPhoto,
                format!("photo {missing} is not in any slide"),
            ));
        }
        Ok(())
    }

    fn check_coverage(&self, photo_count: usize) -> Result<Vec<bool>, IntegrityViolation> {
        let mut seen = vec![false; photo_count];
        for (position, slide) in self.slides.iter().enumerate() {
            for &photo in slide.photos() {
                match seen.get_mut(photo.index()) {
                    Some(flag) if *flag => {
                        return Err(IntegrityViolation::new(
                            IntegrityKind::DuplicatePhoto,
                            format!("photo {photo} appears again in slide {position}"),
                        ));
                    }
                    Some(flag) => *flag = true,
                    None => {
                        return Err(IntegrityViolation::new(
                            IntegrityKind::InvalidSlide,
                            format!(
                                "slide {position} refers to photo {photo}, beyond the {photo_count} input photos"
                            ),
                        ));
                    }
                }
            }
        }
        Ok(seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::{Orientation, TagInterner};

    fn photo(interner: &mut TagInterner, id: u32, orientation: Orientation, tags: &[&str]) -> Photo {
        Photo::new(id, orientation, interner.tag_set(tags.iter().copied()))
    }

    #[test]
    fn pair_takes_tag_union() {
        let mut interner = TagInterner::new();
        let a = photo(&mut interner, 0, Orientation::Vertical, &["a", "b"]);
        let b = photo(&mut interner, 1, Orientation::Vertical, &["b", "c"]);
        let slide = Slide::pair(&a, &b).unwrap();
        assert_eq!(slide.photos(), &[PhotoId(0), PhotoId(1)]);
        assert_eq!(slide.tags().len(), 3);
    }

    #[test]
    fn pair_rejects_horizontal_photo() {
        let mut interner = TagInterner::new();
        let a = photo(&mut interner, 0, Orientation::Vertical, &["a"]);
        let h = photo(&mut interner, 1, Orientation::Horizontal, &["b"]);
        let err = Slide::pair(&a, &h).unwrap_err();
        assert_eq!(err.kind, IntegrityKind::InvalidSlide);
    }

    #[test]
    fn pair_rejects_same_photo_twice() {
        let mut interner = TagInterner::new();
        let a = photo(&mut interner, 3, Orientation::Vertical, &["a"]);
        assert!(Slide::pair(&a, &a).is_err());
    }

    #[test]
    fn validate_detects_duplicates_and_gaps() {
        let mut interner = TagInterner::new();
        let p0 = photo(&mut interner, 0, Orientation::Vertical, &["a"]);
        let p1 = photo(&mut interner, 1, Orientation::Vertical, &["b"]);
        let p2 = photo(&mut interner, 2, Orientation::Horizontal, &["c"]);

        let ok = Slideshow::new(vec![Slide::single(&p2), Slide::pair(&p0, &p1).unwrap()]);
        assert!(ok.validate(3).is_ok());
        assert!(ok.ensure_unique().is_ok());

        let dup = Slideshow::new(vec![Slide::pair(&p0, &p1).unwrap(), Slide::single(&p1)]);
        assert_eq!(dup.validate(3).unwrap_err().kind, IntegrityKind::DuplicatePhoto);
        assert_eq!(dup.ensure_unique().unwrap_err().kind, IntegrityKind::DuplicatePhoto);

        let gap = Slideshow::new(vec![Slide::single(&p0), Slide::single(&p2)]);
        assert_eq!(gap.validate(3).unwrap_err().kind, IntegrityKind::MissingPhoto);
        assert!(gap.ensure_unique().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_photo() {
        let mut interner = TagInterner::new();
        let p5 = photo(&mut interner, 5, Orientation::Horizontal, &["a"]);
        let show = Slideshow::new(vec![Slide::single(&p5)]);
        assert_eq!(show.validate(2).unwrap_err().kind, IntegrityKind::InvalidSlide);
    }

    #[test]
    fn empty_slideshow_is_valid_for_no_photos() {
        let show = Slideshow::default();
        assert!(show.validate(0).is_ok());
        assert!(show.ensure_unique().is_ok());
        assert_eq!(show.score(), 0);
    }
}
