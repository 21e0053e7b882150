// Initial slide construction.
//
// Photos are split by orientation, keeping input order within each group.
// Every horizontal photo becomes its own slide. Vertical photos are sorted
// by ascending tag count (stable) and then combined according to the
// configured `PairingStrategy`:
//
// - `Windowed`: take the first unpaired photo as the base and look at no
//   more than `pairing_window` of the most recently unpaired candidates,
//   scanning from the back of the unpaired list. The candidate giving the
//   largest tag union wins (first found on ties). If no candidate beats the
//   base's own tag count, the base becomes a singleton. Not exhaustive; the
//   bounded scan keeps this close to linear for large vertical sets.
// - `FoldExtremes`: pair the i-th photo with the (n-1-i)-th; the middle
//   photo of an odd count stays alone.
// - `Singletons`: no pairing.
//
// The initial slideshow is all horizontal slides followed by all vertical
// slides. Ordering by overlap is left to the optimizers.

use crate::config::{PairingStrategy, SearchConfig};
use crate::error::IntegrityViolation;
use crate::photo::{Photo, PhotoCollection};
use crate::slide::{Slide, Slideshow};
use slideshow_prng::ShowRng;
use std::collections::VecDeque;

/// Build the unoptimized slideshow for a photo collection.
pub fn build_slideshow(
    photos: &PhotoCollection,
    search: &SearchConfig,
    rng: &mut ShowRng,
) -> Result<Slideshow, IntegrityViolation> {
    let (vertical, horizontal): (Vec<&Photo>, Vec<&Photo>) =
        photos.photos().iter().partition(|p| p.is_vertical());

    let mut slides: Vec<Slide> = horizontal.into_iter().map(Slide::single).collect();
    slides.extend(pair_vertical(vertical, search)?);

    if search.shuffle_initial {
        rng.shuffle(&mut slides);
    }

    tracing::debug!(
        photos = photos.len(),
        slides = slides.len(),
        pairing = ?search.pairing,
        "built initial slideshow"
    );
    Ok(Slideshow::new(slides))
}

/// Combine vertical photos into slides, fewest tags first.
fn pair_vertical(
    mut vertical: Vec<&Photo>,
    search: &SearchConfig,
) -> Result<Vec<Slide>, IntegrityViolation> {
    vertical.sort_by_key(|p| p.tags.len());
    match search.pairing {
        PairingStrategy::Windowed => pair_windowed(&vertical, search.pairing_window),
        PairingStrategy::FoldExtremes => pair_fold_extremes(&vertical),
        PairingStrategy::Singletons => Ok(vertical.into_iter().map(Slide::single).collect()),
    }
}

/// Bounded-window pairing by largest combined tag count.
pub fn pair_windowed(vertical: &[&Photo], window: usize) -> Result<Vec<Slide>, IntegrityViolation> {
    let mut unpaired: VecDeque<usize> = (0..vertical.len()).collect();
    let mut slides = Vec::with_capacity(vertical.len().div_ceil(2));

    while let Some(base_idx) = unpaired.pop_front() {
        let base = vertical[base_idx];
        let mut best_count = base.tags.len();
        let mut best: Option<usize> = None;

        // Positions in `unpaired`, newest first.
        for pos in (0..unpaired.len()).rev().take(window) {
            let count = base.tags.union_len(&vertical[unpaired[pos]].tags);
            if count > best_count {
                best_count = count;
                best = Some(pos);
            }
        }

        match best.and_then(|pos| unpaired.remove(pos)) {
            Some(partner_idx) => slides.push(Slide::pair(base, vertical[partner_idx])?),
            None => slides.push(Slide::single(base)),
        }
    }

    Ok(slides)
}

/// Pair opposite ends of the tag-count ordering.
fn pair_fold_extremes(vertical: &[&Photo]) -> Result<Vec<Slide>, IntegrityViolation> {
    let n = vertical.len();
    let mut slides = Vec::with_capacity(n.div_ceil(2));
    for i in 0..n / 2 {
        slides.push(Slide::pair(vertical[i], vertical[n - 1 - i])?);
    }
    if n % 2 == 1 {
        slides.push(Slide::single(vertical[n / 2]));
    }
    Ok(slides)
}
