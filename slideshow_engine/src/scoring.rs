// Interest scoring between slides.
//
// The interest of a transition from tag set A to tag set B is
// `min(|A ∩ B|, |A \ B|, |B \ A|)`: a transition scores only when the two
// slides share some tags and each also brings tags of its own. A slideshow's
// total score is the sum over consecutive pairs.
//
// Both optimizers score small windows with these functions; `score_window`
// handles the relocation optimizer's fixed-width windows whose trailing
// slots may be empty.

use crate::photo::TagSet;
use crate::slide::Slide;

/// Interest of the transition between two tag sets. Symmetric.
pub fn interest_factor(a: &TagSet, b: &TagSet) -> u32 {
    let shared = a.intersection_len(b);
    let only_a = a.len() - shared;
    let only_b = b.len() - shared;
    shared.min(only_a).min(only_b) as u32
}

/// Sum of `interest_factor` over each consecutive pair. Zero for fewer than
/// two slides.
pub fn total_score(slides: &[Slide]) -> u64 {
    slides
        .windows(2)
        .map(|pair| u64::from(interest_factor(pair[0].tags(), pair[1].tags())))
        .sum()
}

/// Score of a window whose empty slots (`None`) contribute nothing.
pub fn score_window(window: &[Option<&TagSet>]) -> u64 {
    window
        .windows(2)
        .map(|pair| match (pair[0], pair[1]) {
            (Some(a), Some(b)) => u64::from(interest_factor(a, b)),
            _ => 0,
        })
        .sum()
}
