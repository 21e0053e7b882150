// Window relocation optimizer.
//
// Randomized hill climbing with single-slide moves. Each iteration picks a
// slide `p` uniformly, copies the five-slot window centred on it (slots past
// either end of the slideshow stay empty and score nothing), and tries two
// candidate moves on the copy:
//
// 1. exchange the slide with its predecessor;
// 2. exchange it with its successor.
//
// The first candidate that strictly beats the window's current score is
// applied to the live slideshow at `p`; otherwise nothing changes. Every
// transition a move can alter lies inside the window, so an accepted move
// strictly raises the full slideshow's score.
//
// Exchanges go through `swap_adjacent`, whose guard only accepts a target
// position in `1..len`. Index 0 is therefore never the destination of a
// predecessor exchange; the first slide can still move right via the
// successor exchange of slide 0.

use crate::scoring::score_window;
use crate::slide::Slideshow;
use crate::photo::TagSet;
use slideshow_prng::ShowRng;

/// Slides on each side of the chosen slide that the window covers.
pub const HALF_WIDTH: usize = 2;
const WINDOW_LEN: usize = 2 * HALF_WIDTH + 1;

/// Direction of a single-slide exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Exchange with the preceding slide.
    Back,
    /// Exchange with the following slide.
    Forward,
}

impl Movement {
    fn offset(self) -> isize {
        match self {
            Movement::Back => -1,
            Movement::Forward => 1,
        }
    }
}

/// Statistics from a relocation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelocationStats {
    pub iterations: usize,
    pub moved_back: usize,
    pub moved_forward: usize,
    /// Sum of the window gains of all accepted moves.
    pub gain: u64,
}

impl RelocationStats {
    pub fn accepted(&self) -> usize {
        self.moved_back + self.moved_forward
    }
}

/// Exchange `items[position]` with its neighbour in `movement`'s direction.
///
/// A no-op unless the target index is in `1..items.len()`. Returns whether
/// the exchange happened.
pub fn swap_adjacent<T>(items: &mut [T], position: usize, movement: Movement) -> bool {
    let target = position as isize + movement.offset();
    if target > 0 && (target as usize) < items.len() {
        items.swap(position, target as usize);
        true
    } else {
        false
    }
}

/// Run `iterations` relocation attempts on the slideshow.
pub fn relocate(slideshow: &mut Slideshow, iterations: usize, rng: &mut ShowRng) -> RelocationStats {
    let mut stats = RelocationStats::default();
    let len = slideshow.len();
    if len < 2 {
        return stats;
    }

    for _ in 0..iterations {
        stats.iterations += 1;
        let p = rng.range_usize(0, len);

        let Some((movement, gain)) = best_move(slideshow, p) else {
            continue;
        };
        if swap_adjacent(slideshow.slides_mut(), p, movement) {
            stats.gain += gain;
            match movement {
                Movement::Back => stats.moved_back += 1,
                Movement::Forward => stats.moved_forward += 1,
            }
        }
    }

    tracing::debug!(
        iterations = stats.iterations,
        accepted = stats.accepted(),
        gain = stats.gain,
        "relocation finished"
    );
    stats
}

/// Evaluate both candidate moves for slide `p` on a copy of its window.
/// Returns the move to apply and its gain, if any improves the window.
fn best_move(slideshow: &Slideshow, p: usize) -> Option<(Movement, u64)> {
    let slides = slideshow.slides();
    let lo = p.saturating_sub(HALF_WIDTH);
    let hi = (p + HALF_WIDTH + 1).min(slides.len());

    let mut window: [Option<&TagSet>; WINDOW_LEN] = [None; WINDOW_LEN];
    for (slot, slide) in window.iter_mut().zip(&slides[lo..hi]) {
        *slot = Some(slide.tags());
    }
    let rel = p.min(HALF_WIDTH);
    let initial = score_window(&window);

    for movement in [Movement::Back, Movement::Forward] {
        let mut candidate = window;
        swap_adjacent(&mut candidate, rel, movement);
        let score = score_window(&candidate);
        if score > initial {
            return Some((movement, score - initial));
        }
    }
    None
}
