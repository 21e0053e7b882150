// Chunked greedy re-router.
//
// Randomized hill climbing over larger windows. Each iteration picks a
// contiguous window of `window` slides, computes the pairwise transition
// matrix over it, and rebuilds the window as a greedy nearest-neighbour
// path: the window's first and last slides stay where they are (so the
// transitions into and out of the window are unchanged), and from the first
// slide the path repeatedly steps to the unused slide with the highest
// transition score. The rebuilt window replaces the live one only when its
// score is strictly higher, so the full slideshow's score never drops.
//
// Ties in the greedy step go to the lowest window index, which makes a run
// fully reproducible from its seed. The matrix diagonal holds a sentinel
// far below any real score so a slide never steps to itself.

use crate::scoring::{interest_factor, total_score};
use crate::slide::{Slide, Slideshow};
use slideshow_prng::ShowRng;

/// Diagonal value of the transition matrix.
const SELF_TRANSITION: i64 = i64::MIN / 2;

/// Statistics from a re-routing run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RerouteStats {
    pub iterations: usize,
    pub accepted: usize,
    /// Sum of the window gains of all accepted re-routes.
    pub gain: u64,
}

/// Symmetric K×K matrix of transition scores between a window's slides.
#[derive(Clone, Debug)]
pub struct TransitionMatrix {
    size: usize,
    scores: Vec<i64>,
}

impl TransitionMatrix {
    pub fn build(slides: &[Slide]) -> Self {
        let size = slides.len();
        let mut scores = vec![0; size * size];
        for i in 0..size {
            scores[i * size + i] = SELF_TRANSITION;
            for j in (i + 1)..size {
                let s = i64::from(interest_factor(slides[i].tags(), slides[j].tags()));
                scores[i * size + j] = s;
                scores[j * size + i] = s;
            }
        }
        Self { size, scores }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.scores[from * self.size + to]
    }

    /// The untaken slide with the best transition from `from`; lowest index
    /// wins ties.
    fn best_untaken(&self, from: usize, taken: &[bool]) -> Option<usize> {
        let row = &self.scores[from * self.size..(from + 1) * self.size];
        let mut best: Option<(usize, i64)> = None;
        for (to, &score) in row.iter().enumerate() {
            if taken[to] {
                continue;
            }
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((to, score));
            }
        }
        best.map(|(to, _)| to)
    }

    /// Score of visiting the window's slides in `path` order.
    pub fn path_score(&self, path: &[usize]) -> i64 {
        path.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// Greedy nearest-neighbour path from slide 0 to slide `size - 1`, visiting
/// every slide once. Both endpoints stay pinned.
pub fn greedy_path(matrix: &TransitionMatrix) -> Vec<usize> {
    let size = matrix.size();
    match size {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let last = size - 1;
    let mut taken = vec![false; size];
    taken[0] = true;
    taken[last] = true;

    let mut path = Vec::with_capacity(size);
    path.push(0);
    let mut current = 0;
    while let Some(next) = matrix.best_untaken(current, &taken) {
        taken[next] = true;
        path.push(next);
        current = next;
    }
    path.push(last);
    path
}

/// Re-route one window. Returns the reordered slides and their gain when the
/// greedy path beats the current order.
pub fn reroute_window(window: &[Slide]) -> Option<(Vec<Slide>, u64)> {
    let baseline = total_score(window);
    let matrix = TransitionMatrix::build(window);
    let path = greedy_path(&matrix);
    let candidate = u64::try_from(matrix.path_score(&path)).ok()?;
    if candidate <= baseline {
        return None;
    }
    let reordered = path.iter().map(|&i| window[i].clone()).collect();
    Some((reordered, candidate - baseline))
}

/// Run `iterations` re-routing attempts with windows of `window` slides.
/// Does nothing unless the slideshow is longer than one window.
pub fn reroute(
    slideshow: &mut Slideshow,
    window: usize,
    iterations: usize,
    rng: &mut ShowRng,
) -> RerouteStats {
    let mut stats = RerouteStats::default();
    let len = slideshow.len();
    if window < 2 || len <= window {
        return stats;
    }

    for _ in 0..iterations {
        stats.iterations += 1;
        let start = rng.range_usize_inclusive(0, len - window);
        let range = start..start + window;

        if let Some((reordered, gain)) = reroute_window(&slideshow.slides()[range.clone()]) {
            for (slot, slide) in slideshow.slides_mut()[range].iter_mut().zip(reordered) {
                *slot = slide;
            }
            stats.accepted += 1;
            stats.gain += gain;
        }
    }

    tracing::debug!(
        iterations = stats.iterations,
        accepted = stats.accepted,
        gain = stats.gain,
        window,
        "re-routing finished"
    );
    stats
}
