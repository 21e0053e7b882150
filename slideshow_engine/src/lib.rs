// slideshow_engine: slide construction and ordering for tagged photos.
//
// Turns an unordered collection of tagged photos into an ordered slideshow
// that scores well under the interest rule (see `scoring.rs`), using cheap
// heuristics and randomized local search rather than an exact solver.
// The crate does no file I/O: photos come in through a `DatasetStore`
// implementation and finished slideshows go back out through it.
//
// Module overview:
// - `photo.rs`:    PhotoId, Orientation, interned TagSet, PhotoCollection.
// - `slide.rs`:    Slide (one horizontal or one/two vertical photos) and the
//                  Slideshow sequence with its coverage checks.
// - `scoring.rs`:  Interest factor between tag sets and slideshow totals.
// - `builder.rs`:  Initial slides: singleton horizontals, paired verticals.
// - `reroute.rs`:  Chunked greedy re-router (nearest-neighbour windows).
// - `relocate.rs`: Window relocation optimizer (single-slide exchanges).
// - `run.rs`:      Per-dataset pipeline and the parallel multi-dataset run.
// - `config.rs`:   RunConfig / SearchConfig, loadable from JSON.
// - `error.rs`:    IntegrityViolation, ConfigError, RunError.
// - `prng`:        Re-exported from `slideshow_prng`; the seedable generator
//                  every randomized step takes as an explicit argument.

pub mod builder;
pub mod config;
pub mod error;
pub mod photo;
pub use slideshow_prng as prng;
pub mod relocate;
pub mod reroute;
pub mod run;
pub mod scoring;
pub mod slide;

pub use config::{PairingStrategy, RunConfig, SearchConfig};
pub use error::{ConfigError, IntegrityKind, IntegrityViolation, RunError, StoreError};
pub use photo::{Orientation, Photo, PhotoCollection, PhotoId, TagId, TagInterner, TagSet};
pub use run::{DatasetReport, DatasetStore, Optimized, RunSummary, optimize, run};
pub use slide::{Slide, Slideshow};
