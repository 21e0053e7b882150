// Run orchestration.
//
// `optimize` is the per-dataset pipeline: build the initial slideshow,
// re-route windows, relocate single slides, then validate that every photo
// is still in exactly one slide. `run` drives many datasets: one rayon task
// per dataset, each loading its photos through a `DatasetStore`, optimizing
// with a private `ShowRng` stream derived from the run seed and the
// dataset's position in the list, and handing the result back to the store
// for writing. Workers share nothing mutable; the only synchronization is
// the final collect, after which per-dataset scores are summed.
//
// Any integrity violation aborts the run: the error propagates out of the
// parallel collect and `run` returns it without summing partial results.

use crate::builder::build_slideshow;
use crate::config::{RunConfig, SearchConfig};
use crate::error::{IntegrityViolation, RunError, StoreError};
use crate::photo::PhotoCollection;
use crate::relocate::{RelocationStats, relocate};
use crate::reroute::{RerouteStats, reroute};
use crate::slide::Slideshow;
use rayon::prelude::*;
use slideshow_prng::ShowRng;
use std::path::PathBuf;

/// Source of photo collections and sink for finished slideshows.
pub trait DatasetStore: Sync {
    /// Load and validate the photos of the named dataset.
    fn load(&self, dataset: &str) -> Result<PhotoCollection, StoreError>;

    /// Persist a finished slideshow. Returns where it was written.
    fn write(&self, dataset: &str, slideshow: &Slideshow, score: u64) -> Result<PathBuf, StoreError>;
}

/// Result of optimizing one photo collection.
#[derive(Clone, Debug)]
pub struct Optimized {
    pub slideshow: Slideshow,
    pub initial_score: u64,
    pub rerouted_score: u64,
    pub final_score: u64,
    pub reroute: RerouteStats,
    pub relocation: RelocationStats,
}

/// Per-dataset line of a run summary.
#[derive(Clone, Debug)]
pub struct DatasetReport {
    pub dataset: String,
    pub photos: usize,
    pub slides: usize,
    pub initial_score: u64,
    pub rerouted_score: u64,
    pub final_score: u64,
    pub output: PathBuf,
}

/// Outcome of a whole run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub datasets: Vec<DatasetReport>,
    pub total_score: u64,
}

/// Build and optimize the slideshow for one photo collection.
pub fn optimize(
    photos: &PhotoCollection,
    search: &SearchConfig,
    rng: &mut ShowRng,
) -> Result<Optimized, IntegrityViolation> {
    let mut slideshow = build_slideshow(photos, search, rng)?;
    slideshow.validate(photos.len())?;
    let initial_score = slideshow.score();

    let reroute = reroute(
        &mut slideshow,
        search.reroute_window,
        search.reroute_iterations,
        rng,
    );
    let rerouted_score = slideshow.score();

    let relocation = relocate(&mut slideshow, search.relocate_iterations, rng);
    let final_score = slideshow.score();

    slideshow.validate(photos.len())?;
    Ok(Optimized {
        slideshow,
        initial_score,
        rerouted_score,
        final_score,
        reroute,
        relocation,
    })
}

/// Process every configured dataset in parallel and sum their scores.
pub fn run<S: DatasetStore>(config: &RunConfig, store: &S) -> Result<RunSummary, RunError> {
    config.validate()?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if config.threads > 0 {
        pool = pool.num_threads(config.threads);
    }
    let pool = pool.build()?;

    tracing::info!(
        datasets = config.datasets.len(),
        seed = config.seed,
        "starting run"
    );

    let reports = pool.install(|| {
        config
            .datasets
            .par_iter()
            .enumerate()
            .map(|(index, dataset)| run_dataset(config, store, index, dataset))
            .collect::<Result<Vec<_>, RunError>>()
    })?;

    let total_score: u64 = reports.iter().map(|r| r.final_score).sum();
    tracing::info!(total_score, "run finished");
    Ok(RunSummary {
        datasets: reports,
        total_score,
    })
}

fn run_dataset<S: DatasetStore>(
    config: &RunConfig,
    store: &S,
    index: usize,
    dataset: &str,
) -> Result<DatasetReport, RunError> {
    let photos = store.load(dataset).map_err(|source| load_error(dataset, source))?;
    let mut rng = ShowRng::with_stream(config.seed, index as u64);

    let optimized = optimize(&photos, &config.search, &mut rng).inspect_err(|e| {
        tracing::error!(dataset, error = %e, "dataset failed integrity check");
    })?;
    tracing::info!(
        dataset,
        initial = optimized.initial_score,
        after_reroute = optimized.rerouted_score,
        final_score = optimized.final_score,
        "dataset optimized"
    );

    let output = store
        .write(dataset, &optimized.slideshow, optimized.final_score)
        .map_err(|source| write_error(dataset, source))?;
    tracing::info!(dataset, output = %output.display(), "wrote result");

    Ok(DatasetReport {
        dataset: dataset.to_string(),
        photos: photos.len(),
        slides: optimized.slideshow.len(),
        initial_score: optimized.initial_score,
        rerouted_score: optimized.rerouted_score,
        final_score: optimized.final_score,
        output,
    })
}

/// Integrity failures raised inside a store keep their own variant so
/// callers can tell a corrupt dataset or slideshow from an I/O failure.
fn load_error(dataset: &str, source: StoreError) -> RunError {
    match source.downcast::<IntegrityViolation>() {
        Ok(violation) => RunError::Integrity(*violation),
        Err(source) => RunError::Load {
            dataset: dataset.to_string(),
            source,
        },
    }
}

fn write_error(dataset: &str, source: StoreError) -> RunError {
    match source.downcast::<IntegrityViolation>() {
        Ok(violation) => RunError::Integrity(*violation),
        Err(source) => RunError::Write {
            dataset: dataset.to_string(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrityKind;
    use crate::photo::{Orientation, Photo, TagInterner};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory store; writes are recorded instead of touching the file
    /// system.
    #[derive(Default)]
    struct MemoryStore {
        datasets: BTreeMap<String, PhotoCollection>,
        written: Mutex<Vec<(String, Slideshow, u64)>>,
    }

    impl MemoryStore {
        fn with(mut self, name: &str, photos: PhotoCollection) -> Self {
            self.datasets.insert(name.to_string(), photos);
            self
        }
    }

    impl DatasetStore for MemoryStore {
        fn load(&self, dataset: &str) -> Result<PhotoCollection, StoreError> {
            self.datasets
                .get(dataset)
                .cloned()
                .ok_or_else(|| format!("no dataset named {dataset}").into())
        }

        fn write(&self, dataset: &str, slideshow: &Slideshow, score: u64) -> Result<PathBuf, StoreError> {
            slideshow.ensure_unique()?;
            self.written
                .lock()
                .unwrap()
                .push((dataset.to_string(), slideshow.clone(), score));
            Ok(PathBuf::from(format!("mem/{dataset}")))
        }
    }

    fn random_photos(seed: u64, count: u32) -> PhotoCollection {
        let mut rng = ShowRng::new(seed);
        let mut interner = TagInterner::new();
        let photos = (0..count)
            .map(|i| {
                let orientation = if rng.range_usize(0, 2) == 0 {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let names: Vec<String> = (0..rng.range_usize_inclusive(1, 8))
                    .map(|_| format!("t{}", rng.range_usize(0, 25)))
                    .collect();
                Photo::new(i, orientation, interner.tag_set(names.iter().map(String::as_str)))
            })
            .collect();
        PhotoCollection::new(count as usize, photos).unwrap()
    }

    fn small_search() -> SearchConfig {
        SearchConfig {
            reroute_window: 10,
            reroute_iterations: 300,
            relocate_iterations: 300,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn optimize_improves_and_keeps_photos() {
        let photos = random_photos(4, 150);
        let out = optimize(&photos, &small_search(), &mut ShowRng::new(9)).unwrap();
        assert!(out.rerouted_score >= out.initial_score);
        assert!(out.final_score >= out.rerouted_score);
        assert!(out.final_score > out.initial_score);
        assert_eq!(out.final_score, out.slideshow.score());
        assert_eq!(out.final_score - out.rerouted_score, out.relocation.gain);
        assert_eq!(out.rerouted_score - out.initial_score, out.reroute.gain);
        assert!(out.slideshow.validate(150).is_ok());
    }

    #[test]
    fn optimize_handles_empty_collection() {
        let photos = PhotoCollection::new(0, Vec::new()).unwrap();
        let out = optimize(&photos, &SearchConfig::default(), &mut ShowRng::new(1)).unwrap();
        assert!(out.slideshow.is_empty());
        assert_eq!(out.final_score, 0);
    }

    #[test]
    fn run_sums_dataset_scores() {
        let store = MemoryStore::default()
            .with("one", random_photos(1, 80))
            .with("two", random_photos(2, 60))
            .with("three", random_photos(3, 5));
        let config = RunConfig {
            datasets: vec!["one".into(), "two".into(), "three".into()],
            threads: 2,
            search: small_search(),
            ..RunConfig::default()
        };
        let summary = run(&config, &store).unwrap();
        assert_eq!(summary.datasets.len(), 3);
        assert_eq!(
            summary.total_score,
            summary.datasets.iter().map(|d| d.final_score).sum::<u64>()
        );
        let names: Vec<&str> = summary.datasets.iter().map(|d| d.dataset.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert_eq!(store.written.lock().unwrap().len(), 3);
        assert_eq!(summary.datasets[0].output, PathBuf::from("mem/one"));
    }

    #[test]
    fn run_is_reproducible_for_a_seed() {
        let make_store = || {
            MemoryStore::default()
                .with("a", random_photos(10, 120))
                .with("b", random_photos(11, 120))
        };
        let config = RunConfig {
            datasets: vec!["a".into(), "b".into()],
            seed: 1234,
            search: small_search(),
            ..RunConfig::default()
        };
        let (first, second) = (make_store(), make_store());
        let s1 = run(&config, &first).unwrap();
        let s2 = run(&config, &second).unwrap();
        assert_eq!(s1.total_score, s2.total_score);

        let mut w1 = first.written.into_inner().unwrap();
        let mut w2 = second.written.into_inner().unwrap();
        w1.sort_by(|a, b| a.0.cmp(&b.0));
        w2.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(w1, w2);
    }

    #[test]
    fn missing_dataset_is_a_load_error() {
        let store = MemoryStore::default();
        let config = RunConfig {
            datasets: vec!["ghost".into()],
            search: small_search(),
            ..RunConfig::default()
        };
        match run(&config, &store) {
            Err(RunError::Load { dataset, .. }) => assert_eq!(dataset, "ghost"),
            other => panic!("expected load error, got {other:?}"),
        }
    }

    #[test]
    fn integrity_failure_while_loading_keeps_its_kind() {
        struct Corrupt;
        impl DatasetStore for Corrupt {
            fn load(&self, _dataset: &str) -> Result<PhotoCollection, StoreError> {
                Err(PhotoCollection::new(3, Vec::new()).unwrap_err().into())
            }
            fn write(&self, _: &str, _: &Slideshow, _: u64) -> Result<PathBuf, StoreError> {
                unreachable!("nothing to write")
            }
        }
        let config = RunConfig {
            datasets: vec!["bad".into()],
            ..RunConfig::default()
        };
        let err = run(&config, &Corrupt).unwrap_err();
        assert_eq!(err.integrity().map(|v| v.kind), Some(IntegrityKind::CountMismatch));
    }

    #[test]
    fn integrity_failure_while_writing_keeps_its_kind() {
        struct RejectingWriter(MemoryStore);
        impl DatasetStore for RejectingWriter {
            fn load(&self, dataset: &str) -> Result<PhotoCollection, StoreError> {
                self.0.load(dataset)
            }
            fn write(&self, _: &str, _: &Slideshow, _: u64) -> Result<PathBuf, StoreError> {
                Err(IntegrityViolation::new(IntegrityKind::DuplicatePhoto, "photo 0 twice").into())
            }
        }
        let store = RejectingWriter(MemoryStore::default().with("x", random_photos(5, 20)));
        let config = RunConfig {
            datasets: vec!["x".into()],
            search: small_search(),
            ..RunConfig::default()
        };
        let err = run(&config, &store).unwrap_err();
        assert!(matches!(err, RunError::Integrity(_)));
        assert_eq!(err.integrity().map(|v| v.kind), Some(IntegrityKind::DuplicatePhoto));
    }

    #[test]
    fn plain_write_failure_is_a_write_error() {
        struct ReadOnly(MemoryStore);
        impl DatasetStore for ReadOnly {
            fn load(&self, dataset: &str) -> Result<PhotoCollection, StoreError> {
                self.0.load(dataset)
            }
            fn write(&self, _: &str, _: &Slideshow, _: u64) -> Result<PathBuf, StoreError> {
                Err("disk full".into())
            }
        }
        let store = ReadOnly(MemoryStore::default().with("x", random_photos(6, 20)));
        let config = RunConfig {
            datasets: vec!["x".into()],
            search: small_search(),
            ..RunConfig::default()
        };
        match run(&config, &store) {
            Err(RunError::Write { dataset, .. }) => assert_eq!(dataset, "x"),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let store = MemoryStore::default().with("one", random_photos(1, 10));
        let mut config = RunConfig {
            datasets: vec!["one".into()],
            ..RunConfig::default()
        };
        config.search.pairing_window = 0;
        assert!(matches!(run(&config, &store), Err(RunError::Config(_))));
        assert!(store.written.lock().unwrap().is_empty());
    }
}
