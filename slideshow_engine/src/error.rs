// Error types for the slideshow engine.
//
// `IntegrityViolation` is the unrecoverable class: it means the photo data or
// the construction logic is broken (wrong photo count, a photo in two slides,
// a slide mixing orientations). Nothing retries it; the orchestrator stops
// the run and the binary exits non-zero.
//
// `ConfigError` covers configuration values the optimizers cannot work with,
// and `RunError` is what the orchestrator returns, wrapping the above plus
// the failures reported by a `DatasetStore` implementation.

use std::fmt;

/// Which integrity rule was broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegrityKind {
    /// The declared photo count disagrees with the photos actually parsed.
    CountMismatch,
    /// A photo's id is not its position in the collection.
    IndexMismatch,
    /// The same photo appears in more than one slide.
    DuplicatePhoto,
    /// An input photo appears in no slide.
    MissingPhoto,
    /// A slide would mix orientations or hold the same photo twice.
    InvalidSlide,
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegrityKind::CountMismatch => "photo count mismatch",
            IntegrityKind::IndexMismatch => "photo index mismatch",
            IntegrityKind::DuplicatePhoto => "duplicate photo",
            IntegrityKind::MissingPhoto => "missing photo",
            IntegrityKind::InvalidSlide => "invalid slide",
        };
        f.write_str(name)
    }
}

/// An unrecoverable data-integrity failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("integrity violation ({kind}): {detail}")]
pub struct IntegrityViolation {
    pub kind: IntegrityKind,
    pub detail: String,
}

impl IntegrityViolation {
    pub fn new(kind: IntegrityKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// A configuration value outside what the engine accepts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("pairing_window must be at least 1")]
    ZeroPairingWindow,
    #[error("reroute_window must be at least 2, got {0}")]
    RerouteWindowTooSmall(usize),
    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Boxed error reported by a `DatasetStore`.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load dataset `{dataset}`: {source}")]
    Load {
        dataset: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to write result for `{dataset}`: {source}")]
    Write {
        dataset: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RunError {
    /// The integrity violation behind this error, if that is what it is.
    pub fn integrity(&self) -> Option<&IntegrityViolation> {
        match self {
            RunError::Integrity(v) => Some(v),
            _ => None,
        }
    }
}
