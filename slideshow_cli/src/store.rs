// File-system dataset store.
//
// `FileStore` reads dataset files from a data directory and writes result
// files into an output directory. It is the `DatasetStore` the binary hands
// to `slideshow_engine::run`; tests use it against temporary directories.
//
// Integrity violations from parsing or writing are passed up unwrapped so
// the engine reports them as integrity failures rather than plain I/O
// errors.

use crate::dataset::{DatasetError, read_dataset};
use crate::output::{OutputError, write_slideshow};
use slideshow_engine::{DatasetStore, PhotoCollection, Slideshow, StoreError};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    out_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl DatasetStore for FileStore {
    fn load(&self, dataset: &str) -> Result<PhotoCollection, StoreError> {
        read_dataset(&self.data_dir.join(dataset)).map_err(|e| match e {
            DatasetError::Integrity(v) => Box::new(v) as StoreError,
            other => Box::new(other),
        })
    }

    fn write(&self, dataset: &str, slideshow: &Slideshow, score: u64) -> Result<PathBuf, StoreError> {
        write_slideshow(&self.out_dir, dataset, slideshow, score).map_err(|e| match e {
            OutputError::Integrity(v) => Box::new(v) as StoreError,
            other => Box::new(other),
        })
    }
}
