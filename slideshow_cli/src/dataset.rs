// Dataset file parsing.
//
// Format: the first line holds the declared photo count; every following
// non-blank line describes one photo as `H|V <tag count> <tag> <tag> ...`.
// A photo's id is its position among the photo lines, starting at 0.
//
// Tags are interned per dataset (see `TagInterner` in the engine) so the
// optimizers work on integer ids. The declared count is checked against
// the photos actually read by `PhotoCollection::new`; a mismatch is an
// integrity violation, not a parse error.

use slideshow_engine::{IntegrityViolation, Orientation, Photo, PhotoCollection, TagInterner};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
}

fn parse_error(line: usize, message: impl Into<String>) -> DatasetError {
    DatasetError::Parse {
        line,
        message: message.into(),
    }
}

/// Read and parse a dataset file.
pub fn read_dataset(path: &Path) -> Result<PhotoCollection, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read dataset");
    parse_dataset(&text)
}

/// Parse dataset text into a validated photo collection.
pub fn parse_dataset(text: &str) -> Result<PhotoCollection, DatasetError> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "empty dataset: missing photo count"))?;
    let declared: usize = header
        .trim()
        .parse()
        .map_err(|_| parse_error(1, format!("invalid photo count `{}`", header.trim())))?;

    let mut interner = TagInterner::new();
    // Capacity follows the text, not the untrusted header count.
    let mut photos = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(marker) = tokens.next() else {
            continue;
        };
        let orientation = match marker {
            "H" => Orientation::Horizontal,
            "V" => Orientation::Vertical,
            other => {
                return Err(parse_error(
                    line_no,
                    format!("unknown orientation `{other}`, expected H or V"),
                ));
            }
        };
        let stated: usize = tokens
            .next()
            .ok_or_else(|| parse_error(line_no, "missing tag count"))?
            .parse()
            .map_err(|_| parse_error(line_no, "tag count is not a number"))?;
        let tags: Vec<&str> = tokens.collect();
        if tags.len() != stated {
            tracing::warn!(
                line = line_no,
                stated,
                found = tags.len(),
                "tag count disagrees with tags present; using the tags present"
            );
        }

        let id = u32::try_from(photos.len())
            .map_err(|_| parse_error(line_no, "too many photos"))?;
        photos.push(Photo::new(id, orientation, interner.tag_set(tags)));
    }

    tracing::debug!(
        photos = photos.len(),
        distinct_tags = interner.len(),
        "parsed dataset"
    );
    Ok(PhotoCollection::new(declared, photos)?)
}
