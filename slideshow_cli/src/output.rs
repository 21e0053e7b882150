// Result file writing.
//
// A result file holds the slide count on its first line, then one line per
// slide listing its photo ids separated by single spaces. Files are named
// `<timestamp>_<dataset stem>_<score>.txt` so repeated runs never overwrite
// each other and the best score is visible from a directory listing.
//
// The no-duplicate-photo invariant is re-checked right before anything is
// written; a violation aborts the write.

use slideshow_engine::{IntegrityViolation, Slideshow};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
}

/// Render a slideshow in the result format.
pub fn format_slideshow(slideshow: &Slideshow) -> String {
    let mut out = format!("{}\n", slideshow.len());
    for slide in slideshow.slides() {
        let ids: Vec<String> = slide.photos().iter().map(|p| p.to_string()).collect();
        out.push_str(&ids.join(" "));
        out.push('\n');
    }
    out
}

/// File name for a result: `<timestamp>_<dataset stem>_<score>.txt`.
pub fn result_file_name(dataset: &str, score: u64, timestamp: &str) -> String {
    let stem = Path::new(dataset)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| dataset.to_string());
    format!("{timestamp}_{stem}_{score}.txt")
}

/// Validate and write a slideshow into `out_dir`, creating it if needed.
pub fn write_slideshow(
    out_dir: &Path,
    dataset: &str,
    slideshow: &Slideshow,
    score: u64,
) -> Result<PathBuf, OutputError> {
    slideshow.ensure_unique()?;

    std::fs::create_dir_all(out_dir).map_err(|source| OutputError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
    let path = out_dir.join(result_file_name(dataset, score, &timestamp));
    std::fs::write(&path, format_slideshow(slideshow)).map_err(|source| OutputError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideshow_engine::{IntegrityKind, Orientation, Photo, Slide, TagSet};

    fn vertical(id: u32) -> Photo {
        Photo::new(id, Orientation::Vertical, TagSet::new())
    }

    #[test]
    fn formats_one_line_per_slide() {
        let show = Slideshow::new(vec![
            Slide::single(&Photo::new(0, Orientation::Horizontal, TagSet::new())),
            Slide::pair(&vertical(1), &vertical(2)).unwrap(),
        ]);
        assert_eq!(format_slideshow(&show), "2\n0\n1 2\n");
    }

    #[test]
    fn empty_slideshow_is_just_a_count() {
        assert_eq!(format_slideshow(&Slideshow::default()), "0\n");
    }

    #[test]
    fn file_name_uses_dataset_stem() {
        assert_eq!(
            result_file_name("b_lovely_landscapes.txt", 202, "20261018120000"),
            "20261018120000_b_lovely_landscapes_202.txt"
        );
        assert_eq!(result_file_name("plain", 0, "t"), "t_plain_0.txt");
    }

    #[test]
    fn refuses_to_write_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let show = Slideshow::new(vec![
            Slide::single(&vertical(1)),
            Slide::pair(&vertical(1), &vertical(2)).unwrap(),
        ]);
        match write_slideshow(dir.path(), "x.txt", &show, 0) {
            Err(OutputError::Integrity(v)) => assert_eq!(v.kind, IntegrityKind::DuplicatePhoto),
            other => panic!("expected integrity violation, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_into_a_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let show = Slideshow::new(vec![Slide::single(&vertical(0))]);
        let path = write_slideshow(&out, "c_memorable_moments.txt", &show, 7).unwrap();
        assert!(path.starts_with(&out));
        assert!(path.to_string_lossy().ends_with("_c_memorable_moments_7.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "1\n0\n");
    }
}
