// Resume discovery: find the files a screening run will read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

/// How a resume's text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Scanned page that goes through OCR
    Image,
    /// Already-extracted plain text
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub path: PathBuf,
    pub filename: String,
    pub kind: SourceKind,
}

impl ResumeFile {
    /// Describe a single resume path, failing for unsupported extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Resume file not found: {}", path.display());
        }
        let kind = source_kind(path).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported resume type: {} (expected .jpg, .jpeg, .png or .txt)",
                path.display()
            )
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            filename,
            kind,
        })
    }
}

/// Classify a path by extension (case-insensitive).
pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" => Some(SourceKind::Image),
        "txt" => Some(SourceKind::Text),
        _ => None,
    }
}

/// List resumes in `dir`, sorted by filename.
///
/// Only the top level is read unless `recursive` is set. Files with other
/// extensions are skipped.
pub fn discover(dir: &Path, recursive: bool) -> Result<Vec<ResumeFile>> {
    if !dir.is_dir() {
        anyhow::bail!("Resume directory not found: {}", dir.display());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry =
            entry.with_context(|| format!("Failed to read resume directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(kind) = source_kind(path) else {
            debug!(path = %path.display(), "Skipping unsupported file");
            continue;
        };
        files.push(ResumeFile {
            filename: entry.file_name().to_string_lossy().into_owned(),
            path: path.to_path_buf(),
            kind,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_by_extension() {
        assert_eq!(source_kind(Path::new("a.PNG")), Some(SourceKind::Image));
        assert_eq!(source_kind(Path::new("a.jpeg")), Some(SourceKind::Image));
        assert_eq!(source_kind(Path::new("a.Jpg")), Some(SourceKind::Image));
        assert_eq!(source_kind(Path::new("a.txt")), Some(SourceKind::Text));
        assert_eq!(source_kind(Path::new("a.pdf")), None);
        assert_eq!(source_kind(Path::new("README")), None);
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.txt", "c.pdf", "d.JPG"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let files = discover(dir.path(), false).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.png", "d.JPG"]);
        assert_eq!(files[0].kind, SourceKind::Text);
        assert_eq!(files[1].kind, SourceKind::Image);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("top.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("nested").join("deep.txt"), b"x").unwrap();

        assert_eq!(discover(dir.path(), false).unwrap().len(), 1);
        assert_eq!(discover(dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, b"x").unwrap();
        let file = ResumeFile::from_path(&path).unwrap();
        assert_eq!(file.filename, "resume.txt");
        assert_eq!(file.kind, SourceKind::Text);

        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, b"x").unwrap();
        assert!(ResumeFile::from_path(&pdf).is_err());
        assert!(ResumeFile::from_path(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover(&missing, false).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
