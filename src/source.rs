//! Content discovery.
//!
//! Walks the content directory and reads every document into a
//! [`SourceDocument`] whose path is relative to the content root.

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use folio_core::SourceDocument;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// Files that are never content.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Dot-prefixed entries below the walk root.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// All files under `dir`, in file-name order.
///
/// Symlinks are followed. Any entry that cannot be walked fails the
/// whole collection.
pub fn collect_all_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let name = entry.file_name().to_str().unwrap_or_default();
        if entry.file_type().is_file() && !IGNORED_FILES.contains(&name) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Document files under the configured content directory.
pub fn collect_documents(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let files = collect_all_files(&config.build.content)?;
    Ok(files.into_iter().filter(|p| config.build.is_document(p)).collect())
}

/// Read `paths` in parallel, keeping their order.
///
/// `on_read` is called once per file read.
pub fn read_sources<F>(content: &Path, paths: &[PathBuf], on_read: F) -> Result<Vec<SourceDocument>>
where
    F: Fn() + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let relative = path.strip_prefix(content).unwrap_or(path);
            on_read();
            Ok(SourceDocument::new(relative, raw))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn config_for(content: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = content.to_path_buf();
        config
    }

    #[test]
    fn test_collect_all_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", "");
        write(dir.path(), "a/z.md", "");
        write(dir.path(), ".DS_Store", "");
        write(dir.path(), ".drafts/hidden.md", "");
        write(dir.path(), ".hidden.md", "");

        let files = collect_all_files(dir.path()).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(rel, vec![PathBuf::from("a/z.md"), PathBuf::from("b.md")]);
    }

    #[test]
    fn test_collect_documents_by_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/js.md", "");
        write(dir.path(), "posts/py.markdown", "");
        write(dir.path(), "posts/cover.png", "");

        let docs = collect_documents(&config_for(dir.path())).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|p| p.extension().unwrap() != "png"));
    }

    #[test]
    fn test_collect_missing_dir_fails() {
        let err = collect_all_files(Path::new("/nonexistent/content")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/content"), "{err:#}");
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_unreadable_entry_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/a.md", "");
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("posts/b.md"))
            .unwrap();

        let err = collect_all_files(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to walk"), "{err:#}");

        let err = collect_documents(&config_for(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("b.md"), "{err:#}");
    }

    #[test]
    fn test_read_sources_relative_paths() {
        let dir = TempDir::new().unwrap();
        let a = write(dir.path(), "posts/a.md", "alpha");
        let b = write(dir.path(), "posts/b.md", "beta");

        let counter = AtomicUsize::new(0);
        let sources = read_sources(dir.path(), &[a, b], || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(counter.load(Ordering::Relaxed), 2);
        assert_eq!(sources[0], SourceDocument::new("posts/a.md", "alpha"));
        assert_eq!(sources[1], SourceDocument::new("posts/b.md", "beta"));
    }

    #[test]
    fn test_read_sources_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.md");

        let err = read_sources(dir.path(), &[missing], || {}).unwrap_err();
        assert!(err.to_string().contains("gone.md"));
    }
}
