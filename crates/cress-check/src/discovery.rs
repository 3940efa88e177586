//! Locating feature files on disk.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CheckError;

/// Collect the feature files named by `paths`, sorted and deduplicated.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked recursively for `*.feature` files.
///
/// # Errors
///
/// Returns [`CheckError::MissingPath`] for a path that does not exist and
/// [`CheckError::Walk`] when a directory cannot be read.
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use cress_check::discovery::feature_files;
///
/// for file in feature_files(&[PathBuf::from("tests/features")])? {
///     println!("{}", file.display());
/// }
/// # Ok::<(), cress_check::error::CheckError>(())
/// ```
pub fn feature_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CheckError> {
    let mut files = Vec::new();
    for path in paths {
        gather(path, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn gather(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), CheckError> {
    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    if !path.is_dir() {
        return Err(CheckError::MissingPath(path.to_path_buf()));
    }
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|source| CheckError::Walk {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_feature_file(entry.path()) {
            tracing::debug!(path = %entry.path().display(), "found feature file");
            files.push(entry.into_path());
        }
    }
    Ok(())
}

fn is_feature_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == OsStr::new("feature"))
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail loudly on fixture setup errors")]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("temporary directory");
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("file has a parent"))
                .expect("create parent directories");
            fs::write(&path, "Feature: f\n").expect("write fixture");
        }
        dir
    }

    #[test]
    fn walks_directories_in_path_order() {
        let dir = tree(&["b.feature", "a/z.feature", "a/notes.md", "c/d/e.feature"]);
        let found = feature_files(&[dir.path().to_path_buf()]).expect("walk succeeds");
        let relative: Vec<PathBuf> = found
            .iter()
            .map(|path| path.strip_prefix(dir.path()).expect("inside root").to_path_buf())
            .collect();
        assert_eq!(
            relative,
            [
                PathBuf::from("a/z.feature"),
                PathBuf::from("b.feature"),
                PathBuf::from("c/d/e.feature"),
            ]
        );
    }

    #[test]
    fn explicit_files_are_kept_and_deduplicated() {
        let dir = tree(&["one.feature", "story.txt"]);
        let story = dir.path().join("story.txt");
        let found = feature_files(&[
            story.clone(),
            dir.path().to_path_buf(),
            dir.path().join("one.feature"),
        ])
        .expect("walk succeeds");
        assert_eq!(found, [dir.path().join("one.feature"), story]);
    }

    #[rstest]
    #[case("missing")]
    #[case("missing/inner.feature")]
    fn missing_paths_are_errors(#[case] name: &str) {
        let dir = tree(&[]);
        let result = feature_files(&[dir.path().join(name)]);
        assert!(matches!(result, Err(CheckError::MissingPath(_))));
    }
}
