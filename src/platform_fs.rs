/*
 * This module defines the OS shim boundary for the filesystem layer. All
 * platform-specific filesystem access goes through the
 * `PlatformFsOperations` trait, so that the walker and resolver components
 * above it never touch OS APIs directly and tests can substitute a scripted
 * double for fault injection.
 *
 * It includes a trait-based approach (`PlatformFsOperations`) mirroring the
 * other component seams in this crate, and the concrete `CorePlatformFs`
 * implementation backed by `std::fs`, which is what production callers use.
 */
use crate::error::{FsErrorKind, FsResult};
use crate::types::FileType;
use regex::Regex;
use std::fs;
use std::path::Path;

/*
 * The portable filesystem primitives supplied by the OS shim. Contracts:
 *
 * - `query_file_metadata` classifies a path, following symlinks the way a
 *   stat-like call does; on failure the classification is absent, never a
 *   default value.
 * - `list_directory_by_pattern` returns the names (relative to `dir`) of
 *   all entries whose name matches the given regular expression, in
 *   unspecified order. The `.` and `..` pseudo-entries may appear on
 *   platforms whose raw iteration surfaces them; type-classifying callers
 *   filter them. An invalid pattern is a programming error at the call
 *   site and panics with a diagnostic rather than being reported as an
 *   I/O condition.
 * - `delete_file`, `create_directory`, `delete_empty_directory` are thin
 *   mutation primitives returning mapped error kinds (or a bare success
 *   flag for `delete_file`, whose callers aggregate rather than inspect).
 *
 * The trait also carries the file-type convenience queries as default
 * methods, since every implementation derives them from
 * `query_file_metadata` the same way.
 */
pub trait PlatformFsOperations: Send + Sync {
    fn query_file_metadata(&self, path: &Path) -> FsResult<FileType>;
    fn list_directory_by_pattern(&self, dir: &Path, pattern: &str) -> FsResult<Vec<String>>;
    fn delete_file(&self, path: &Path) -> bool;
    fn create_directory(&self, path: &Path) -> FsErrorKind;
    fn delete_empty_directory(&self, path: &Path) -> FsErrorKind;

    /*
     * Classifies a path, logging and discarding the error kind on failure.
     * Callers that need the precise failure kind use `query_file_metadata`
     * directly.
     */
    fn file_type_checked(&self, path: &Path) -> Option<FileType> {
        match self.query_file_metadata(path) {
            Ok(file_type) => Some(file_type),
            Err(kind) => {
                log::error!("PlatformFs: Can't determine file type for {path:?}: {kind}");
                None
            }
        }
    }

    /*
     * Returns true only when `path` exists and is a directory. A failed
     * metadata query also yields false; the two cases are indistinguishable
     * here on purpose, preserved for compatibility with long-standing
     * callers. Use `query_file_metadata` when the distinction matters.
     */
    fn is_directory(&self, path: &Path) -> bool {
        matches!(self.query_file_metadata(path), Ok(FileType::Directory))
    }
}

/*
 * The production implementation of `PlatformFsOperations`, backed by
 * `std::fs`. Pattern listing compiles the pattern once per call and applies
 * it to entry file names with search semantics, so callers anchor with `$`
 * (or `^`) where they need it.
 */
pub struct CorePlatformFs {}

impl CorePlatformFs {
    pub fn new() -> Self {
        CorePlatformFs {}
    }
}

impl Default for CorePlatformFs {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformFsOperations for CorePlatformFs {
    fn query_file_metadata(&self, path: &Path) -> FsResult<FileType> {
        match fs::metadata(path) {
            Ok(metadata) => {
                let file_type = if metadata.is_file() {
                    FileType::Regular
                } else if metadata.is_dir() {
                    FileType::Directory
                } else {
                    FileType::Other
                };
                Ok(file_type)
            }
            Err(e) => Err(FsErrorKind::from_io(&e)),
        }
    }

    fn list_directory_by_pattern(&self, dir: &Path, pattern: &str) -> FsResult<Vec<String>> {
        let matcher = Regex::new(pattern).unwrap_or_else(|e| {
            panic!("PlatformFs: invalid listing pattern '{pattern}': {e}");
        });

        let read_dir = match fs::read_dir(dir) {
            Ok(iter) => iter,
            Err(e) => {
                let kind = FsErrorKind::from_io(&e);
                log::debug!("PlatformFs: Can't list directory {dir:?}: {kind}");
                return Err(kind);
            }
        };

        let mut names = Vec::new();
        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    // A single unreadable entry does not abort the listing.
                    log::warn!(
                        "PlatformFs: Skipping unreadable entry in {dir:?}: {}",
                        FsErrorKind::from_io(&e)
                    );
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if matcher.is_match(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn delete_file(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "PlatformFs: Can't delete file {path:?}: {}",
                    FsErrorKind::from_io(&e)
                );
                false
            }
        }
    }

    fn create_directory(&self, path: &Path) -> FsErrorKind {
        match fs::create_dir(path) {
            Ok(()) => FsErrorKind::Ok,
            Err(e) => FsErrorKind::from_io(&e),
        }
    }

    fn delete_empty_directory(&self, path: &Path) -> FsErrorKind {
        match fs::remove_dir(path) {
            Ok(()) => FsErrorKind::Ok,
            Err(e) => FsErrorKind::from_io(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_query_file_metadata_classifies_files_and_directories() {
        // Arrange
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        File::create(&file_path).unwrap().sync_all().unwrap();
        let fs_shim = CorePlatformFs::new();

        // Act & Assert
        assert_eq!(
            fs_shim.query_file_metadata(&file_path),
            Ok(FileType::Regular)
        );
        assert_eq!(
            fs_shim.query_file_metadata(dir.path()),
            Ok(FileType::Directory)
        );
    }

    #[test]
    fn test_query_file_metadata_missing_path_reports_kind() {
        let fs_shim = CorePlatformFs::new();
        let result = fs_shim.query_file_metadata(Path::new("this_path_does_not_exist_hopefully"));
        assert_eq!(result, Err(FsErrorKind::FileDoesNotExist));
    }

    #[test]
    fn test_is_directory_swallows_query_failures() {
        // Documented quirk: a nonexistent path and a regular file are both
        // reported as "not a directory"; the error kind is unavailable here.
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        File::create(&file_path).unwrap().sync_all().unwrap();
        let fs_shim = CorePlatformFs::new();

        assert!(fs_shim.is_directory(dir.path()));
        assert!(!fs_shim.is_directory(&file_path));
        assert!(
            !fs_shim.is_directory(Path::new("this_path_does_not_exist_hopefully")),
            "A failed metadata query must read as 'not a directory', by contract"
        );
    }

    #[test]
    fn test_list_directory_by_pattern_matches_entry_names() {
        // Arrange
        let dir = tempdir().unwrap();
        for name in ["one.mwm", "two.mwm", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap().sync_all().unwrap();
        }
        let fs_shim = CorePlatformFs::new();

        // Act
        let mut all = fs_shim.list_directory_by_pattern(dir.path(), ".*").unwrap();
        let mut maps = fs_shim
            .list_directory_by_pattern(dir.path(), r"\.mwm$")
            .unwrap();
        all.sort();
        maps.sort();

        // Assert
        assert_eq!(all, vec!["notes.txt", "one.mwm", "two.mwm"]);
        assert_eq!(maps, vec!["one.mwm", "two.mwm"]);
    }

    #[test]
    fn test_list_directory_by_pattern_missing_directory_is_an_error() {
        let fs_shim = CorePlatformFs::new();
        let result = fs_shim
            .list_directory_by_pattern(Path::new("this_path_does_not_exist_hopefully"), ".*");
        assert_eq!(result, Err(FsErrorKind::FileDoesNotExist));
    }

    #[test]
    #[should_panic(expected = "invalid listing pattern")]
    fn test_invalid_pattern_is_a_programming_error() {
        let dir = tempdir().unwrap();
        let fs_shim = CorePlatformFs::new();
        let _ = fs_shim.list_directory_by_pattern(dir.path(), "([unclosed");
    }

    #[test]
    fn test_mutation_primitives_report_mapped_kinds() {
        // Arrange
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        let fs_shim = CorePlatformFs::new();

        // Act & Assert: create, then create again, then remove.
        assert_eq!(fs_shim.create_directory(&sub), FsErrorKind::Ok);
        assert_eq!(
            fs_shim.create_directory(&sub),
            FsErrorKind::FileAlreadyExists
        );

        let inner = sub.join("inner.txt");
        File::create(&inner).unwrap().sync_all().unwrap();
        assert_eq!(
            fs_shim.delete_empty_directory(&sub),
            FsErrorKind::DirectoryNotEmpty,
            "A populated directory must not be removable via the empty-directory primitive"
        );

        assert!(fs_shim.delete_file(&inner));
        assert!(
            !fs_shim.delete_file(&inner),
            "Deleting an already-deleted file must report failure"
        );
        assert_eq!(fs_shim.delete_empty_directory(&sub), FsErrorKind::Ok);
    }
}
