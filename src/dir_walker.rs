/*
 * This module provides the portable directory-walking operations: listing by
 * extension, listing by type mask, recursive enumeration of regular files,
 * recursive best-effort deletion, and checked directory creation. Every
 * listing flows through the OS shim's single pattern-listing primitive, and
 * every classification through its metadata query, so the semantics here are
 * identical across platforms and fully exercisable against a scripted shim
 * in tests.
 *
 * It includes a trait for walker operations (`DirectoryWalkerOperations`) to
 * facilitate testing and dependency injection, and a concrete implementation
 * (`CoreDirectoryWalker`).
 */
use crate::error::FsErrorKind;
use crate::platform_fs::PlatformFsOperations;
use crate::types::{FileType, FileTypeMask, TypedDirEntry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// True for the `.` / `..` pseudo-entries, which never count as real children.
fn is_special_dir_name(name: &str) -> bool {
    name == "." || name == ".."
}

pub trait DirectoryWalkerOperations: Send + Sync {
    fn list_by_extension(&self, dir: &Path, ext: &str) -> Vec<String>;
    fn list_by_type_mask(&self, dir: &Path, mask: FileTypeMask) -> Vec<TypedDirEntry>;
    fn list_recursively(&self, dir: &Path) -> Vec<PathBuf>;
    fn remove_tree_recursively(&self, dir: &Path) -> bool;
    fn create_dir_checked(&self, dir: &Path) -> bool;
}

/*
 * The core implementation of `DirectoryWalkerOperations`. It owns no state
 * beyond a handle to the OS shim; all operations are synchronous and leave
 * concurrent-access serialization to the caller.
 */
pub struct CoreDirectoryWalker {
    fs: Arc<dyn PlatformFsOperations>,
}

impl CoreDirectoryWalker {
    pub fn new(fs: Arc<dyn PlatformFsOperations>) -> Self {
        CoreDirectoryWalker { fs }
    }

    /*
     * Lists all entries of `dir`, logging and returning an empty list when
     * the directory itself cannot be read. Listing failure is not fatal to
     * the composite operations built on top; they observe the absence of
     * entries and report failure through their own contracts.
     */
    fn list_all(&self, dir: &Path) -> Vec<String> {
        match self.fs.list_directory_by_pattern(dir, ".*") {
            Ok(names) => names,
            Err(kind) => {
                log::debug!("DirectoryWalker: Can't list {dir:?}: {kind}");
                Vec::new()
            }
        }
    }

    fn collect_recursively(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let regular_entries = self.list_by_type_mask(dir, FileTypeMask::REGULAR);
        for entry in &regular_entries {
            assert_eq!(
                entry.file_type,
                FileType::Regular,
                "dir: {dir:?}, file: {}",
                entry.name
            );
            files.push(dir.join(&entry.name));
        }

        let subdir_entries = self.list_by_type_mask(dir, FileTypeMask::DIRECTORY);
        for entry in &subdir_entries {
            assert_eq!(
                entry.file_type,
                FileType::Directory,
                "dir: {dir:?}, subdir: {}",
                entry.name
            );
            if is_special_dir_name(&entry.name) {
                continue;
            }
            self.collect_recursively(&dir.join(&entry.name), files);
        }
    }
}

impl DirectoryWalkerOperations for CoreDirectoryWalker {
    /*
     * Lists the entries of `dir` whose name ends in the literal extension
     * `ext` (leading dot required). `.mwm` matches neither `.mwmx` nor
     * `.xmwm`; the extension is escaped and anchored at end-of-name.
     */
    fn list_by_extension(&self, dir: &Path, ext: &str) -> Vec<String> {
        assert!(
            ext.starts_with('.'),
            "DirectoryWalker: extension must start with '.', got '{ext}'"
        );

        let pattern = format!("{}$", regex::escape(ext));
        match self.fs.list_directory_by_pattern(dir, &pattern) {
            Ok(names) => names,
            Err(kind) => {
                log::debug!("DirectoryWalker: Can't list {dir:?} by extension '{ext}': {kind}");
                Vec::new()
            }
        }
    }

    /*
     * Lists all entries of `dir`, classifies each, and keeps those whose
     * type intersects `mask`. Entries whose classification fails are
     * skipped, not reported: a transient or permission-denied entry drops
     * out of the listing while the rest goes through.
     */
    fn list_by_type_mask(&self, dir: &Path, mask: FileTypeMask) -> Vec<TypedDirEntry> {
        let mut entries = Vec::new();
        for name in self.list_all(dir) {
            let file_type = match self.fs.query_file_metadata(&dir.join(&name)) {
                Ok(file_type) => file_type,
                Err(kind) => {
                    // Deliberate skip-and-continue: per-entry classification
                    // failures must not abort the listing.
                    log::trace!("DirectoryWalker: Skipping {name:?} in {dir:?}: {kind}");
                    continue;
                }
            };
            if mask.matches(file_type) {
                entries.push(TypedDirEntry::new(name, file_type));
            }
        }
        entries
    }

    /*
     * Flattens every regular file anywhere under `dir` into full paths,
     * depth-first: the files directly under a directory come before those of
     * its subdirectories. Ordering within a directory follows the shim's
     * listing order and is otherwise unspecified. Directory paths themselves
     * never appear in the result.
     */
    fn list_recursively(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.collect_recursively(dir, &mut files);
        files
    }

    /*
     * Deletes the tree rooted at `dir`, best-effort: every entry is
     * attempted regardless of earlier failures, and the aggregate result is
     * true only if every individual deletion (including `dir` itself at the
     * end) succeeded. One locked file must not prevent deletion of its
     * siblings. Refuses the empty path and the `.` / `..` pseudo-names
     * outright.
     */
    fn remove_tree_recursively(&self, dir: &Path) -> bool {
        if dir.as_os_str().is_empty() || dir == Path::new(".") || dir == Path::new("..") {
            log::warn!("DirectoryWalker: Refusing to remove {dir:?}");
            return false;
        }

        let mut res = true;

        for name in self.list_all(dir) {
            let path = dir.join(&name);

            let file_type = match self.fs.query_file_metadata(&path) {
                Ok(file_type) => file_type,
                // Unclassifiable entries are skipped; the final removal of
                // `dir` reports the aggregate failure if they still exist.
                Err(_) => continue,
            };

            if file_type == FileType::Directory {
                if !is_special_dir_name(&name) && !self.remove_tree_recursively(&path) {
                    res = false;
                }
            } else if !self.fs.delete_file(&path) {
                res = false;
            }
        }

        let removed = self.fs.delete_empty_directory(dir);
        if !removed.is_ok() {
            log::debug!("DirectoryWalker: Can't remove directory {dir:?}: {removed}");
            res = false;
        }

        res
    }

    /*
     * Creates `dir`, treating an already-existing directory as success. An
     * existing non-directory entry under the same name, or any other
     * creation failure, is logged and reported as failure.
     */
    fn create_dir_checked(&self, dir: &Path) -> bool {
        match self.fs.create_directory(dir) {
            FsErrorKind::Ok => true,
            FsErrorKind::FileAlreadyExists => {
                let Some(file_type) = self.fs.file_type_checked(dir) else {
                    return false;
                };
                if file_type != FileType::Directory {
                    log::error!(
                        "DirectoryWalker: {dir:?} exists, but is not a directory: {file_type:?}"
                    );
                    return false;
                }
                true
            }
            kind => {
                log::error!("DirectoryWalker: {dir:?} can't be created: {kind}");
                false
            }
        }
    }
}
