/*
 * This crate is the portable platform layer an application builds on: it
 * consolidates filesystem operations, error-code translation, path-scope
 * resolution, and background-worker lifecycle management behind OS-agnostic
 * interfaces (including abstractions like `PlatformFsOperations`,
 * `DirectoryWalkerOperations`, and `PathResolverOperations`), so upper
 * layers never touch OS-specific APIs directly. It re-exports the key data
 * structures and component seams from each module.
 */
#![feature(io_error_more)]
pub mod dir_walker;
pub mod error;
pub mod path_resolver;
pub mod platform_fs;
pub mod types;
pub mod worker_pool;

// Re-export the error taxonomy
pub use error::{FsErrorKind, FsResult};

// Re-export shared filesystem types
pub use types::{FileType, FileTypeMask, TypedDirEntry};

// Re-export the OS shim seam
pub use platform_fs::{CorePlatformFs, PlatformFsOperations};

// Re-export directory walking
pub use dir_walker::{CoreDirectoryWalker, DirectoryWalkerOperations};

// Re-export path-scope resolution
pub use path_resolver::{
    CorePathResolver, DEFAULT_SEARCH_SCOPE, PathResolverOperations, ResolveError, RootDirs,
};

// Re-export the worker pool
pub use worker_pool::{WorkUnit, WorkerPoolManager, WorkerRole};
