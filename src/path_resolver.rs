/*
 * This module resolves logical file names to physical paths across the
 * process's root directories. A small ordered scope string selects which
 * roots are searched and in what priority; the first existing candidate
 * wins. The roots themselves live in an explicitly constructed `RootDirs`
 * value passed to the resolver at construction time, never in ambient
 * globals, so multiple isolated instances can coexist in tests.
 *
 * It includes a trait for resolver operations (`PathResolverOperations`) to
 * facilitate testing and dependency injection, and a concrete implementation
 * (`CorePathResolver`).
 */
use crate::platform_fs::PlatformFsOperations;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Scope searched when the caller passes an empty specifier.
pub const DEFAULT_SEARCH_SCOPE: &str = "wrf";

/*
 * The three root directories a process resolves logical file names against:
 * `writable` for user data the application may modify, `resource` for
 * read-only bundled data, and `settings` for configuration. Set once during
 * process initialization and read many times thereafter.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDirs {
    writable: PathBuf,
    resource: PathBuf,
    settings: PathBuf,
}

impl RootDirs {
    pub fn new(
        writable: impl Into<PathBuf>,
        resource: impl Into<PathBuf>,
        settings: impl Into<PathBuf>,
    ) -> Self {
        RootDirs {
            writable: writable.into(),
            resource: resource.into(),
            settings: settings.into(),
        }
    }

    /*
     * Derives default roots from the platform's standard directories for
     * `app_name` and ensures they exist, creating them if necessary.
     * Returns `None` when the platform reports no suitable location or a
     * directory cannot be created.
     */
    pub fn discover(app_name: &str) -> Option<Self> {
        log::trace!("RootDirs: Discovering standard directories for '{app_name}'");
        let proj_dirs = ProjectDirs::from("", "", app_name)?;
        let writable = proj_dirs.data_local_dir();
        let resource = proj_dirs.data_dir();
        let settings = proj_dirs.config_local_dir();

        for dir in [writable, resource, settings] {
            if !dir.exists() {
                if let Err(e) = fs::create_dir_all(dir) {
                    log::error!("RootDirs: Failed to create root directory {dir:?}: {e}");
                    return None;
                }
                log::debug!("RootDirs: Created root directory {dir:?}");
            }
        }

        Some(RootDirs::new(writable, resource, settings))
    }

    pub fn writable(&self) -> &Path {
        &self.writable
    }

    pub fn resource(&self) -> &Path {
        &self.resource
    }

    pub fn settings(&self) -> &Path {
        &self.settings
    }

    pub fn set_writable_dir(&mut self, path: impl Into<PathBuf>) {
        self.writable = path.into();
    }

    pub fn set_resource_dir(&mut self, path: impl Into<PathBuf>) {
        self.resource = path.into();
    }

    pub fn set_settings_dir(&mut self, path: impl Into<PathBuf>) {
        self.settings = path.into();
    }
}

/*
 * Failure to resolve a file in any searched root. Carries the searched
 * roots so an operator can see at a glance where the file was expected.
 * This is the recoverable counterpart of scope misconfiguration, which is a
 * programming error and panics instead.
 */
#[derive(Debug, Clone)]
pub enum ResolveError {
    FileAbsent {
        file: String,
        scope: String,
        roots: RootDirs,
    },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::FileAbsent { file, scope, roots } => write!(
                f,
                "File '{file}' doesn't exist in the scope '{scope}'. Have been looking in:\n{}\n{}\n{}",
                roots.writable.display(),
                roots.resource.display(),
                roots.settings.display()
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

pub type Result<T> = std::result::Result<T, ResolveError>;

pub trait PathResolverOperations: Send + Sync {
    fn resolve(&self, file_name: &str, scope: &str) -> Result<PathBuf>;
}

pub struct CorePathResolver {
    roots: RootDirs,
    fs: Arc<dyn PlatformFsOperations>,
}

impl CorePathResolver {
    pub fn new(roots: RootDirs, fs: Arc<dyn PlatformFsOperations>) -> Self {
        CorePathResolver { roots, fs }
    }

    pub fn roots(&self) -> &RootDirs {
        &self.roots
    }
}

impl PathResolverOperations for CorePathResolver {
    /*
     * Walks the scope characters in order, composes a candidate per root
     * ('w' writable, 'r' resource, 's' settings, 'f' the file name taken
     * verbatim as a filesystem path), and returns the first candidate that
     * exists. An empty scope means `"wrf"`. An unrecognized scope character
     * indicates a mistake at the call site and panics with the offending
     * specifier; it is not a runtime condition.
     */
    fn resolve(&self, file_name: &str, scope: &str) -> Result<PathBuf> {
        let scope = if scope.is_empty() {
            DEFAULT_SEARCH_SCOPE
        } else {
            scope
        };

        for scope_char in scope.chars() {
            let candidate = match scope_char {
                'w' => self.roots.writable.join(file_name),
                'r' => self.roots.resource.join(file_name),
                's' => self.roots.settings.join(file_name),
                'f' => PathBuf::from(file_name),
                _ => panic!(
                    "PathResolver: unsupported search scope '{scope}' (character '{scope_char}')"
                ),
            };
            if self.fs.query_file_metadata(&candidate).is_ok() {
                log::trace!("PathResolver: Resolved '{file_name}' to {candidate:?}");
                return Ok(candidate);
            }
        }

        Err(ResolveError::FileAbsent {
            file: file_name.to_string(),
            scope: scope.to_string(),
            roots: self.roots.clone(),
        })
    }
}
