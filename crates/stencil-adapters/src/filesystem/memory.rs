//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::RelativePath,
    error::StencilResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle for
/// inspection while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    /// Paths whose writes fail, for fault injection.
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn insert_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check_writable(&self, path: &Path) -> StencilResult<()> {
        if self.read_only.contains(path) {
            return Err(fs_error(path, "Permission denied"));
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(fs_error(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            inner.insert_dirs(parent);
        }
        inner.files.insert(path.to_path_buf(), content.as_ref().to_vec());
    }

    /// A file's content as text (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Every file path, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// A copy of every file under `root` with its content.
    pub fn snapshot(&self, root: impl AsRef<Path>) -> BTreeMap<PathBuf, Vec<u8>> {
        let root = root.as_ref();
        self.read()
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(root))
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect()
    }

    /// Make every later write or copy to `path` fail.
    pub fn deny_writes_to(&self, path: impl AsRef<Path>) {
        self.write().read_only.insert(path.as_ref().to_path_buf());
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.files.clear();
        inner.directories.clear();
        inner.read_only.clear();
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write();
        if inner.files.contains_key(path) {
            return Err(fs_error(path, "A file exists at this path"));
        }
        inner.insert_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()> {
        let mut inner = self.write();
        inner.check_writable(path)?;
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StencilResult<Vec<u8>> {
        self.read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "No such file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StencilResult<()> {
        let mut inner = self.write();
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| fs_error(from, "No such file"))?;
        inner.check_writable(to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> StencilResult<()> {
        self.write()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| fs_error(path, "No such file"))
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.write();
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory"));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read().files.contains_key(path)
    }

    fn list_files(&self, root: &Path) -> StencilResult<Vec<RelativePath>> {
        let inner = self.read();
        if !inner.directories.contains(root) {
            return Err(fs_error(root, "No such directory"));
        }
        inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok())
            .map(|rel| RelativePath::try_new(rel).map_err(Into::into))
            .collect()
    }
}

fn fs_error(path: &Path, reason: &str) -> stencil_core::error::StencilError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}
