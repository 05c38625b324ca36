//! Entries: lightweight locators for nodes of a virtual filesystem tree.

use crate::{Filesystem, VfsResult, VirtualPath};
use std::fmt;
use std::sync::Arc;

/// Identity shared by every entry variant.
#[derive(Clone)]
struct Locator {
    filesystem: Arc<dyn Filesystem>,
    path: VirtualPath,
}

impl Locator {
    fn new(filesystem: Arc<dyn Filesystem>, raw: &str) -> VfsResult<Self> {
        let path = filesystem.check_path(raw)?;
        Ok(Self { filesystem, path })
    }

    fn same_filesystem(&self, other: &Locator) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.filesystem), Arc::as_ptr(&other.filesystem))
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("filesystem", &self.filesystem.name())
            .field("path", &self.path)
            .finish()
    }
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.same_filesystem(other)
    }
}

impl Eq for Locator {}

macro_rules! entry_accessors {
    ($ty:ident) => {
        impl $ty {
            /// The filesystem that issued this entry.
            pub fn filesystem(&self) -> &Arc<dyn Filesystem> {
                &self.0.filesystem
            }

            pub fn virtual_path(&self) -> &VirtualPath {
                &self.0.path
            }

            /// Last path component, `""` for the root.
            pub fn name(&self) -> &str {
                self.0.path.name()
            }

            pub fn same_filesystem(&self, other: &Entry) -> bool {
                self.0.same_filesystem(other.locator())
            }
        }
    };
}

/// An entry known to denote a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry(Locator);

impl FileEntry {
    /// Bind `raw` in `filesystem`'s namespace.
    ///
    /// Fails synchronously if the filesystem rejects the path; no backend
    /// lookup happens here, the node may not exist.
    pub fn new(filesystem: Arc<dyn Filesystem>, raw: &str) -> VfsResult<Self> {
        Locator::new(filesystem, raw).map(Self)
    }
}

entry_accessors!(FileEntry);

/// An entry known to denote a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry(Locator);

impl DirectoryEntry {
    pub fn new(filesystem: Arc<dyn Filesystem>, raw: &str) -> VfsResult<Self> {
        Locator::new(filesystem, raw).map(Self)
    }

    /// The root directory of `filesystem`.
    pub fn root(filesystem: Arc<dyn Filesystem>) -> Self {
        Self(Locator {
            filesystem,
            path: VirtualPath::root(),
        })
    }
}

entry_accessors!(DirectoryEntry);

/// Any node of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
}

impl Entry {
    fn locator(&self) -> &Locator {
        match self {
            Entry::File(FileEntry(locator)) => locator,
            Entry::Directory(DirectoryEntry(locator)) => locator,
        }
    }

    pub fn filesystem(&self) -> &Arc<dyn Filesystem> {
        &self.locator().filesystem
    }

    pub fn virtual_path(&self) -> &VirtualPath {
        &self.locator().path
    }

    pub fn name(&self) -> &str {
        self.locator().path.name()
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryEntry> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }
}

impl From<FileEntry> for Entry {
    fn from(entry: FileEntry) -> Self {
        Entry::File(entry)
    }
}

impl From<DirectoryEntry> for Entry {
    fn from(entry: DirectoryEntry) -> Self {
        Entry::Directory(entry)
    }
}
