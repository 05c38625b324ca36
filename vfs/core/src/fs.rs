//! The filesystem collaborator that entries delegate to.

use crate::{FileEntry, FileHandle, VfsConfig, VfsContext, VfsResult, VirtualPath};
use async_trait::async_trait;
use std::sync::OnceLock;

/// A filesystem instance that owns a namespace of entries.
///
/// Entries hold an `Arc<dyn Filesystem>`, so an instance lives at least as
/// long as every entry it issued.
#[async_trait]
pub trait Filesystem: Send + Sync + 'static {
    /// Name of this filesystem instance.
    fn name(&self) -> &str;

    fn config(&self) -> &VfsConfig {
        static DEFAULT: OnceLock<VfsConfig> = OnceLock::new();
        DEFAULT.get_or_init(VfsConfig::default)
    }

    /// Validate a raw path for use as an entry locator in this namespace.
    fn check_path(&self, raw: &str) -> VfsResult<VirtualPath> {
        VirtualPath::with_limits(raw, self.config())
    }

    /// Produce a snapshot of the file `entry` points at.
    ///
    /// Missing nodes, permission problems and the like are returned as
    /// `Err`; implementations must not panic for them.
    async fn get_file(&self, ctx: &VfsContext, entry: &FileEntry) -> VfsResult<FileHandle>;
}
