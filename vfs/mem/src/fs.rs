use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use entryfs_core::{
    FileEntry, FileHandle, Filesystem, VfsConfig, VfsContext, VfsError, VfsErrorKind, VfsResult,
    VfsTimespec, VirtualPath,
};
use parking_lot::RwLock;

use crate::config::MemFsConfig;
use crate::node::{FileMode, FileNode, MemNode};

/// Filesystem that keeps its whole tree in memory.
///
/// Resolutions hand out snapshots: rewriting a file does not change handles
/// that were already produced.
#[derive(Debug)]
pub struct MemFs {
    config: MemFsConfig,
    tree: RwLock<Tree>,
}

#[derive(Debug)]
struct Tree {
    nodes: BTreeMap<VirtualPath, MemNode>,
    used_bytes: u64,
}

impl Tree {
    fn check_parent(&self, path: &VirtualPath, context: &'static str) -> VfsResult<()> {
        let Some(parent) = path.parent() else {
            return Err(VfsError::new(VfsErrorKind::AlreadyExists, context));
        };
        match self.nodes.get(&parent) {
            Some(MemNode::Directory) => Ok(()),
            Some(MemNode::File(_)) => Err(VfsError::new(VfsErrorKind::NotDir, context)),
            None => Err(VfsError::new(VfsErrorKind::NotFound, context)),
        }
    }

    /// Error for a path that has no node: `NotDir` if a file sits where an
    /// ancestor directory should be, `NotFound` otherwise.
    fn missing(&self, path: &VirtualPath, context: &'static str) -> VfsError {
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if let Some(MemNode::File(_)) = self.nodes.get(&dir) {
                return VfsError::new(VfsErrorKind::NotDir, context);
            }
            ancestor = dir.parent();
        }
        VfsError::new(VfsErrorKind::NotFound, context)
    }

    fn has_children(&self, dir: &VirtualPath) -> bool {
        self.nodes
            .keys()
            .any(|path| path.parent().as_ref() == Some(dir))
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self::with_config(MemFsConfig::default())
    }

    pub fn with_config(config: MemFsConfig) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(VirtualPath::root(), MemNode::Directory);
        Self {
            config,
            tree: RwLock::new(Tree {
                nodes,
                used_bytes: 0,
            }),
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.tree.read().nodes.len()
    }

    /// Whether only the root directory exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    pub fn used_bytes(&self) -> u64 {
        self.tree.read().used_bytes
    }

    pub fn create_dir(&self, raw: &str) -> VfsResult<()> {
        let path = self.check_path(raw)?;
        let mut tree = self.tree.write();
        if tree.nodes.contains_key(&path) {
            return Err(VfsError::new(
                VfsErrorKind::AlreadyExists,
                "memfs.create_dir",
            ));
        }
        tree.check_parent(&path, "memfs.create_dir")?;
        self.check_inode_quota(&tree)?;
        tracing::trace!(fs = %self.config.name, path = %path, "memfs create_dir");
        tree.nodes.insert(path, MemNode::Directory);
        Ok(())
    }

    /// Create or replace the file at `raw`. A replaced file keeps its mode.
    pub fn write_file(&self, raw: &str, data: impl Into<Bytes>) -> VfsResult<()> {
        let path = self.check_path(raw)?;
        let data = data.into();
        let mut tree = self.tree.write();

        let (old_len, mode) = match tree.nodes.get(&path) {
            Some(MemNode::Directory) => {
                return Err(VfsError::new(VfsErrorKind::IsDir, "memfs.write_file"));
            }
            Some(MemNode::File(file)) => (file.data.len() as u64, file.mode),
            None => {
                tree.check_parent(&path, "memfs.write_file")?;
                self.check_inode_quota(&tree)?;
                (0, FileMode::default())
            }
        };

        let used_bytes = tree.used_bytes - old_len + data.len() as u64;
        if let Some(max_bytes) = self.config.max_bytes {
            if used_bytes > max_bytes {
                return Err(VfsError::new(VfsErrorKind::NoSpace, "memfs.write_file"));
            }
        }

        tracing::trace!(
            fs = %self.config.name,
            path = %path,
            len = data.len(),
            "memfs write_file"
        );
        tree.used_bytes = used_bytes;
        tree.nodes.insert(
            path,
            MemNode::File(FileNode {
                data,
                mode,
                modified: VfsTimespec::now(),
            }),
        );
        Ok(())
    }

    pub fn set_mode(&self, raw: &str, mode: FileMode) -> VfsResult<()> {
        let path = self.check_path(raw)?;
        let mut tree = self.tree.write();
        let found = match tree.nodes.get_mut(&path) {
            Some(MemNode::File(file)) => {
                file.mode = mode;
                true
            }
            Some(MemNode::Directory) => {
                return Err(VfsError::new(VfsErrorKind::IsDir, "memfs.set_mode"));
            }
            None => false,
        };
        if !found {
            return Err(tree.missing(&path, "memfs.set_mode"));
        }
        Ok(())
    }

    /// Remove a file or an empty directory. The root cannot be removed.
    pub fn remove(&self, raw: &str) -> VfsResult<()> {
        let path = self.check_path(raw)?;
        if path.is_root() {
            return Err(VfsError::new(
                VfsErrorKind::OperationNotPermitted,
                "memfs.remove",
            ));
        }
        let mut tree = self.tree.write();
        match tree.nodes.get(&path) {
            None => return Err(tree.missing(&path, "memfs.remove")),
            Some(MemNode::Directory) if tree.has_children(&path) => {
                return Err(VfsError::new(VfsErrorKind::DirNotEmpty, "memfs.remove"));
            }
            Some(_) => {}
        }
        if let Some(node) = tree.nodes.remove(&path) {
            tree.used_bytes -= node.data_len();
        }
        tracing::trace!(fs = %self.config.name, path = %path, "memfs remove");
        Ok(())
    }

    fn check_inode_quota(&self, tree: &Tree) -> VfsResult<()> {
        if let Some(max_inodes) = self.config.max_inodes {
            if tree.nodes.len() as u64 >= max_inodes {
                return Err(VfsError::new(VfsErrorKind::NoSpace, "memfs.inodes"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Filesystem for MemFs {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn config(&self) -> &VfsConfig {
        &self.config.limits
    }

    async fn get_file(&self, ctx: &VfsContext, entry: &FileEntry) -> VfsResult<FileHandle> {
        let path = entry.virtual_path();
        tracing::trace!(fs = %self.config.name, path = %path, uid = ctx.cred.uid, "memfs get_file");

        ctx.policy.check_read(&ctx.cred, path)?;

        let tree = self.tree.read();
        let file = match tree.nodes.get(path) {
            Some(MemNode::File(file)) => file,
            Some(MemNode::Directory) => {
                return Err(VfsError::new(VfsErrorKind::IsDir, "memfs.get_file"));
            }
            None => return Err(tree.missing(path, "memfs.get_file")),
        };
        if !file.mode.contains(FileMode::READ) && !ctx.cred.is_root() {
            return Err(VfsError::new(
                VfsErrorKind::PermissionDenied,
                "memfs.get_file",
            ));
        }
        Ok(FileHandle::new(
            path.clone(),
            file.data.clone(),
            file.modified,
        ))
    }
}
