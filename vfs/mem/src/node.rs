use bitflags::bitflags;
use bytes::Bytes;
use entryfs_core::VfsTimespec;

bitflags! {
    /// Access bits of a file node.
    ///
    /// Root credentials bypass these checks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FileMode: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode::READ | FileMode::WRITE
    }
}

#[derive(Clone, Debug)]
pub(crate) struct FileNode {
    pub(crate) data: Bytes,
    pub(crate) mode: FileMode,
    pub(crate) modified: VfsTimespec,
}

#[derive(Clone, Debug)]
pub(crate) enum MemNode {
    File(FileNode),
    Directory,
}

impl MemNode {
    pub(crate) fn data_len(&self) -> u64 {
        match self {
            MemNode::File(file) => file.data.len() as u64,
            MemNode::Directory => 0,
        }
    }
}
