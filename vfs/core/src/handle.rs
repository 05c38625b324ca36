//! Immutable file snapshots produced by a successful resolution.

use crate::{VfsTimespec, VirtualPath};
use bytes::{Buf, Bytes};
use std::io::Read;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    pub modified: VfsTimespec,
}

/// Snapshot of a file's content and metadata at resolution time.
///
/// Later changes to the backing node are not visible through an existing
/// handle. Cloning shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHandle {
    path: VirtualPath,
    metadata: FileMetadata,
    data: Bytes,
}

impl FileHandle {
    pub fn new(path: VirtualPath, data: Bytes, modified: VfsTimespec) -> Self {
        let metadata = FileMetadata {
            size: data.len() as u64,
            modified,
        };
        Self {
            path,
            metadata,
            data,
        }
    }

    pub fn path(&self) -> &VirtualPath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    pub fn last_modified(&self) -> VfsTimespec {
        self.metadata.modified
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Copy bytes starting at `offset` into `buf`, returning how many were
    /// copied. Reading at or past the end returns 0.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> usize {
        let Ok(start) = usize::try_from(offset) else {
            return 0;
        };
        if start >= self.data.len() {
            return 0;
        }
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        n
    }

    /// Sequential reader over the snapshot.
    pub fn reader(&self) -> impl Read + use<> {
        self.data.clone().reader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(data: &'static [u8]) -> FileHandle {
        FileHandle::new(
            VirtualPath::new("/docs/readme.md").unwrap(),
            Bytes::from_static(data),
            VfsTimespec { secs: 7, nanos: 0 },
        )
    }

    #[test]
    fn metadata_reflects_snapshot() {
        let h = handle(b"hello world");
        assert_eq!(h.size(), 11);
        assert_eq!(h.name(), "readme.md");
        assert_eq!(h.last_modified(), VfsTimespec { secs: 7, nanos: 0 });
    }

    #[test]
    fn read_at_bounds() {
        let h = handle(b"hello world");
        let mut buf = [0u8; 5];
        assert_eq!(h.read_at(6, &mut buf), 5);
        assert_eq!(&buf, b"world");
        assert_eq!(h.read_at(9, &mut buf), 2);
        assert_eq!(&buf[..2], b"ld");
        assert_eq!(h.read_at(11, &mut buf), 0);
        assert_eq!(h.read_at(u64::MAX, &mut buf), 0);
    }

    #[test]
    fn reader_reads_everything() {
        let h = handle(b"abc");
        let mut out = String::new();
        h.reader().read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc");
    }
}
