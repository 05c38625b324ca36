//! Entries of a sandboxed virtual filesystem and the asynchronous protocol
//! for resolving a file entry to a readable snapshot.
//!
//! The tree itself (lookup, listing, storage) lives behind the
//! [`Filesystem`] trait. This crate only models the entries a filesystem
//! hands out and the resolve-to-file handshake with it.

pub mod context;
pub mod entry;
pub mod error;
pub mod fs;
pub mod handle;
pub mod ids;
pub mod path;
pub mod policy;
pub mod resolve;
pub mod rt;

pub use context::{VfsConfig, VfsContext, VfsCred};
pub use entry::{DirectoryEntry, Entry, FileEntry};
pub use error::{ResolveError, ResolveErrorReason, VfsError, VfsErrorKind, VfsResult};
pub use fs::Filesystem;
pub use handle::{FileHandle, FileMetadata};
pub use ids::{VfsGid, VfsTimespec, VfsUid};
pub use path::VirtualPath;
pub use policy::{AllowAllPolicy, DenyPrefixPolicy, VfsPolicy};
pub use resolve::{Completion, ErrorCallback, ResolveState, SuccessCallback};
pub use rt::{VfsRuntime, VfsRuntimeExt};
