//! Error types for the entry layer.
//!
//! [`VfsError`] is what backends report. [`ResolveError`] is what callers of
//! [`FileEntry::resolve_to_file`](crate::FileEntry::resolve_to_file) receive:
//! it keeps the backend error and classifies it into a small set of reasons
//! callers can branch on.

use std::fmt;
use std::io;
use thiserror::Error;

pub type VfsResult<T> = Result<T, VfsError>;

/// Backend failure reasons.
///
/// New kinds may be added by backends over time, so callers must not
/// assume this list is closed.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VfsErrorKind {
    /// No node exists at the requested path
    #[error("entity not found")]
    NotFound,
    /// A path component that must be a directory is not one
    #[error("not a directory")]
    NotDir,
    /// Expected a file but found a directory
    #[error("is a directory")]
    IsDir,
    /// A node already exists at the requested path
    #[error("entity already exists")]
    AlreadyExists,
    /// The directory still has children
    #[error("directory not empty")]
    DirNotEmpty,
    /// Caller was not allowed to read or modify the node
    #[error("permission denied")]
    PermissionDenied,
    /// The operation is not permitted for this caller regardless of node permissions
    #[error("operation not permitted")]
    OperationNotPermitted,
    /// The provided data is invalid
    #[error("invalid input")]
    InvalidInput,
    /// A path or one of its components exceeds the configured limits
    #[error("name too long")]
    NameTooLong,
    /// The backend ran out of space or inodes
    #[error("no space left")]
    NoSpace,
    /// The backend does not implement this operation
    #[error("operation not supported")]
    NotSupported,
    /// The operation was cancelled before it could finish
    #[error("operation cancelled")]
    Cancelled,
    /// Something failed when doing IO. It may work if tried again.
    #[error("io error")]
    Io,
    /// Backend invariant violation. If you see this, it's probably a bug.
    #[error("internal error")]
    Internal,
}

#[derive(Error, Debug)]
#[error("{context}: {kind}")]
pub struct VfsError {
    kind: VfsErrorKind,
    context: &'static str,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl VfsError {
    pub fn new(kind: VfsErrorKind, context: &'static str) -> Self {
        Self {
            kind,
            context,
            source: None,
        }
    }

    pub fn with_source<E>(kind: VfsErrorKind, context: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            context,
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> VfsErrorKind {
        self.kind
    }

    /// Static tag naming the operation that failed, e.g. `memfs.get_file`.
    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl From<io::Error> for VfsError {
    fn from(io_error: io::Error) -> Self {
        let kind = match io_error.kind() {
            io::ErrorKind::NotFound => VfsErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => VfsErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => VfsErrorKind::AlreadyExists,
            io::ErrorKind::InvalidInput => VfsErrorKind::InvalidInput,
            io::ErrorKind::Unsupported => VfsErrorKind::NotSupported,
            io::ErrorKind::Interrupted => VfsErrorKind::Cancelled,
            _ => VfsErrorKind::Io,
        };
        VfsError::with_source(kind, "io", io_error)
    }
}

/// Why a resolution failed, as seen by the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolveErrorReason {
    NotFound,
    PermissionDenied,
    /// A node exists at the path but it is not a file.
    TypeMismatch,
    Generic,
}

impl ResolveErrorReason {
    pub fn from_kind(kind: VfsErrorKind) -> Self {
        match kind {
            VfsErrorKind::NotFound => Self::NotFound,
            VfsErrorKind::PermissionDenied | VfsErrorKind::OperationNotPermitted => {
                Self::PermissionDenied
            }
            VfsErrorKind::IsDir | VfsErrorKind::NotDir => Self::TypeMismatch,
            _ => Self::Generic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::TypeMismatch => "type mismatch",
            Self::Generic => "resolution failed",
        }
    }
}

impl fmt::Display for ResolveErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error handed to the error continuation of a failed resolution.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct ResolveError {
    reason: ResolveErrorReason,
    #[source]
    source: VfsError,
}

impl ResolveError {
    pub fn reason(&self) -> ResolveErrorReason {
        self.reason
    }

    /// The backend error this was created from.
    pub fn backend_error(&self) -> &VfsError {
        &self.source
    }

    pub fn into_backend_error(self) -> VfsError {
        self.source
    }
}

impl From<VfsError> for ResolveError {
    fn from(source: VfsError) -> Self {
        Self {
            reason: ResolveErrorReason::from_kind(source.kind()),
            source,
        }
    }
}
