//! Read policies consulted by backends before serving a node.

use crate::{VfsCred, VfsError, VfsErrorKind, VfsResult, VirtualPath};

pub trait VfsPolicy: Send + Sync + 'static {
    fn check_read(&self, cred: &VfsCred, path: &VirtualPath) -> VfsResult<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAllPolicy;

impl VfsPolicy for AllowAllPolicy {
    fn check_read(&self, _cred: &VfsCred, _path: &VirtualPath) -> VfsResult<()> {
        Ok(())
    }
}

/// Denies reads of anything at or below the listed prefixes.
///
/// Root credentials are subject to the same rules.
#[derive(Clone, Debug, Default)]
pub struct DenyPrefixPolicy {
    prefixes: Vec<VirtualPath>,
}

impl DenyPrefixPolicy {
    pub fn new(prefixes: impl IntoIterator<Item = VirtualPath>) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }
}

impl VfsPolicy for DenyPrefixPolicy {
    fn check_read(&self, _cred: &VfsCred, path: &VirtualPath) -> VfsResult<()> {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return Err(VfsError::new(
                VfsErrorKind::PermissionDenied,
                "policy.check_read",
            ));
        }
        Ok(())
    }
}
