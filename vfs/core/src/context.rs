use crate::policy::{AllowAllPolicy, VfsPolicy};
use crate::rt::VfsRuntime;
use crate::{VfsGid, VfsUid};
use smallvec::SmallVec;
use std::sync::Arc;

/// Path limits enforced when entries are constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VfsConfig {
    pub max_path_len: usize,
    pub max_name_len: usize,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            max_path_len: 4096,
            max_name_len: 255,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VfsCred {
    pub uid: VfsUid,
    pub gid: VfsGid,
    pub groups: SmallVec<[VfsGid; 8]>,
}

impl VfsCred {
    pub fn root() -> Self {
        Self {
            uid: 0,
            gid: 0,
            groups: SmallVec::new(),
        }
    }

    pub fn user(uid: VfsUid, gid: VfsGid) -> Self {
        Self {
            uid,
            gid,
            groups: SmallVec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

/// Per-call execution context.
///
/// Carries who is asking, which policy applies to them, and the runtime
/// that completions of asynchronous operations are scheduled on.
#[derive(Clone)]
pub struct VfsContext {
    pub cred: VfsCred,
    pub policy: Arc<dyn VfsPolicy>,
    pub runtime: Arc<dyn VfsRuntime>,
}

impl VfsContext {
    pub fn new(cred: VfsCred, runtime: Arc<dyn VfsRuntime>) -> Self {
        Self {
            cred,
            policy: Arc::new(AllowAllPolicy),
            runtime,
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn VfsPolicy>) -> Self {
        self.policy = policy;
        self
    }
}

impl std::fmt::Debug for VfsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VfsContext")
            .field("cred", &self.cred)
            .finish_non_exhaustive()
    }
}
