//! Absolute virtual paths.

use crate::{VfsConfig, VfsError, VfsErrorKind, VfsResult};
use std::fmt;
use std::sync::Arc;

/// Absolute, `/`-separated path of a node inside one filesystem namespace.
///
/// Always normalised: no empty components, no trailing slash (except for the
/// root), no `.` or `..` components. Cloning is a reference count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath(Arc<str>);

impl VirtualPath {
    /// Validate `raw` against the default [`VfsConfig`] limits.
    pub fn new(raw: &str) -> VfsResult<Self> {
        Self::with_limits(raw, &VfsConfig::default())
    }

    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    pub fn with_limits(raw: &str, config: &VfsConfig) -> VfsResult<Self> {
        if raw.is_empty() {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "path.empty"));
        }
        if !raw.starts_with('/') {
            return Err(VfsError::new(
                VfsErrorKind::InvalidInput,
                "path.not_absolute",
            ));
        }
        if raw.contains('\0') {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "path.nul"));
        }
        if raw.len() > config.max_path_len {
            return Err(VfsError::new(VfsErrorKind::NameTooLong, "path.len"));
        }

        let mut normalized = String::with_capacity(raw.len());
        for component in raw.split('/').filter(|c| !c.is_empty()) {
            if component == "." || component == ".." {
                return Err(VfsError::new(
                    VfsErrorKind::InvalidInput,
                    "path.dot_component",
                ));
            }
            if component.len() > config.max_name_len {
                return Err(VfsError::new(VfsErrorKind::NameTooLong, "path.name_len"));
            }
            normalized.push('/');
            normalized.push_str(component);
        }
        if normalized.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(Arc::from(normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == "/"
    }

    /// Last component, or `""` for the root.
    pub fn name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }

    pub fn parent(&self) -> Option<VirtualPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(Arc::from(&self.0[..idx]))),
            None => None,
        }
    }

    /// Whether `self` equals `prefix` or lies underneath it.
    pub fn starts_with(&self, prefix: &VirtualPath) -> bool {
        if prefix.is_root() {
            return true;
        }
        match self.0.strip_prefix(&*prefix.0) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_relative() {
        let err = VirtualPath::new("").unwrap_err();
        assert_eq!(err.kind(), VfsErrorKind::InvalidInput);
        assert_eq!(err.context(), "path.empty");

        let err = VirtualPath::new("docs/readme.md").unwrap_err();
        assert_eq!(err.kind(), VfsErrorKind::InvalidInput);
        assert_eq!(err.context(), "path.not_absolute");
    }

    #[test]
    fn rejects_traversal_components() {
        for raw in ["/a/../b", "/./a", "/a/.."] {
            let err = VirtualPath::new(raw).unwrap_err();
            assert_eq!(err.context(), "path.dot_component", "{raw}");
        }
        // Dots inside a name are fine.
        assert_eq!(VirtualPath::new("/a/..b").unwrap().name(), "..b");
    }

    #[test]
    fn normalizes_slashes() {
        assert_eq!(VirtualPath::new("//a///b/").unwrap().as_str(), "/a/b");
        assert_eq!(VirtualPath::new("///").unwrap().as_str(), "/");
        assert!(VirtualPath::new("/").unwrap().is_root());
    }

    #[test]
    fn enforces_limits() {
        let config = VfsConfig {
            max_path_len: 16,
            max_name_len: 4,
        };
        assert_eq!(
            VirtualPath::with_limits("/abcde", &config)
                .unwrap_err()
                .kind(),
            VfsErrorKind::NameTooLong
        );
        assert_eq!(
            VirtualPath::with_limits("/abcd/abcd/abcd/abcd", &config)
                .unwrap_err()
                .context(),
            "path.len"
        );
        assert!(VirtualPath::with_limits("/abcd/abcd", &config).is_ok());
    }

    #[test]
    fn name_and_parent() {
        let path = VirtualPath::new("/docs/readme.md").unwrap();
        assert_eq!(path.name(), "readme.md");
        assert_eq!(path.parent().unwrap().as_str(), "/docs");
        assert_eq!(path.parent().unwrap().parent().unwrap().as_str(), "/");
        assert_eq!(VirtualPath::root().name(), "");
        assert!(VirtualPath::root().parent().is_none());
        assert_eq!(path.components().collect::<Vec<_>>(), ["docs", "readme.md"]);
    }

    #[test]
    fn prefix_matching_respects_components() {
        let path = VirtualPath::new("/secret/key").unwrap();
        assert!(path.starts_with(&VirtualPath::new("/secret").unwrap()));
        assert!(path.starts_with(&VirtualPath::root()));
        assert!(!path.starts_with(&VirtualPath::new("/sec").unwrap()));
        assert!(
            !VirtualPath::new("/secrets")
                .unwrap()
                .starts_with(&VirtualPath::new("/secret").unwrap())
        );
    }
}
