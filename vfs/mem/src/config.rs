use entryfs_core::VfsConfig;

#[derive(Clone, Debug)]
pub struct MemFsConfig {
    /// Name reported by `Filesystem::name`.
    pub name: String,
    /// Path limits applied when entries are created against this FS.
    pub limits: VfsConfig,
    /// Optional max bytes allowed for all file data in this FS instance.
    pub max_bytes: Option<u64>,
    /// Optional max node count (files and directories, root included).
    pub max_inodes: Option<u64>,
}

impl Default for MemFsConfig {
    fn default() -> Self {
        Self {
            name: "memfs".to_string(),
            limits: VfsConfig::default(),
            max_bytes: None,
            max_inodes: None,
        }
    }
}
