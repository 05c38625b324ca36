mod config;
mod fs;
mod node;

pub use config::MemFsConfig;
pub use fs::MemFs;
pub use node::FileMode;
