// Application state module
// Holds the loaded configuration and the canonical served root

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state, shared read-only by every connection
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.serve.root`, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState` serving the configured root directory
    pub fn new(config: &Config) -> io::Result<Self> {
        let root = PathBuf::from(&config.serve.root);
        Self::with_root(config.clone(), &root)
    }

    /// Create `AppState` serving an explicit root directory
    pub fn with_root(config: Config, root: &Path) -> io::Result<Self> {
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("served root is not a directory: {}", root.display()),
            ));
        }
        Ok(Self { config, root })
    }
}
