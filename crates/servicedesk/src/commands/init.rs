//! Implementation of the `init` command.
//!
//! This module handles initialization of a new service desk workspace,
//! creating the `.servicedesk/` directory structure with configuration
//! and data files.

use crate::domain::Role;
use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the service desk directory
pub const DESK_DIR_NAME: &str = ".servicedesk";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the tickets data file
pub const TICKETS_FILE_NAME: &str = "tickets.jsonl";

/// Maximum directory depth to traverse when searching for the desk root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for the service desk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Identity used for commands that don't pass `--actor`/`--role`
    #[serde(rename = "default-actor", skip_serializing_if = "Option::is_none", default)]
    pub default_actor: Option<ActorConfig>,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("jsonl" for file persistence, "memory" for
    /// ephemeral)
    pub backend: String,

    /// Path to the data file, relative to the workspace root
    pub data_file: String,
}

/// A configured acting identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorConfig {
    /// User name
    pub name: String,

    /// User role
    pub role: Role,
}

impl DeskConfig {
    /// Create a new configuration with the default JSONL backend
    pub fn new(default_actor: Option<ActorConfig>) -> Self {
        Self {
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{DESK_DIR_NAME}/{TICKETS_FILE_NAME}"),
            },
            default_actor,
        }
    }

    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Resolve the configured backend for a workspace root
    pub fn to_backend(&self, root: &Path) -> Result<StorageBackend> {
        match self.storage.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root.join(&self.storage.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(Error::Config(format!("Unknown storage backend: {other}"))),
        }
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created service desk directory
    pub desk_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created tickets file
    pub tickets_file: PathBuf,
}

/// Initialize a new service desk workspace in the given directory.
///
/// # Errors
///
/// Returns an error if the `.servicedesk/` directory already exists or
/// file system operations fail.
pub async fn init(base_dir: &Path, default_actor: Option<ActorConfig>) -> Result<InitResult> {
    let desk_dir = base_dir.join(DESK_DIR_NAME);

    // Check if already initialized
    if desk_dir.exists() {
        return Err(Error::Config(format!(
            "Service desk is already initialized in this directory. Found existing '{DESK_DIR_NAME}'"
        )));
    }

    fs::create_dir_all(&desk_dir).await?;

    // Create config.yaml
    let config_file = desk_dir.join(CONFIG_FILE_NAME);
    let config = DeskConfig::new(default_actor);
    config.save(&config_file).await?;

    // Create empty tickets.jsonl
    let tickets_file = desk_dir.join(TICKETS_FILE_NAME);
    fs::write(&tickets_file, "").await?;

    Ok(InitResult {
        desk_dir,
        config_file,
        tickets_file,
    })
}

/// Check if a directory has been initialized.
///
/// Returns `true` if the `.servicedesk/` directory exists.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(DESK_DIR_NAME).exists()
}

/// Find the workspace root by searching up the directory tree.
///
/// Starts from the given directory and traverses parent directories until
/// a `.servicedesk/` directory is found, the filesystem root is reached,
/// or the maximum traversal depth is exceeded.
pub fn find_desk_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(DESK_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
