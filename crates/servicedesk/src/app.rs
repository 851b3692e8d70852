//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that manages configuration and
//! storage lifecycle and provides the context for executing CLI commands.

use crate::commands::init::{find_desk_root, ActorConfig, DeskConfig, CONFIG_FILE_NAME, DESK_DIR_NAME};
use crate::desk::TicketDesk;
use crate::domain::{Role, UserId};
use crate::error::{Error, Result};
use crate::storage::create_store;
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// Manages storage initialization and lifecycle. The desk is loaded from
/// the workspace configuration on creation.
pub struct App {
    /// The ticket desk engine over the configured storage backend
    desk: TicketDesk,

    /// Path to the service desk directory (.servicedesk)
    desk_dir: PathBuf,

    /// Default acting identity from configuration, if any
    default_actor: Option<ActorConfig>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("desk_dir", &self.desk_dir)
            .field("default_actor", &self.default_actor)
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.servicedesk/` directory,
    /// loads configuration, and initializes storage.
    ///
    /// # Errors
    ///
    /// Returns an error if no workspace is found in the directory tree,
    /// configuration cannot be loaded, or storage initialization fails.
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_desk_root(working_dir).ok_or_else(|| {
            Error::Config(
                "Not a service desk workspace (run `servicedesk init` first)".to_string(),
            )
        })?;

        let desk_dir = root_dir.join(DESK_DIR_NAME);
        let config_path = desk_dir.join(CONFIG_FILE_NAME);

        let config = DeskConfig::load(&config_path).await?;

        let backend = config.to_backend(&root_dir)?;
        let store = create_store(backend).await?;

        Ok(Self {
            desk: TicketDesk::new(store),
            desk_dir,
            default_actor: config.default_actor,
        })
    }

    /// Get a mutable reference to the ticket desk
    pub fn desk_mut(&mut self) -> &mut TicketDesk {
        &mut self.desk
    }

    /// Get an immutable reference to the ticket desk
    pub fn desk(&self) -> &TicketDesk {
        &self.desk
    }

    /// Get the path to the service desk directory
    pub fn desk_dir(&self) -> &Path {
        &self.desk_dir
    }

    /// Resolve the acting identity for a command.
    ///
    /// Explicit `--actor`/`--role` flags win; otherwise the configured
    /// default actor applies.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither flags nor configuration
    /// identify the actor.
    pub fn resolve_actor(
        &self,
        actor: Option<&str>,
        role: Option<Role>,
    ) -> Result<(UserId, Role)> {
        match (actor, role, &self.default_actor) {
            (Some(name), Some(role), _) => Ok((UserId::from(name), role)),
            (Some(name), None, Some(default)) => Ok((UserId::from(name), default.role)),
            (None, role, Some(default)) => Ok((
                UserId::new(default.name.clone()),
                role.unwrap_or(default.role),
            )),
            _ => Err(Error::Config(
                "No acting user: pass --actor/--role or configure default-actor".to_string(),
            )),
        }
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.desk.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use tempfile::TempDir;

    #[tokio::test]
    async fn app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        init::init(
            temp_dir.path(),
            Some(ActorConfig {
                name: "alice".to_string(),
                role: Role::Admin,
            }),
        )
        .await
        .unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.desk_dir().ends_with(".servicedesk"));
        let (actor, role) = app.resolve_actor(None, None).unwrap();
        assert_eq!(actor.as_str(), "alice");
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();

        init::init(temp_dir.path(), None).await.unwrap();

        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        assert!(app.desk_dir().ends_with(".servicedesk"));
    }

    #[tokio::test]
    async fn app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = App::from_directory(temp_dir.path()).await;
        assert!(result.is_err());

        let err = result.unwrap_err().to_string();
        assert!(err.contains("Not a service desk workspace"));
    }

    #[tokio::test]
    async fn resolve_actor_flag_precedence() {
        let temp_dir = TempDir::new().unwrap();
        init::init(
            temp_dir.path(),
            Some(ActorConfig {
                name: "alice".to_string(),
                role: Role::Admin,
            }),
        )
        .await
        .unwrap();
        let app = App::from_directory(temp_dir.path()).await.unwrap();

        // Explicit flags win over the configured default
        let (actor, role) = app
            .resolve_actor(Some("bob"), Some(Role::Client))
            .unwrap();
        assert_eq!(actor.as_str(), "bob");
        assert_eq!(role, Role::Client);

        // Actor flag alone inherits the configured role
        let (actor, role) = app.resolve_actor(Some("bob"), None).unwrap();
        assert_eq!(actor.as_str(), "bob");
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn resolve_actor_requires_identity() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), None).await.unwrap();
        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.resolve_actor(None, None).is_err());
        // A bare --role is not an identity either
        assert!(app.resolve_actor(None, Some(Role::Admin)).is_err());
    }
}
