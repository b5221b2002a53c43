//! Platform client seam.
//!
//! The synchronizer only talks to the platform through [`PlatformClient`],
//! so tests can substitute an in-memory double and the binary uses
//! [`HttpPlatformClient`].

pub mod http;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{HttpPlatformClient, HttpResponder};
pub use types::{
    CommandDeclaration, CommandId, CommandOption, CommandPermission, GuildId, OptionChoice,
    OptionKind, PermissionGrant, PermissionKind, RegisteredCommand, RoleId,
};

/// Errors from platform REST calls.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Calls the synchronizer needs from the platform.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Application id that owns the bot's commands
    fn application_id(&self) -> &str;

    /// Replace the guild's declaration set with `declarations`
    async fn push_declarations(
        &self,
        guild: &GuildId,
        declarations: &[CommandDeclaration],
    ) -> Result<Vec<RegisteredCommand>, PlatformError>;

    /// Commands currently registered in the guild
    async fn fetch_registered_commands(
        &self,
        guild: &GuildId,
    ) -> Result<Vec<RegisteredCommand>, PlatformError>;

    /// Replace the guild's permission state with `grants`
    async fn set_permissions(
        &self,
        guild: &GuildId,
        grants: &[PermissionGrant],
    ) -> Result<(), PlatformError>;
}
