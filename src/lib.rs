pub mod builtin;
pub mod callbacks;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod interaction;
pub mod logging;
pub mod permissions;
pub mod platform;
pub mod plugin;
pub mod sync;
pub mod ui;
use miette::Diagnostic;

pub use config::Config;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use interaction::{ComponentInteraction, Interaction, InteractionResponder};
pub use platform::{GuildId, PlatformClient, PlatformError};
pub use plugin::{CommandAccess, CommandPlugin, CommandTable, PluginContext, PluginLoader};
pub use sync::{SyncReport, Synchronizer};

/// Result type alias for the registry
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for plugin loading and guild synchronization
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Failed to load command plugins: {0}")]
    #[diagnostic(
        code(slashdeck::load_failed),
        help("Check that the plugin directory exists and that every manifest names a registered factory.")
    )]
    Load(String),

    #[error("Duplicate command name '{name}'")]
    #[diagnostic(
        code(slashdeck::duplicate_command),
        help("Two plugins declare the same command name. Rename or disable one of them.")
    )]
    DuplicateCommand { name: String },

    #[error("Failed to synchronize commands for guild {guild}: {source}")]
    #[diagnostic(
        code(slashdeck::sync_failed),
        help("The platform rejected or did not answer a request. Registration for this guild can be retried on its own.")
    )]
    Synchronization {
        guild: GuildId,
        #[source]
        source: PlatformError,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(slashdeck::config_error),
        help("Check the TOML syntax of your config file and that the token and application id are set.")
    )]
    Config(String),
}
