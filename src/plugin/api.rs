use crate::callbacks::CallbackManager;
use crate::config::Config;
use crate::interaction::Interaction;
use crate::platform::{CommandDeclaration, PlatformClient};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::any::Any;
use std::sync::Arc;

/// Opaque persistent storage handed to plugins; plugins downcast it to the
/// concrete store they were built against.
pub type StorageHandle = Arc<dyn Any + Send + Sync>;

/// Free-form `[settings]` table of a plugin manifest
pub type PluginSettings = toml::Table;

/// Who may invoke a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAccess {
    /// Anyone in the guild
    Unrestricted,
    /// Only roles configured for at least one of these permission tags
    Restricted(Vec<String>),
}

impl CommandAccess {
    pub fn restricted<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandAccess::Restricted(tags.into_iter().map(Into::into).collect())
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, CommandAccess::Restricted(_))
    }
}

/// The trait every command plugin implements
///
/// A plugin owns exactly one slash command. The dispatcher may invoke
/// [`CommandPlugin::execute`] concurrently for several interactions, so
/// implementations must be safe to re-enter.
#[async_trait]
pub trait CommandPlugin: Send + Sync {
    /// Wire declaration of the command
    fn declaration(&self) -> CommandDeclaration;

    /// Access restriction of the command
    fn access(&self) -> CommandAccess {
        CommandAccess::Unrestricted
    }

    /// Run the command for one interaction
    ///
    /// Errors are reported to the invoking user by the dispatcher; the
    /// plugin does not need to reply on failure.
    async fn execute(&self, interaction: &Interaction) -> anyhow::Result<()>;
}

/// Shared dependencies every plugin is constructed with
#[derive(Clone)]
pub struct PluginContext {
    pub config: Arc<Config>,
    pub platform: Arc<dyn PlatformClient>,
    pub storage: StorageHandle,
    pub callbacks: Arc<CallbackManager>,
}

impl PluginContext {
    pub fn new(
        config: Arc<Config>,
        platform: Arc<dyn PlatformClient>,
        storage: StorageHandle,
        callbacks: Arc<CallbackManager>,
    ) -> Self {
        Self {
            config,
            platform,
            storage,
            callbacks,
        }
    }

    /// Storage handle downcast to a concrete type
    pub fn storage_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.storage.clone().downcast::<T>().ok()
    }
}

/// Future returned by a plugin factory
pub type PluginFuture = BoxFuture<'static, anyhow::Result<Arc<dyn CommandPlugin>>>;

/// Constructor registered in the plugin catalog
pub type PluginFactory = Arc<dyn Fn(PluginContext, PluginSettings) -> PluginFuture + Send + Sync>;
