pub mod api;
pub mod catalog;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use api::{
    CommandAccess, CommandPlugin, PluginContext, PluginFactory, PluginFuture, PluginSettings,
    StorageHandle,
};
pub use catalog::PluginCatalog;
pub use loader::{PluginLoader, PluginSource};
pub use manifest::PluginManifest;
pub use registry::{CommandEntry, CommandTable, CommandTableBuilder, TableStatistics};
