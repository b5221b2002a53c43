//! Plugins compiled into the binary.

mod announce;
mod ping;

pub use announce::AnnouncePlugin;
pub use ping::PingPlugin;

use crate::plugin::PluginCatalog;

/// Catalog of every built-in plugin factory
pub fn catalog() -> PluginCatalog {
    let mut catalog = PluginCatalog::new();
    catalog
        .register_sync("ping", |_ctx, _settings| Ok(PingPlugin))
        .register_sync("announce", AnnouncePlugin::from_settings);
    catalog
}
