use super::api::{CommandPlugin, PluginContext, PluginFactory, PluginFuture, PluginSettings};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Startup-time registration list of plugin constructors, keyed by factory name
#[derive(Clone, Default)]
pub struct PluginCatalog {
    factories: BTreeMap<String, PluginFactory>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asynchronous constructor. A later registration under the
    /// same name replaces the earlier one and is logged as a warning.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(PluginContext, PluginSettings) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Arc<dyn CommandPlugin>>> + Send + 'static,
    {
        let factory: PluginFactory =
            Arc::new(move |ctx: PluginContext, settings: PluginSettings| -> PluginFuture {
                Box::pin(factory(ctx, settings))
            });
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            warn!(factory = %name, "Plugin factory replaced by a later registration");
        }
        self
    }

    /// Register a synchronous constructor
    pub fn register_sync<F, P>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(PluginContext, PluginSettings) -> anyhow::Result<P> + Send + Sync + 'static,
        P: CommandPlugin + 'static,
    {
        self.register(name, move |ctx, settings| {
            let built = constructor(ctx, settings);
            async move {
                let plugin: Arc<dyn CommandPlugin> = Arc::new(built?);
                Ok(plugin)
            }
        })
    }

    pub fn get(&self, name: &str) -> Option<PluginFactory> {
        self.factories.get(name).cloned()
    }

    /// Factory names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
