//! Component callbacks registered by plugins.
//!
//! A plugin that sends buttons or select menus registers a callback under
//! the component's `custom_id`. Ids of the form `namespace:rest` also match
//! a callback registered under `namespace`.

use crate::interaction::ComponentInteraction;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Follow-up logic for a component interaction
#[async_trait]
pub trait ComponentCallback: Send + Sync {
    async fn call(&self, interaction: &ComponentInteraction) -> anyhow::Result<()>;
}

struct Registration {
    callback: Arc<dyn ComponentCallback>,
    once: bool,
}

/// Registry of component callbacks shared with every plugin
#[derive(Default)]
pub struct CallbackManager {
    callbacks: RwLock<HashMap<String, Registration>>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback that stays until removed. Replaces any previous one.
    pub fn register(&self, custom_id: impl Into<String>, callback: Arc<dyn ComponentCallback>) {
        self.insert(custom_id.into(), callback, false);
    }

    /// Register a callback that is dropped after its first lookup
    pub fn register_once(
        &self,
        custom_id: impl Into<String>,
        callback: Arc<dyn ComponentCallback>,
    ) {
        self.insert(custom_id.into(), callback, true);
    }

    fn insert(&self, custom_id: String, callback: Arc<dyn ComponentCallback>, once: bool) {
        debug!(custom_id = custom_id.as_str(), once, "Component callback registered");
        let mut callbacks = self.callbacks.write().unwrap_or_else(|e| e.into_inner());
        callbacks.insert(custom_id, Registration { callback, once });
    }

    pub fn remove(&self, custom_id: &str) -> bool {
        let mut callbacks = self.callbacks.write().unwrap_or_else(|e| e.into_inner());
        callbacks.remove(custom_id).is_some()
    }

    /// Find the callback for a component id, consuming one-shot registrations
    pub fn lookup(&self, custom_id: &str) -> Option<Arc<dyn ComponentCallback>> {
        let mut callbacks = self.callbacks.write().unwrap_or_else(|e| e.into_inner());

        let key = if callbacks.contains_key(custom_id) {
            custom_id
        } else {
            let namespace = custom_id.split_once(':')?.0;
            if !callbacks.contains_key(namespace) {
                return None;
            }
            namespace
        };

        let once = callbacks.get(key)?.once;
        if once {
            callbacks.remove(key).map(|r| r.callback)
        } else {
            callbacks.get(key).map(|r| r.callback.clone())
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
