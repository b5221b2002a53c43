use super::api::PluginSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Manifest file enabling one catalog plugin
///
/// ```toml
/// factory = "announce"
/// enabled = true
///
/// [settings]
/// channel = "123"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Name of the catalog factory that builds the plugin
    pub factory: String,

    /// Disabled manifests are skipped during the scan
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Settings passed to the factory
    #[serde(default)]
    pub settings: PluginSettings,
}

fn default_enabled() -> bool {
    true
}

impl PluginManifest {
    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse manifest: {}", e))
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), String> {
        if self.factory.trim().is_empty() {
            return Err("Plugin factory name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Whether a directory entry looks like a plugin manifest
pub fn is_plugin_file(path: &Path) -> bool {
    let has_toml_ext = path.extension().and_then(|e| e.to_str()) == Some("toml");
    let visible = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| !n.starts_with('.') && !n.starts_with('_'))
        .unwrap_or(false);

    has_toml_ext && visible && path.is_file()
}
