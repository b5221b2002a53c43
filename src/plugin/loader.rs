use super::api::{PluginContext, PluginFactory, PluginSettings};
use super::catalog::PluginCatalog;
use super::manifest::{is_plugin_file, PluginManifest};
use super::registry::CommandTable;
use crate::logging;
use crate::{Error, Result};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where plugins are discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    /// Every factory in the catalog
    Catalog,
    /// Manifest files in a directory, each naming a catalog factory
    Directory(PathBuf),
}

impl PluginSource {
    /// Pick the source from the configured directory, falling back to the
    /// default directory when it exists and to the catalog otherwise
    pub fn resolve(configured: Option<&Path>) -> Self {
        if let Some(dir) = configured {
            return PluginSource::Directory(dir.to_path_buf());
        }

        match PluginLoader::default_plugin_dir() {
            Ok(dir) if dir.is_dir() => PluginSource::Directory(dir),
            _ => PluginSource::Catalog,
        }
    }

    fn describe(&self) -> String {
        match self {
            PluginSource::Catalog => "catalog".to_string(),
            PluginSource::Directory(dir) => dir.display().to_string(),
        }
    }
}

/// A plugin found during discovery, not yet constructed
struct PendingPlugin {
    label: String,
    factory: PluginFactory,
    settings: PluginSettings,
}

/// Plugin loader that discovers, constructs and registers command plugins
pub struct PluginLoader {
    source: PluginSource,
    catalog: PluginCatalog,
    context: PluginContext,
}

impl PluginLoader {
    /// Create a new plugin loader
    pub fn new(source: PluginSource, catalog: PluginCatalog, context: PluginContext) -> Self {
        Self {
            source,
            catalog,
            context,
        }
    }

    /// Get the default plugin directory (~/.slashdeck/plugins/)
    pub fn default_plugin_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Load("Could not determine home directory".to_string()))?;

        Ok(home.join(".slashdeck").join("plugins"))
    }

    pub fn source(&self) -> &PluginSource {
        &self.source
    }

    /// Discover, construct and register every plugin
    ///
    /// Construction fans out concurrently; registration then follows
    /// discovery order so the declaration order is deterministic.
    pub async fn scan(&self) -> Result<CommandTable> {
        let pending = self.discover().await?;
        logging::log_plugins_discovered(&self.source.describe(), pending.len());

        let constructed = join_all(
            pending
                .iter()
                .map(|p| (p.factory)(self.context.clone(), p.settings.clone())),
        )
        .await;

        let mut builder = CommandTable::builder();
        for (pending, result) in pending.iter().zip(constructed) {
            let plugin = result.map_err(|e| {
                Error::Load(format!(
                    "Plugin '{}' failed to initialize: {:#}",
                    pending.label, e
                ))
            })?;
            builder.insert(plugin)?;
        }

        logging::log_plugins_instantiated(builder.len());
        Ok(builder.freeze())
    }

    async fn discover(&self) -> Result<Vec<PendingPlugin>> {
        match &self.source {
            PluginSource::Catalog => Ok(self
                .catalog
                .names()
                .into_iter()
                .filter_map(|name| {
                    let factory = self.catalog.get(&name)?;
                    Some(PendingPlugin {
                        label: name,
                        factory,
                        settings: PluginSettings::new(),
                    })
                })
                .collect()),
            PluginSource::Directory(dir) => self.discover_directory(dir).await,
        }
    }

    async fn discover_directory(&self, dir: &Path) -> Result<Vec<PendingPlugin>> {
        let manifest_paths = list_manifests(dir).await?;

        let manifests = join_all(manifest_paths.iter().map(|path| load_manifest(path))).await;

        let mut pending = Vec::new();
        for (path, manifest) in manifest_paths.iter().zip(manifests) {
            let manifest = manifest?;
            let label = path.display().to_string();

            if !manifest.enabled {
                logging::log_plugin_disabled(&label);
                continue;
            }

            let factory = self.catalog.get(&manifest.factory).ok_or_else(|| {
                Error::Load(format!(
                    "{}: unknown plugin factory '{}'",
                    label, manifest.factory
                ))
            })?;

            pending.push(PendingPlugin {
                label,
                factory,
                settings: manifest.settings,
            });
        }

        Ok(pending)
    }
}

/// Plugin manifest paths in a directory, sorted by file name
async fn list_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        Error::Load(format!("Failed to read plugin directory {:?}: {}", dir, e))
    })?;

    let mut paths = Vec::new();
    loop {
        let entry = entries.next_entry().await.map_err(|e| {
            Error::Load(format!("Failed to read plugin directory {:?}: {}", dir, e))
        })?;
        let Some(entry) = entry else { break };

        let path = entry.path();
        if is_plugin_file(&path) {
            paths.push(path);
        }
    }

    paths.sort();
    info!("Found {} plugin manifests in {:?}", paths.len(), dir);
    Ok(paths)
}

async fn load_manifest(path: &Path) -> Result<PluginManifest> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Load(format!("Failed to read manifest {:?}: {}", path, e)))?;

    let manifest = PluginManifest::from_toml(&contents)
        .map_err(|e| Error::Load(format!("{:?}: {}", path, e)))?;

    manifest
        .validate()
        .map_err(|e| Error::Load(format!("{:?}: {}", path, e)))?;

    Ok(manifest)
}
