/// Tests for plugin discovery and command table construction
use proptest::prelude::*;
use slashdeck::builtin;
use slashdeck::plugin::{
    CommandAccess, CommandPlugin, PluginCatalog, PluginLoader, PluginSource,
};
use slashdeck::{Error, PlatformClient};
use slashdeck_mock::{test_context, MockPlatform, MockPlugin};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Barrier;

fn context() -> slashdeck::PluginContext {
    test_context(Arc::new(MockPlatform::new("42")), &[])
}

fn catalog_of(names: &[&str]) -> PluginCatalog {
    let mut catalog = PluginCatalog::new();
    for name in names {
        let command = name.to_string();
        catalog.register_sync(*name, move |_ctx, _settings| {
            Ok(MockPlugin::builder(&command).build())
        });
    }
    catalog
}

fn write_manifest(dir: &TempDir, file: &str, contents: &str) {
    std::fs::write(dir.path().join(file), contents).unwrap();
}

#[tokio::test]
async fn test_catalog_source_loads_every_factory() {
    let loader = PluginLoader::new(
        PluginSource::Catalog,
        catalog_of(&["ping", "kick", "echo"]),
        context(),
    );

    let table = loader.scan().await.unwrap();

    assert_eq!(table.len(), 3);
    // catalog factories are discovered in sorted order
    assert_eq!(table.names(), vec!["echo", "kick", "ping"]);
    assert_eq!(table.declarations().len(), table.len());
}

#[tokio::test]
async fn test_duplicate_names_are_rejected() {
    let mut catalog = PluginCatalog::new();
    catalog
        .register_sync("ping-a", |_ctx, _settings| {
            Ok(MockPlugin::builder("ping").replying("a").build())
        })
        .register_sync("ping-b", |_ctx, _settings| {
            Ok(MockPlugin::builder("ping").replying("b").build())
        });

    let loader = PluginLoader::new(PluginSource::Catalog, catalog, context());
    let err = loader.scan().await.err().expect("duplicate must fail");

    assert!(matches!(err, Error::DuplicateCommand { ref name } if name == "ping"));
}

#[tokio::test]
async fn test_directory_source_reads_manifests() {
    let dir = TempDir::new().unwrap();
    write_manifest(&dir, "10-ping.toml", "factory = \"ping\"");
    write_manifest(
        &dir,
        "20-announce.toml",
        "factory = \"announce\"\n[settings]\nprefix = \">>\"\npermissions = [\"ADMIN\"]",
    );
    write_manifest(&dir, "30-off.toml", "factory = \"ping\"\nenabled = false");
    write_manifest(&dir, "README.md", "not a plugin");

    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().to_path_buf()),
        builtin::catalog(),
        context(),
    );
    let table = loader.scan().await.unwrap();

    assert_eq!(table.names(), vec!["ping", "announce"]);
    assert_eq!(
        table.get("announce").unwrap().access(),
        &CommandAccess::Restricted(vec!["ADMIN".to_string()])
    );
}

#[tokio::test]
async fn test_duplicate_manifests_in_directory_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_manifest(&dir, "10-ping.toml", "factory = \"ping\"");
    write_manifest(&dir, "11-ping.toml", "factory = \"ping\"");

    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().to_path_buf()),
        builtin::catalog(),
        context(),
    );
    let err = loader.scan().await.err().expect("duplicate manifests must fail");

    assert!(matches!(err, Error::DuplicateCommand { ref name } if name == "ping"));
}

#[tokio::test]
async fn test_unknown_factory_is_load_error() {
    let dir = TempDir::new().unwrap();
    write_manifest(&dir, "weather.toml", "factory = \"weather\"");

    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().to_path_buf()),
        builtin::catalog(),
        context(),
    );
    let err = loader.scan().await.err().expect("unknown factory must fail");

    assert!(matches!(err, Error::Load(ref msg) if msg.contains("weather")));
}

#[tokio::test]
async fn test_malformed_manifest_is_load_error() {
    let dir = TempDir::new().unwrap();
    write_manifest(&dir, "broken.toml", "factory = ");

    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().to_path_buf()),
        builtin::catalog(),
        context(),
    );

    assert!(matches!(loader.scan().await, Err(Error::Load(_))));
}

#[tokio::test]
async fn test_unreadable_directory_is_load_error() {
    let dir = TempDir::new().unwrap();
    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().join("missing")),
        builtin::catalog(),
        context(),
    );

    assert!(matches!(loader.scan().await, Err(Error::Load(_))));
}

#[tokio::test]
async fn test_failing_factory_is_load_error() {
    let mut catalog = catalog_of(&["ping"]);
    catalog.register("broken", |_ctx, _settings| async {
        Err::<Arc<dyn CommandPlugin>, _>(anyhow::anyhow!("database unavailable"))
    });

    let loader = PluginLoader::new(PluginSource::Catalog, catalog, context());
    let err = loader.scan().await.err().expect("factory failure must fail");

    assert!(matches!(err, Error::Load(ref msg) if msg.contains("database unavailable")));
}

#[tokio::test]
async fn test_invalid_settings_fail_the_scan() {
    let dir = TempDir::new().unwrap();
    write_manifest(&dir, "announce.toml", "factory = \"announce\"\n[settings]\nprefix = 5");

    let loader = PluginLoader::new(
        PluginSource::Directory(dir.path().to_path_buf()),
        builtin::catalog(),
        context(),
    );

    assert!(matches!(loader.scan().await, Err(Error::Load(_))));
}

#[tokio::test]
async fn test_factories_are_constructed_concurrently() {
    // Every factory waits for all the others; a sequential loader would never finish.
    const COUNT: usize = 4;
    let barrier = Arc::new(Barrier::new(COUNT));
    let mut catalog = PluginCatalog::new();
    for i in 0..COUNT {
        let barrier = barrier.clone();
        catalog.register(format!("cmd-{i}"), move |_ctx, _settings| {
            let barrier = barrier.clone();
            async move {
                barrier.wait().await;
                let plugin: Arc<dyn CommandPlugin> =
                    Arc::new(MockPlugin::builder(&format!("cmd-{i}")).build());
                Ok(plugin)
            }
        });
    }

    let loader = PluginLoader::new(PluginSource::Catalog, catalog, context());
    let table = tokio::time::timeout(Duration::from_secs(5), loader.scan())
        .await
        .expect("plugins were not constructed concurrently")
        .unwrap();

    assert_eq!(table.len(), COUNT);
}

#[tokio::test]
async fn test_builtin_catalog() {
    let loader = PluginLoader::new(PluginSource::Catalog, builtin::catalog(), context());
    let table = loader.scan().await.unwrap();

    assert_eq!(table.names(), vec!["announce", "ping"]);
    assert!(table.get("announce").unwrap().access().is_restricted());
    assert!(!table.get("ping").unwrap().access().is_restricted());

    let stats = table.statistics();
    assert_eq!(stats.restricted, 1);
    assert_eq!(stats.unrestricted, 1);
}

#[tokio::test]
async fn test_factories_receive_shared_context() {
    let mut catalog = PluginCatalog::new();
    catalog.register_sync("audit", |ctx, _settings| {
        anyhow::ensure!(ctx.storage_as::<()>().is_some(), "storage handle missing");
        anyhow::ensure!(ctx.storage_as::<String>().is_none(), "storage has wrong type");
        anyhow::ensure!(ctx.config.permissions.contains_key("MODERATE"));
        anyhow::ensure!(ctx.platform.application_id() == "42");
        Ok(MockPlugin::builder("audit").build())
    });
    let context = test_context(Arc::new(MockPlatform::new("42")), &[("MODERATE", &["R1"])]);

    let loader = PluginLoader::new(PluginSource::Catalog, catalog, context);

    assert!(loader.scan().await.unwrap().contains("audit"));
}

proptest! {
    #[test]
    fn prop_distinct_names_yield_one_entry_each(
        names in prop::collection::hash_set("[a-z][a-z0-9_-]{0,15}", 0..12)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let loader = PluginLoader::new(PluginSource::Catalog, catalog_of(&refs), context());

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let table = runtime.block_on(loader.scan()).unwrap();

        prop_assert_eq!(table.len(), names.len());
        for name in &names {
            prop_assert!(table.contains(name));
        }
    }
}
