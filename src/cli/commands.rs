use crate::builtin;
use crate::callbacks::CallbackManager;
use crate::cli::args::{ListArgs, SyncArgs};
use crate::config::Config;
use crate::platform::{GuildId, HttpPlatformClient, PlatformClient};
use crate::plugin::{CommandTable, PluginContext, PluginLoader, PluginSource, StorageHandle};
use crate::sync::Synchronizer;
use crate::ui::formatter::Formatter;
use crate::Error;
use miette::{miette, Result};
use std::path::Path;
use std::sync::Arc;

fn print_info(message: impl AsRef<str>) {
    println!("{}", Formatter::info(message));
}

fn print_success(message: impl AsRef<str>) {
    println!("{}", Formatter::success(message));
}

fn print_warning(message: impl AsRef<str>) {
    println!("{}", Formatter::warning(message));
}

fn print_error(message: impl AsRef<str>) {
    eprintln!("{}", Formatter::error(message));
}

/// Scan plugins with the shared dependencies built from `config`
async fn load_table(
    config: Arc<Config>,
    client: Arc<dyn PlatformClient>,
    plugin_dir: Option<&Path>,
) -> Result<Arc<CommandTable>> {
    let configured = plugin_dir.or(config.plugins.directory.as_deref());
    let source = PluginSource::resolve(configured);

    // No persistent store is configured for the CLI; plugins get a unit handle.
    let storage: StorageHandle = Arc::new(());
    let context = PluginContext::new(
        config.clone(),
        client,
        storage,
        Arc::new(CallbackManager::new()),
    );

    let loader = PluginLoader::new(source, builtin::catalog(), context);
    let table = loader.scan().await?;
    Ok(Arc::new(table))
}

/// Execute the list command
pub async fn list(args: ListArgs, config: Config) -> Result<()> {
    let client = HttpPlatformClient::with_base_url(
        config.bot.token.as_deref().unwrap_or_default(),
        config.bot.application_id.as_deref().unwrap_or_default(),
        config.api_base_url(),
    );

    let table = load_table(Arc::new(config), Arc::new(client), args.plugin_dir.as_deref()).await?;
    println!("{}", Formatter::format_table(&table));
    Ok(())
}

/// Execute the sync command
pub async fn sync(args: SyncArgs, config: Config) -> Result<()> {
    let guilds: Vec<GuildId> = if args.guilds.is_empty() {
        config.bot.guilds.clone()
    } else {
        args.guilds
    };
    if guilds.is_empty() {
        return Err(Error::Config(
            "no guilds given; pass --guild or set bot.guilds".to_string(),
        )
        .into());
    }

    let config = Arc::new(config);
    let client: Arc<dyn PlatformClient> = Arc::new(HttpPlatformClient::from_config(&config)?);
    let table = load_table(config.clone(), client.clone(), args.plugin_dir.as_deref()).await?;

    print_info(format!(
        "Registering {} commands with {} guild(s)",
        table.len(),
        guilds.len()
    ));

    let synchronizer = Synchronizer::new(table, client, config);
    let results = synchronizer.register_all(&guilds).await;

    let mut failed = 0;
    for (guild, result) in results {
        match result {
            Ok(report) if !report.drifted.is_empty() => {
                print_warning(Formatter::format_sync_report(&report))
            }
            Ok(report) => print_success(Formatter::format_sync_report(&report)),
            Err(e) => {
                failed += 1;
                print_error(format!("guild {}: {}", guild, e));
            }
        }
    }

    if failed > 0 {
        return Err(miette!("{} of {} guild registrations failed", failed, guilds.len()));
    }
    Ok(())
}
