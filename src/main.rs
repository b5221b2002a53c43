use clap::Parser;
use slashdeck::cli::{Cli, Commands, Verbosity};
use slashdeck::config::Config;
use slashdeck::ui::formatter::Formatter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: human-readable lines on stderr, or JSON
/// lines when `SLASHDECK_LOG_JSON` is set. `RUST_LOG` overrides the
/// verbosity flags.
fn initialize_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("slashdeck={}", verbosity.to_log_level())));
    let json = std::env::var_os("SLASHDECK_LOG_JSON").is_some();

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let cli = Cli::parse();
    initialize_tracing(cli.verbosity());

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(token) = cli.token {
        config.bot.token = Some(token);
    }

    let result = match cli.command {
        Commands::List(args) => slashdeck::cli::commands::list(args, config).await,
        Commands::Sync(args) => slashdeck::cli::commands::sync(args, config).await,
    };

    if let Err(err) = &result {
        eprintln!("{}", Formatter::error(format!("Error: {err}")));
    }
    result
}
