use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slashdeck")]
#[command(about = "Load slash command plugins and register them with Discord guilds", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file; must exist when given [default: ./.slashdeck.toml if present]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bot token, overrides `bot.token` from the config file
    #[arg(long, global = true, env = "SLASHDECK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load plugins and print the command table
    List(ListArgs),

    /// Register commands and permissions with one or more guilds
    Sync(SyncArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Directory of plugin manifests (defaults to `plugins.directory`)
    #[arg(long)]
    pub plugin_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SyncArgs {
    /// Guild to register with; repeatable (defaults to `bot.guilds`)
    #[arg(short, long = "guild", value_name = "GUILD_ID")]
    pub guilds: Vec<String>,

    /// Directory of plugin manifests (defaults to `plugins.directory`)
    #[arg(long)]
    pub plugin_dir: Option<PathBuf>,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}
