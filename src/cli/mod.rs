pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ListArgs, SyncArgs, Verbosity};
