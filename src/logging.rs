//! Structured logging helpers for the command registry.
//!
//! These wrap `tracing` so loading, synchronization and dispatch report
//! with consistent field names.

/// Log plugin discovery.
pub fn log_plugins_discovered(source: &str, count: usize) {
    tracing::info!(source, count, "Discovered command plugins");
}

/// Log a skipped manifest.
pub fn log_plugin_disabled(manifest: &str) {
    tracing::debug!(manifest, "Plugin disabled, skipping");
}

/// Log plugin instantiation.
pub fn log_plugins_instantiated(count: usize) {
    tracing::info!(count, "Command plugins instantiated");
}

/// Log the declaration push for a guild.
pub fn log_commands_pushed(guild: &str, count: usize) {
    tracing::info!(guild, count, "Registered commands for guild");
}

/// Log a registered command with no local handler.
pub fn log_command_drift(guild: &str, command: &str) {
    tracing::warn!(guild, command, "Registered command has no local handler");
}

/// Log the permission push for a guild.
pub fn log_permissions_pushed(guild: &str, grants: usize) {
    tracing::info!(guild, grants, "Updated command permissions for guild");
}

/// Log an interaction for a command that is not in the table.
pub fn log_unknown_command(command: &str) {
    tracing::warn!(command, "No handler for interaction, ignoring");
}

/// Log a component interaction nobody registered a callback for.
pub fn log_unknown_component(custom_id: &str) {
    tracing::warn!(custom_id, "No callback for component interaction, ignoring");
}

/// Log a dispatched command.
pub fn log_dispatch(command: &str, guild: Option<&str>) {
    tracing::debug!(command, guild = guild.unwrap_or("-"), "Dispatching interaction");
}

/// Log a failed command execution.
pub fn log_handler_failure(command: &str, error: &str) {
    tracing::error!(command, error, "Command execution failed");
}

/// Log a failure to deliver the error report itself.
pub fn log_report_failure(command: &str, error: &str) {
    tracing::error!(command, error, "Failed to report command error to user");
}
