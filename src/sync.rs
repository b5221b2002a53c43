//! Guild synchronization: publish declarations, then derive and publish
//! permission grants for restricted commands.

use crate::config::Config;
use crate::logging;
use crate::permissions::resolve_elevated_permission_roles;
use crate::platform::{GuildId, PermissionGrant, PlatformClient, RegisteredCommand};
use crate::plugin::{CommandAccess, CommandTable};
use crate::{Error, Result};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Outcome of one guild registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub guild: GuildId,
    /// Declarations pushed
    pub declared: usize,
    /// Restricted commands that received a grant
    pub granted: usize,
    /// Registered names with no local handler
    pub drifted: Vec<String>,
    /// Registered commands owned by other applications
    pub foreign: usize,
}

/// Pushes the command table and its permission grants to guilds
pub struct Synchronizer {
    table: Arc<CommandTable>,
    client: Arc<dyn PlatformClient>,
    config: Arc<Config>,
}

impl Synchronizer {
    pub fn new(table: Arc<CommandTable>, client: Arc<dyn PlatformClient>, config: Arc<Config>) -> Self {
        Self {
            table,
            client,
            config,
        }
    }

    /// Register the full declaration set for one guild, then its permissions
    ///
    /// Steps run strictly in order since grants need the ids the platform
    /// assigns on push. Any platform failure aborts this guild only.
    pub async fn register_commands_for_guild(&self, guild: &GuildId) -> Result<SyncReport> {
        let sync_error = |source| Error::Synchronization {
            guild: guild.clone(),
            source,
        };

        let declarations = self.table.declarations();
        self.client
            .push_declarations(guild, declarations)
            .await
            .map_err(sync_error)?;
        logging::log_commands_pushed(guild, declarations.len());

        let registered = self
            .client
            .fetch_registered_commands(guild)
            .await
            .map_err(sync_error)?;

        let mut report = SyncReport {
            guild: guild.clone(),
            declared: declarations.len(),
            ..SyncReport::default()
        };
        let grants = self.compute_grants(guild, &registered, &mut report);
        report.granted = grants.len();

        self.client
            .set_permissions(guild, &grants)
            .await
            .map_err(sync_error)?;
        logging::log_permissions_pushed(guild, grants.len());

        Ok(report)
    }

    /// Register every guild concurrently; one guild's failure leaves the others untouched
    pub async fn register_all(&self, guilds: &[GuildId]) -> Vec<(GuildId, Result<SyncReport>)> {
        let results = join_all(
            guilds
                .iter()
                .map(|guild| self.register_commands_for_guild(guild)),
        )
        .await;

        guilds.iter().cloned().zip(results).collect()
    }

    fn compute_grants(
        &self,
        guild: &GuildId,
        registered: &[RegisteredCommand],
        report: &mut SyncReport,
    ) -> Vec<PermissionGrant> {
        let own_application = self.client.application_id();
        let mut grants = Vec::new();

        for command in registered {
            if command.application_id != own_application {
                report.foreign += 1;
                continue;
            }

            let Some(entry) = self.table.get(&command.name) else {
                logging::log_command_drift(guild, &command.name);
                report.drifted.push(command.name.clone());
                continue;
            };

            match entry.access() {
                CommandAccess::Unrestricted => {}
                CommandAccess::Restricted(tags) => {
                    let roles = resolve_elevated_permission_roles(&self.config, tags);
                    debug!(
                        command = command.name.as_str(),
                        roles = roles.len(),
                        "Granting restricted command"
                    );
                    grants.push(PermissionGrant::for_roles(command.id.clone(), &roles));
                }
            }
        }

        grants
    }
}
