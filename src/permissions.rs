use crate::config::Config;
use crate::platform::RoleId;
use tracing::warn;

/// Resolve required permission tags to the role ids configured for them.
///
/// Roles keep the order of the tags and of the configured lists; a role
/// listed under several tags appears once. Tags missing from the
/// configuration grant nothing.
pub fn resolve_elevated_permission_roles(config: &Config, required_tags: &[String]) -> Vec<RoleId> {
    let mut roles: Vec<RoleId> = Vec::new();

    for tag in required_tags {
        match config.permissions.get(tag) {
            Some(configured) => {
                for role in configured {
                    if !roles.contains(role) {
                        roles.push(role.clone());
                    }
                }
            }
            None => warn!(tag = tag.as_str(), "No roles configured for permission tag"),
        }
    }

    roles
}
