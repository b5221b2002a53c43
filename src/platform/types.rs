//! Wire types exchanged with the platform's application command endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::OnceLock;

/// Platform identifier of a guild
pub type GuildId = String;

/// Platform identifier of a role
pub type RoleId = String;

/// Platform identifier of a registered command, assigned on push
pub type CommandId = String;

const MAX_NAME_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_OPTIONS: usize = 25;

/// Integer kinds of command options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A fixed choice offered for a string or integer option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: serde_json::Value,
}

/// One option of a command declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
}

impl CommandOption {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Wire description of a slash command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDeclaration {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
    pub default_permission: bool,
}

impl CommandDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            default_permission: true,
        }
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Check the platform's naming and size limits
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_name(&self.name) {
            return Err(format!(
                "Invalid command name '{}': expected 1-{} lowercase letters, digits, '-' or '_'",
                self.name, MAX_NAME_LEN
            ));
        }

        let desc_len = self.description.chars().count();
        if desc_len == 0 || desc_len > MAX_DESCRIPTION_LEN {
            return Err(format!(
                "Command '{}' description must be 1-{} characters",
                self.name, MAX_DESCRIPTION_LEN
            ));
        }

        if self.options.len() > MAX_OPTIONS {
            return Err(format!(
                "Command '{}' has {} options, at most {} are allowed",
                self.name,
                self.options.len(),
                MAX_OPTIONS
            ));
        }

        for option in &self.options {
            if !is_valid_name(&option.name) {
                return Err(format!(
                    "Command '{}' has invalid option name '{}'",
                    self.name, option.name
                ));
            }
        }

        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| {
        Regex::new(r"^[-_\p{Ll}\p{N}]{1,32}$").expect("command name pattern is valid")
    });
    re.is_match(name)
}

/// A command as currently registered on the platform
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisteredCommand {
    pub id: CommandId,
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub description: String,
}

/// Kind of target a permission entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Role = 1,
    User = 2,
}

impl Serialize for PermissionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// One allow entry of a permission grant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandPermission {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PermissionKind,
    pub permission: bool,
}

impl CommandPermission {
    pub fn allow_role(role: impl Into<RoleId>) -> Self {
        Self {
            id: role.into(),
            kind: PermissionKind::Role,
            permission: true,
        }
    }
}

/// Roles allowed to invoke one registered command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionGrant {
    pub id: CommandId,
    pub permissions: Vec<CommandPermission>,
}

impl PermissionGrant {
    pub fn for_roles(command_id: impl Into<CommandId>, roles: &[RoleId]) -> Self {
        Self {
            id: command_id.into(),
            permissions: roles.iter().cloned().map(CommandPermission::allow_role).collect(),
        }
    }

    /// Role ids carried by this grant
    pub fn role_ids(&self) -> Vec<&str> {
        self.permissions
            .iter()
            .filter(|p| p.kind == PermissionKind::Role)
            .map(|p| p.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declaration_wire_shape() {
        let decl = CommandDeclaration::new("kick", "Kick a member").option(
            CommandOption::new(OptionKind::User, "member", "Member to kick").required(true),
        );

        assert_eq!(
            serde_json::to_value(&decl).unwrap(),
            json!({
                "name": "kick",
                "description": "Kick a member",
                "options": [
                    {"type": 6, "name": "member", "description": "Member to kick", "required": true}
                ],
                "default_permission": true
            })
        );
    }

    #[test]
    fn test_option_choices_serialize() {
        let option = CommandOption::new(OptionKind::String, "level", "Level")
            .choice("Low", "low")
            .choice("High", "high");
        let value = serde_json::to_value(&option).unwrap();
        assert_eq!(value["type"], 3);
        assert_eq!(value["choices"][1], json!({"name": "High", "value": "high"}));
        assert!(value.get("required").is_none());
    }

    #[test]
    fn test_validate_names() {
        assert!(CommandDeclaration::new("ping", "Ping").validate().is_ok());
        assert!(CommandDeclaration::new("set-level_2", "x").validate().is_ok());
        assert!(CommandDeclaration::new("Ping", "Ping").validate().is_err());
        assert!(CommandDeclaration::new("", "Ping").validate().is_err());
        assert!(CommandDeclaration::new("has space", "Ping").validate().is_err());
        assert!(CommandDeclaration::new("a".repeat(33), "Ping").validate().is_err());
    }

    #[test]
    fn test_validate_description_and_options() {
        assert!(CommandDeclaration::new("ping", "").validate().is_err());
        assert!(CommandDeclaration::new("ping", "d".repeat(101)).validate().is_err());

        let mut decl = CommandDeclaration::new("ping", "Ping");
        for i in 0..26 {
            decl = decl.option(CommandOption::new(OptionKind::String, format!("o{i}"), "x"));
        }
        assert!(decl.validate().is_err());

        let bad_option = CommandDeclaration::new("ping", "Ping")
            .option(CommandOption::new(OptionKind::String, "Bad", "x"));
        assert!(bad_option.validate().is_err());
    }

    #[test]
    fn test_grant_wire_shape() {
        let grant = PermissionGrant::for_roles("900", &["R1".to_string()]);
        assert_eq!(
            serde_json::to_value(&grant).unwrap(),
            json!({"id": "900", "permissions": [{"id": "R1", "type": 1, "permission": true}]})
        );
        assert_eq!(grant.role_ids(), vec!["R1"]);
    }

    #[test]
    fn test_registered_command_decodes() {
        let cmd: RegisteredCommand = serde_json::from_value(json!({
            "id": "1",
            "application_id": "42",
            "name": "ping",
            "version": "7",
            "type": 1
        }))
        .unwrap();
        assert_eq!(cmd.name, "ping");
        assert_eq!(cmd.guild_id, None);
    }
}
