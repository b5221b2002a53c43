use crate::interaction::{Interaction, ReplyPayload};
use crate::platform::{CommandDeclaration, CommandOption, OptionKind};
use crate::plugin::{CommandAccess, CommandPlugin, PluginContext, PluginSettings};
use anyhow::{bail, Context};
use async_trait::async_trait;

const DEFAULT_PREFIX: &str = "📣";

/// `/announce <message>`: posts a prefixed announcement, restricted to moderators
pub struct AnnouncePlugin {
    prefix: String,
    tags: Vec<String>,
}

impl AnnouncePlugin {
    /// Settings: `prefix` (string) and `permissions` (list of tags, default `["MODERATE"]`)
    pub fn from_settings(_ctx: PluginContext, settings: PluginSettings) -> anyhow::Result<Self> {
        let prefix = match settings.get("prefix") {
            Some(value) => value
                .as_str()
                .context("announce: `prefix` must be a string")?
                .to_string(),
            None => DEFAULT_PREFIX.to_string(),
        };

        let tags = match settings.get("permissions") {
            Some(value) => value
                .as_array()
                .context("announce: `permissions` must be a list of tags")?
                .iter()
                .map(|tag| tag.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
                .context("announce: permission tags must be strings")?,
            None => vec!["MODERATE".to_string()],
        };

        Ok(Self { prefix, tags })
    }
}

#[async_trait]
impl CommandPlugin for AnnouncePlugin {
    fn declaration(&self) -> CommandDeclaration {
        CommandDeclaration::new("announce", "Post an announcement in this channel").option(
            CommandOption::new(OptionKind::String, "message", "Announcement text").required(true),
        )
    }

    fn access(&self) -> CommandAccess {
        CommandAccess::Restricted(self.tags.clone())
    }

    async fn execute(&self, interaction: &Interaction) -> anyhow::Result<()> {
        interaction.defer(false).await?;

        let Some(message) = interaction.option("message").and_then(|v| v.as_str()) else {
            bail!("missing required option `message`");
        };
        if message.trim().is_empty() {
            bail!("announcement text is empty");
        }

        interaction
            .edit_reply(ReplyPayload::text(format!("{} {}", self.prefix, message)))
            .await?;
        Ok(())
    }
}
