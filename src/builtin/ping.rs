use crate::interaction::{Interaction, ReplyPayload};
use crate::platform::CommandDeclaration;
use crate::plugin::CommandPlugin;
use async_trait::async_trait;

/// `/ping`: answers immediately, useful to check the bot is alive
pub struct PingPlugin;

#[async_trait]
impl CommandPlugin for PingPlugin {
    fn declaration(&self) -> CommandDeclaration {
        CommandDeclaration::new("ping", "Check that the bot is responding")
    }

    async fn execute(&self, interaction: &Interaction) -> anyhow::Result<()> {
        interaction
            .reply(ReplyPayload::text("Pong!").ephemeral())
            .await?;
        Ok(())
    }
}
