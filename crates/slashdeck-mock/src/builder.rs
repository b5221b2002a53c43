use crate::platform::MockPlatform;
use crate::responder::RecordingResponder;
use anyhow::bail;
use async_trait::async_trait;
use slashdeck::callbacks::CallbackManager;
use slashdeck::config::Config;
use slashdeck::interaction::{Interaction, InteractionData, ReplyPayload};
use slashdeck::platform::CommandDeclaration;
use slashdeck::plugin::{CommandAccess, CommandPlugin, PluginContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    DeferThenReply(String),
    Fail(String),
    DeferThenFail(String),
    ReplyThenFail(String),
    Panic(String),
    Sleep(Duration),
}

/// Scripted command plugin
pub struct MockPlugin {
    declaration: CommandDeclaration,
    access: CommandAccess,
    behavior: Behavior,
    executions: AtomicUsize,
}

impl MockPlugin {
    pub fn builder(name: &str) -> MockPluginBuilder {
        MockPluginBuilder {
            declaration: CommandDeclaration::new(name, format!("Mock command {}", name)),
            access: CommandAccess::Unrestricted,
            behavior: Behavior::Reply("ok".to_string()),
        }
    }

    /// Number of times `execute` was entered
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandPlugin for MockPlugin {
    fn declaration(&self) -> CommandDeclaration {
        self.declaration.clone()
    }

    fn access(&self) -> CommandAccess {
        self.access.clone()
    }

    async fn execute(&self, interaction: &Interaction) -> anyhow::Result<()> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Reply(text) => interaction.reply(ReplyPayload::text(text.clone())).await?,
            Behavior::DeferThenReply(text) => {
                interaction.defer(false).await?;
                interaction.edit_reply(ReplyPayload::text(text.clone())).await?;
            }
            Behavior::Fail(msg) => bail!("{}", msg),
            Behavior::DeferThenFail(msg) => {
                interaction.defer(false).await?;
                bail!("{}", msg);
            }
            Behavior::ReplyThenFail(msg) => {
                interaction.reply(ReplyPayload::text("working")).await?;
                bail!("{}", msg);
            }
            Behavior::Panic(msg) => panic!("{}", msg),
            Behavior::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                interaction.reply(ReplyPayload::text("slept")).await?;
            }
        }
        Ok(())
    }
}

pub struct MockPluginBuilder {
    declaration: CommandDeclaration,
    access: CommandAccess,
    behavior: Behavior,
}

impl MockPluginBuilder {
    pub fn description(mut self, description: &str) -> Self {
        self.declaration.description = description.to_string();
        self
    }

    pub fn restricted(mut self, tags: &[&str]) -> Self {
        self.access = CommandAccess::restricted(tags.iter().copied());
        self
    }

    pub fn replying(mut self, text: &str) -> Self {
        self.behavior = Behavior::Reply(text.to_string());
        self
    }

    pub fn deferring_then_replying(mut self, text: &str) -> Self {
        self.behavior = Behavior::DeferThenReply(text.to_string());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.behavior = Behavior::Fail(message.to_string());
        self
    }

    pub fn deferring_then_failing(mut self, message: &str) -> Self {
        self.behavior = Behavior::DeferThenFail(message.to_string());
        self
    }

    pub fn replying_then_failing(mut self, message: &str) -> Self {
        self.behavior = Behavior::ReplyThenFail(message.to_string());
        self
    }

    pub fn panicking(mut self, message: &str) -> Self {
        self.behavior = Behavior::Panic(message.to_string());
        self
    }

    pub fn sleeping(mut self, duration: Duration) -> Self {
        self.behavior = Behavior::Sleep(duration);
        self
    }

    pub fn build(self) -> MockPlugin {
        MockPlugin {
            declaration: self.declaration,
            access: self.access,
            behavior: self.behavior,
            executions: AtomicUsize::new(0),
        }
    }

    pub fn build_arc(self) -> Arc<MockPlugin> {
        Arc::new(self.build())
    }
}

/// Plugin context backed by a mock platform and the given permission mapping
pub fn test_context(platform: Arc<MockPlatform>, permissions: &[(&str, &[&str])]) -> PluginContext {
    let mut mapping = HashMap::new();
    for (tag, roles) in permissions {
        mapping.insert(
            tag.to_string(),
            roles.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
        );
    }
    let config = Config {
        permissions: mapping,
        ..Config::default()
    };

    PluginContext::new(
        Arc::new(config),
        platform,
        Arc::new(()),
        Arc::new(CallbackManager::new()),
    )
}

/// Slash command interaction in guild `7` answered through `responder`
pub fn interaction(command_name: &str, responder: Arc<RecordingResponder>) -> Interaction {
    interaction_with_options(command_name, serde_json::Value::Null, responder)
}

pub fn interaction_with_options(
    command_name: &str,
    options: serde_json::Value,
    responder: Arc<RecordingResponder>,
) -> Interaction {
    let data = InteractionData {
        id: "1".to_string(),
        token: "interaction-token".to_string(),
        application_id: "42".to_string(),
        guild_id: Some("7".to_string()),
        user_id: Some("99".to_string()),
        command_name: command_name.to_string(),
        options,
    };
    Interaction::new(data, responder)
}
