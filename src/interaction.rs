//! Inbound interaction events and the channel used to answer them.

use crate::platform::{GuildId, PlatformError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Message body of a reply or an edited reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyPayload {
    pub content: String,
    /// Action rows; an empty list clears components on edit
    pub components: Vec<serde_json::Value>,
    pub ephemeral: bool,
}

impl ReplyPayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn with_components(mut self, components: Vec<serde_json::Value>) -> Self {
        self.components = components;
        self
    }
}

/// Response channel of one interaction
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Send the initial response
    async fn reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError>;

    /// Acknowledge now, answer later through [`InteractionResponder::edit_reply`]
    async fn defer(&self, ephemeral: bool) -> Result<(), PlatformError>;

    /// Replace the content of the original (possibly deferred) response
    async fn edit_reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError>;
}

/// Identity and payload of an interaction as handed over by the event source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionData {
    pub id: String,
    pub token: String,
    pub application_id: String,
    pub guild_id: Option<GuildId>,
    pub user_id: Option<String>,
    pub command_name: String,
    pub options: serde_json::Value,
}

/// A slash command invocation routed through the dispatcher
pub struct Interaction {
    data: InteractionData,
    responder: Arc<dyn InteractionResponder>,
    deferred: AtomicBool,
    replied: AtomicBool,
}

impl Interaction {
    pub fn new(data: InteractionData, responder: Arc<dyn InteractionResponder>) -> Self {
        Self {
            data,
            responder,
            deferred: AtomicBool::new(false),
            replied: AtomicBool::new(false),
        }
    }

    pub fn command_name(&self) -> &str {
        &self.data.command_name
    }

    pub fn data(&self) -> &InteractionData {
        &self.data
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.data.guild_id.as_deref()
    }

    /// Value of a named top-level option, if present
    pub fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.data
            .options
            .as_array()?
            .iter()
            .find(|opt| opt.get("name").and_then(|n| n.as_str()) == Some(name))
            .and_then(|opt| opt.get("value"))
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    pub fn is_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    pub async fn reply(&self, payload: ReplyPayload) -> Result<(), PlatformError> {
        self.responder.reply(&payload).await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub async fn defer(&self, ephemeral: bool) -> Result<(), PlatformError> {
        self.responder.defer(ephemeral).await?;
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub async fn edit_reply(&self, payload: ReplyPayload) -> Result<(), PlatformError> {
        self.responder.edit_reply(&payload).await
    }
}

/// A button or select-menu interaction on a message a plugin sent earlier
pub struct ComponentInteraction {
    pub custom_id: String,
    pub values: Vec<String>,
    pub interaction: Interaction,
}
