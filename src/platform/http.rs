//! Raw HTTP calls to the platform REST API.
//!
//! Wraps reqwest for the guild command endpoints (bulk overwrite, list,
//! batch permission edit) and the interaction response endpoints.

use super::types::{CommandDeclaration, GuildId, PermissionGrant, RegisteredCommand};
use super::{PlatformClient, PlatformError};
use crate::config::Config;
use crate::interaction::{InteractionResponder, ReplyPayload};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

/// Interaction callback type: reply with a message
const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
/// Interaction callback type: acknowledge, reply later
const CALLBACK_DEFERRED_CHANNEL_MESSAGE: u8 = 5;
/// Message flag hiding the response from everyone but the invoker
const FLAG_EPHEMERAL: u64 = 1 << 6;

/// REST client for the application command endpoints.
#[derive(Clone)]
pub struct HttpPlatformClient {
    client: Client,
    base_url: String,
    token: String,
    application_id: String,
}

impl HttpPlatformClient {
    /// Create a client from the bot section of the configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self::with_base_url(
            config.token()?,
            config.application_id()?,
            config.api_base_url(),
        ))
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(token: &str, application_id: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            application_id: application_id.to_string(),
        }
    }

    /// Responder for one interaction received by this bot
    pub fn responder(&self, interaction_id: &str, interaction_token: &str) -> HttpResponder {
        HttpResponder {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            application_id: self.application_id.clone(),
            interaction_id: interaction_id.to_string(),
            interaction_token: interaction_token.to_string(),
        }
    }

    fn guild_commands_url(&self, guild: &GuildId) -> String {
        format!(
            "{}/applications/{}/guilds/{}/commands",
            self.base_url, self.application_id, guild
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bot {}", self.token))
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    fn application_id(&self) -> &str {
        &self.application_id
    }

    async fn push_declarations(
        &self,
        guild: &GuildId,
        declarations: &[CommandDeclaration],
    ) -> Result<Vec<RegisteredCommand>, PlatformError> {
        debug!(guild = %guild, count = declarations.len(), "PUT guild commands");

        let resp = self
            .authorized(self.client.put(self.guild_commands_url(guild)))
            .json(declarations)
            .send()
            .await?;

        decode_json(check_status(resp).await?).await
    }

    async fn fetch_registered_commands(
        &self,
        guild: &GuildId,
    ) -> Result<Vec<RegisteredCommand>, PlatformError> {
        debug!(guild = %guild, "GET guild commands");

        let resp = self
            .authorized(self.client.get(self.guild_commands_url(guild)))
            .send()
            .await?;

        decode_json(check_status(resp).await?).await
    }

    /// Batch permission overwrite. Discord's v10 API rejects this call for
    /// bot tokens; point `api_base_url` at an endpoint that still serves it.
    async fn set_permissions(
        &self,
        guild: &GuildId,
        grants: &[PermissionGrant],
    ) -> Result<(), PlatformError> {
        debug!(guild = %guild, count = grants.len(), "PUT guild command permissions");

        let url = format!("{}/permissions", self.guild_commands_url(guild));
        let resp = self
            .authorized(self.client.put(url))
            .json(grants)
            .send()
            .await?;

        check_status(resp).await?;
        Ok(())
    }
}

/// Answers one interaction through the callback and webhook endpoints.
///
/// Interaction tokens authorize these calls, so no bot token is sent.
pub struct HttpResponder {
    client: Client,
    base_url: String,
    application_id: String,
    interaction_id: String,
    interaction_token: String,
}

impl HttpResponder {
    async fn callback(&self, body: serde_json::Value) -> Result<(), PlatformError> {
        let url = format!(
            "{}/interactions/{}/{}/callback",
            self.base_url, self.interaction_id, self.interaction_token
        );
        let resp = self.client.post(url).json(&body).send().await?;
        check_status(resp).await?;
        Ok(())
    }
}

fn message_body(payload: &ReplyPayload) -> serde_json::Value {
    let mut body = json!({
        "content": payload.content,
        "components": payload.components,
    });
    if payload.ephemeral {
        body["flags"] = json!(FLAG_EPHEMERAL);
    }
    body
}

#[async_trait]
impl InteractionResponder for HttpResponder {
    async fn reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError> {
        self.callback(json!({
            "type": CALLBACK_CHANNEL_MESSAGE,
            "data": message_body(payload),
        }))
        .await
    }

    async fn defer(&self, ephemeral: bool) -> Result<(), PlatformError> {
        let mut body = json!({ "type": CALLBACK_DEFERRED_CHANNEL_MESSAGE });
        if ephemeral {
            body["data"] = json!({ "flags": FLAG_EPHEMERAL });
        }
        self.callback(body).await
    }

    async fn edit_reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.base_url, self.application_id, self.interaction_token
        );
        let resp = self
            .client
            .patch(url)
            .json(&json!({
                "content": payload.content,
                "components": payload.components,
            }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, PlatformError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(body);
    warn!(status = status.as_u16(), "platform request failed: {message}");

    Err(PlatformError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T, PlatformError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| PlatformError::Decode(e.to_string()))
}
