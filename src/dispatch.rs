//! Routes interactions to command handlers and contains their failures.
//!
//! Every handler invocation runs behind a single catch point: errors,
//! panics and timeouts are logged and reported to the invoking user, and
//! never reach the caller.

use crate::callbacks::CallbackManager;
use crate::config::Config;
use crate::interaction::{ComponentInteraction, Interaction, ReplyPayload};
use crate::logging;
use crate::plugin::CommandTable;
use anyhow::anyhow;
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Platform limit on message content length, in characters
pub const MAX_MESSAGE_LEN: usize = 2000;

const ERROR_HEADER: &str = "Something went wrong while running this command:\n```\n";
const ERROR_FOOTER: &str = "\n```";

/// What happened to one dispatched interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion
    Completed,
    /// No handler is registered under the name; nothing was sent
    UnknownCommand,
    /// The handler failed and the failure was reported to the user
    Failed,
}

pub struct Dispatcher {
    table: Arc<CommandTable>,
    callbacks: Option<Arc<CallbackManager>>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(table: Arc<CommandTable>) -> Self {
        Self {
            table,
            callbacks: None,
            timeout: None,
        }
    }

    /// Dispatcher bounded by the `[dispatch]` timeout of the configuration
    pub fn from_config(table: Arc<CommandTable>, config: &Config) -> Self {
        Self::new(table).with_timeout(config.dispatch_timeout())
    }

    /// Bound every execution; an overrun is reported like any other failure
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route component interactions through this callback manager
    pub fn with_callbacks(mut self, callbacks: Arc<CallbackManager>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    pub fn table(&self) -> &Arc<CommandTable> {
        &self.table
    }

    /// Dispatch one slash command interaction
    pub async fn handle_interaction(&self, interaction: &Interaction) -> DispatchOutcome {
        let name = interaction.command_name();
        let Some(entry) = self.table.get(name) else {
            logging::log_unknown_command(name);
            return DispatchOutcome::UnknownCommand;
        };

        logging::log_dispatch(name, interaction.guild_id());
        match self.run_contained(entry.plugin().execute(interaction)).await {
            Ok(()) => DispatchOutcome::Completed,
            Err(error) => {
                report_failure(name, interaction, &error).await;
                DispatchOutcome::Failed
            }
        }
    }

    /// Dispatch one component interaction to its registered callback
    pub async fn handle_component(&self, component: &ComponentInteraction) -> DispatchOutcome {
        let callback = self
            .callbacks
            .as_ref()
            .and_then(|callbacks| callbacks.lookup(&component.custom_id));
        let Some(callback) = callback else {
            logging::log_unknown_component(&component.custom_id);
            return DispatchOutcome::UnknownCommand;
        };

        match self.run_contained(callback.call(component)).await {
            Ok(()) => DispatchOutcome::Completed,
            Err(error) => {
                report_failure(&component.custom_id, &component.interaction, &error).await;
                DispatchOutcome::Failed
            }
        }
    }

    async fn run_contained<F>(&self, execution: F) -> anyhow::Result<()>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        let guarded = AssertUnwindSafe(execution).catch_unwind();

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(anyhow!(
                        "command timed out after {:.1}s",
                        limit.as_secs_f64()
                    ))
                }
            },
            None => guarded.await,
        };

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(anyhow!("command panicked: {}", panic_message(&*panic))),
        }
    }
}

/// Tell the user a command failed, editing the response if one was already sent
async fn report_failure(label: &str, interaction: &Interaction, error: &anyhow::Error) {
    logging::log_handler_failure(label, &format!("{:#}", error));

    let payload = ReplyPayload::text(format_error(error)).with_components(Vec::new());
    let sent = if interaction.is_deferred() || interaction.is_replied() {
        interaction.edit_reply(payload).await
    } else {
        interaction.reply(payload).await
    };

    if let Err(e) = sent {
        logging::log_report_failure(label, &e.to_string());
    }
}

/// Render an error for the user: the cause chain inside a code block,
/// fitted to the message length limit
pub fn format_error(error: &anyhow::Error) -> String {
    let detail = format!("{:#}", error).replace("```", "'''");
    let budget = MAX_MESSAGE_LEN - ERROR_HEADER.len() - ERROR_FOOTER.len();
    format!("{}{}{}", ERROR_HEADER, truncate_chars(&detail, budget), ERROR_FOOTER)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
