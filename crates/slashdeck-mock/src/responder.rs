use async_trait::async_trait;
use slashdeck::interaction::{InteractionResponder, ReplyPayload};
use slashdeck::platform::PlatformError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One response call made on an interaction
#[derive(Debug, Clone, PartialEq)]
pub enum ResponderCall {
    Reply(ReplyPayload),
    Defer { ephemeral: bool },
    EditReply(ReplyPayload),
}

/// Responder that records every call instead of sending it
#[derive(Default)]
pub struct RecordingResponder {
    calls: Mutex<Vec<ResponderCall>>,
    failing: AtomicBool,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responder whose every call fails after being recorded
    pub fn failing() -> Self {
        let responder = Self::default();
        responder.failing.store(true, Ordering::SeqCst);
        responder
    }

    pub fn calls(&self) -> Vec<ResponderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<ReplyPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ResponderCall::Reply(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<ReplyPayload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ResponderCall::EditReply(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ResponderCall) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlatformError::Other("responder unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError> {
        self.record(ResponderCall::Reply(payload.clone()))
    }

    async fn defer(&self, ephemeral: bool) -> Result<(), PlatformError> {
        self.record(ResponderCall::Defer { ephemeral })
    }

    async fn edit_reply(&self, payload: &ReplyPayload) -> Result<(), PlatformError> {
        self.record(ResponderCall::EditReply(payload.clone()))
    }
}
