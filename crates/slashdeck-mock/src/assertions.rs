use crate::responder::{RecordingResponder, ResponderCall};

pub struct ResponderAssertions<'a> {
    responder: &'a RecordingResponder,
}

impl<'a> ResponderAssertions<'a> {
    pub fn new(responder: &'a RecordingResponder) -> Self {
        Self { responder }
    }

    pub fn assert_silent(&self) {
        assert!(
            self.responder.calls().is_empty(),
            "expected no responses, got {:?}",
            self.responder.calls()
        );
    }

    /// Exactly one fresh reply carrying a formatted error and no components
    pub fn assert_error_replied(&self, fragment: &str) {
        let replies = self.responder.replies();
        assert_eq!(replies.len(), 1, "expected one reply, got {:?}", replies);
        assert!(self.responder.edits().is_empty());
        assert_error_payload(&replies[0], fragment);
    }

    /// Exactly one edit of the original response carrying a formatted error,
    /// and no fresh reply
    pub fn assert_error_edited(&self, fragment: &str) {
        let edits = self.responder.edits();
        assert_eq!(edits.len(), 1, "expected one edit, got {:?}", edits);
        assert!(self.responder.replies().is_empty());
        assert_error_payload(&edits[0], fragment);
    }

    pub fn assert_calls(&self, expected: &[ResponderCall]) {
        assert_eq!(self.responder.calls(), expected);
    }
}

fn assert_error_payload(payload: &slashdeck::interaction::ReplyPayload, fragment: &str) {
    assert!(
        payload.content.contains("```"),
        "error content is not formatted: {}",
        payload.content
    );
    assert!(
        payload.content.contains(fragment),
        "error content {:?} does not mention {:?}",
        payload.content,
        fragment
    );
    assert!(payload.components.is_empty());
}
