//! Text-completion hook
//!
//! The host calls the hook once per finished text output, passing opaque
//! identifiers and a mutable output whose `text` the hook replaces.

use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use super::splicer::Splicer;
use crate::core::SpliceError;

/// Identifiers the host passes with each event (unused by splicing)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookInput {
    #[serde(rename = "sessionID", default)]
    pub session_id: String,
    #[serde(rename = "messageID", default)]
    pub message_id: String,
    #[serde(rename = "partID", default)]
    pub part_id: String,
}

/// The host's mutable output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutput {
    pub text: String,
}

/// One text-completion event as serialized by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCompleteEvent {
    #[serde(default)]
    pub input: HookInput,
    pub output: HookOutput,
}

/// Hook that splices diagram blocks in completed text
pub struct TextCompleteHook {
    splicer: Splicer,
}

impl TextCompleteHook {
    pub fn new(splicer: Splicer) -> Self {
        Self { splicer }
    }

    pub fn splicer(&self) -> &Splicer {
        &self.splicer
    }

    /// Replace `output.text` with its spliced form. Never fails.
    pub fn on_text_complete(&self, input: &HookInput, output: &mut HookOutput) {
        let hook_span = span!(
            Level::INFO,
            "text_complete",
            session = %input.session_id,
            message = %input.message_id,
            part = %input.part_id
        );
        let _enter = hook_span.enter();

        let text = self.splicer.process(&output.text);
        debug!(
            before = output.text.len(),
            after = text.len(),
            "Replaced output text"
        );
        output.text = text;
    }

    /// Handle a decoded event and return the updated output
    pub fn handle_event(&self, event: TextCompleteEvent) -> HookOutput {
        let TextCompleteEvent { input, mut output } = event;
        self.on_text_complete(&input, &mut output);
        output
    }

    /// Handle an event encoded as JSON, returning the output as JSON
    ///
    /// Only malformed JSON is an error; once the event is decoded, splicing
    /// always yields text.
    pub fn handle_json(&self, json: &str) -> Result<String, SpliceError> {
        let event: TextCompleteEvent = serde_json::from_str(json)?;
        let output = self.handle_event(event);
        Ok(serde_json::to_string(&output)?)
    }
}
