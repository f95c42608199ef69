//! Conversation membership: participants and transcriber attachment.

use crate::attach;
use crate::capability::{caps, Query};
use crate::error::{Result, SpeechKitError};
use crate::handles::{Handle, HandleTableManager};
use crate::objects::{AttachmentState, Participant};

use super::require;

pub fn conversation_id(tables: &HandleTableManager, conversation: Handle) -> Result<String> {
    Ok(require(&tables.conversations(), conversation)?.id().to_string())
}

/// Add (or replace) a participant. `preferred_language` and
/// `voice_signature` may be empty.
pub fn conversation_add_participant(
    tables: &HandleTableManager,
    conversation: Handle,
    user_id: &str,
    preferred_language: &str,
    voice_signature: &str,
) -> Result<()> {
    let conversation = require(&tables.conversations(), conversation)?;
    let participant = Participant::new(user_id, preferred_language, voice_signature)?;
    conversation.add_participant(participant);
    Ok(())
}

pub fn conversation_remove_participant(
    tables: &HandleTableManager,
    conversation: Handle,
    user_id: &str,
) -> Result<()> {
    let conversation = require(&tables.conversations(), conversation)?;
    conversation.remove_participant(user_id).map(drop)
}

pub fn conversation_participants(
    tables: &HandleTableManager,
    conversation: Handle,
) -> Result<Vec<Participant>> {
    Ok(require(&tables.conversations(), conversation)?.participants())
}

pub fn recognizer_join_conversation(
    tables: &HandleTableManager,
    conversation: Handle,
    recognizer: Handle,
) -> Result<()> {
    let conversation = require(&tables.conversations(), conversation)?;
    let recognizer = require(&tables.recognizers(), recognizer)?;
    attach::join_conversation(&conversation, &recognizer)
}

/// Leaving while detached succeeds without doing anything.
pub fn recognizer_leave_conversation(
    tables: &HandleTableManager,
    recognizer: Handle,
) -> Result<()> {
    let recognizer = require(&tables.recognizers(), recognizer)?;
    attach::leave_conversation(&recognizer).map(drop)
}

pub fn transcriber_state(
    tables: &HandleTableManager,
    recognizer: Handle,
) -> Result<AttachmentState> {
    let recognizer = require(&tables.recognizers(), recognizer)?;
    recognizer
        .query::<caps::Transcriber>()
        .map(|t| t.state())
        .ok_or_else(not_a_transcriber)
}

fn not_a_transcriber() -> SpeechKitError {
    SpeechKitError::invalid_argument("recognizer is not a conversation transcriber")
}

/// Participants of the conversation a transcriber has joined; empty while
/// detached.
pub fn transcriber_participants(
    tables: &HandleTableManager,
    recognizer: Handle,
) -> Result<Vec<Participant>> {
    let recognizer = require(&tables.recognizers(), recognizer)?;
    recognizer
        .query::<caps::Transcriber>()
        .map(|t| t.participants())
        .ok_or_else(not_a_transcriber)
}
