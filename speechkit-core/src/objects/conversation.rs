//! Conversations and their participants.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::{ServiceProvider, SpxObject};
use crate::error::{Result, SpeechKitError};
use crate::factory::SpeechApiFactory;
use crate::properties::{PropertyBag, PropertyId};
use crate::site::Session;

/// Enrolled voice signature, as produced by the signature service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceSignature {
    pub version: i32,
    pub tag: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub preferred_language: Option<String>,
    pub voice_signature: Option<VoiceSignature>,
}

impl Participant {
    pub fn from_user_id(user_id: &str) -> Result<Self> {
        Self::new(user_id, "", "")
    }

    /// Build a participant. Empty language or signature means "not given";
    /// a non-empty signature must parse as a [`VoiceSignature`].
    pub fn new(user_id: &str, preferred_language: &str, voice_signature: &str) -> Result<Self> {
        if user_id.trim().is_empty() {
            return Err(SpeechKitError::invalid_argument("participant user id must not be empty"));
        }
        let voice_signature = if voice_signature.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(voice_signature).map_err(|e| {
                SpeechKitError::invalid_argument(format!("invalid voice signature: {e}"))
            })?)
        };
        Ok(Self {
            user_id: user_id.to_string(),
            preferred_language: Some(preferred_language.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            voice_signature,
        })
    }
}

/// A multi-party conversation. Owns the session its transcribers join.
pub struct Conversation {
    id: String,
    properties: Arc<PropertyBag>,
    session: Arc<Session>,
    factory: Arc<SpeechApiFactory>,
    participants: RwLock<IndexMap<String, Participant>>,
}

impl Conversation {
    pub(crate) fn new(
        id: &str,
        properties: PropertyBag,
        session: Arc<Session>,
        factory: Arc<SpeechApiFactory>,
    ) -> Self {
        properties.set_property(PropertyId::ConversationId, id);
        Self {
            id: id.to_string(),
            properties: Arc::new(properties),
            session,
            factory,
            participants: RwLock::new(IndexMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }

    /// Add or replace the participant with the same user id.
    pub fn add_participant(&self, participant: Participant) {
        debug!(conversation = %self.id, user = %participant.user_id, "participant added");
        self.participants
            .write()
            .insert(participant.user_id.clone(), participant);
    }

    pub fn remove_participant(&self, user_id: &str) -> Result<Participant> {
        self.participants
            .write()
            .shift_remove(user_id)
            .ok_or_else(|| {
                SpeechKitError::invalid_argument(format!(
                    "participant '{user_id}' is not part of the conversation"
                ))
            })
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.participants.read().values().cloned().collect()
    }
}

impl SpxObject for Conversation {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }

    fn service_provider(&self) -> Option<&dyn ServiceProvider> {
        Some(self)
    }
}

impl ServiceProvider for Conversation {
    fn session(&self) -> Option<Arc<Session>> {
        Some(Arc::clone(&self.session))
    }

    fn factory(&self) -> Option<Arc<SpeechApiFactory>> {
        Some(Arc::clone(&self.factory))
    }
}

impl fmt::Debug for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("id", &self.id)
            .field("session", &self.session.id())
            .field("participants", &self.participants.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str =
        r#"{ "Version": 0, "Tag": "VtZQ7sJp8np3", "Data": "BhRRgDCrg6ij5fyl" }"#;

    #[test]
    fn participant_accepts_empty_language_and_signature() {
        let p = Participant::new("xyz@example.com", "", "").expect("participant");
        assert_eq!(p.preferred_language, None);
        assert_eq!(p.voice_signature, None);

        let p = Participant::new("xyz@example.com", "invalid", SIGNATURE).expect("participant");
        assert_eq!(p.preferred_language.as_deref(), Some("invalid"));
        assert_eq!(p.voice_signature.expect("signature").version, 0);
    }

    #[test]
    fn participant_rejects_malformed_signature() {
        let err = Participant::new("xyz@example.com", "", "1.1, 2.2").expect_err("bad signature");
        assert!(matches!(err, SpeechKitError::InvalidArgument(_)));
        assert!(Participant::from_user_id("  ").is_err());
    }
}
