//! Conversation transcriber.
//!
//! A transcriber is `Detached` until it joins a conversation, at which point
//! it sits on the conversation's session site and is fed by that session.
//! The join/leave orchestration lives in [`crate::attach`]; this type only
//! owns the per-transcriber state.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::Serialize;

use crate::capability::{AudioConfigAccess, ObjectWithSite, SpxObject};
use crate::objects::{AudioConfig, Conversation, Participant, Recognizer, RecognizerKind};
use crate::properties::PropertyBag;
use crate::site::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentState {
    Detached,
    Attached,
}

/// Binding to the conversation a transcriber has joined.
///
/// Held weakly: the conversation owns the session, and the session holds the
/// transcriber while attached. A binding whose conversation has been dropped
/// is stale and reads as `Detached`.
#[derive(Debug, Default)]
pub struct Attachment {
    conversation: Option<Weak<Conversation>>,
}

impl Attachment {
    pub fn state(&self) -> AttachmentState {
        match &self.conversation {
            Some(conversation) if conversation.strong_count() > 0 => AttachmentState::Attached,
            _ => AttachmentState::Detached,
        }
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.conversation
            .as_ref()
            .is_some_and(|conversation| conversation.strong_count() == 0)
    }

    pub(crate) fn bind(&mut self, conversation: &Arc<Conversation>) {
        self.conversation = Some(Arc::downgrade(conversation));
    }

    pub(crate) fn unbind(&mut self) -> bool {
        self.conversation.take().is_some()
    }

    fn conversation(&self) -> Option<Arc<Conversation>> {
        self.conversation.as_ref().and_then(Weak::upgrade)
    }
}

pub struct ConversationTranscriber {
    properties: Arc<PropertyBag>,
    audio: RwLock<Option<Arc<AudioConfig>>>,
    site: Mutex<Site>,
    attachment: Mutex<Attachment>,
}

impl ConversationTranscriber {
    pub(crate) fn new(site: Site) -> Self {
        Self {
            properties: Arc::new(PropertyBag::new()),
            audio: RwLock::new(None),
            site: Mutex::new(site),
            attachment: Mutex::new(Attachment::default()),
        }
    }

    /// Bind the audio input the transcriber will hand to its session.
    pub fn init(&self, audio: Option<Arc<AudioConfig>>) {
        *self.audio.write() = audio;
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }

    pub fn state(&self) -> AttachmentState {
        self.attachment.lock().state()
    }

    pub fn conversation(&self) -> Option<Arc<Conversation>> {
        self.attachment.lock().conversation()
    }

    /// Participants of the joined conversation; empty while detached.
    pub fn participants(&self) -> Vec<Participant> {
        self.conversation()
            .map(|c| c.participants())
            .unwrap_or_default()
    }

    /// Held for the whole of a join or leave so transitions never interleave.
    pub(crate) fn lock_attachment(&self) -> MutexGuard<'_, Attachment> {
        self.attachment.lock()
    }
}

impl Recognizer for ConversationTranscriber {
    fn kind(&self) -> RecognizerKind {
        RecognizerKind::ConversationTranscriber
    }
}

impl SpxObject for ConversationTranscriber {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }

    fn audio_config_access(&self) -> Option<&dyn AudioConfigAccess> {
        Some(self)
    }

    fn object_with_site(&self) -> Option<&dyn ObjectWithSite> {
        Some(self)
    }

    fn conversation_transcriber(&self) -> Option<&ConversationTranscriber> {
        Some(self)
    }
}

impl AudioConfigAccess for ConversationTranscriber {
    fn audio_config(&self) -> Option<Arc<AudioConfig>> {
        self.audio.read().clone()
    }
}

impl ObjectWithSite for ConversationTranscriber {
    fn set_site(&self, site: Site) {
        *self.site.lock() = site;
    }

    fn site(&self) -> Site {
        self.site.lock().clone()
    }
}

impl fmt::Debug for ConversationTranscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationTranscriber")
            .field("state", &self.state())
            .field("site", &*self.site.lock())
            .finish_non_exhaustive()
    }
}
