//! Recognizer-role objects.
//!
//! Every object tracked under a recognizer handle implements [`Recognizer`].
//! The recognition engines themselves live elsewhere; these types hold the
//! configuration the engines are started with.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::capability::{AudioConfigAccess, ObjectWithSite, SpxObject};
use crate::objects::AudioConfig;
use crate::properties::PropertyBag;
use crate::site::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerKind {
    Speech,
    Translation,
    Intent,
    ConversationTranscriber,
}

pub trait Recognizer: SpxObject {
    fn kind(&self) -> RecognizerKind;
}

/// Speech, translation, and intent recognizers.
pub struct SpeechRecognizer {
    kind: RecognizerKind,
    properties: Arc<PropertyBag>,
    audio: Option<Arc<AudioConfig>>,
    site: Mutex<Site>,
}

impl SpeechRecognizer {
    pub(crate) fn new(
        kind: RecognizerKind,
        properties: PropertyBag,
        audio: Option<Arc<AudioConfig>>,
        site: Site,
    ) -> Self {
        Self {
            kind,
            properties: Arc::new(properties),
            audio,
            site: Mutex::new(site),
        }
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }
}

impl Recognizer for SpeechRecognizer {
    fn kind(&self) -> RecognizerKind {
        self.kind
    }
}

impl SpxObject for SpeechRecognizer {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }

    fn audio_config_access(&self) -> Option<&dyn AudioConfigAccess> {
        Some(self)
    }

    fn object_with_site(&self) -> Option<&dyn ObjectWithSite> {
        Some(self)
    }
}

impl AudioConfigAccess for SpeechRecognizer {
    fn audio_config(&self) -> Option<Arc<AudioConfig>> {
        self.audio.clone()
    }
}

impl ObjectWithSite for SpeechRecognizer {
    fn set_site(&self, site: Site) {
        *self.site.lock() = site;
    }

    fn site(&self) -> Site {
        self.site.lock().clone()
    }
}

impl fmt::Debug for SpeechRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechRecognizer")
            .field("kind", &self.kind)
            .field("properties", &self.properties.len())
            .field("audio", &self.audio.as_ref().map(|a| a.source().clone()))
            .finish()
    }
}

/// Dialog service connector. Shares the recognizer handle kind but is
/// tracked in its own table.
#[derive(Debug)]
pub struct DialogServiceConnector {
    properties: Arc<PropertyBag>,
    audio: Option<Arc<AudioConfig>>,
}

impl DialogServiceConnector {
    pub(crate) fn new(properties: PropertyBag, audio: Option<Arc<AudioConfig>>) -> Self {
        Self {
            properties: Arc::new(properties),
            audio,
        }
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }
}

impl SpxObject for DialogServiceConnector {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }

    fn audio_config_access(&self) -> Option<&dyn AudioConfigAccess> {
        Some(self)
    }
}

impl AudioConfigAccess for DialogServiceConnector {
    fn audio_config(&self) -> Option<Arc<AudioConfig>> {
        self.audio.clone()
    }
}
