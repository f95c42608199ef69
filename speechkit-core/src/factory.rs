//! `SpeechApiFactory`: builds domain objects from a merged property bag.
//!
//! A fresh factory is created for every creation call. The composition
//! cascade fills its bag first; every object the factory builds gets its own
//! copy of that bag, so later edits to the factory never leak into objects
//! already handed out.

use std::sync::Arc;

use tracing::debug;

use crate::capability::SpxObject;
use crate::error::{Result, SpeechKitError};
use crate::objects::{
    AudioConfig, Conversation, DialogServiceConnector, Recognizer, RecognizerKind,
    SpeechRecognizer, Synthesizer,
};
use crate::properties::PropertyBag;
use crate::site::{Session, Site};

#[derive(Debug)]
pub struct SpeechApiFactory {
    site: Site,
    properties: Arc<PropertyBag>,
}

impl SpeechApiFactory {
    pub(crate) fn new(site: Site) -> Self {
        Self {
            site,
            properties: Arc::new(PropertyBag::new()),
        }
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn create_recognizer(
        &self,
        kind: RecognizerKind,
        audio: Option<Arc<AudioConfig>>,
    ) -> Result<Arc<dyn Recognizer>> {
        if kind == RecognizerKind::ConversationTranscriber {
            return Err(SpeechKitError::invalid_argument(
                "conversation transcribers are not built from a speech config",
            ));
        }
        require_input(audio.as_deref())?;
        debug!(?kind, properties = self.properties.len(), "creating recognizer");
        Ok(Arc::new(SpeechRecognizer::new(
            kind,
            self.bag_copy(),
            audio,
            self.site.clone(),
        )))
    }

    pub fn create_dialog_service_connector(
        &self,
        audio: Option<Arc<AudioConfig>>,
    ) -> Result<Arc<DialogServiceConnector>> {
        require_input(audio.as_deref())?;
        debug!(properties = self.properties.len(), "creating dialog service connector");
        Ok(Arc::new(DialogServiceConnector::new(self.bag_copy(), audio)))
    }

    pub fn create_synthesizer(&self, audio: Option<Arc<AudioConfig>>) -> Result<Arc<Synthesizer>> {
        if audio.as_ref().is_some_and(|a| a.source().is_input()) {
            return Err(SpeechKitError::invalid_argument(
                "speech synthesis requires an audio output config",
            ));
        }
        debug!(properties = self.properties.len(), "creating synthesizer");
        Ok(Arc::new(Synthesizer::new(self.bag_copy(), audio)))
    }

    /// Create a conversation with its own session. `id` may be empty.
    pub fn create_conversation(self: &Arc<Self>, id: &str) -> Result<Arc<Conversation>> {
        let session = Arc::new(Session::new());
        debug!(conversation = id, session = session.id(), "creating conversation");
        Ok(Arc::new(Conversation::new(
            id,
            self.bag_copy(),
            session,
            Arc::clone(self),
        )))
    }

    /// Point `session` at the audio input a joining recognizer brings along.
    pub fn init_session_from_audio_config(
        &self,
        session: &Session,
        audio: Option<Arc<AudioConfig>>,
    ) {
        debug!(
            session = session.id(),
            source = ?audio.as_ref().map(|a| a.source().clone()),
            "session audio initialised"
        );
        session.set_audio_config(audio);
    }

    fn bag_copy(&self) -> PropertyBag {
        PropertyBag::from(self.properties.snapshot())
    }
}

impl SpxObject for SpeechApiFactory {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }
}

fn require_input(audio: Option<&AudioConfig>) -> Result<()> {
    match audio {
        Some(a) if !a.source().is_input() => Err(SpeechKitError::invalid_argument(
            "recognition requires an audio input config",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{caps, Query};

    #[test]
    fn created_objects_get_a_private_copy_of_the_bag() {
        let factory = SpeechApiFactory::new(Site::Root);
        factory.properties().set("k", "before");

        let recognizer = factory
            .create_recognizer(RecognizerKind::Speech, None)
            .expect("recognizer");
        factory.properties().set("k", "after");

        let bag = recognizer
            .query::<caps::NamedProperties>()
            .expect("recognizer bag");
        assert_eq!(bag.get("k").as_deref(), Some("before"));
    }

    #[test]
    fn audio_direction_is_checked() {
        let factory = SpeechApiFactory::new(Site::Root);
        let speaker = Arc::new(AudioConfig::from_default_speaker_output());
        let mic = Arc::new(AudioConfig::from_default_microphone());

        assert!(factory
            .create_recognizer(RecognizerKind::Intent, Some(Arc::clone(&speaker)))
            .is_err());
        assert!(factory.create_synthesizer(Some(mic)).is_err());
        assert!(factory.create_synthesizer(Some(speaker)).is_ok());
        assert!(factory.create_synthesizer(None).is_ok());
    }

    #[test]
    fn transcribers_are_not_factory_products() {
        let factory = SpeechApiFactory::new(Site::Root);
        let err = factory
            .create_recognizer(RecognizerKind::ConversationTranscriber, None)
            .err()
            .expect("transcriber request should fail");
        assert!(matches!(err, SpeechKitError::InvalidArgument(_)));
    }

    #[test]
    fn conversation_exposes_session_and_factory_services() {
        let factory = Arc::new(SpeechApiFactory::new(Site::Root));
        let conversation = factory.create_conversation("的").expect("conversation");

        assert_eq!(conversation.id(), "的");
        let services = conversation
            .query::<caps::Services>()
            .expect("service capability");
        let owner = services.factory().expect("factory service");
        assert!(Arc::ptr_eq(&owner, &factory));
        assert!(services.session().is_some());
    }
}
