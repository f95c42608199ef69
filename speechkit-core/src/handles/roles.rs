//! Typed accessors for the tables behind each API role.

use std::sync::Arc;

use super::{HandleKind, HandleTable, HandleTableManager};
use crate::attach::leave_conversation;
use crate::objects::{
    AudioConfig, AutoDetectSourceLangConfig, Conversation, DialogServiceConnector, Recognizer,
    RecognizerKind, SourceLanguageConfig, SpeechConfig, Synthesizer,
};
use crate::properties::PropertyBag;

impl HandleTableManager {
    pub fn speech_configs(&self) -> Arc<HandleTable<SpeechConfig>> {
        self.get(HandleKind::SpeechConfig)
    }

    pub fn audio_configs(&self) -> Arc<HandleTable<AudioConfig>> {
        self.get(HandleKind::AudioConfig)
    }

    pub fn auto_detect_source_lang_configs(&self) -> Arc<HandleTable<AutoDetectSourceLangConfig>> {
        self.get(HandleKind::AutoDetectSourceLangConfig)
    }

    pub fn source_lang_configs(&self) -> Arc<HandleTable<SourceLanguageConfig>> {
        self.get(HandleKind::SourceLangConfig)
    }

    pub fn recognizers(&self) -> Arc<HandleTable<dyn Recognizer>> {
        self.get(HandleKind::Recognizer)
    }

    pub fn dialog_service_connectors(&self) -> Arc<HandleTable<DialogServiceConnector>> {
        self.get(HandleKind::Recognizer)
    }

    pub fn synthesizers(&self) -> Arc<HandleTable<Synthesizer>> {
        self.get(HandleKind::Synthesizer)
    }

    pub fn conversations(&self) -> Arc<HandleTable<Conversation>> {
        self.get(HandleKind::Conversation)
    }

    pub fn property_bags(&self) -> Arc<HandleTable<PropertyBag>> {
        self.get(HandleKind::PropertyBag)
    }

    /// Make every tracked transcriber that is still attached leave its
    /// conversation. Returns how many left.
    pub(crate) fn detach_transcribers(&self) -> usize {
        let Some(recognizers) = self.find::<dyn Recognizer>(HandleKind::Recognizer) else {
            return 0;
        };
        recognizers
            .objects()
            .iter()
            .filter(|recognizer| recognizer.kind() == RecognizerKind::ConversationTranscriber)
            .filter(|recognizer| matches!(leave_conversation(recognizer), Ok(true)))
            .count()
    }
}
