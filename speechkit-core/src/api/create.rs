//! Creating recognizers, synthesizers, connectors, and conversations from
//! tracked configs.

use std::sync::Arc;

use tracing::debug;

use crate::attach::leave_conversation;
use crate::capability::{caps, Query};
use crate::compose::{create_from_config, CompositionInputs};
use crate::error::{Result, SpeechKitError};
use crate::handles::{Handle, HandleTableManager};
use crate::objects::{Recognizer, RecognizerKind};
use crate::properties::PropertyId;
use crate::registry::{create_object_with_site, ObjectKind};
use crate::site::Site;

use super::require;

fn recognizer_from_inputs(
    tables: &HandleTableManager,
    kind: RecognizerKind,
    inputs: CompositionInputs,
) -> Result<Handle> {
    let recognizer = create_from_config(tables, &inputs, |factory, audio| {
        factory.create_recognizer(kind, audio)
    })?;
    tables.recognizers().track(recognizer)
}

pub fn create_speech_recognizer_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    recognizer_from_inputs(
        tables,
        RecognizerKind::Speech,
        CompositionInputs::new(speech_config).with_audio_config(audio_config),
    )
}

pub fn create_speech_recognizer_from_auto_detect_source_lang_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    auto_detect_source_lang_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    require(
        &tables.auto_detect_source_lang_configs(),
        auto_detect_source_lang_config,
    )?;
    recognizer_from_inputs(
        tables,
        RecognizerKind::Speech,
        CompositionInputs::new(speech_config)
            .with_audio_config(audio_config)
            .with_auto_detect_source_lang_config(auto_detect_source_lang_config),
    )
}

pub fn create_speech_recognizer_from_source_lang_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    source_lang_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    require(&tables.source_lang_configs(), source_lang_config)?;
    recognizer_from_inputs(
        tables,
        RecognizerKind::Speech,
        CompositionInputs::new(speech_config)
            .with_audio_config(audio_config)
            .with_source_lang_config(source_lang_config),
    )
}

pub fn create_translation_recognizer_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    recognizer_from_inputs(
        tables,
        RecognizerKind::Translation,
        CompositionInputs::new(speech_config).with_audio_config(audio_config),
    )
}

pub fn create_intent_recognizer_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    recognizer_from_inputs(
        tables,
        RecognizerKind::Intent,
        CompositionInputs::new(speech_config).with_audio_config(audio_config),
    )
}

/// Keyword verification is switched on in the speech config itself unless
/// the caller already chose a value.
pub fn create_dialog_service_connector_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    let config = require(&tables.speech_configs(), speech_config)?;
    let key = PropertyId::KeywordConfigEnableKeywordVerification.name();
    let bag = config.properties();
    if bag.get(key).is_none() {
        bag.set(key, "true");
    }

    let inputs = CompositionInputs::new(speech_config).with_audio_config(audio_config);
    let connector = create_from_config(tables, &inputs, |factory, audio| {
        factory.create_dialog_service_connector(audio)
    })?;
    tables.dialog_service_connectors().track(connector)
}

pub fn create_speech_synthesizer_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    audio_config: Handle,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    let inputs = CompositionInputs::new(speech_config).with_audio_config(audio_config);
    let synthesizer = create_from_config(tables, &inputs, |factory, audio| {
        factory.create_synthesizer(audio)
    })?;
    tables.synthesizers().track(synthesizer)
}

/// Create a conversation. Any id, including the empty string, is kept as is.
pub fn create_conversation_from_config(
    tables: &HandleTableManager,
    speech_config: Handle,
    id: &str,
) -> Result<Handle> {
    require(&tables.speech_configs(), speech_config)?;
    let inputs = CompositionInputs::new(speech_config);
    let conversation = create_from_config(tables, &inputs, |factory, _| {
        factory.create_conversation(id)
    })?;
    tables.conversations().track(conversation)
}

/// Create a detached conversation transcriber fed by `audio_config`, if it
/// resolves.
pub fn create_conversation_transcriber_from_config(
    tables: &HandleTableManager,
    audio_config: Handle,
) -> Result<Handle> {
    let transcriber = create_object_with_site(ObjectKind::ConversationTranscriber, &Site::Root)
        .into_recognizer()
        .ok_or_else(|| SpeechKitError::runtime("object registry produced no transcriber"))?;

    let audio = tables.audio_configs().resolve_optional(audio_config);
    if audio.as_ref().is_some_and(|a| !a.source().is_input()) {
        return Err(SpeechKitError::invalid_argument(
            "conversation transcription requires an audio input config",
        ));
    }
    if let (Some(source), Some(target)) = (
        audio.as_ref().and_then(|a| a.query::<caps::NamedProperties>()),
        transcriber.query::<caps::NamedProperties>(),
    ) {
        target.copy_from(&source);
    }

    let init = transcriber.query::<caps::Transcriber>().ok_or_else(|| {
        SpeechKitError::invalid_argument("created object is not a conversation transcriber")
    })?;
    init.init(audio);

    debug!("conversation transcriber created");
    tables.recognizers().track(transcriber)
}

/// Release a recognizer handle. An attached transcriber leaves its
/// conversation first.
pub fn release_recognizer(tables: &HandleTableManager, recognizer: Handle) -> Result<()> {
    let released: Arc<dyn Recognizer> = tables.recognizers().release(recognizer)?;
    if released.query::<caps::Transcriber>().is_some() {
        leave_conversation(&released)?;
    }
    Ok(())
}

pub fn recognizer_kind(tables: &HandleTableManager, recognizer: Handle) -> Result<RecognizerKind> {
    Ok(require(&tables.recognizers(), recognizer)?.kind())
}
