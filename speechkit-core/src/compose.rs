//! Property bag composition cascade.
//!
//! ## Merge order (later wins on key collision)
//!
//! ```text
//! 1. speech config           (required)
//! 2. audio config            (optional)
//! 3. auto-detect config      (optional, rejected if 1. pins an endpoint id)
//! 4. source language config  (optional)
//!          │
//!          ▼
//!   factory bag ──► factory.create_*(audio) ──► new object
//! ```
//!
//! Optional handles that are the invalid sentinel or that no table knows are
//! treated as "not supplied". Objects without a property bag contribute
//! nothing.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::capability::{caps, query_optional, Query};
use crate::error::{Result, SpeechKitError};
use crate::factory::SpeechApiFactory;
use crate::handles::{Handle, HandleTableManager};
use crate::objects::AudioConfig;
use crate::properties::{PropertyBag, PropertyId};
use crate::registry;
use crate::site::Site;

const ENDPOINT_ID_WITH_AUTO_DETECT: &str = "EndpointId on SpeechConfig is unsupported for auto \
     detection source language scenario. Please set per language endpointId through \
     SourceLanguageConfig and use it to construct AutoDetectSourceLanguageConfig.";

/// Handles feeding one creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionInputs {
    pub speech_config: Handle,
    pub audio_config: Handle,
    pub auto_detect_source_lang_config: Handle,
    pub source_lang_config: Handle,
}

impl CompositionInputs {
    pub fn new(speech_config: Handle) -> Self {
        Self {
            speech_config,
            audio_config: Handle::INVALID,
            auto_detect_source_lang_config: Handle::INVALID,
            source_lang_config: Handle::INVALID,
        }
    }

    pub fn with_audio_config(mut self, handle: Handle) -> Self {
        self.audio_config = handle;
        self
    }

    pub fn with_auto_detect_source_lang_config(mut self, handle: Handle) -> Self {
        self.auto_detect_source_lang_config = handle;
        self
    }

    pub fn with_source_lang_config(mut self, handle: Handle) -> Self {
        self.source_lang_config = handle;
        self
    }
}

/// Result of the cascade: a factory holding the merged bag plus the audio
/// config the new object should be built with.
#[derive(Debug)]
pub struct CompositionContext {
    factory: Arc<SpeechApiFactory>,
    audio: Option<Arc<AudioConfig>>,
}

impl CompositionContext {
    pub fn factory(&self) -> &Arc<SpeechApiFactory> {
        &self.factory
    }

    pub fn audio(&self) -> Option<Arc<AudioConfig>> {
        self.audio.clone()
    }

    pub fn merged_properties(&self) -> &Arc<PropertyBag> {
        self.factory.properties()
    }
}

/// Run the merge cascade for `inputs`.
///
/// # Errors
/// - `InvalidHandle` if the speech config handle does not resolve.
/// - `InvalidArgument` if the speech config pins an endpoint id and an
///   auto-detect config is supplied.
/// - `Runtime` if no factory can be built.
pub fn compose(
    tables: &HandleTableManager,
    inputs: &CompositionInputs,
) -> Result<CompositionContext> {
    let factory = registry::create_factory(&Site::Root)?;
    let factory_bag = factory.properties();

    let speech_config = tables.speech_configs().resolve(inputs.speech_config)?;
    let config_bag = speech_config.query::<caps::NamedProperties>();
    if let Some(bag) = &config_bag {
        factory_bag.copy_from(bag);
    }

    let audio = tables.audio_configs().resolve_optional(inputs.audio_config);
    if let Some(bag) = query_optional::<caps::NamedProperties, _>(audio.as_deref()) {
        factory_bag.copy_from(&bag);
    }

    let auto_detect = tables
        .auto_detect_source_lang_configs()
        .resolve_optional(inputs.auto_detect_source_lang_config);
    if let Some(bag) = query_optional::<caps::NamedProperties, _>(auto_detect.as_deref()) {
        let endpoint_id = PropertyId::SpeechServiceConnectionEndpointId.name();
        if config_bag
            .as_ref()
            .is_some_and(|b| b.has_string_value(endpoint_id))
        {
            warn!("speech config endpoint id combined with auto-detect source language config");
            return Err(SpeechKitError::invalid_argument(ENDPOINT_ID_WITH_AUTO_DETECT));
        }
        factory_bag.copy_from(&bag);
    }

    let source_lang = tables
        .source_lang_configs()
        .resolve_optional(inputs.source_lang_config);
    if let Some(bag) = query_optional::<caps::NamedProperties, _>(source_lang.as_deref()) {
        factory_bag.copy_from(&bag);
    }

    debug!(
        properties = factory_bag.len(),
        audio = audio.is_some(),
        auto_detect = auto_detect.is_some(),
        source_lang = source_lang.is_some(),
        "composed factory properties"
    );

    Ok(CompositionContext { factory, audio })
}

/// Compose, then hand the factory and audio config to `build`.
pub fn create_from_config<T, F>(
    tables: &HandleTableManager,
    inputs: &CompositionInputs,
    build: F,
) -> Result<T>
where
    F: FnOnce(&Arc<SpeechApiFactory>, Option<Arc<AudioConfig>>) -> Result<T>,
{
    let context = compose(tables, inputs)?;
    build(&context.factory, context.audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{AutoDetectSourceLangConfig, SourceLanguageConfig, SpeechConfig};

    fn speech_config(tables: &HandleTableManager, entries: &[(&str, &str)]) -> Handle {
        let config = SpeechConfig::new();
        for (k, v) in entries {
            config.properties().set(*k, *v);
        }
        tables
            .speech_configs()
            .track(Arc::new(config))
            .expect("track speech config")
    }

    #[test]
    fn base_config_alone_is_copied_exactly() {
        let tables = HandleTableManager::new();
        let handle = speech_config(&tables, &[("SPEECH-Region", "westus"), ("x", "1")]);

        let ctx = compose(&tables, &CompositionInputs::new(handle)).expect("compose");
        let merged = ctx.merged_properties().snapshot();
        let base = tables
            .speech_configs()
            .resolve(handle)
            .expect("resolve")
            .properties()
            .snapshot();
        assert_eq!(merged, base);
        assert!(ctx.audio().is_none());
    }

    #[test]
    fn audio_properties_override_speech_config() {
        let tables = HandleTableManager::new();
        let capture = PropertyId::AudioConfigDeviceNameForCapture.name();
        let handle = speech_config(&tables, &[(capture, "from-speech-config")]);
        let audio = tables
            .audio_configs()
            .track(Arc::new(AudioConfig::from_microphone("usb-mic").expect("mic")))
            .expect("track audio");

        let ctx = compose(&tables, &CompositionInputs::new(handle).with_audio_config(audio))
            .expect("compose");
        assert_eq!(
            ctx.merged_properties().get(capture).as_deref(),
            Some("usb-mic")
        );
        assert!(ctx.audio().is_some());
    }

    #[test]
    fn unknown_optional_handles_are_ignored() {
        let tables = HandleTableManager::new();
        let handle = speech_config(&tables, &[("a", "1")]);
        let inputs = CompositionInputs::new(handle)
            .with_audio_config(Handle::from_raw(0x1234))
            .with_auto_detect_source_lang_config(Handle::INVALID);

        let ctx = compose(&tables, &inputs).expect("compose");
        assert!(ctx.audio().is_none());
        assert_eq!(ctx.merged_properties().len(), 1);
    }

    #[test]
    fn bagless_audio_config_merges_nothing() {
        let tables = HandleTableManager::new();
        let handle = speech_config(&tables, &[("a", "1")]);
        let speaker = tables
            .audio_configs()
            .track(Arc::new(AudioConfig::from_default_speaker_output()))
            .expect("track speaker");

        let ctx = compose(&tables, &CompositionInputs::new(handle).with_audio_config(speaker))
            .expect("compose");
        assert_eq!(ctx.merged_properties().len(), 1);
        assert!(ctx.audio().is_some());
    }

    #[test]
    fn endpoint_id_conflicts_with_auto_detect() {
        let tables = HandleTableManager::new();
        let handle = speech_config(&tables, &[("SPEECH-ModelId", "custom")]);
        let auto = tables
            .auto_detect_source_lang_configs()
            .track(Arc::new(
                AutoDetectSourceLangConfig::from_languages(&["en-US", "de-DE"]).expect("auto"),
            ))
            .expect("track auto detect");

        let err = compose(
            &tables,
            &CompositionInputs::new(handle).with_auto_detect_source_lang_config(auto),
        )
        .expect_err("conflict expected");
        assert!(matches!(err, SpeechKitError::InvalidArgument(ref m) if m.contains("EndpointId")));
    }

    #[test]
    fn empty_endpoint_id_does_not_conflict() {
        let tables = HandleTableManager::new();
        let handle = speech_config(&tables, &[("SPEECH-ModelId", "")]);
        let auto = tables
            .auto_detect_source_lang_configs()
            .track(Arc::new(
                AutoDetectSourceLangConfig::from_languages(&["en-US"]).expect("auto"),
            ))
            .expect("track auto detect");

        compose(
            &tables,
            &CompositionInputs::new(handle).with_auto_detect_source_lang_config(auto),
        )
        .expect("empty endpoint id is not an explicit endpoint");
    }

    #[test]
    fn source_language_config_merges_last() {
        let tables = HandleTableManager::new();
        let reco = PropertyId::SpeechServiceConnectionRecoLanguage.name();
        let handle = speech_config(&tables, &[(reco, "en-US")]);
        let source = tables
            .source_lang_configs()
            .track(Arc::new(
                SourceLanguageConfig::from_language("fr-FR").expect("source lang"),
            ))
            .expect("track source lang");

        let ctx = compose(
            &tables,
            &CompositionInputs::new(handle).with_source_lang_config(source),
        )
        .expect("compose");
        assert_eq!(ctx.merged_properties().get(reco).as_deref(), Some("fr-FR"));
    }

    #[test]
    fn missing_speech_config_fails() {
        let tables = HandleTableManager::new();
        let err = compose(&tables, &CompositionInputs::new(Handle::INVALID))
            .expect_err("no speech config");
        assert!(matches!(err, SpeechKitError::InvalidHandle { .. }));
    }
}
