use std::sync::Arc;
use std::thread;

use speechkit_core::api;
use speechkit_core::capability::{caps, Query};
use speechkit_core::compose::{compose, CompositionInputs};
use speechkit_core::{Handle, HandleKind, HandleTableManager, PropertyId, SpeechKitError};

fn base_config(tables: &HandleTableManager, json: &str) -> Handle {
    api::speech_config_from_json(tables, json).expect("speech config")
}

#[test]
fn base_only_merges_exactly_the_base_bag() {
    let tables = HandleTableManager::new();
    let config = base_config(
        &tables,
        r#"{"SPEECH-SubscriptionKey":"k","SPEECH-Region":"westus","custom":"x"}"#,
    );

    let recognizer =
        api::create_speech_recognizer_from_config(&tables, config, Handle::INVALID)
            .expect("recognizer");

    let object = tables.recognizers().resolve(recognizer).expect("resolve");
    let merged = object
        .query::<caps::NamedProperties>()
        .expect("recognizer bag")
        .snapshot();
    let base = tables
        .speech_configs()
        .resolve(config)
        .expect("config")
        .properties()
        .snapshot();
    assert_eq!(merged, base);
}

#[test]
fn later_sources_win_on_collision() {
    let tables = HandleTableManager::new();
    let capture = PropertyId::AudioConfigDeviceNameForCapture.name();
    let config = base_config(
        &tables,
        &format!(r#"{{"{capture}":"from-config","SPEECH-RecoLanguage":"en-US"}}"#),
    );
    let audio = api::audio_config_from_microphone(&tables, "from-audio").expect("audio");
    let source = api::source_lang_config_from_language(&tables, "ja-JP").expect("source");

    let recognizer =
        api::create_speech_recognizer_from_source_lang_config(&tables, config, source, audio)
            .expect("recognizer");

    let bag = tables
        .recognizers()
        .resolve(recognizer)
        .expect("resolve")
        .query::<caps::NamedProperties>()
        .expect("bag");
    assert_eq!(bag.get(capture).as_deref(), Some("from-audio"));
    assert_eq!(
        bag.get_property(PropertyId::SpeechServiceConnectionRecoLanguage)
            .as_deref(),
        Some("ja-JP")
    );
}

#[test]
fn endpoint_id_with_auto_detect_is_rejected_and_tracks_nothing() {
    let tables = HandleTableManager::new();
    let config = base_config(&tables, r#"{"SPEECH-ModelId":"my-endpoint"}"#);
    let auto = api::auto_detect_source_lang_config_from_languages(&tables, &["en-US", "fr-FR"])
        .expect("auto detect");

    let err = api::create_speech_recognizer_from_auto_detect_source_lang_config(
        &tables,
        config,
        auto,
        Handle::INVALID,
    )
    .expect_err("endpoint id conflicts with auto detection");

    assert!(matches!(
        err,
        SpeechKitError::InvalidArgument(ref msg) if msg.contains("SourceLanguageConfig")
    ));
    assert!(tables.recognizers().is_empty());
}

#[test]
fn per_language_endpoints_flow_through_auto_detect() {
    let tables = HandleTableManager::new();
    let config = base_config(&tables, r#"{"SPEECH-Region":"westus"}"#);
    let de = api::source_lang_config_from_language_and_endpoint_id(&tables, "de-DE", "de-model")
        .expect("de");
    let en = api::source_lang_config_from_language(&tables, "en-US").expect("en");
    let auto = api::auto_detect_source_lang_config_from_source_lang_configs(&tables, &[de, en])
        .expect("auto detect");

    let recognizer = api::create_speech_recognizer_from_auto_detect_source_lang_config(
        &tables,
        config,
        auto,
        Handle::INVALID,
    )
    .expect("recognizer");

    let bag = tables
        .recognizers()
        .resolve(recognizer)
        .expect("resolve")
        .query::<caps::NamedProperties>()
        .expect("bag");
    assert_eq!(bag.get("de-DESPEECH-ModelId").as_deref(), Some("de-model"));
    assert_eq!(
        bag.get_property(PropertyId::SpeechServiceConnectionAutoDetectSourceLanguages)
            .as_deref(),
        Some("de-DE,en-US")
    );
}

#[test]
fn never_tracked_audio_handle_means_no_audio() {
    let tables = HandleTableManager::new();
    let config = base_config(&tables, r#"{"a":"1"}"#);
    let foreign = HandleTableManager::new();
    let stray = api::audio_config_from_default_microphone(&foreign).expect("foreign audio");

    let ctx = compose(&tables, &CompositionInputs::new(config).with_audio_config(stray))
        .expect("compose");
    assert!(ctx.audio().is_none());
    assert_eq!(ctx.merged_properties().len(), 1);

    let recognizer = api::create_speech_recognizer_from_config(&tables, config, stray)
        .expect("recognizer without audio");
    let audio = tables
        .recognizers()
        .resolve(recognizer)
        .expect("resolve")
        .query::<caps::AudioConfigAccessor>()
        .and_then(|a| a.audio_config());
    assert!(audio.is_none());
}

#[test]
fn invalid_speech_config_is_invalid_argument() {
    let tables = HandleTableManager::new();
    for handle in [Handle::INVALID, Handle::from_raw(0), Handle::from_raw(42)] {
        let err = api::create_speech_synthesizer_from_config(&tables, handle, Handle::INVALID)
            .expect_err("invalid speech config");
        assert!(matches!(err, SpeechKitError::InvalidArgument(_)));
    }
    assert!(tables.synthesizers().is_empty());
}

#[test]
fn concurrent_creations_share_one_table_and_get_distinct_handles() {
    let tables = Arc::new(HandleTableManager::new());
    let config = base_config(&tables, r#"{"SPEECH-Region":"westus"}"#);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let tables = Arc::clone(&tables);
            thread::spawn(move || {
                (0..50)
                    .map(|_| {
                        api::create_intent_recognizer_from_config(&tables, config, Handle::INVALID)
                            .expect("recognizer")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut handles: Vec<Handle> = workers
        .into_iter()
        .flat_map(|w| w.join().expect("worker panicked"))
        .collect();
    let total = handles.len();
    handles.sort_by_key(|h| h.into_raw());
    handles.dedup();
    assert_eq!(handles.len(), total);
    assert_eq!(tables.recognizers().len(), total);

    let recognizer_tables = tables
        .snapshot()
        .into_iter()
        .filter(|s| s.kind == HandleKind::Recognizer)
        .count();
    assert_eq!(recognizer_tables, 1);
}
