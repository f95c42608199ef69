//! Config object creation.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::handles::{Handle, HandleTableManager};
use crate::objects::{AudioConfig, AutoDetectSourceLangConfig, SourceLanguageConfig, SpeechConfig};

use super::require;

pub fn speech_config_from_subscription(
    tables: &HandleTableManager,
    key: &str,
    region: &str,
) -> Result<Handle> {
    let config = SpeechConfig::from_subscription(key, region)?;
    tables.speech_configs().track(Arc::new(config))
}

pub fn speech_config_from_authorization_token(
    tables: &HandleTableManager,
    token: &str,
    region: &str,
) -> Result<Handle> {
    let config = SpeechConfig::from_authorization_token(token, region)?;
    tables.speech_configs().track(Arc::new(config))
}

pub fn speech_config_from_endpoint(
    tables: &HandleTableManager,
    endpoint: &str,
    key: Option<&str>,
) -> Result<Handle> {
    let config = SpeechConfig::from_endpoint(endpoint, key)?;
    tables.speech_configs().track(Arc::new(config))
}

pub fn speech_config_from_host(
    tables: &HandleTableManager,
    host: &str,
    key: Option<&str>,
) -> Result<Handle> {
    let config = SpeechConfig::from_host(host, key)?;
    tables.speech_configs().track(Arc::new(config))
}

pub fn speech_config_from_json(tables: &HandleTableManager, json: &str) -> Result<Handle> {
    let config = SpeechConfig::from_json(json)?;
    tables.speech_configs().track(Arc::new(config))
}

pub fn audio_config_from_default_microphone(tables: &HandleTableManager) -> Result<Handle> {
    tables
        .audio_configs()
        .track(Arc::new(AudioConfig::from_default_microphone()))
}

pub fn audio_config_from_microphone(
    tables: &HandleTableManager,
    device_name: &str,
) -> Result<Handle> {
    let config = AudioConfig::from_microphone(device_name)?;
    tables.audio_configs().track(Arc::new(config))
}

pub fn audio_config_from_wav_file_input(
    tables: &HandleTableManager,
    path: impl AsRef<Path>,
) -> Result<Handle> {
    let config = AudioConfig::from_wav_file_input(path)?;
    tables.audio_configs().track(Arc::new(config))
}

pub fn audio_config_from_default_speaker_output(tables: &HandleTableManager) -> Result<Handle> {
    tables
        .audio_configs()
        .track(Arc::new(AudioConfig::from_default_speaker_output()))
}

pub fn audio_config_from_speaker_output(
    tables: &HandleTableManager,
    device_name: &str,
) -> Result<Handle> {
    let config = AudioConfig::from_speaker_output(device_name)?;
    tables.audio_configs().track(Arc::new(config))
}

pub fn audio_config_from_wav_file_output(
    tables: &HandleTableManager,
    path: impl AsRef<Path>,
) -> Result<Handle> {
    let config = AudioConfig::from_wav_file_output(path)?;
    tables.audio_configs().track(Arc::new(config))
}

pub fn source_lang_config_from_language(
    tables: &HandleTableManager,
    language: &str,
) -> Result<Handle> {
    let config = SourceLanguageConfig::from_language(language)?;
    tables.source_lang_configs().track(Arc::new(config))
}

pub fn source_lang_config_from_language_and_endpoint_id(
    tables: &HandleTableManager,
    language: &str,
    endpoint_id: &str,
) -> Result<Handle> {
    let config = SourceLanguageConfig::from_language_and_endpoint_id(language, endpoint_id)?;
    tables.source_lang_configs().track(Arc::new(config))
}

pub fn auto_detect_source_lang_config_from_languages<S: AsRef<str>>(
    tables: &HandleTableManager,
    languages: &[S],
) -> Result<Handle> {
    let config = AutoDetectSourceLangConfig::from_languages(languages)?;
    tables.auto_detect_source_lang_configs().track(Arc::new(config))
}

/// Aggregate already-tracked source language configs. Every handle must be
/// valid.
pub fn auto_detect_source_lang_config_from_source_lang_configs(
    tables: &HandleTableManager,
    source_lang_configs: &[Handle],
) -> Result<Handle> {
    let table = tables.source_lang_configs();
    let configs = source_lang_configs
        .iter()
        .map(|handle| require(&table, *handle))
        .collect::<Result<Vec<_>>>()?;
    let config = AutoDetectSourceLangConfig::from_source_lang_configs(&configs)?;
    tables.auto_detect_source_lang_configs().track(Arc::new(config))
}
