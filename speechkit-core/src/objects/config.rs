//! Configuration objects: speech, audio, and source-language configs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::capability::SpxObject;
use crate::error::{Result, SpeechKitError};
use crate::properties::{per_language_endpoint_key, PropertyBag, PropertyId};

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SpeechKitError::invalid_argument(format!("{what} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Speech config
// ---------------------------------------------------------------------------

/// Service connection settings. Everything lives in the property bag.
#[derive(Debug, Default)]
pub struct SpeechConfig {
    properties: Arc<PropertyBag>,
}

impl SpeechConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_subscription(key: &str, region: &str) -> Result<Self> {
        require_non_empty(key, "subscription key")?;
        require_non_empty(region, "region")?;
        let config = Self::new();
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionKey, key);
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionRegion, region);
        Ok(config)
    }

    pub fn from_authorization_token(token: &str, region: &str) -> Result<Self> {
        require_non_empty(token, "authorization token")?;
        require_non_empty(region, "region")?;
        let config = Self::new();
        config
            .properties
            .set_property(PropertyId::SpeechServiceAuthorizationToken, token);
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionRegion, region);
        Ok(config)
    }

    pub fn from_endpoint(endpoint: &str, key: Option<&str>) -> Result<Self> {
        require_non_empty(endpoint, "endpoint")?;
        let config = Self::new();
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionEndpoint, endpoint);
        config.set_optional_key(key);
        Ok(config)
    }

    pub fn from_host(host: &str, key: Option<&str>) -> Result<Self> {
        require_non_empty(host, "host")?;
        let config = Self::new();
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionHost, host);
        config.set_optional_key(key);
        Ok(config)
    }

    /// Build a config from a JSON object whose values are all strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let values: IndexMap<String, String> = serde_json::from_str(json).map_err(|e| {
            SpeechKitError::invalid_argument(format!("speech config JSON: {e}"))
        })?;
        Ok(Self {
            properties: Arc::new(PropertyBag::from(values)),
        })
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }

    fn set_optional_key(&self, key: Option<&str>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.properties
                .set_property(PropertyId::SpeechServiceConnectionKey, key);
        }
    }
}

impl SpxObject for SpeechConfig {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }
}

// ---------------------------------------------------------------------------
// Audio config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    DefaultMicrophone,
    Microphone(String),
    WavFileInput(PathBuf),
    DefaultSpeaker,
    Speaker(String),
    WavFileOutput(PathBuf),
}

impl AudioSource {
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::DefaultMicrophone | Self::Microphone(_) | Self::WavFileInput(_)
        )
    }
}

/// Audio input or output description.
///
/// Input configs carry a property bag describing the capture source; output
/// configs to the default speaker or a file carry none.
#[derive(Debug)]
pub struct AudioConfig {
    source: AudioSource,
    properties: Option<Arc<PropertyBag>>,
}

impl AudioConfig {
    pub fn from_default_microphone() -> Self {
        let bag = PropertyBag::new();
        bag.set_property(PropertyId::AudioConfigAudioSource, "Microphones");
        Self::with_bag(AudioSource::DefaultMicrophone, bag)
    }

    pub fn from_microphone(device_name: &str) -> Result<Self> {
        require_non_empty(device_name, "capture device name")?;
        let bag = PropertyBag::new();
        bag.set_property(PropertyId::AudioConfigAudioSource, "Microphones");
        bag.set_property(PropertyId::AudioConfigDeviceNameForCapture, device_name);
        Ok(Self::with_bag(
            AudioSource::Microphone(device_name.to_string()),
            bag,
        ))
    }

    pub fn from_wav_file_input(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_non_empty(&path.to_string_lossy(), "WAV file path")?;
        let bag = PropertyBag::new();
        bag.set_property(PropertyId::AudioConfigAudioSource, "File");
        Ok(Self::with_bag(AudioSource::WavFileInput(path.to_path_buf()), bag))
    }

    pub fn from_default_speaker_output() -> Self {
        Self {
            source: AudioSource::DefaultSpeaker,
            properties: None,
        }
    }

    pub fn from_speaker_output(device_name: &str) -> Result<Self> {
        require_non_empty(device_name, "render device name")?;
        let bag = PropertyBag::new();
        bag.set_property(PropertyId::AudioConfigDeviceNameForRender, device_name);
        Ok(Self::with_bag(AudioSource::Speaker(device_name.to_string()), bag))
    }

    pub fn from_wav_file_output(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_non_empty(&path.to_string_lossy(), "WAV file path")?;
        Ok(Self {
            source: AudioSource::WavFileOutput(path.to_path_buf()),
            properties: None,
        })
    }

    pub fn source(&self) -> &AudioSource {
        &self.source
    }

    fn with_bag(source: AudioSource, bag: PropertyBag) -> Self {
        Self {
            source,
            properties: Some(Arc::new(bag)),
        }
    }
}

impl SpxObject for AudioConfig {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        self.properties.clone()
    }
}

// ---------------------------------------------------------------------------
// Source language configs
// ---------------------------------------------------------------------------

/// One recognition language, optionally pinned to a custom endpoint.
#[derive(Debug)]
pub struct SourceLanguageConfig {
    properties: Arc<PropertyBag>,
}

impl SourceLanguageConfig {
    pub fn from_language(language: &str) -> Result<Self> {
        require_non_empty(language, "source language")?;
        let bag = PropertyBag::new();
        bag.set_property(PropertyId::SpeechServiceConnectionRecoLanguage, language);
        Ok(Self {
            properties: Arc::new(bag),
        })
    }

    pub fn from_language_and_endpoint_id(language: &str, endpoint_id: &str) -> Result<Self> {
        require_non_empty(endpoint_id, "endpoint id")?;
        let config = Self::from_language(language)?;
        config
            .properties
            .set_property(PropertyId::SpeechServiceConnectionEndpointId, endpoint_id);
        Ok(config)
    }

    pub fn language(&self) -> String {
        self.properties
            .get_property(PropertyId::SpeechServiceConnectionRecoLanguage)
            .unwrap_or_default()
    }

    pub fn endpoint_id(&self) -> Option<String> {
        self.properties
            .get_property(PropertyId::SpeechServiceConnectionEndpointId)
            .filter(|id| !id.is_empty())
    }
}

impl SpxObject for SourceLanguageConfig {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }
}

/// Candidate languages for automatic source-language detection.
///
/// Endpoint ids for individual languages are stored under
/// `<language>SPEECH-ModelId`, never under the plain endpoint-id key.
#[derive(Debug)]
pub struct AutoDetectSourceLangConfig {
    properties: Arc<PropertyBag>,
}

impl AutoDetectSourceLangConfig {
    pub fn from_languages<S: AsRef<str>>(languages: &[S]) -> Result<Self> {
        let languages: Vec<&str> = languages.iter().map(|l| l.as_ref().trim()).collect();
        if languages.is_empty() {
            return Err(SpeechKitError::invalid_argument(
                "at least one candidate language is required",
            ));
        }
        for language in &languages {
            require_non_empty(language, "candidate language")?;
        }
        let bag = PropertyBag::new();
        bag.set_property(
            PropertyId::SpeechServiceConnectionAutoDetectSourceLanguages,
            languages.join(","),
        );
        Ok(Self {
            properties: Arc::new(bag),
        })
    }

    pub fn from_source_lang_configs(configs: &[Arc<SourceLanguageConfig>]) -> Result<Self> {
        let languages: Vec<String> = configs.iter().map(|c| c.language()).collect();
        let config = Self::from_languages(&languages)?;
        for source in configs {
            if let Some(endpoint_id) = source.endpoint_id() {
                config
                    .properties
                    .set(per_language_endpoint_key(&source.language()), endpoint_id);
            }
        }
        Ok(config)
    }

    pub fn languages(&self) -> Vec<String> {
        self.properties
            .get_property(PropertyId::SpeechServiceConnectionAutoDetectSourceLanguages)
            .map(|joined| joined.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl SpxObject for AutoDetectSourceLangConfig {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }
}
