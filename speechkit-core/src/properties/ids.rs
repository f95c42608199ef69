//! Semantic property identifiers and their string keys.

/// Well-known properties. Numeric values are part of the C ABI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    SpeechServiceConnectionKey = 1000,
    SpeechServiceConnectionEndpoint = 1001,
    SpeechServiceConnectionRegion = 1002,
    SpeechServiceAuthorizationToken = 1003,
    SpeechServiceConnectionEndpointId = 1005,
    SpeechServiceConnectionHost = 1006,
    SpeechServiceConnectionTranslationToLanguages = 2000,
    SpeechServiceConnectionRecoLanguage = 3001,
    SpeechServiceConnectionSynthLanguage = 3100,
    SpeechServiceConnectionAutoDetectSourceLanguages = 3300,
    AudioConfigDeviceNameForCapture = 8000,
    AudioConfigDeviceNameForRender = 8005,
    AudioConfigAudioSource = 8004,
    KeywordConfigEnableKeywordVerification = 8500,
    ConversationId = 10000,
}

impl PropertyId {
    const ALL: [PropertyId; 15] = [
        Self::SpeechServiceConnectionKey,
        Self::SpeechServiceConnectionEndpoint,
        Self::SpeechServiceConnectionRegion,
        Self::SpeechServiceAuthorizationToken,
        Self::SpeechServiceConnectionEndpointId,
        Self::SpeechServiceConnectionHost,
        Self::SpeechServiceConnectionTranslationToLanguages,
        Self::SpeechServiceConnectionRecoLanguage,
        Self::SpeechServiceConnectionSynthLanguage,
        Self::SpeechServiceConnectionAutoDetectSourceLanguages,
        Self::AudioConfigDeviceNameForCapture,
        Self::AudioConfigDeviceNameForRender,
        Self::AudioConfigAudioSource,
        Self::KeywordConfigEnableKeywordVerification,
        Self::ConversationId,
    ];

    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| *id as i32 == raw)
    }

    /// String key stored in property bags.
    pub fn name(self) -> &'static str {
        match self {
            Self::SpeechServiceConnectionKey => "SPEECH-SubscriptionKey",
            Self::SpeechServiceConnectionEndpoint => "SPEECH-Endpoint",
            Self::SpeechServiceConnectionRegion => "SPEECH-Region",
            Self::SpeechServiceAuthorizationToken => "SPEECH-AuthToken",
            Self::SpeechServiceConnectionEndpointId => ENDPOINT_ID_KEY,
            Self::SpeechServiceConnectionHost => "SPEECH-Host",
            Self::SpeechServiceConnectionTranslationToLanguages => "TRANSLATION-ToLanguages",
            Self::SpeechServiceConnectionRecoLanguage => "SPEECH-RecoLanguage",
            Self::SpeechServiceConnectionSynthLanguage => "SPEECH-SynthLanguage",
            Self::SpeechServiceConnectionAutoDetectSourceLanguages => {
                "SPEECH-AutoDetectSourceLanguages"
            }
            Self::AudioConfigDeviceNameForCapture => "AudioConfig_DeviceNameForCapture",
            Self::AudioConfigDeviceNameForRender => "AudioConfig_DeviceNameForRender",
            Self::AudioConfigAudioSource => "AudioConfig_AudioSource",
            Self::KeywordConfigEnableKeywordVerification => {
                "KeywordConfig_EnableKeywordVerification"
            }
            Self::ConversationId => "CONVERSATION-Id",
        }
    }
}

const ENDPOINT_ID_KEY: &str = "SPEECH-ModelId";

/// Key under which an auto-detect config carries the endpoint id for one language.
pub fn per_language_endpoint_key(language: &str) -> String {
    format!("{language}{ENDPOINT_ID_KEY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_round_trip_for_every_variant() {
        for id in PropertyId::ALL {
            assert_eq!(PropertyId::from_raw(id as i32), Some(id));
        }
        assert_eq!(PropertyId::from_raw(-1), None);
    }

    #[test]
    fn per_language_key_reuses_endpoint_id_name() {
        assert_eq!(per_language_endpoint_key("de-DE"), "de-DESPEECH-ModelId");
        assert_eq!(
            PropertyId::SpeechServiceConnectionEndpointId.name(),
            "SPEECH-ModelId"
        );
    }
}
