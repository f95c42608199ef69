//! Domain objects that sit behind handles.
//!
//! These are the in-process stand-ins for the SDK's recognizers,
//! synthesizers, conversations, and configs. Each implements
//! [`SpxObject`](crate::capability::SpxObject) and advertises only the
//! capabilities it actually has.

pub mod config;
pub mod conversation;
pub mod recognizer;
pub mod synthesizer;
pub mod transcriber;

pub use config::{
    AudioConfig, AudioSource, AutoDetectSourceLangConfig, SourceLanguageConfig, SpeechConfig,
};
pub use conversation::{Conversation, Participant, VoiceSignature};
pub use recognizer::{DialogServiceConnector, Recognizer, RecognizerKind, SpeechRecognizer};
pub use synthesizer::Synthesizer;
pub use transcriber::{AttachmentState, ConversationTranscriber};
