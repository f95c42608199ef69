//! Sites and sessions.
//!
//! A [`Site`] is the services context an object is bound to. Objects built
//! by the API start on the root site; a conversation transcriber moves onto
//! its conversation's session site while attached.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::capability::same_object;
use crate::objects::{AudioConfig, Recognizer};

#[derive(Clone, Default)]
pub enum Site {
    #[default]
    Root,
    Session(Arc<Session>),
}

impl Site {
    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            Self::Root => None,
            Self::Session(session) => Some(session),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("Site::Root"),
            Self::Session(session) => write!(f, "Site::Session({})", session.id()),
        }
    }
}

/// Shared audio session owned by a conversation.
///
/// Holds the recognizers currently fed by the session. The set keeps strong
/// references; detaching a recognizer removes it again.
pub struct Session {
    id: u64,
    audio: Mutex<Option<Arc<AudioConfig>>>,
    recognizers: Mutex<Vec<Arc<dyn Recognizer>>>,
}

impl Session {
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            audio: Mutex::new(None),
            recognizers: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn set_audio_config(&self, audio: Option<Arc<AudioConfig>>) {
        *self.audio.lock() = audio;
    }

    pub fn audio_config(&self) -> Option<Arc<AudioConfig>> {
        self.audio.lock().clone()
    }

    /// Add `recognizer` to the active set. Adding it twice is a no-op.
    pub fn add_recognizer(&self, recognizer: Arc<dyn Recognizer>) {
        let mut recognizers = self.recognizers.lock();
        if recognizers.iter().any(|r| same_object(r, &recognizer)) {
            return;
        }
        recognizers.push(recognizer);
        debug!(session = self.id, active = recognizers.len(), "recognizer added to session");
    }

    /// Remove the recognizer at the same address as `recognizer`.
    pub fn remove_recognizer<R: ?Sized>(&self, recognizer: &Arc<R>) -> bool {
        let removed = {
            let mut recognizers = self.recognizers.lock();
            let before = recognizers.len();
            recognizers.retain(|r| !same_object(r, recognizer));
            before != recognizers.len()
        };
        if removed {
            debug!(session = self.id, "recognizer removed from session");
        }
        removed
    }

    pub fn contains_recognizer<R: ?Sized>(&self, recognizer: &Arc<R>) -> bool {
        self.recognizers
            .lock()
            .iter()
            .any(|r| same_object(r, recognizer))
    }

    pub fn recognizers(&self) -> Vec<Arc<dyn Recognizer>> {
        self.recognizers.lock().clone()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("recognizers", &self.recognizers.lock().len())
            .finish_non_exhaustive()
    }
}
