//! Closed registry of constructible object types.
//!
//! Objects that are not produced by a factory are built here from an
//! [`ObjectKind`] and the [`Site`] they start on.

use std::sync::Arc;

use crate::error::{Result, SpeechKitError};
use crate::factory::SpeechApiFactory;
use crate::objects::{ConversationTranscriber, Recognizer};
use crate::site::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    SpeechApiFactory,
    ConversationTranscriber,
}

pub enum SharedObject {
    SpeechApiFactory(Arc<SpeechApiFactory>),
    ConversationTranscriber(Arc<ConversationTranscriber>),
}

impl SharedObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::SpeechApiFactory(_) => ObjectKind::SpeechApiFactory,
            Self::ConversationTranscriber(_) => ObjectKind::ConversationTranscriber,
        }
    }

    /// View the object through the recognizer interface, if it has one.
    pub fn into_recognizer(self) -> Option<Arc<dyn Recognizer>> {
        match self {
            Self::ConversationTranscriber(t) => Some(t),
            Self::SpeechApiFactory(_) => None,
        }
    }
}

type Constructor = fn(&Site) -> SharedObject;

fn constructor(kind: ObjectKind) -> Constructor {
    match kind {
        ObjectKind::SpeechApiFactory => |site| {
            SharedObject::SpeechApiFactory(Arc::new(SpeechApiFactory::new(site.clone())))
        },
        ObjectKind::ConversationTranscriber => |site| {
            SharedObject::ConversationTranscriber(Arc::new(ConversationTranscriber::new(
                site.clone(),
            )))
        },
    }
}

pub fn create_object_with_site(kind: ObjectKind, site: &Site) -> SharedObject {
    constructor(kind)(site)
}

/// Build a factory bound to `site`.
///
/// # Errors
/// `SpeechKitError::Runtime` if the registry hands back anything else.
pub fn create_factory(site: &Site) -> Result<Arc<SpeechApiFactory>> {
    match create_object_with_site(ObjectKind::SpeechApiFactory, site) {
        SharedObject::SpeechApiFactory(factory) => Ok(factory),
        other => Err(SpeechKitError::runtime(format!(
            "object registry produced {:?} for a factory request",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{caps, Query};

    #[test]
    fn factory_starts_on_requested_site() {
        let factory = create_factory(&Site::Root).expect("factory");
        assert!(factory.site().is_root());
        assert!(factory.properties().is_empty());
    }

    #[test]
    fn transcriber_is_a_recognizer_with_transcriber_capability() {
        let object = create_object_with_site(ObjectKind::ConversationTranscriber, &Site::Root);
        assert_eq!(object.kind(), ObjectKind::ConversationTranscriber);
        let recognizer = object.into_recognizer().expect("recognizer view");
        assert!(recognizer.query::<caps::Transcriber>().is_some());
    }

    #[test]
    fn factory_has_no_recognizer_view() {
        let object = create_object_with_site(ObjectKind::SpeechApiFactory, &Site::Root);
        assert!(object.into_recognizer().is_none());
    }
}
