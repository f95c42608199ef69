//! Optional capability interfaces and the typed query over them.
//!
//! Every shared object implements [`SpxObject`]; each accessor defaults to
//! `None`, so an object advertises a capability simply by overriding the
//! matching method. Callers go through [`Query::query`] with one of the
//! marker types in [`caps`]:
//!
//! ```ignore
//! if let Some(bag) = object.query::<caps::NamedProperties>() {
//!     factory_bag.copy_from(&bag);
//! }
//! ```

use std::sync::Arc;

use crate::factory::SpeechApiFactory;
use crate::objects::{AudioConfig, ConversationTranscriber};
use crate::properties::PropertyBag;
use crate::site::{Session, Site};

/// Base trait of every object that can sit behind a handle.
pub trait SpxObject: Send + Sync + 'static {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        None
    }

    fn audio_config_access(&self) -> Option<&dyn AudioConfigAccess> {
        None
    }

    fn object_with_site(&self) -> Option<&dyn ObjectWithSite> {
        None
    }

    fn service_provider(&self) -> Option<&dyn ServiceProvider> {
        None
    }

    fn conversation_transcriber(&self) -> Option<&ConversationTranscriber> {
        None
    }
}

/// Exposes the audio configuration an object was built with.
pub trait AudioConfigAccess {
    fn audio_config(&self) -> Option<Arc<AudioConfig>>;
}

/// Objects that resolve shared collaborators through a [`Site`].
pub trait ObjectWithSite {
    fn set_site(&self, site: Site);
    fn site(&self) -> Site;
}

/// Service lookup: the objects that own a session and factory hand them out.
pub trait ServiceProvider {
    fn session(&self) -> Option<Arc<Session>>;
    fn factory(&self) -> Option<Arc<SpeechApiFactory>>;
}

/// A capability that can be looked up on any [`SpxObject`].
pub trait Capability {
    type View<'a>;

    fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>>;
}

/// Marker types naming each capability.
pub mod caps {
    use super::*;

    pub struct NamedProperties;
    pub struct AudioConfigAccessor;
    pub struct WithSite;
    pub struct Services;
    pub struct Transcriber;

    impl Capability for NamedProperties {
        type View<'a> = Arc<PropertyBag>;

        fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>> {
            object.named_properties()
        }
    }

    impl Capability for AudioConfigAccessor {
        type View<'a> = &'a dyn AudioConfigAccess;

        fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>> {
            object.audio_config_access()
        }
    }

    impl Capability for WithSite {
        type View<'a> = &'a dyn ObjectWithSite;

        fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>> {
            object.object_with_site()
        }
    }

    impl Capability for Services {
        type View<'a> = &'a dyn ServiceProvider;

        fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>> {
            object.service_provider()
        }
    }

    impl Capability for Transcriber {
        type View<'a> = &'a ConversationTranscriber;

        fn lookup<'a, O: SpxObject + ?Sized>(object: &'a O) -> Option<Self::View<'a>> {
            object.conversation_transcriber()
        }
    }
}

/// `object.query::<C>()` for every [`SpxObject`], sized or not.
pub trait Query {
    fn query<C: Capability>(&self) -> Option<C::View<'_>>;
}

impl<O: SpxObject + ?Sized> Query for O {
    fn query<C: Capability>(&self) -> Option<C::View<'_>> {
        C::lookup(self)
    }
}

/// Query through an optional object; absence of the object means absence of
/// the capability.
pub fn query_optional<C: Capability, O: SpxObject + ?Sized>(
    object: Option<&O>,
) -> Option<C::View<'_>> {
    object.and_then(|o| C::lookup(o))
}

/// Compare two shared objects by address, ignoring trait-object metadata.
pub fn same_object<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl SpxObject for Bare {}

    struct WithBag(Arc<PropertyBag>);
    impl SpxObject for WithBag {
        fn named_properties(&self) -> Option<Arc<PropertyBag>> {
            Some(Arc::clone(&self.0))
        }
    }

    #[test]
    fn missing_capability_yields_none() {
        let bare = Bare;
        assert!(bare.query::<caps::NamedProperties>().is_none());
        assert!(bare.query::<caps::Transcriber>().is_none());
        assert!(bare.query::<caps::Services>().is_none());
    }

    #[test]
    fn present_capability_yields_shared_view() {
        let bag = Arc::new(PropertyBag::new());
        bag.set("k", "v");
        let object: Arc<dyn SpxObject> = Arc::new(WithBag(Arc::clone(&bag)));

        let view = object
            .query::<caps::NamedProperties>()
            .expect("bag capability");
        assert!(Arc::ptr_eq(&view, &bag));
    }

    #[test]
    fn optional_object_query() {
        let none: Option<&Bare> = None;
        assert!(query_optional::<caps::NamedProperties, _>(none).is_none());
    }

    #[test]
    fn same_object_ignores_vtable() {
        let a: Arc<WithBag> = Arc::new(WithBag(Arc::new(PropertyBag::new())));
        let b: Arc<dyn SpxObject> = a.clone();
        assert!(same_object(&a, &b));
    }
}
