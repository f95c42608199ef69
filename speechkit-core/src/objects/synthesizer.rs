use std::sync::Arc;

use crate::capability::{AudioConfigAccess, SpxObject};
use crate::objects::AudioConfig;
use crate::properties::PropertyBag;

/// Speech synthesizer configuration holder.
#[derive(Debug)]
pub struct Synthesizer {
    properties: Arc<PropertyBag>,
    audio: Option<Arc<AudioConfig>>,
}

impl Synthesizer {
    pub(crate) fn new(properties: PropertyBag, audio: Option<Arc<AudioConfig>>) -> Self {
        Self {
            properties: Arc::new(properties),
            audio,
        }
    }

    pub fn properties(&self) -> &Arc<PropertyBag> {
        &self.properties
    }
}

impl SpxObject for Synthesizer {
    fn named_properties(&self) -> Option<Arc<PropertyBag>> {
        Some(Arc::clone(&self.properties))
    }

    fn audio_config_access(&self) -> Option<&dyn AudioConfigAccess> {
        Some(self)
    }
}

impl AudioConfigAccess for Synthesizer {
    fn audio_config(&self) -> Option<Arc<AudioConfig>> {
        self.audio.clone()
    }
}
