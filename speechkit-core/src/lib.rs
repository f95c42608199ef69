//! # speechkit-core
//!
//! Object lifetime and configuration substrate behind the speechkit C API.
//!
//! ## Architecture
//!
//! ```text
//! C call ─► Handle ─► HandleTableManager ─► HandleTable<I> ─► Arc<I>
//!                                                               │
//!                                               query::<caps::X>()
//!                                                               │
//!   speech cfg ┐                                                ▼
//!   audio cfg  ├─► compose (bag merge) ─► SpeechApiFactory ─► new object
//!   lang cfgs  ┘                                                │
//!                                                    track ─► fresh Handle
//! ```
//!
//! Handles are opaque 64-bit values; every table stamps its own tag into the
//! handles it mints, so a handle only ever resolves in the table that
//! produced it.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod attach;
pub mod capability;
pub mod compose;
pub mod error;
pub mod factory;
pub mod handles;
pub mod objects;
pub mod properties;
pub mod registry;
pub mod settings;
pub mod site;

// Convenience re-exports for downstream crates
pub use capability::{caps, Query, SpxObject};
pub use compose::{CompositionContext, CompositionInputs};
pub use error::{ErrorKind, Result, SpeechKitError};
pub use handles::{Handle, HandleKind, HandleTable, HandleTableManager, TableSnapshot};
pub use objects::{AttachmentState, Participant, RecognizerKind, VoiceSignature};
pub use properties::{PropertyBag, PropertyId};
pub use settings::{runtime_settings, RuntimeSettings};
