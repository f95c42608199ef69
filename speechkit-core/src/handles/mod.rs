//! Opaque handle tables.
//!
//! A [`HandleTable<T>`] maps [`Handle`] values to shared ownership of an
//! object viewed through interface `T`. Tables are obtained from the
//! process-wide [`HandleTableManager`], one per `(T, HandleKind)` pair.
//!
//! ## Handle layout
//!
//! ```text
//!  63          48 47          32 31                         0
//! ┌──────────────┬──────────────┬────────────────────────────┐
//! │  table tag   │  generation  │         slot index         │
//! └──────────────┴──────────────┴────────────────────────────┘
//! ```
//!
//! Every table gets its own tag, so a handle minted by one table never
//! resolves in another. Tags are reused only after 65534 tables have been
//! created. Generations start at 1 and advance on every release,
//! so a stale handle stops matching once its slot is reused.

pub mod manager;
mod roles;

pub use manager::HandleTableManager;

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SpeechKitError};
use crate::settings::{runtime_settings, MAX_SLOTS};

const TAG_SHIFT: u32 = 48;
const GENERATION_SHIFT: u32 = 32;
/// Tags cycle through `1..=MAX_TAG`; `0xFFFF` is left unused so the invalid
/// sentinel can never carry a live tag.
const MAX_TAG: u32 = 0xFFFE;

/// Opaque identifier handed across the C boundary.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    /// Reserved "no object" value.
    pub const INVALID: Handle = Handle(u64::MAX);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    fn compose(tag: u16, generation: u16, slot: u32) -> Self {
        Self(
            (u64::from(tag) << TAG_SHIFT)
                | (u64::from(generation) << GENERATION_SHIFT)
                | u64::from(slot),
        )
    }

    fn tag(self) -> u16 {
        (self.0 >> TAG_SHIFT) as u16
    }

    fn generation(self) -> u16 {
        (self.0 >> GENERATION_SHIFT) as u16
    }

    fn slot(self) -> u32 {
        self.0 as u32
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// The role a handle plays at the API surface.
///
/// Several interface views may share one kind (a dialog connector and a
/// speech recognizer are both "recognizer" handles) but each view still gets
/// its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    SpeechConfig,
    AudioConfig,
    AutoDetectSourceLangConfig,
    SourceLangConfig,
    Recognizer,
    Synthesizer,
    Conversation,
    PropertyBag,
}

impl HandleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpeechConfig => "speech config",
            Self::AudioConfig => "audio config",
            Self::AutoDetectSourceLangConfig => "auto-detect source language config",
            Self::SourceLangConfig => "source language config",
            Self::Recognizer => "recognizer",
            Self::Synthesizer => "synthesizer",
            Self::Conversation => "conversation",
            Self::PropertyBag => "property bag",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn next_table_tag() -> u16 {
    static NEXT: AtomicU32 = AtomicU32::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    ((n % MAX_TAG) + 1) as u16
}

struct Slot<T: ?Sized> {
    generation: u16,
    object: Option<Arc<T>>,
}

struct Slots<T: ?Sized> {
    entries: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T: ?Sized> Slots<T> {
    fn get(&self, tag: u16, handle: Handle) -> Option<&Arc<T>> {
        if handle.tag() != tag {
            return None;
        }
        let slot = self.entries.get(handle.slot() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.object.as_ref()
    }
}

/// Registry of live handles for one interface view.
pub struct HandleTable<T: ?Sized> {
    kind: HandleKind,
    tag: u16,
    max_live: usize,
    slots: RwLock<Slots<T>>,
    diagnostics: TableDiagnostics,
}

impl<T: ?Sized + Send + Sync + 'static> HandleTable<T> {
    pub fn new(kind: HandleKind) -> Self {
        Self::with_capacity_limit(kind, runtime_settings().max_handles_per_table)
    }

    /// Create a table that refuses to hold more than `max_live` handles.
    pub fn with_capacity_limit(kind: HandleKind, max_live: usize) -> Self {
        Self {
            kind,
            tag: next_table_tag(),
            max_live: max_live.clamp(1, MAX_SLOTS),
            slots: RwLock::new(Slots {
                entries: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
            diagnostics: TableDiagnostics::default(),
        }
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Register shared ownership of `object` and mint a fresh handle for it.
    ///
    /// # Errors
    /// `SpeechKitError::OutOfResources` once the table is full.
    pub fn track(&self, object: Arc<T>) -> Result<Handle> {
        let mut slots = self.slots.write();
        if slots.live >= self.max_live {
            self.diagnostics.track_failures.fetch_add(1, Ordering::Relaxed);
            return Err(SpeechKitError::OutOfResources { kind: self.kind });
        }

        let index = match slots.free.pop() {
            Some(index) => index,
            None => {
                let next = slots.entries.len();
                if next >= MAX_SLOTS {
                    self.diagnostics.track_failures.fetch_add(1, Ordering::Relaxed);
                    return Err(SpeechKitError::OutOfResources { kind: self.kind });
                }
                slots.entries.push(Slot {
                    generation: 1,
                    object: None,
                });
                next as u32
            }
        };

        let slot = &mut slots.entries[index as usize];
        slot.object = Some(object);
        let handle = Handle::compose(self.tag, slot.generation, index);
        slots.live += 1;
        drop(slots);

        self.diagnostics.tracked.fetch_add(1, Ordering::Relaxed);
        debug!(kind = %self.kind, %handle, "tracked handle");
        Ok(handle)
    }

    /// Look up the object behind `handle` without removing it.
    pub fn resolve(&self, handle: Handle) -> Result<Arc<T>> {
        let found = self.slots.read().get(self.tag, handle).cloned();
        found.ok_or_else(|| {
            self.diagnostics.failed_lookups.fetch_add(1, Ordering::Relaxed);
            SpeechKitError::InvalidHandle { kind: self.kind }
        })
    }

    /// `resolve` for optional inputs: unknown or invalid handles yield `None`.
    pub fn resolve_optional(&self, handle: Handle) -> Option<Arc<T>> {
        if handle.is_invalid() {
            return None;
        }
        self.slots.read().get(self.tag, handle).cloned()
    }

    pub fn is_valid(&self, handle: Handle) -> bool {
        !handle.is_invalid() && self.slots.read().get(self.tag, handle).is_some()
    }

    /// Remove `handle`, returning the table's share of the object.
    ///
    /// The object itself is dropped only if no other owner remains once the
    /// caller lets go of the returned `Arc`.
    pub fn release(&self, handle: Handle) -> Result<Arc<T>> {
        let mut slots = self.slots.write();
        if slots.get(self.tag, handle).is_none() {
            drop(slots);
            self.diagnostics.failed_lookups.fetch_add(1, Ordering::Relaxed);
            return Err(SpeechKitError::InvalidHandle { kind: self.kind });
        }

        let index = handle.slot();
        let slot = &mut slots.entries[index as usize];
        let object = slot.object.take();
        slot.generation = match slot.generation.wrapping_add(1) {
            0 => 1,
            g => g,
        };
        slots.free.push(index);
        slots.live -= 1;
        drop(slots);

        self.diagnostics.released.fetch_add(1, Ordering::Relaxed);
        debug!(kind = %self.kind, %handle, "released handle");
        object.ok_or(SpeechKitError::InvalidHandle { kind: self.kind })
    }

    pub fn len(&self) -> usize {
        self.slots.read().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every object currently tracked, in slot order.
    pub fn objects(&self) -> Vec<Arc<T>> {
        self.slots
            .read()
            .entries
            .iter()
            .filter_map(|slot| slot.object.clone())
            .collect()
    }

    /// Drop every entry. Objects are released after the lock is let go.
    pub fn clear(&self) -> usize {
        let drained: Vec<Arc<T>> = {
            let mut guard = self.slots.write();
            let slots = &mut *guard;
            let mut drained = Vec::with_capacity(slots.live);
            for (index, slot) in slots.entries.iter_mut().enumerate() {
                if let Some(object) = slot.object.take() {
                    drained.push(object);
                    slot.generation = match slot.generation.wrapping_add(1) {
                        0 => 1,
                        g => g,
                    };
                    slots.free.push(index as u32);
                }
            }
            slots.live = 0;
            drained
        };
        let count = drained.len();
        self.diagnostics.released.fetch_add(count, Ordering::Relaxed);
        count
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            kind: self.kind,
            interface: short_type_name::<T>(),
            live: self.len(),
            tracked: self.diagnostics.tracked.load(Ordering::Relaxed),
            released: self.diagnostics.released.load(Ordering::Relaxed),
            failed_lookups: self.diagnostics.failed_lookups.load(Ordering::Relaxed),
            track_failures: self.diagnostics.track_failures.load(Ordering::Relaxed),
        }
    }
}

impl<T: ?Sized> fmt::Debug for HandleTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleTable")
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct TableDiagnostics {
    tracked: AtomicUsize,
    released: AtomicUsize,
    failed_lookups: AtomicUsize,
    track_failures: AtomicUsize,
}

/// Point-in-time counters for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub kind: HandleKind,
    pub interface: String,
    pub live: usize,
    pub tracked: usize,
    pub released: usize,
    pub failed_lookups: usize,
    pub track_failures: usize,
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let trimmed = full.strip_prefix("dyn ").unwrap_or(full);
    let base = trimmed.split('<').next().unwrap_or(trimmed);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
