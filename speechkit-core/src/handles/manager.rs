//! `HandleTableManager`: process-wide registry of handle tables.
//!
//! Tables are keyed by `(TypeId of the interface view, HandleKind)` and
//! created lazily on first request. Lookups take a read lock; creation
//! re-checks under the write lock so concurrent first use observes a single
//! table.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::info;

use super::{HandleKind, HandleTable, TableSnapshot};

/// Type-erased operations the manager needs on every table.
trait ErasedTable: Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn snapshot(&self) -> TableSnapshot;
    fn clear(&self) -> usize;
}

impl<T: ?Sized + Send + Sync + 'static> ErasedTable for HandleTable<T> {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn snapshot(&self) -> TableSnapshot {
        HandleTable::snapshot(self)
    }

    fn clear(&self) -> usize {
        HandleTable::clear(self)
    }
}

type TableKey = (TypeId, HandleKind);

fn downcast<T>(table: Arc<dyn ErasedTable>) -> Arc<HandleTable<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    match table.into_any().downcast::<HandleTable<T>>() {
        Ok(table) => table,
        Err(_) => unreachable!("handle table registered under a foreign type id"),
    }
}

#[derive(Default)]
pub struct HandleTableManager {
    tables: RwLock<HashMap<TableKey, Arc<dyn ErasedTable>>>,
}

impl HandleTableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The manager backing the C API.
    pub fn global() -> &'static HandleTableManager {
        static MANAGER: OnceLock<HandleTableManager> = OnceLock::new();
        MANAGER.get_or_init(HandleTableManager::new)
    }

    /// Return the table for interface `T` under `kind`, creating it if absent.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, kind: HandleKind) -> Arc<HandleTable<T>> {
        let key = (TypeId::of::<T>(), kind);

        let existing = self.tables.read().get(&key).cloned();
        let table = match existing {
            Some(table) => table,
            None => {
                let mut tables = self.tables.write();
                Arc::clone(tables.entry(key).or_insert_with(|| {
                    let table = HandleTable::<T>::new(kind);
                    info!(%kind, interface = %table.snapshot().interface, "created handle table");
                    Arc::new(table) as Arc<dyn ErasedTable>
                }))
            }
        };

        downcast(table)
    }

    /// Return the table for interface `T` under `kind` if it already exists.
    pub fn find<T: ?Sized + Send + Sync + 'static>(
        &self,
        kind: HandleKind,
    ) -> Option<Arc<HandleTable<T>>> {
        let table = self.tables.read().get(&(TypeId::of::<T>(), kind)).cloned()?;
        Some(downcast(table))
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    /// Counters for every table, ordered by kind then interface name.
    pub fn snapshot(&self) -> Vec<TableSnapshot> {
        let tables: Vec<Arc<dyn ErasedTable>> = self.tables.read().values().cloned().collect();
        let mut snaps: Vec<TableSnapshot> = tables.iter().map(|t| t.snapshot()).collect();
        snaps.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.interface.cmp(&b.interface)));
        snaps
    }

    /// Global teardown: forget every table and drop every tracked object.
    ///
    /// Attached transcribers leave their conversations first, otherwise the
    /// session and the transcriber would keep each other alive.
    ///
    /// Replacement tables are created with fresh tags, so handles minted
    /// before `term` do not resolve afterwards. Tags are 16 bits wide and
    /// wrap once 65534 tables have been created in the process.
    pub fn term(&self) -> usize {
        let detached = self.detach_transcribers();
        let tables: Vec<Arc<dyn ErasedTable>> = {
            let mut guard = self.tables.write();
            guard.drain().map(|(_, table)| table).collect()
        };
        let table_count = tables.len();
        let released: usize = tables.iter().map(|t| t.clear()).sum();
        info!(tables = table_count, released, detached, "handle tables torn down");
        released
    }
}

impl std::fmt::Debug for HandleTableManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleTableManager")
            .field("tables", &self.table_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn same_key_returns_same_table() {
        let manager = HandleTableManager::new();
        let a = manager.get::<String>(HandleKind::SpeechConfig);
        let b = manager.get::<String>(HandleKind::SpeechConfig);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(manager.table_count(), 1);
    }

    #[test]
    fn kind_and_interface_both_key_the_table() {
        let manager = HandleTableManager::new();
        let configs = manager.get::<String>(HandleKind::SpeechConfig);
        let bags = manager.get::<String>(HandleKind::PropertyBag);
        let numbers = manager.get::<u32>(HandleKind::SpeechConfig);

        let handle = configs.track(Arc::new("x".into())).expect("track");
        assert!(!bags.is_valid(handle));
        assert!(!numbers.is_valid(handle));
        assert_eq!(manager.table_count(), 3);
    }

    #[test]
    fn concurrent_first_use_creates_one_table() {
        let manager = Arc::new(HandleTableManager::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || manager.get::<u64>(HandleKind::Recognizer))
            })
            .collect();
        let tables: Vec<_> = workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect();

        assert_eq!(manager.table_count(), 1);
        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn term_drops_tables_and_invalidates_handles() {
        let manager = HandleTableManager::new();
        let table = manager.get::<String>(HandleKind::Conversation);
        let object = Arc::new("conversation".to_string());
        let handle = table.track(Arc::clone(&object)).expect("track");

        assert_eq!(manager.term(), 1);
        assert_eq!(manager.table_count(), 0);
        assert_eq!(Arc::strong_count(&object), 1);

        let fresh = manager.get::<String>(HandleKind::Conversation);
        assert!(!Arc::ptr_eq(&table, &fresh));
        assert!(!fresh.is_valid(handle));
    }

    #[test]
    fn find_never_creates_a_table() {
        let manager = HandleTableManager::new();
        assert!(manager.find::<String>(HandleKind::Conversation).is_none());
        assert_eq!(manager.table_count(), 0);

        let table = manager.get::<String>(HandleKind::Conversation);
        let found = manager.find::<String>(HandleKind::Conversation).expect("table");
        assert!(Arc::ptr_eq(&table, &found));
    }

    #[test]
    fn snapshot_is_sorted_by_kind() {
        let manager = HandleTableManager::new();
        manager.get::<u8>(HandleKind::Synthesizer);
        manager.get::<u8>(HandleKind::SpeechConfig);
        let kinds: Vec<_> = manager.snapshot().into_iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![HandleKind::SpeechConfig, HandleKind::Synthesizer]);
    }
}
