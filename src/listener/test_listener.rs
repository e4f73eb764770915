use std::fmt::{Debug, Write as _};
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ahash::RandomState;
use dashmap::{DashMap, DashSet};

use crate::listener::ListenerStats;
use crate::wait::WaitConfig;
use crate::{CqEvent, CqStatusListener};

/// Bound shared by every key type a [`CqTestListener`] can record
pub trait CqKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> CqKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

type KeySet<K> = DashSet<K, RandomState>;

/// A CQ listener that records every delivered event for later assertions.
///
/// Delivery threads drive it through [`CqStatusListener`]; the test thread
/// reads counters and key sets, or blocks on one of the `wait_for_*`
/// helpers. Every update is a single atomic or concurrent-set operation, so
/// the listener can be shared behind an `Arc` without extra locking.
///
/// # Example Usage
/// ```ignore
/// let listener = Arc::new(CqTestListener::<String>::new("testCQ"));
/// register_cq("SELECT * FROM /root/portfolios", listener.clone());
///
/// put("key-1", portfolio);
/// listener.wait_for_created(&"key-1".to_string())?;
/// assert_eq!(listener.create_event_count(), 1);
/// ```
pub struct CqTestListener<K: CqKey> {
    pub cq_name: String,
    pub user_name: Option<String>,

    pub(crate) wait_config: WaitConfig,

    total_event_count: AtomicU64,
    event_create_count: AtomicU64,
    event_update_count: AtomicU64,
    event_delete_count: AtomicU64,
    event_invalidate_count: AtomicU64,
    event_error_count: AtomicU64,

    event_query_insert_count: AtomicU64,
    event_query_update_count: AtomicU64,
    event_query_delete_count: AtomicU64,
    event_query_invalidate_count: AtomicU64,

    cqs_connected_count: AtomicU64,
    cqs_disconnected_count: AtomicU64,

    event_close: AtomicBool,
    event_region_clear: AtomicBool,
    event_region_invalidate: AtomicBool,

    pub(crate) creates: KeySet<K>,
    pub(crate) updates: KeySet<K>,
    pub(crate) destroys: KeySet<K>,
    pub(crate) invalidates: KeySet<K>,
    pub(crate) errors: DashSet<String, RandomState>,

    // Arrival-ordered history, indexed by a sequence number taken at delivery
    next_sequence: AtomicU64,
    history: DashMap<u64, CqEvent<K>, RandomState>,
}

impl<K: CqKey> CqTestListener<K> {
    /// Create a listener for the named CQ, with wait timing read from the environment
    pub fn new(cq_name: impl Into<String>) -> Self {
        Self::with_wait_config(cq_name, WaitConfig::from_env())
    }

    pub fn with_wait_config(cq_name: impl Into<String>, wait_config: WaitConfig) -> Self {
        CqTestListener {
            cq_name: cq_name.into(),
            user_name: None,
            wait_config,
            total_event_count: AtomicU64::new(0),
            event_create_count: AtomicU64::new(0),
            event_update_count: AtomicU64::new(0),
            event_delete_count: AtomicU64::new(0),
            event_invalidate_count: AtomicU64::new(0),
            event_error_count: AtomicU64::new(0),
            event_query_insert_count: AtomicU64::new(0),
            event_query_update_count: AtomicU64::new(0),
            event_query_delete_count: AtomicU64::new(0),
            event_query_invalidate_count: AtomicU64::new(0),
            cqs_connected_count: AtomicU64::new(0),
            cqs_disconnected_count: AtomicU64::new(0),
            event_close: AtomicBool::new(false),
            event_region_clear: AtomicBool::new(false),
            event_region_invalidate: AtomicBool::new(false),
            creates: DashSet::with_hasher(RandomState::new()),
            updates: DashSet::with_hasher(RandomState::new()),
            destroys: DashSet::with_hasher(RandomState::new()),
            invalidates: DashSet::with_hasher(RandomState::new()),
            errors: DashSet::with_hasher(RandomState::new()),
            next_sequence: AtomicU64::new(0),
            history: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Attach the user the CQ runs as, for multi-user tests
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait_config
    }

    /// Name used in log lines and wait failure messages
    pub fn identity(&self) -> String {
        match &self.user_name {
            Some(user) => format!("{} (user {})", self.cq_name, user),
            None => self.cq_name.clone(),
        }
    }

    fn append_history(&self, event: &CqEvent<K>) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        self.history.insert(sequence, event.clone());
    }

    fn classify_base_operation(&self, event: &CqEvent<K>) {
        let key = event.key.as_ref();
        let base = event.base_operation;
        if base.is_update() {
            self.event_update_count.fetch_add(1, Ordering::SeqCst);
            insert_key(&self.updates, key);
        } else if base.is_create() {
            self.event_create_count.fetch_add(1, Ordering::SeqCst);
            insert_key(&self.creates, key);
        } else if base.is_destroy() {
            self.event_delete_count.fetch_add(1, Ordering::SeqCst);
            insert_key(&self.destroys, key);
        } else if base.is_invalidate() {
            // Invalidation is counted as a delete as well as an invalidate
            self.event_delete_count.fetch_add(1, Ordering::SeqCst);
            self.event_invalidate_count.fetch_add(1, Ordering::SeqCst);
            insert_key(&self.invalidates, key);
        }
    }

    fn classify_query_operation(&self, event: &CqEvent<K>) {
        let query = event.query_operation;
        if query.is_update() {
            self.event_query_update_count.fetch_add(1, Ordering::SeqCst);
        } else if query.is_create() {
            self.event_query_insert_count.fetch_add(1, Ordering::SeqCst);
        } else if query.is_destroy() {
            self.event_query_delete_count.fetch_add(1, Ordering::SeqCst);
        } else if query.is_invalidate() {
            self.event_query_invalidate_count.fetch_add(1, Ordering::SeqCst);
        } else if query.is_clear() {
            self.event_region_clear.store(true, Ordering::SeqCst);
        } else if query.is_region_invalidate() {
            self.event_region_invalidate.store(true, Ordering::SeqCst);
        }
    }

    /// Clear the four key sets and the close flag.
    ///
    /// Counters, the error set and the region flags are left untouched.
    pub fn reset(&self) {
        self.destroys.clear();
        self.creates.clear();
        self.invalidates.clear();
        self.updates.clear();
        self.event_close.store(false, Ordering::SeqCst);
    }

    pub fn total_event_count(&self) -> u64 {
        self.total_event_count.load(Ordering::SeqCst)
    }

    pub fn create_event_count(&self) -> u64 {
        self.event_create_count.load(Ordering::SeqCst)
    }

    pub fn update_event_count(&self) -> u64 {
        self.event_update_count.load(Ordering::SeqCst)
    }

    pub fn delete_event_count(&self) -> u64 {
        self.event_delete_count.load(Ordering::SeqCst)
    }

    pub fn invalidate_event_count(&self) -> u64 {
        self.event_invalidate_count.load(Ordering::SeqCst)
    }

    pub fn error_event_count(&self) -> u64 {
        self.event_error_count.load(Ordering::SeqCst)
    }

    pub fn query_insert_event_count(&self) -> u64 {
        self.event_query_insert_count.load(Ordering::SeqCst)
    }

    pub fn query_update_event_count(&self) -> u64 {
        self.event_query_update_count.load(Ordering::SeqCst)
    }

    pub fn query_delete_event_count(&self) -> u64 {
        self.event_query_delete_count.load(Ordering::SeqCst)
    }

    pub fn query_invalidate_event_count(&self) -> u64 {
        self.event_query_invalidate_count.load(Ordering::SeqCst)
    }

    pub fn cqs_connected_count(&self) -> u64 {
        self.cqs_connected_count.load(Ordering::SeqCst)
    }

    pub fn cqs_disconnected_count(&self) -> u64 {
        self.cqs_disconnected_count.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.event_close.load(Ordering::SeqCst)
    }

    pub fn is_region_cleared(&self) -> bool {
        self.event_region_clear.load(Ordering::SeqCst)
    }

    pub fn is_region_invalidated(&self) -> bool {
        self.event_region_invalidate.load(Ordering::SeqCst)
    }

    pub fn is_created(&self, key: &K) -> bool {
        self.creates.contains(key)
    }

    pub fn is_updated(&self, key: &K) -> bool {
        self.updates.contains(key)
    }

    pub fn is_destroyed(&self, key: &K) -> bool {
        self.destroys.contains(key)
    }

    pub fn is_invalidated(&self, key: &K) -> bool {
        self.invalidates.contains(key)
    }

    pub fn has_error(&self, message: &str) -> bool {
        self.errors.iter().any(|error| {
            let matched = error.key() == message;
            if !matched {
                log::trace!("errors that exist: {}", error.key());
            }
            matched
        })
    }

    pub fn created_keys(&self) -> Vec<K> {
        snapshot(&self.creates)
    }

    pub fn updated_keys(&self) -> Vec<K> {
        snapshot(&self.updates)
    }

    pub fn destroyed_keys(&self) -> Vec<K> {
        snapshot(&self.destroys)
    }

    pub fn invalidated_keys(&self) -> Vec<K> {
        snapshot(&self.invalidates)
    }

    pub fn errors(&self) -> Vec<String> {
        snapshot(&self.errors)
    }

    /// Every keyed event received so far, in arrival order
    pub fn events(&self) -> Vec<CqEvent<K>> {
        let mut entries: Vec<(u64, CqEvent<K>)> = self
            .history
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, event)| event).collect()
    }

    /// Keys of every keyed event received so far, in arrival order, duplicates kept
    pub fn keys(&self) -> Vec<K> {
        self.events().into_iter().filter_map(|event| event.key).collect()
    }

    pub fn stats(&self) -> ListenerStats {
        ListenerStats {
            total: self.total_event_count(),
            creates: self.create_event_count(),
            updates: self.update_event_count(),
            deletes: self.delete_event_count(),
            invalidates: self.invalidate_event_count(),
            errors: self.error_event_count(),
            query_inserts: self.query_insert_event_count(),
            query_updates: self.query_update_event_count(),
            query_deletes: self.query_delete_event_count(),
            query_invalidates: self.query_invalidate_event_count(),
            cqs_connected: self.cqs_connected_count(),
            cqs_disconnected: self.cqs_disconnected_count(),
            closed: self.is_closed(),
            region_cleared: self.is_region_cleared(),
            region_invalidated: self.is_region_invalidated(),
        }
    }

    /// Human readable report of the counters, optionally with the key sets
    pub fn summary(&self, print_keys: bool) -> String {
        let stats = self.stats();
        let mut out = format!(
            "####{}: Events Total: {} Events Created: {} Events Updated: {} Events Deleted: {} \
             Events Invalidated: {} Events Errored: {} Query Inserts: {} Query Updates: {} \
             Query Deletes: {} Query Invalidates: {}",
            self.identity(),
            stats.total,
            stats.creates,
            stats.updates,
            stats.deletes,
            stats.invalidates,
            stats.errors,
            stats.query_inserts,
            stats.query_updates,
            stats.query_deletes,
            stats.query_invalidates,
        );

        if print_keys {
            let _ = write!(
                out,
                "\nNumber of creates for key: {} updates: {} destroys: {} invalidates: {}",
                self.creates.len(),
                self.updates.len(),
                self.destroys.len(),
                self.invalidates.len(),
            );
            let _ = write!(out, "\nKeys in created set: {:?}", self.created_keys());
            let _ = write!(out, "\nKeys in updated set: {:?}", self.updated_keys());
            let _ = write!(out, "\nKeys in destroyed set: {:?}", self.destroyed_keys());
            let _ = write!(out, "\nKeys in invalidated set: {:?}", self.invalidated_keys());
        }

        out
    }

    pub fn print_info(&self, print_keys: bool) {
        log::info!("{}", self.summary(print_keys));
    }
}

impl<K: CqKey> CqStatusListener<K> for CqTestListener<K> {
    fn on_event(&self, event: &CqEvent<K>) {
        let total = self.total_event_count.fetch_add(1, Ordering::SeqCst) + 1;

        log::trace!(
            "CqEvent for the CQ: {}; Key={:?}; baseOp={}; queryOp={}; totalEventCount={}",
            self.cq_name,
            event.key,
            event.base_operation,
            event.query_operation,
            total
        );

        if event.key.is_some() {
            self.append_history(event);
        }
        self.classify_base_operation(event);
        self.classify_query_operation(event);
    }

    fn on_error(&self, event: &CqEvent<K>) {
        self.total_event_count.fetch_add(1, Ordering::SeqCst);
        self.event_error_count.fetch_add(1, Ordering::SeqCst);

        let message = event.error.clone().unwrap_or_default();
        log::trace!("CqEvent error for the CQ: {}; message={:?}", self.cq_name, message);
        self.errors.insert(message);
    }

    fn on_cq_connected(&self) {
        let count = self.cqs_connected_count.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("CQ {} connected ({} times)", self.cq_name, count);
    }

    fn on_cq_disconnected(&self) {
        let count = self.cqs_disconnected_count.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("CQ {} disconnected ({} times)", self.cq_name, count);
    }

    fn close(&self) {
        self.event_close.store(true, Ordering::SeqCst);
        log::debug!("CQ {} closed", self.cq_name);
    }
}

impl<K: CqKey> Debug for CqTestListener<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CqTestListener")
            .field("cq_name", &self.cq_name)
            .field("user_name", &self.user_name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn insert_key<K: CqKey>(set: &KeySet<K>, key: Option<&K>) {
    if let Some(key) = key {
        set.insert(key.clone());
    }
}

fn snapshot<T: CqKey>(set: &DashSet<T, RandomState>) -> Vec<T> {
    set.iter().map(|entry| entry.key().clone()).collect()
}
