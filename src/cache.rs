//! Process-scoped cache of fetched entity collections.
//!
//! Each collection owns an invalidation counter and a background sync worker.
//! Bumping the counter (after a successful mutation) wakes the worker, which
//! refetches through the gateway and replaces the cached snapshot. Consumers
//! only ever read snapshots; all mutation goes through this narrow interface.
//!
//! Exactly one fetch is in flight per collection. Invalidations that arrive
//! while a fetch is running are coalesced into a single follow-up fetch, and
//! a completed fetch whose originating counter value has been superseded is
//! discarded (last-writer-by-intent, not by completion time).

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::models::{Budget, Expense};
use crate::queries::budgets::BudgetSource;
use crate::queries::expenses::ExpenseSource;

/// The two cached collection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Budgets,
    Expenses,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Budgets => write!(f, "budgets"),
            EntityKind::Expenses => write!(f, "expenses"),
        }
    }
}

/// Fetches the full collection of one entity kind from the backend.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn list(&self) -> GatewayResult<Vec<T>>;
}

/// Read-only copy of a collection's state, handed to consumers.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    pub entities: Vec<T>,
    pub is_loading: bool,
    /// Display string of the most recent fetch failure, cleared on success.
    pub last_error: Option<String>,
    /// When the collection was last successfully replaced.
    pub last_synced: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct CollectionState<T> {
    entities: Vec<T>,
    loading: bool,
    last_error: Option<String>,
    last_synced: Option<DateTime<Utc>>,
    /// Originating counter value of the last applied fetch.
    applied_generation: Option<u64>,
}

impl<T: Clone> CollectionState<T> {
    fn new() -> Self {
        Self {
            entities: Vec::new(),
            loading: true,
            last_error: None,
            last_synced: None,
            applied_generation: None,
        }
    }

    fn snapshot(&self) -> CollectionSnapshot<T> {
        CollectionSnapshot {
            entities: self.entities.clone(),
            is_loading: self.loading,
            last_error: self.last_error.clone(),
            last_synced: self.last_synced,
        }
    }

    fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Apply a completed fetch. Returns false when the result is stale: a
    /// fetch with an equal-or-newer originating counter was already applied.
    ///
    /// On failure the previous collection is retained (stale-but-consistent
    /// over empty-but-fresh) and only the error detail is recorded.
    fn complete_fetch(&mut self, origin: u64, outcome: GatewayResult<Vec<T>>) -> bool {
        if let Some(applied) = self.applied_generation {
            if origin <= applied {
                return false;
            }
        }
        self.loading = false;
        match outcome {
            Ok(entities) => {
                self.entities = entities;
                self.last_error = None;
                self.last_synced = Some(Utc::now());
                self.applied_generation = Some(origin);
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
        true
    }
}

/// One cached collection plus its sync worker.
///
/// The worker task is aborted when the collection is dropped.
pub struct Collection<T> {
    state: Arc<RwLock<CollectionState<T>>>,
    invalidations: watch::Sender<u64>,
    worker: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Collection<T> {
    /// Start with an empty, loading collection and dispatch the implicit
    /// startup fetch. Must be called within a tokio runtime.
    pub fn spawn(kind: EntityKind, source: Arc<dyn CollectionSource<T>>) -> Self {
        let state = Arc::new(RwLock::new(CollectionState::new()));
        let (tx, rx) = watch::channel(0u64);
        let worker = tokio::spawn(sync_loop(kind, Arc::clone(&state), rx, source));
        Self {
            state,
            invalidations: tx,
            worker,
        }
    }

    pub fn snapshot(&self) -> CollectionSnapshot<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Bump the invalidation counter; the sync worker refetches reactively.
    pub fn invalidate(&self) {
        self.invalidations.send_modify(|counter| *counter += 1);
    }
}

impl<T> Drop for Collection<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn sync_loop<T: Clone + Send + Sync>(
    kind: EntityKind,
    state: Arc<RwLock<CollectionState<T>>>,
    mut invalidations: watch::Receiver<u64>,
    source: Arc<dyn CollectionSource<T>>,
) {
    loop {
        // Reading the latest counter value here coalesces any number of
        // invalidations issued since the previous fetch into one.
        let origin = *invalidations.borrow_and_update();

        state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_fetch();
        debug!(kind = %kind, generation = origin, "fetching collection");

        let outcome = source.list().await;
        if let Err(ref err) = outcome {
            warn!(kind = %kind, error = %err, "fetch failed, keeping previous snapshot");
        }

        let applied = state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .complete_fetch(origin, outcome);
        if !applied {
            debug!(kind = %kind, generation = origin, "discarded stale fetch result");
        }

        // Resolves immediately if an invalidation arrived during the fetch.
        if invalidations.changed().await.is_err() {
            break;
        }
    }
}

/// Facade over the budget and expense collections.
pub struct EntityCache {
    budgets: Collection<Budget>,
    expenses: Collection<Expense>,
}

impl EntityCache {
    /// Wire both collections to gateway-backed sources and start syncing.
    pub fn spawn(gateway: Arc<Gateway>) -> Self {
        Self {
            budgets: Collection::spawn(
                EntityKind::Budgets,
                Arc::new(BudgetSource::new(Arc::clone(&gateway))),
            ),
            expenses: Collection::spawn(
                EntityKind::Expenses,
                Arc::new(ExpenseSource::new(gateway)),
            ),
        }
    }

    pub fn budgets(&self) -> CollectionSnapshot<Budget> {
        self.budgets.snapshot()
    }

    pub fn expenses(&self) -> CollectionSnapshot<Expense> {
        self.expenses.snapshot()
    }

    pub fn invalidate(&self, kind: EntityKind) {
        match kind {
            EntityKind::Budgets => self.budgets.invalidate(),
            EntityKind::Expenses => self.expenses.invalidate(),
        }
    }
}
