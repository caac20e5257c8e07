//! # Ticket Sequencer
//!
//! Issues strictly increasing ticket codes backed by a [`CounterStore`].
//!
//! ## One Issuance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        issue_next()                                     │
//! │                                                                         │
//! │  lease() ──► lock ──► load ──┬── None ─────► parse("01,0000")          │
//! │                              └── Some(raw) ─► parse(raw) ── bad? ─► ✗  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  advance() ── 99,9999? ─► ✗ SeriesExhausted                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commit(next) ──► store(encode(next)) ──► TicketCode                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lease dropped ──► lock released (every path, including ✗)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written unless the old record parsed and the next value was
//! computed, so a failed issuance never changes the committed counter.

use cambista_core::ticket::{TicketCode, TicketCounter, BOOTSTRAP_RECORD};
use tracing::{debug, info, warn};

use crate::counter::CounterStore;
use crate::error::StoreResult;

/// Whether a counter record has ever been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    /// No durable record; the next issuance starts from `01,0000`.
    Uninitialized,
    /// A record exists and is the source of truth.
    Initialized,
}

// =============================================================================
// Sequencer
// =============================================================================

/// Owns the counter store and the ticket prefix.
#[derive(Debug)]
pub struct TicketSequencer<S: CounterStore> {
    store: S,
    prefix: String,
}

impl<S: CounterStore> TicketSequencer<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        TicketSequencer {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issues the next ticket code and persists the counter.
    ///
    /// ## Errors
    /// - `CorruptCounterState` if the stored record does not parse
    /// - `SeriesExhausted` after `99,9999`
    /// - `Locked` / `StorageWriteFailure` from the store
    pub fn issue_next(&mut self) -> StoreResult<TicketCode> {
        let prefix = self.prefix.clone();

        let lease = self.lease()?;
        let next = lease.current().advance()?;
        lease.commit(next)?;

        let code = TicketCode::new(prefix, next);
        info!(ticket = %code, "Ticket issued");
        Ok(code)
    }

    /// Locks and reads the counter for one read-modify-write.
    pub fn lease(&mut self) -> StoreResult<CounterLease<'_, S>> {
        let lock = self.store.lock()?;

        let (current, state) = match self.store.load()? {
            Some(raw) => (TicketCounter::parse(&raw)?, CounterState::Initialized),
            None => (TicketCounter::parse(BOOTSTRAP_RECORD)?, CounterState::Uninitialized),
        };
        debug!(counter = %current.encode(), ?state, "Counter leased");

        Ok(CounterLease {
            store: &mut self.store,
            _lock: lock,
            current,
            state,
            committed: false,
        })
    }

    /// Reads the last issued counter without issuing anything.
    pub fn peek(&self) -> StoreResult<Option<TicketCounter>> {
        match self.store.load()? {
            Some(raw) => Ok(Some(TicketCounter::parse(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn state(&self) -> StoreResult<CounterState> {
        Ok(match self.store.load()? {
            Some(_) => CounterState::Initialized,
            None => CounterState::Uninitialized,
        })
    }
}

// =============================================================================
// Lease
// =============================================================================

/// Exclusive, scoped access to the counter for one issuance.
///
/// Holds the store lock until dropped. [`CounterLease::commit`] is the
/// only way the record changes.
pub struct CounterLease<'a, S: CounterStore> {
    store: &'a mut S,
    _lock: S::Lock,
    current: TicketCounter,
    state: CounterState,
    committed: bool,
}

impl<'a, S: CounterStore> CounterLease<'a, S> {
    /// The counter as read under the lock.
    pub fn current(&self) -> TicketCounter {
        self.current
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    /// Persists `next` and releases the lock.
    pub fn commit(mut self, next: TicketCounter) -> StoreResult<()> {
        self.store.store(&next.encode())?;
        self.committed = true;
        if self.state == CounterState::Uninitialized {
            info!(counter = %next.encode(), "Counter record created");
        }
        Ok(())
    }
}

impl<S: CounterStore> Drop for CounterLease<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            warn!(counter = %self.current.encode(), "Counter lease released without commit");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
