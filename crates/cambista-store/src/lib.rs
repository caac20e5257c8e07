//! # cambista-store: Filesystem Layer for Cambista
//!
//! Owns the two durable artifacts of the system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cambista Data Flow                               │
//! │                                                                         │
//! │  Operator console (issue ticket, save operation)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 cambista-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │ TicketSequencer│   │ OperationArchive│  │   atomic     │   │   │
//! │  │   │ (sequencer.rs) │   │  (archive.rs)  │   │  lock        │   │   │
//! │  │   │ CounterStore   │   │  JSON per op   │   │  helpers     │   │   │
//! │  │   └────────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  contador_ticket.txt          Operaciones de COMPRA/*.json             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Single process, one issuance at a time. The counter lock file turns a
//! concurrent second issuer into an explicit `Locked` error instead of a race.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cambista_store::{FileCounterStore, OperationArchive, TicketSequencer};
//!
//! let mut sequencer = TicketSequencer::new(FileCounterStore::new("contador_ticket.txt"), "TC");
//! let ticket = sequencer.issue_next()?;
//!
//! let archive = OperationArchive::default();
//! let path = archive.save(&record)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod archive;
pub mod atomic;
pub mod counter;
pub mod error;
pub mod lock;
pub mod sequencer;

// =============================================================================
// Re-exports
// =============================================================================

pub use archive::{OperationArchive, DEFAULT_OPERATIONS_DIR};
pub use counter::{CounterStore, FileCounterStore, MemoryCounterStore};
pub use error::{StoreError, StoreResult};
pub use sequencer::{CounterLease, CounterState, TicketSequencer};

/// Default counter file name.
pub const DEFAULT_COUNTER_FILE: &str = "contador_ticket.txt";
