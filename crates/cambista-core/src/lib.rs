//! # cambista-core: Pure Business Logic for Cambista
//!
//! This crate holds everything Cambista knows about a BRL purchase quote,
//! expressed as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cambista Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Operator Console (apps/cli)                  │   │
//! │  │    Prompts ──► Quote ──► Ticket ──► Message ──► Save record     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cambista-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  quote   │  │  format  │  │  ticket  │  │ record/msg   │   │   │
//! │  │   │ compute  │  │ canonical│  │ counter  │  │ OperationRec │   │   │
//! │  │   │          │  │ display  │  │ TC010001 │  │ client text  │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                cambista-store (Filesystem Layer)                │   │
//! │  │         contador_ticket.txt, Operaciones de COMPRA/*.json       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`quote`] - Market inputs and the seven-step quote pipeline
//! - [`format`] - Canonical (storage) and display number formatting
//! - [`ticket`] - Ticket counter state, its text encoding, and ticket codes
//! - [`record`] - Client identity and the persisted operation record
//! - [`message`] - Client message, ticket line and executive summary
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cambista_core::quote::{compute, MarketInputs};
//! use cambista_core::format::to_display;
//!
//! let inputs = MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0);
//! let quote = compute(&inputs).unwrap();
//!
//! assert_eq!(to_display(quote.total_ars), "200.000");
//! assert_eq!(to_display(quote.total_ars_profit), "1.800");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod message;
pub mod quote;
pub mod record;
pub mod ticket;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{Canonical, DisplayLocale, ARGENTINE_LOCALE};
pub use quote::{compute, MarketInputs, QuoteResult};
pub use record::{ClientIdentity, OperationRecord};
pub use ticket::{TicketCode, TicketCounter};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency being bought in every operation this system records.
pub const CURRENCY_TAG: &str = "BRL";

/// Operation type tag written into every record and file name.
pub const OPERATION_TAG: &str = "COMPRA";

/// Default prefix for ticket codes (`TC010001`).
pub const DEFAULT_TICKET_PREFIX: &str = "TC";
