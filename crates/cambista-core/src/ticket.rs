//! # Ticket Codes
//!
//! Counter arithmetic and the on-disk encoding of the ticket counter.
//! Reading and writing the counter file lives in `cambista-store`; this
//! module only knows what a valid record looks like and what comes next.
//!
//! ## Counter Record Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "01,0042"                                                              │
//! │   ││ ││││                                                               │
//! │   ││ └┴┴┴── sequence: exactly 4 digits, 0000-9999                      │
//! │   └┴─────── series:   exactly 2 digits, 00-99                          │
//! │                                                                         │
//! │  One line, one comma, nothing else (a trailing newline is tolerated).  │
//! │  Anything else is CorruptCounterState - never reset to zero.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Advancing
//! ```text
//! 01,0041 ──► 01,0042        sequence + 1
//! 01,9999 ──► 02,0000        sequence overflow rolls the series
//! 99,9999 ──► SeriesExhausted (nothing is written)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Highest sequence value before the series rolls.
pub const MAX_SEQUENCE: u32 = 9_999;

/// Highest series value a two-digit field can hold.
pub const MAX_SERIES: u32 = 99;

/// Record written when no counter exists yet ("no ticket issued").
pub const BOOTSTRAP_RECORD: &str = "01,0000";

const SERIES_WIDTH: usize = 2;
const SEQUENCE_WIDTH: usize = 4;

// =============================================================================
// Ticket Counter
// =============================================================================

/// The last issued `(series, sequence)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketCounter {
    series: u32,
    sequence: u32,
}

impl TicketCounter {
    /// Creates a counter, rejecting values the record format cannot hold.
    pub fn new(series: u32, sequence: u32) -> CoreResult<Self> {
        if series > MAX_SERIES || sequence > MAX_SEQUENCE {
            return Err(CoreError::corrupt(
                format!("{},{}", series, sequence),
                "value out of range",
            ));
        }
        Ok(TicketCounter { series, sequence })
    }

    /// The counter before any ticket was issued: `01,0000`.
    pub const fn bootstrap() -> Self {
        TicketCounter {
            series: 1,
            sequence: 0,
        }
    }

    #[inline]
    pub const fn series(&self) -> u32 {
        self.series
    }

    #[inline]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Total order across series: `series * 10000 + sequence`.
    #[inline]
    pub const fn sort_key(&self) -> u32 {
        self.series * (MAX_SEQUENCE + 1) + self.sequence
    }

    /// Parses a counter record.
    ///
    /// ## Example
    /// ```rust
    /// use cambista_core::ticket::TicketCounter;
    ///
    /// let counter = TicketCounter::parse("01,0042\n").unwrap();
    /// assert_eq!(counter.sequence(), 42);
    /// assert!(TicketCounter::parse("ab,cd").is_err());
    /// ```
    pub fn parse(record: &str) -> CoreResult<Self> {
        let line = record.trim_end_matches(['\n', '\r']);

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(CoreError::corrupt(
                record,
                format!("expected 2 fields, found {}", fields.len()),
            ));
        }

        let series = parse_field(record, "series", fields[0], SERIES_WIDTH)?;
        let sequence = parse_field(record, "sequence", fields[1], SEQUENCE_WIDTH)?;

        Ok(TicketCounter { series, sequence })
    }

    /// Encodes the counter as a record line (without newline).
    pub fn encode(&self) -> String {
        format!("{:02},{:04}", self.series, self.sequence)
    }

    /// Returns the counter after issuing one more ticket.
    ///
    /// ## Errors
    /// [`CoreError::SeriesExhausted`] when the series would pass 99. The
    /// field is two digits wide; widening or wrapping to `00` would both
    /// break the code format or reissue codes.
    pub fn advance(&self) -> CoreResult<Self> {
        if self.sequence < MAX_SEQUENCE {
            return Ok(TicketCounter {
                series: self.series,
                sequence: self.sequence + 1,
            });
        }

        if self.series >= MAX_SERIES {
            return Err(CoreError::SeriesExhausted {
                series: self.series,
                sequence: self.sequence,
            });
        }

        Ok(TicketCounter {
            series: self.series + 1,
            sequence: 0,
        })
    }
}

impl Default for TicketCounter {
    fn default() -> Self {
        TicketCounter::bootstrap()
    }
}

fn parse_field(record: &str, name: &str, field: &str, width: usize) -> CoreResult<u32> {
    if !field.bytes().all(|b| b.is_ascii_digit()) || field.is_empty() {
        return Err(CoreError::corrupt(
            record,
            format!("{} is not numeric", name),
        ));
    }
    if field.len() != width {
        return Err(CoreError::corrupt(
            record,
            format!("{} must be {} digits", name, width),
        ));
    }
    field
        .parse()
        .map_err(|_| CoreError::corrupt(record, format!("{} is not numeric", name)))
}

// =============================================================================
// Ticket Code
// =============================================================================

/// An issued ticket: prefix plus counter, rendered `TC010001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketCode {
    prefix: String,
    counter: TicketCounter,
}

impl TicketCode {
    pub fn new(prefix: impl Into<String>, counter: TicketCounter) -> Self {
        TicketCode {
            prefix: prefix.into(),
            counter,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn counter(&self) -> TicketCounter {
        self.counter
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}{:04}",
            self.prefix, self.counter.series, self.counter.sequence
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_parses_with_same_parser() {
        assert_eq!(
            TicketCounter::parse(BOOTSTRAP_RECORD).unwrap(),
            TicketCounter::bootstrap()
        );
    }

    #[test]
    fn test_parse_and_encode() {
        let counter = TicketCounter::parse("03,0420").unwrap();
        assert_eq!(counter.series(), 3);
        assert_eq!(counter.sequence(), 420);
        assert_eq!(counter.encode(), "03,0420");
    }

    #[test]
    fn test_parse_tolerates_trailing_newline() {
        assert_eq!(
            TicketCounter::parse("01,0007\r\n").unwrap(),
            TicketCounter::new(1, 7).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed_records() {
        for record in [
            "ab,cd", "", "01", "01,0000,1", "1,0000", "01,000", "01,00000", " 01,0000",
            "01;0000", "-1,0000", "+1,0000", "01,00a0",
        ] {
            let err = TicketCounter::parse(record).unwrap_err();
            assert!(
                matches!(err, CoreError::CorruptCounterState { .. }),
                "{record:?} should be corrupt"
            );
        }
    }

    #[test]
    fn test_advance_increments_sequence() {
        let next = TicketCounter::bootstrap().advance().unwrap();
        assert_eq!(next, TicketCounter::new(1, 1).unwrap());
    }

    #[test]
    fn test_advance_rolls_series() {
        let last = TicketCounter::new(1, 9999).unwrap();
        let next = last.advance().unwrap();
        assert_eq!(next, TicketCounter::new(2, 0).unwrap());
        assert_eq!(TicketCode::new("TC", next).to_string(), "TC020000");
    }

    #[test]
    fn test_advance_refuses_series_overflow() {
        let last = TicketCounter::new(99, 9999).unwrap();
        assert_eq!(
            last.advance().unwrap_err(),
            CoreError::SeriesExhausted {
                series: 99,
                sequence: 9999
            }
        );
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(TicketCounter::new(100, 0).is_err());
        assert!(TicketCounter::new(1, 10_000).is_err());
    }

    #[test]
    fn test_sort_key_orders_across_series() {
        let a = TicketCounter::new(1, 9999).unwrap();
        let b = TicketCounter::new(2, 0).unwrap();
        assert!(a.sort_key() < b.sort_key());
        assert_eq!(b.sort_key(), 20_000);
    }

    #[test]
    fn test_code_display() {
        let code = TicketCode::new("TC", TicketCounter::new(1, 1).unwrap());
        assert_eq!(code.to_string(), "TC010001");
        assert_eq!(code.prefix(), "TC");
    }
}
