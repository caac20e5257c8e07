//! # Error Types
//!
//! Domain-specific error types for cambista-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cambista-core errors (this file)                                      │
//! │  ├── CoreError        - Quote and ticket domain failures               │
//! │  └── ValidationError  - Client identity input failures                 │
//! │                                                                         │
//! │  cambista-store errors (separate crate)                                │
//! │  └── StoreError       - Counter / archive file failures                │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees, plus an exit code      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError → Operator  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these are retried. Each one aborts the current quote or ticket
/// issuance and is surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A quote input used as a divisor is zero.
    ///
    /// ## When This Occurs
    /// - `brl_usd_rate == 0` (step 1 of the pipeline)
    /// - `brl_amount == 0` (step 3 of the pipeline)
    ///
    /// The operator must re-enter the inputs; no partial quote exists.
    #[error("Division by zero: {field} must not be zero")]
    DivisionByZero { field: &'static str },

    /// An input or derived value is NaN or infinite.
    ///
    /// Guards the persisted record against `Infinity`/`NaN` values.
    #[error("{field} is not a finite number")]
    NonFiniteValue { field: &'static str },

    /// The durable ticket counter record cannot be parsed.
    ///
    /// ## When This Occurs
    /// - Non-numeric fields (`"ab,cd"`)
    /// - Wrong field count (`"01"`, `"01,0000,7"`)
    /// - Wrong field width (`"1,0000"`)
    ///
    /// Never auto-healed: resetting the counter would reissue old codes.
    #[error("Corrupt ticket counter state {record:?}: {reason}")]
    CorruptCounterState { record: String, reason: String },

    /// The two-digit series is used up (`99,9999` cannot advance).
    #[error("Ticket series exhausted at {series:02},{sequence:04}")]
    SeriesExhausted { series: u32, sequence: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a CorruptCounterState error for the given raw record.
    pub fn corrupt(record: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::CorruptCounterState {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for the client identity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. a path separator inside a name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DivisionByZero {
            field: "brl_usd_rate",
        };
        assert_eq!(
            err.to_string(),
            "Division by zero: brl_usd_rate must not be zero"
        );

        let err = CoreError::SeriesExhausted {
            series: 99,
            sequence: 9999,
        };
        assert_eq!(err.to_string(), "Ticket series exhausted at 99,9999");
    }

    #[test]
    fn test_corrupt_message_quotes_record() {
        let err = CoreError::corrupt("ab,cd", "series is not numeric");
        assert_eq!(
            err.to_string(),
            "Corrupt ticket counter state \"ab,cd\": series is not numeric"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "last_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
