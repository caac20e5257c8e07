//! # Quote Module
//!
//! Turns five market inputs into the seven quantities of a BRL purchase.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     BRL → USD → ARS cross                               │
//! │                                                                         │
//! │  brl_amount ÷ brl_usd_rate ─────────────► usd_amount           (1)     │
//! │  usd_amount × usd_ars_rate ─────────────► total_ars            (2)     │
//! │  total_ars ÷ brl_amount ────────────────► effective_brl_ars    (3)     │
//! │                                                                         │
//! │  usd_amount × profit_per_usd_in_brl ────► total_brl_profit     (4)     │
//! │  usd_amount × profit_per_usd_in_ars ────► ars_profit_usd_leg   (5)     │
//! │  total_brl_profit × effective_brl_ars ──► ars_profit_brl_leg   (6)     │
//! │  (5) + (6) ─────────────────────────────► total_ars_profit     (7)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each step depends only on the ones before it. The arithmetic is plain
//! `f64`; rounding happens only when a value is formatted.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Market Inputs
// =============================================================================

/// The operator's inputs for one quote. Immutable once read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// BRL per USD.
    pub brl_usd_rate: f64,
    /// ARS per USD.
    pub usd_ars_rate: f64,
    /// BRL the client wants to buy.
    pub brl_amount: f64,
    /// Profit per USD of the cross, in BRL.
    pub profit_per_usd_in_brl: f64,
    /// Profit per USD of the cross, in ARS.
    pub profit_per_usd_in_ars: f64,
}

impl MarketInputs {
    /// Creates inputs in the order the operator enters them.
    pub const fn new(
        brl_usd_rate: f64,
        usd_ars_rate: f64,
        brl_amount: f64,
        profit_per_usd_in_brl: f64,
        profit_per_usd_in_ars: f64,
    ) -> Self {
        MarketInputs {
            brl_usd_rate,
            usd_ars_rate,
            brl_amount,
            profit_per_usd_in_brl,
            profit_per_usd_in_ars,
        }
    }

    fn check_finite(&self) -> CoreResult<()> {
        let fields = [
            ("brl_usd_rate", self.brl_usd_rate),
            ("usd_ars_rate", self.usd_ars_rate),
            ("brl_amount", self.brl_amount),
            ("profit_per_usd_in_brl", self.profit_per_usd_in_brl),
            ("profit_per_usd_in_ars", self.profit_per_usd_in_ars),
        ];
        ensure_finite(&fields)
    }
}

// =============================================================================
// Quote Result
// =============================================================================

/// All quantities derived from one set of [`MarketInputs`].
///
/// `total_ars_profit` is built as `ars_profit_from_usd_leg +
/// ars_profit_from_brl_leg` and is never re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub usd_amount: f64,
    pub total_ars: f64,
    pub effective_brl_ars_rate: f64,
    pub total_brl_profit: f64,
    pub ars_profit_from_usd_leg: f64,
    pub ars_profit_from_brl_leg: f64,
    pub total_ars_profit: f64,
}

impl QuoteResult {
    fn check_finite(&self) -> CoreResult<()> {
        let fields = [
            ("usd_amount", self.usd_amount),
            ("total_ars", self.total_ars),
            ("effective_brl_ars_rate", self.effective_brl_ars_rate),
            ("total_brl_profit", self.total_brl_profit),
            ("ars_profit_from_usd_leg", self.ars_profit_from_usd_leg),
            ("ars_profit_from_brl_leg", self.ars_profit_from_brl_leg),
            ("total_ars_profit", self.total_ars_profit),
        ];
        ensure_finite(&fields)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Runs the seven-step quote pipeline.
///
/// ## Errors
/// - [`CoreError::DivisionByZero`] when `brl_usd_rate` or `brl_amount` is zero
/// - [`CoreError::NonFiniteValue`] when an input is NaN/infinite, or the
///   arithmetic overflows
///
/// ## Example
/// ```rust
/// use cambista_core::quote::{compute, MarketInputs};
///
/// let quote = compute(&MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0)).unwrap();
/// assert_eq!(quote.usd_amount, 200.0);
/// assert_eq!(quote.total_ars_profit, 1800.0);
/// ```
pub fn compute(inputs: &MarketInputs) -> CoreResult<QuoteResult> {
    inputs.check_finite()?;

    if inputs.brl_usd_rate == 0.0 {
        return Err(CoreError::DivisionByZero {
            field: "brl_usd_rate",
        });
    }
    if inputs.brl_amount == 0.0 {
        return Err(CoreError::DivisionByZero {
            field: "brl_amount",
        });
    }

    let usd_amount = inputs.brl_amount / inputs.brl_usd_rate;
    let total_ars = usd_amount * inputs.usd_ars_rate;
    let effective_brl_ars_rate = total_ars / inputs.brl_amount;

    let total_brl_profit = usd_amount * inputs.profit_per_usd_in_brl;
    let ars_profit_from_usd_leg = usd_amount * inputs.profit_per_usd_in_ars;
    let ars_profit_from_brl_leg = total_brl_profit * effective_brl_ars_rate;
    let total_ars_profit = ars_profit_from_usd_leg + ars_profit_from_brl_leg;

    let result = QuoteResult {
        usd_amount,
        total_ars,
        effective_brl_ars_rate,
        total_brl_profit,
        ars_profit_from_usd_leg,
        ars_profit_from_brl_leg,
        total_ars_profit,
    };
    result.check_finite()?;

    Ok(result)
}

fn ensure_finite(fields: &[(&'static str, f64)]) -> CoreResult<()> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, _)) => Err(CoreError::NonFiniteValue { field }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarketInputs {
        MarketInputs::new(5.0, 1000.0, 1000.0, 0.02, 5.0)
    }

    #[test]
    fn test_reference_scenario() {
        let quote = compute(&sample()).unwrap();

        assert_eq!(quote.usd_amount, 200.0);
        assert_eq!(quote.total_ars, 200_000.0);
        assert_eq!(quote.effective_brl_ars_rate, 200.0);
        assert_eq!(quote.total_brl_profit, 4.0);
        assert_eq!(quote.ars_profit_from_usd_leg, 1000.0);
        assert_eq!(quote.ars_profit_from_brl_leg, 800.0);
        assert_eq!(quote.total_ars_profit, 1800.0);
    }

    #[test]
    fn test_zero_rate_is_division_by_zero() {
        let mut inputs = sample();
        inputs.brl_usd_rate = 0.0;

        let err = compute(&inputs).unwrap_err();
        assert_eq!(
            err,
            CoreError::DivisionByZero {
                field: "brl_usd_rate"
            }
        );
    }

    #[test]
    fn test_zero_amount_is_division_by_zero() {
        let mut inputs = sample();
        inputs.brl_amount = 0.0;

        let err = compute(&inputs).unwrap_err();
        assert_eq!(
            err,
            CoreError::DivisionByZero {
                field: "brl_amount"
            }
        );
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut inputs = sample();
        inputs.usd_ars_rate = f64::NAN;

        let err = compute(&inputs).unwrap_err();
        assert_eq!(
            err,
            CoreError::NonFiniteValue {
                field: "usd_ars_rate"
            }
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let inputs = MarketInputs::new(1e-300, 1e300, 1e10, 0.0, 0.0);

        let err = compute(&inputs).unwrap_err();
        assert!(matches!(err, CoreError::NonFiniteValue { .. }));
    }

    #[test]
    fn test_zero_profits() {
        let quote = compute(&MarketInputs::new(5.5, 1200.0, 2500.0, 0.0, 0.0)).unwrap();

        assert_eq!(quote.total_brl_profit, 0.0);
        assert_eq!(quote.total_ars_profit, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]
        #[test]
        fn test_total_profit_is_sum_of_legs(
            brl_usd_rate in 0.01..100.0f64,
            usd_ars_rate in 0.01..10_000.0f64,
            brl_amount in 0.01..10_000_000.0f64,
            profit_brl in 0.0..10.0f64,
            profit_ars in 0.0..1_000.0f64,
        ) {
            let inputs = MarketInputs::new(
                brl_usd_rate, usd_ars_rate, brl_amount, profit_brl, profit_ars,
            );
            let quote = compute(&inputs).unwrap();

            prop_assert_eq!(
                quote.total_ars_profit,
                quote.ars_profit_from_usd_leg + quote.ars_profit_from_brl_leg
            );
        }

        #[test]
        fn test_compute_is_deterministic(
            brl_usd_rate in 0.01..100.0f64,
            usd_ars_rate in 0.01..10_000.0f64,
            brl_amount in 0.01..10_000_000.0f64,
            profit_brl in 0.0..10.0f64,
            profit_ars in 0.0..1_000.0f64,
        ) {
            let inputs = MarketInputs::new(
                brl_usd_rate, usd_ars_rate, brl_amount, profit_brl, profit_ars,
            );
            let first = compute(&inputs).unwrap();
            let second = compute(&inputs).unwrap();

            prop_assert_eq!(first.usd_amount.to_bits(), second.usd_amount.to_bits());
            prop_assert_eq!(first.total_ars.to_bits(), second.total_ars.to_bits());
            prop_assert_eq!(
                first.total_ars_profit.to_bits(),
                second.total_ars_profit.to_bits()
            );
            prop_assert_eq!(first, second);
        }
    }
}
