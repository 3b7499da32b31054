//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many split-bill systems:                                            │
//! │    ₹10.00 / 3 = ₹3.33 (×3 = ₹9.99)  → Lost ₹0.01!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    1000 paise / 3 = [334, 333, 333]                                    │
//! │    distribute() hands the leftover paisa out explicitly, so the        │
//! │    shares ALWAYS sum back to the total                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use divvy_core::money::{Currency, Money};
//!
//! // Create from minor units (preferred)
//! let total = Money::from_minor(900, Currency::Inr); // ₹9.00
//!
//! // Split exactly three ways
//! let shares = total.distribute(&[1, 1, 1]).unwrap();
//! assert_eq!(shares.iter().map(Money::minor_units).sum::<i64>(), 900);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(9.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Currency
// =============================================================================

/// The currencies the app offers in its currency picker.
///
/// ## Why a Closed Enum?
/// Every monetary value carries its currency, and two values may only be
/// combined when the currencies match. A closed enum keeps that check a
/// simple equality test and keeps `Money` a `Copy` type.
///
/// Conversion rates are a presentation/service concern and deliberately do
/// not live in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee (the app default).
    Inr,
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
    /// British Pound.
    Gbp,
}

impl Currency {
    /// ISO 4217 currency code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Display symbol (for debugging output only; the frontend owns
    /// locale-aware formatting).
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    /// Parses an ISO 4217 code.
    pub fn from_code(code: &str) -> Option<Currency> {
        match code {
            "INR" => Some(Currency::Inr),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            _ => None,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Inr
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR, cents for
/// USD), tagged with its currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: Net balances go negative when a participant owes
/// - **Currency tag**: Cross-currency arithmetic is a typed error, never a
///   silent merge
/// - **Copy**: Two machine words, cheap to pass around
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Expense total ──► SplitPolicy.compute ──► AllocationLine shares        │
/// │                              │                                          │
/// │  Ledger fold ──► net balances ──► SuggestedPayment amounts              │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    minor_units: i64,
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units (paise, cents, pence).
    ///
    /// ## Example
    /// ```rust
    /// use divvy_core::money::{Currency, Money};
    ///
    /// let price = Money::from_minor(1099, Currency::Usd); // $10.99
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Money {
            minor_units,
            currency,
        }
    }

    /// Zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money {
            minor_units: 0,
            currency,
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Returns the currency tag.
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Major unit portion (rupees, dollars).
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.minor_units / 100
    }

    /// Minor unit portion, always 0-99.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.minor_units % 100).abs()
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Absolute value, same currency.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money {
            minor_units: self.minor_units.abs(),
            currency: self.currency,
        }
    }

    /// Flips the sign, same currency.
    #[inline]
    pub const fn negate(&self) -> Self {
        Money {
            minor_units: -self.minor_units,
            currency: self.currency,
        }
    }

    /// Verifies the other value has the same currency.
    ///
    /// All combining operations call this first; mixed-currency arithmetic
    /// must surface as a typed error, never a silent merge of units.
    fn require_same_currency(&self, other: &Money) -> CoreResult<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CoreError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            })
        }
    }

    /// Adds two values of the same currency.
    ///
    /// ## Errors
    /// - `CurrencyMismatch` if the currencies differ
    /// - `AmountOverflow` if the sum leaves the i64 range
    pub fn checked_add(&self, other: Money) -> CoreResult<Money> {
        self.require_same_currency(&other)?;
        let minor_units = self
            .minor_units
            .checked_add(other.minor_units)
            .ok_or(CoreError::AmountOverflow)?;
        Ok(Money {
            minor_units,
            currency: self.currency,
        })
    }

    /// Subtracts two values of the same currency.
    ///
    /// ## Errors
    /// - `CurrencyMismatch` if the currencies differ
    /// - `AmountOverflow` if the difference leaves the i64 range
    pub fn checked_sub(&self, other: Money) -> CoreResult<Money> {
        self.require_same_currency(&other)?;
        let minor_units = self
            .minor_units
            .checked_sub(other.minor_units)
            .ok_or(CoreError::AmountOverflow)?;
        Ok(Money {
            minor_units,
            currency: self.currency,
        })
    }

    /// Compares two values of the same currency.
    ///
    /// `Money` deliberately does not implement `Ord`: ordering across
    /// currencies has no meaning, so comparison is a fallible operation.
    pub fn compare(&self, other: Money) -> CoreResult<Ordering> {
        self.require_same_currency(&other)?;
        Ok(self.minor_units.cmp(&other.minor_units))
    }

    /// Splits this amount into weighted shares that sum back exactly.
    ///
    /// ## Remainder Policy
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  STABLE LARGEST-REMAINDER DISTRIBUTION                              │
    /// │                                                                     │
    /// │  1000 paise, weights [1, 1, 1]:                                     │
    /// │    floor shares: [333, 333, 333]  (999, one paisa left over)        │
    /// │    leftover paisa goes to the EARLIEST-indexed weighted entry       │
    /// │    result:       [334, 333, 333]  (sums to 1000 exactly)            │
    /// │                                                                     │
    /// │  Deterministic: same inputs always produce the same shares, so     │
    /// │  every device that replays the ledger agrees on who owes the extra │
    /// │  minor unit.                                                        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Zero-weight entries stay in the output as explicit zero shares and
    /// never receive a remainder unit.
    ///
    /// ## Errors
    /// `InvalidWeights` if `weights` is empty or all zero.
    ///
    /// ## Example
    /// ```rust
    /// use divvy_core::money::{Currency, Money};
    ///
    /// let total = Money::from_minor(1000, Currency::Inr);
    /// let shares = total.distribute(&[1, 1, 1]).unwrap();
    /// assert_eq!(
    ///     shares.iter().map(Money::minor_units).collect::<Vec<_>>(),
    ///     vec![334, 333, 333]
    /// );
    /// ```
    pub fn distribute(&self, weights: &[u64]) -> CoreResult<Vec<Money>> {
        // i128 throughout: minor_units * weight can overflow i64
        let total_weight: i128 = weights.iter().map(|w| *w as i128).sum();
        if weights.is_empty() || total_weight == 0 {
            return Err(CoreError::InvalidWeights);
        }

        let total = self.minor_units as i128;
        let mut shares: Vec<i64> = weights
            .iter()
            .map(|w| ((total * *w as i128) / total_weight) as i64)
            .collect();

        // Hand the leftover out one minor unit at a time, earliest weighted
        // entry first. For negative totals the leftover is negative and the
        // same rule applies with -1 units.
        let mut leftover = self.minor_units - shares.iter().sum::<i64>();
        let step = leftover.signum();
        let mut idx = 0;
        while leftover != 0 {
            if weights[idx] > 0 {
                shares[idx] += step;
                leftover -= step;
            }
            idx = (idx + 1) % weights.len();
        }

        Ok(shares
            .into_iter()
            .map(|minor| Money::from_minor(minor, self.currency))
            .collect())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            self.currency.symbol(),
            self.major_part().abs(),
            self.minor_part()
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
    fn test_from_minor() {
        let money = Money::from_minor(1099, Currency::Usd);
        assert_eq!(money.minor_units(), 1099);
        assert_eq!(money.major_part(), 10);
        assert_eq!(money.minor_part(), 99);
        assert_eq!(money.currency(), Currency::Usd);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1099, Currency::Usd)), "$10.99");
        assert_eq!(format!("{}", Money::from_minor(500, Currency::Inr)), "₹5.00");
        assert_eq!(format!("{}", Money::from_minor(-550, Currency::Gbp)), "-£5.50");
        assert_eq!(format!("{}", Money::from_minor(0, Currency::Eur)), "€0.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_minor(1000, Currency::Inr);
        let b = Money::from_minor(500, Currency::Inr);

        assert_eq!(a.checked_add(b).unwrap().minor_units(), 1500);
        assert_eq!(a.checked_sub(b).unwrap().minor_units(), 500);
        assert_eq!(a.negate().minor_units(), -1000);
        assert_eq!(a.negate().abs().minor_units(), 1000);
    }

    #[test]
    fn test_arithmetic_overflow_is_an_error() {
        let max = Money::from_minor(i64::MAX, Currency::Inr);
        let min = Money::from_minor(i64::MIN, Currency::Inr);
        let one = Money::from_minor(1, Currency::Inr);

        assert!(matches!(
            max.checked_add(one).unwrap_err(),
            CoreError::AmountOverflow
        ));
        assert!(matches!(
            min.checked_sub(one).unwrap_err(),
            CoreError::AmountOverflow
        ));
        assert_eq!(max.checked_sub(one).unwrap().minor_units(), i64::MAX - 1);
    }

    #[test]
    fn test_cross_currency_arithmetic_fails() {
        let rupees = Money::from_minor(1000, Currency::Inr);
        let dollars = Money::from_minor(1000, Currency::Usd);

        let err = rupees.checked_add(dollars).unwrap_err();
        assert!(matches!(
            err,
            CoreError::CurrencyMismatch {
                expected: Currency::Inr,
                found: Currency::Usd,
            }
        ));
        assert!(rupees.checked_sub(dollars).is_err());
        assert!(rupees.compare(dollars).is_err());
    }

    #[test]
    fn test_compare_same_currency() {
        let a = Money::from_minor(100, Currency::Inr);
        let b = Money::from_minor(200, Currency::Inr);
        assert_eq!(a.compare(b).unwrap(), Ordering::Less);
        assert_eq!(b.compare(a).unwrap(), Ordering::Greater);
        assert_eq!(a.compare(a).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_distribute_even() {
        let total = Money::from_minor(900, Currency::Inr);
        let shares = total.distribute(&[1, 1, 1]).unwrap();
        let minor: Vec<i64> = shares.iter().map(Money::minor_units).collect();
        assert_eq!(minor, vec![300, 300, 300]);
    }

    #[test]
    fn test_distribute_remainder_goes_to_earliest() {
        let total = Money::from_minor(1000, Currency::Inr);
        let shares = total.distribute(&[1, 1, 1]).unwrap();
        let minor: Vec<i64> = shares.iter().map(Money::minor_units).collect();
        assert_eq!(minor, vec![334, 333, 333]);
        assert_eq!(minor.iter().sum::<i64>(), 1000);
    }

    #[test]
    fn test_distribute_weighted() {
        // 2:1:1 of 1000 = 500/250/250
        let total = Money::from_minor(1000, Currency::Inr);
        let shares = total.distribute(&[2, 1, 1]).unwrap();
        let minor: Vec<i64> = shares.iter().map(Money::minor_units).collect();
        assert_eq!(minor, vec![500, 250, 250]);
    }

    #[test]
    fn test_distribute_zero_weight_entry_stays_zero() {
        let total = Money::from_minor(1001, Currency::Inr);
        let shares = total.distribute(&[0, 1, 1]).unwrap();
        let minor: Vec<i64> = shares.iter().map(Money::minor_units).collect();
        // Excluded entry gets an explicit zero and never the leftover unit
        assert_eq!(minor[0], 0);
        assert_eq!(minor.iter().sum::<i64>(), 1001);
        assert_eq!(minor, vec![0, 501, 500]);
    }

    #[test]
    fn test_distribute_invalid_weights() {
        let total = Money::from_minor(1000, Currency::Inr);
        assert!(matches!(
            total.distribute(&[]),
            Err(CoreError::InvalidWeights)
        ));
        assert!(matches!(
            total.distribute(&[0, 0, 0]),
            Err(CoreError::InvalidWeights)
        ));
    }

    #[test]
    fn test_distribute_negative_total() {
        // Reversals distribute the same way in the other direction
        let total = Money::from_minor(-1000, Currency::Inr);
        let shares = total.distribute(&[1, 1, 1]).unwrap();
        let minor: Vec<i64> = shares.iter().map(Money::minor_units).collect();
        assert_eq!(minor.iter().sum::<i64>(), -1000);
        assert_eq!(minor, vec![-334, -333, -333]);
    }

    /// Property from the engine contract: for any participant count from
    /// 1 to 1000, an equal split sums back exactly to the total.
    #[test]
    fn test_distribute_always_sums_to_total() {
        let total = Money::from_minor(99_999, Currency::Inr);
        for n in 1..=1000usize {
            let weights = vec![1u64; n];
            let shares = total.distribute(&weights).unwrap();
            assert_eq!(
                shares.iter().map(Money::minor_units).sum::<i64>(),
                99_999,
                "equal split across {} participants lost minor units",
                n
            );
        }
    }
}
