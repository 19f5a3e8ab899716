//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront API sends every monetary amount as a decimal string
//! (`"1234.50"`). Amounts are kept as [`Decimal`] end to end; floats never
//! touch money.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The amount is negative.
    #[error("amount cannot be negative")]
    Negative,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a decimal string as sent by the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is negative.
    pub fn parse(amount: &str, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self::new(amount, currency_code))
    }

    /// Format for display using the currency's locale conventions.
    ///
    /// ARS follows es-AR: `$ 1.234,50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{rounded:.2}");
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let (group_sep, decimal_sep) = self.currency_code.separators();
        let grouped = group_thousands(whole, group_sep);

        format!(
            "{} {grouped}{decimal_sep}{frac}",
            self.currency_code.symbol()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ARS,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ARS | Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Thousands and decimal separators.
    const fn separators(self) -> (char, char) {
        match self {
            Self::ARS | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }
}

fn group_thousands(whole: &str, sep: char) -> String {
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |rest| ("-", rest));

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

/// Anything with a regular price and an optional sale price.
///
/// Implemented by catalog products and cart line products so the same
/// pricing rules apply everywhere.
pub trait PricedItem {
    /// List price.
    fn regular_price(&self) -> Decimal;

    /// Discounted price, if the item has one.
    fn sale_price(&self) -> Option<Decimal>;

    /// Whether the sale price is set and strictly below the regular price.
    fn is_on_sale(&self) -> bool {
        self.sale_price()
            .is_some_and(|sale| sale < self.regular_price())
    }

    /// The price the customer pays.
    fn effective_price(&self) -> Decimal {
        match self.sale_price() {
            Some(sale) if sale > Decimal::ZERO && sale < self.regular_price() => sale,
            _ => self.regular_price(),
        }
    }

    /// Discount as a whole percentage, rounded to the nearest integer.
    fn discount_percentage(&self) -> u32 {
        let regular = self.regular_price();
        match self.sale_price() {
            Some(sale) if self.is_on_sale() && !regular.is_zero() => {
                let pct = ((regular - sale) / regular * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                pct.to_u32().unwrap_or(0)
            }
            _ => 0,
        }
    }
}
