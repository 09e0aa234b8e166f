//! # Native Currency Amounts
//!
//! [`Ether`] stores an amount in base units (wei, 18 decimals) so that decoding a
//! ledger value is exact: `decoded == raw / 10^18`. Rounding happens only when an
//! amount is rendered with [`Ether::display_rounded`].

use alloy_primitives::utils::{format_ether, parse_ether, UnitsError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact native-currency amount held in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ether(U256);

impl Ether {
    /// Decimal places between the base unit and one whole coin.
    pub const DECIMALS: u8 = 18;

    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub const fn wei(&self) -> U256 {
        self.0
    }

    /// Parse a decimal ether string such as `"0.5"` into base units.
    pub fn parse(ether: &str) -> Result<Self, UnitsError> {
        parse_ether(ether.trim()).map(Self)
    }

    /// Parse a decimal base-unit string such as `"500000000000000000"`.
    pub fn from_wei_str(wei: &str) -> Option<Self> {
        U256::from_str_radix(wei.trim(), 10).ok().map(Self)
    }

    /// Lossy conversion for arithmetic in display code (price conversion, charts).
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }

    /// Render with a fixed number of decimals. The only place rounding happens.
    pub fn display_rounded(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self.to_f64())
    }
}

impl From<U256> for Ether {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl FromStr for Ether {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Exact decimal form with trailing zeros removed (`1.500000` → `1.5`, `2.000` → `2`).
impl fmt::Display for Ether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = format_ether(self.0);
        let trimmed = match full.split_once('.') {
            Some((whole, frac)) => {
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() {
                    whole.to_string()
                } else {
                    format!("{whole}.{frac}")
                }
            }
            None => full,
        };
        f.write_str(&trimmed)
    }
}
