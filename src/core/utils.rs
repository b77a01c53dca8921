use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::core::constants::COIN_DECIMALS;
use crate::core::error::AssetError;

/// Largest scale a `Decimal` can carry exactly.
pub const MAX_DECIMALS: u8 = 28;

/// Case-insensitive address comparison.
#[inline]
pub fn addresses_equal(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

pub fn parse_pubkey(address: &str) -> Result<Pubkey, AssetError> {
    Pubkey::from_str(address).map_err(|err| AssetError::invalid_address(format!("{address}: {err}")))
}

/// `10^decimals` as a `Decimal`, or `None` past the representable range.
pub fn pow10(decimals: u8) -> Option<Decimal> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    Decimal::try_from_i128_with_scale(10i128.pow(decimals as u32), 0).ok()
}

/// Fixed-point amount with the precision declared by its asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    value: Decimal,
    decimals: u8,
}

impl Amount {
    /// Rounds `value` half away from zero to `decimals` places.
    pub fn new(value: Decimal, decimals: u8) -> Self {
        Self {
            value: value.round_dp_with_strategy(
                decimals.min(MAX_DECIMALS) as u32,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            decimals,
        }
    }

    pub fn zero(decimals: u8) -> Self {
        Self {
            value: Decimal::ZERO,
            decimals,
        }
    }

    /// Exact conversion of an integer base-unit quantity.
    pub fn from_base_units(raw: u64, decimals: u8) -> Option<Self> {
        if decimals > MAX_DECIMALS {
            return None;
        }
        let value = Decimal::try_from_i128_with_scale(raw as i128, decimals as u32).ok()?;
        Some(Self { value, decimals })
    }

    /// Same as [`Amount::from_base_units`] for the decimal string nodes report.
    pub fn from_base_units_str(raw: &str, decimals: u8) -> Option<Self> {
        let raw = raw.trim().parse::<u64>().ok()?;
        Self::from_base_units(raw, decimals)
    }

    /// `round(value * 10^decimals)`; negative or oversized values are rejected.
    pub fn to_base_units(&self) -> Result<u64, AssetError> {
        let scale = pow10(self.decimals).ok_or(AssetError::InvalidAmount)?;
        self.value
            .checked_mul(scale)
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|scaled| scaled.to_u64())
            .ok_or(AssetError::InvalidAmount)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(0.0)
    }

    /// Equality against a caller value, compared at this amount's precision.
    pub fn matches(&self, expected: Decimal) -> bool {
        Self::new(expected, self.decimals).value == self.value
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.normalize())
    }
}

/// Native-unit quantity to lamports.
pub fn to_lamports(amount: Decimal) -> Result<u64, AssetError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AssetError::InvalidAmount);
    }
    Amount::new(amount, COIN_DECIMALS).to_base_units()
}

pub fn from_lamports(lamports: u64) -> Amount {
    Amount::from_base_units(lamports, COIN_DECIMALS).unwrap_or(Amount::zero(COIN_DECIMALS))
}
