// Asset identifiers and amount arithmetic
// Assets are 20-byte identifiers; the all-zero identifier denotes the native asset.
// Amounts are u128 with checked arithmetic and 256-bit intermediates for mul/div.
//
// Numan Thabit 2025 Nov

use crate::errors::{AggrError, Result};
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type Amount = u128;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asset([u8; 20]);

impl Asset {
    pub const NATIVE: Asset = Asset([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Asset {
    type Err = AggrError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AggrError::InvalidArgument(format!("asset {s:?} must start with 0x")))?;
        if digits.len() != 40 {
            return Err(AggrError::InvalidArgument(format!(
                "asset {s:?} must have 40 hex digits"
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AggrError::InvalidArgument(format!("asset {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "Asset(native)")
        } else {
            write!(f, "Asset({self})")
        }
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Asset::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// `a * b / c` with a 256-bit intermediate product
pub fn mul_div(a: Amount, b: Amount, c: Amount) -> Result<Amount> {
    if c == 0 {
        return Err(AggrError::ArithmeticOverflow("mul_div: zero divisor"));
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(c);
    narrow(wide)
}

/// `a * b / c` rounded up
pub fn mul_div_up(a: Amount, b: Amount, c: Amount) -> Result<Amount> {
    if c == 0 {
        return Err(AggrError::ArithmeticOverflow("mul_div_up: zero divisor"));
    }
    let c = U256::from(c);
    let product = U256::from(a) * U256::from(b);
    let mut wide = product / c;
    if !(product % c).is_zero() {
        wide += U256::one();
    }
    narrow(wide)
}

pub(crate) fn narrow(value: U256) -> Result<Amount> {
    if value > U256::from(u128::MAX) {
        return Err(AggrError::ArithmeticOverflow("u256 -> u128 narrowing"));
    }
    Ok(value.as_u128())
}

pub fn checked_sum<I: IntoIterator<Item = Amount>>(values: I) -> Result<Amount> {
    values.into_iter().try_fold(0u128, |acc, v| {
        acc.checked_add(v)
            .ok_or(AggrError::ArithmeticOverflow("amount sum"))
    })
}

/// Serde helpers: amounts travel as decimal strings, small integers are accepted too
pub mod amount_str {
    use super::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Int(u64),
    }

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(v as Amount),
            Repr::Text(s) => s
                .trim()
                .replace('_', "")
                .parse::<Amount>()
                .map_err(|e| serde::de::Error::custom(format!("invalid amount {s:?}: {e}"))),
        }
    }
}
