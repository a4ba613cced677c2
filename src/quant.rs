// Quantization module for trade discretization
// This file splits an input amount into equal-sized parts and maps
// allocated part counts back to executable input amounts
//
// Numan Thabit 2025 Nov

use crate::asset::Amount;
use crate::errors::{AggrError, Result};

/// Upper bound on the quoting granularity.
pub const MAX_PARTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discretization {
    pub total: Amount,
    pub parts: u32,
    /// Input amount priced per part (`total / parts`).
    pub unit: Amount,
    /// `total % parts`; never priced, absorbed at execution.
    pub remainder: Amount,
}

pub fn to_parts(total: Amount, parts: u32) -> Result<Discretization> {
    if parts == 0 {
        return Err(AggrError::InvalidArgument(
            "cannot discretize into zero parts".to_string(),
        ));
    }
    let p = Amount::from(parts);
    Ok(Discretization {
        total,
        parts,
        unit: total / p,
        remainder: total % p,
    })
}

pub fn from_parts(units: u32, unit: Amount) -> Result<Amount> {
    unit.checked_mul(Amount::from(units))
        .ok_or(AggrError::ArithmeticOverflow("from_parts"))
}

impl Discretization {
    /// Input amount priced for `units` parts.
    pub fn amount_for(&self, units: u32) -> Result<Amount> {
        from_parts(units, self.unit)
    }

    /// Executable input per venue for a distribution.
    ///
    /// Parts are handed out in venue-index order, so the highest-indexed venue
    /// with a non-zero allocation receives the final part and absorbs the
    /// remainder. The returned amounts sum to `total`.
    pub fn split(&self, distribution: &[u32]) -> Result<Vec<Amount>> {
        let allocated: u64 = distribution.iter().map(|&d| u64::from(d)).sum();
        if allocated != u64::from(self.parts) {
            return Err(AggrError::InvalidArgument(format!(
                "distribution allocates {allocated} parts, expected {}",
                self.parts
            )));
        }

        let mut amounts = distribution
            .iter()
            .map(|&d| self.amount_for(d))
            .collect::<Result<Vec<_>>>()?;

        if let Some(last) = distribution.iter().rposition(|&d| d > 0) {
            amounts[last] = amounts[last]
                .checked_add(self.remainder)
                .ok_or(AggrError::ArithmeticOverflow("remainder absorption"))?;
        }
        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split_has_no_remainder() {
        let d = to_parts(20_000, 10).unwrap();
        assert_eq!(d.unit, 2_000);
        assert_eq!(d.remainder, 0);
        assert_eq!(d.amount_for(3).unwrap(), 6_000);
    }

    #[test]
    fn zero_parts_is_rejected() {
        assert!(matches!(to_parts(10, 0), Err(AggrError::InvalidArgument(_))));
    }

    #[test]
    fn remainder_goes_to_last_allocated_venue() {
        let d = to_parts(1_003, 10).unwrap();
        assert_eq!(d.unit, 100);
        assert_eq!(d.remainder, 3);

        let amounts = d.split(&[4, 6, 0]).unwrap();
        assert_eq!(amounts, vec![400, 603, 0]);
        assert_eq!(amounts.iter().sum::<u128>(), 1_003);

        let amounts = d.split(&[0, 0, 10]).unwrap();
        assert_eq!(amounts, vec![0, 0, 1_003]);
    }

    #[test]
    fn remainder_when_unit_is_zero() {
        // fewer input units than parts: everything is remainder
        let d = to_parts(7, 10).unwrap();
        assert_eq!(d.unit, 0);
        assert_eq!(d.split(&[3, 7]).unwrap(), vec![0, 7]);
    }

    #[test]
    fn split_rejects_wrong_total() {
        let d = to_parts(100, 10).unwrap();
        assert!(d.split(&[3, 3]).is_err());
    }

    #[test]
    fn from_parts_is_checked() {
        assert!(matches!(
            from_parts(2, u128::MAX),
            Err(AggrError::ArithmeticOverflow(_))
        ));
    }
}
