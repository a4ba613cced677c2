// Venue adapter module
// This file defines the capability contract every liquidity venue implements
// and the ordered venue set the optimizer works against
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::quant::to_parts;

/// A disable mask has one bit per venue index.
pub const MAX_VENUES: usize = 64;

/// Capability contract for a single liquidity source.
///
/// `quote` and `cumulative_return` are pure reads of the venue state;
/// `swap` is the only mutating call. An unsupported pair is reported as
/// [`AggrError::VenueUnavailable`].
pub trait Venue: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    /// Output amount for swapping `amount` of `source` into `dest`.
    fn quote(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<Amount>;

    /// Output for `0..=parts` units of `total / parts` each.
    fn cumulative_return(
        &self,
        source: &Asset,
        dest: &Asset,
        parts: u32,
        total: Amount,
    ) -> Result<Vec<Amount>> {
        let disc = to_parts(total, parts)?;
        let mut table = Vec::with_capacity(parts as usize + 1);
        table.push(0);
        for units in 1..=parts {
            table.push(self.quote(source, dest, disc.amount_for(units)?)?);
        }
        Ok(table)
    }

    /// Execute the trade against the venue state.
    fn swap(
        &mut self,
        source: &Asset,
        dest: &Asset,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount>;

    fn clone_box(&self) -> Box<dyn Venue>;
}

impl Clone for Box<dyn Venue> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub(crate) fn ensure_min_return(out: Amount, min_return: Amount) -> Result<Amount> {
    if out < min_return {
        return Err(AggrError::SlippageExceeded {
            expected: min_return,
            actual: out,
        });
    }
    Ok(out)
}

/// Ordered venue set; a venue's position is its bit in the disable mask.
#[derive(Clone, Default)]
pub struct VenueSet {
    venues: Vec<Box<dyn Venue>>,
}

impl VenueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_venues(venues: Vec<Box<dyn Venue>>) -> Result<Self> {
        let mut set = Self::new();
        for venue in venues {
            set.push(venue)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, venue: Box<dyn Venue>) -> Result<usize> {
        if self.venues.len() >= MAX_VENUES {
            return Err(AggrError::InvalidArgument(format!(
                "venue set is limited to {MAX_VENUES} venues"
            )));
        }
        self.venues.push(venue);
        Ok(self.venues.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Venue> {
        self.venues.get(index).map(|v| v.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn Venue>> {
        self.venues.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Venue> {
        self.venues.iter().map(|v| v.as_ref())
    }

    /// Whether venue `index` survives the mask. Bits past the set are ignored.
    pub fn is_enabled(&self, index: usize, disable_flags: u64) -> bool {
        index < self.venues.len() && (disable_flags >> index) & 1 == 0
    }

    /// Per-venue enable flags for this call.
    pub fn enabled(&self, disable_flags: u64) -> Vec<bool> {
        (0..self.venues.len())
            .map(|i| self.is_enabled(i, disable_flags))
            .collect()
    }
}

impl std::fmt::Debug for VenueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.venues.iter().map(|v| (v.kind(), v.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::wrap::WrapVenue;

    fn wrap(i: u8) -> Box<dyn Venue> {
        Box::new(WrapVenue::new(
            format!("wrap-{i}"),
            Asset::from_bytes([i; 20]),
            Asset::from_bytes([i + 100; 20]),
        ))
    }

    #[test]
    fn mask_bits_map_to_indices() {
        let set = VenueSet::from_venues((1..=4).map(wrap).collect()).unwrap();
        assert_eq!(set.enabled(0b0100), vec![true, true, false, true]);
        assert_eq!(set.enabled(0), vec![true; 4]);
    }

    #[test]
    fn out_of_range_bits_are_ignored() {
        let set = VenueSet::from_venues((1..=2).map(wrap).collect()).unwrap();
        assert_eq!(set.enabled(u64::MAX << 2), vec![true, true]);
    }

    #[test]
    fn venue_set_is_capped() {
        let mut set = VenueSet::new();
        for _ in 0..MAX_VENUES {
            set.push(wrap(1)).unwrap();
        }
        assert!(matches!(set.push(wrap(1)), Err(AggrError::InvalidArgument(_))));
    }

    #[test]
    fn default_cumulative_table_starts_at_zero() {
        let v = wrap(1);
        let (a, b) = (Asset::from_bytes([1; 20]), Asset::from_bytes([101; 20]));
        let table = v.cumulative_return(&a, &b, 4, 1_000).unwrap();
        assert_eq!(table, vec![0, 250, 500, 750, 1_000]);
    }
}
