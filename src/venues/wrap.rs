// Wrapped-asset venue
// A 1:1 wrap/unwrap relationship between two assets, modelled as a
// zero-slippage venue. Works in both directions.
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::venues::adapter::{ensure_min_return, Venue};

#[derive(Debug, Clone)]
pub struct WrapVenue {
    name: String,
    underlying: Asset,
    wrapped: Asset,
}

impl WrapVenue {
    pub fn new(name: impl Into<String>, underlying: Asset, wrapped: Asset) -> Self {
        Self {
            name: name.into(),
            underlying,
            wrapped,
        }
    }

    fn supports(&self, source: &Asset, dest: &Asset) -> bool {
        (*source == self.underlying && *dest == self.wrapped)
            || (*source == self.wrapped && *dest == self.underlying)
    }
}

impl Venue for WrapVenue {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "wrap"
    }

    fn quote(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<Amount> {
        if !self.supports(source, dest) {
            return Err(AggrError::unavailable(&self.name, "pair not wrapped here"));
        }
        Ok(amount)
    }

    fn swap(
        &mut self,
        source: &Asset,
        dest: &Asset,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount> {
        let out = self.quote(source, dest, amount)?;
        ensure_min_return(out, min_return)
    }

    fn clone_box(&self) -> Box<dyn Venue> {
        Box::new(self.clone())
    }
}
