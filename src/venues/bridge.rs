// Bridged venue
// Routes source -> bridge -> dest through two inner venues. The bridge asset
// is fixed when the venue is configured; no path search happens here.
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::venues::adapter::{ensure_min_return, Venue};

#[derive(Clone)]
pub struct BridgedVenue {
    name: String,
    bridge: Asset,
    first: Box<dyn Venue>,
    second: Box<dyn Venue>,
}

impl BridgedVenue {
    pub fn new(
        name: impl Into<String>,
        bridge: Asset,
        first: Box<dyn Venue>,
        second: Box<dyn Venue>,
    ) -> Self {
        Self {
            name: name.into(),
            bridge,
            first,
            second,
        }
    }

    pub fn bridge(&self) -> &Asset {
        &self.bridge
    }

    fn check_pair(&self, source: &Asset, dest: &Asset) -> Result<()> {
        if *source == self.bridge || *dest == self.bridge {
            return Err(AggrError::unavailable(
                &self.name,
                "bridge asset cannot be an endpoint",
            ));
        }
        Ok(())
    }

    /// Inner failures are reported under this venue's name.
    fn relabel(&self, err: AggrError) -> AggrError {
        match err {
            AggrError::VenueUnavailable { venue, reason } => {
                AggrError::unavailable(&self.name, format!("leg {venue}: {reason}"))
            }
            other => other,
        }
    }
}

impl Venue for BridgedVenue {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "bridged"
    }

    fn quote(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<Amount> {
        self.check_pair(source, dest)?;
        let mid = self
            .first
            .quote(source, &self.bridge, amount)
            .map_err(|e| self.relabel(e))?;
        self.second
            .quote(&self.bridge, dest, mid)
            .map_err(|e| self.relabel(e))
    }

    fn swap(
        &mut self,
        source: &Asset,
        dest: &Asset,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount> {
        self.check_pair(source, dest)?;
        // both legs are staged so a failing second leg leaves the first untouched
        let mut first = self.first.clone();
        let mut second = self.second.clone();
        let mid = first
            .swap(source, &self.bridge, amount, 0)
            .map_err(|e| self.relabel(e))?;
        let out = second
            .swap(&self.bridge, dest, mid, 0)
            .map_err(|e| self.relabel(e))?;
        let out = ensure_min_return(out, min_return)?;
        self.first = first;
        self.second = second;
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Venue> {
        Box::new(self.clone())
    }
}
