// Venue-set configuration
// Venues are declared in YAML with a `kind` tag and built into a VenueSet in
// declaration order, which fixes their disable-mask bit.
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::venues::adapter::{Venue, VenueSet};
use crate::venues::amm::ConstantProductPool;
use crate::venues::bridge::BridgedVenue;
use crate::venues::orderbook::{Level, OrderBookVenue};
use crate::venues::wrap::WrapVenue;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct VenueSetConfig {
    pub venues: Vec<VenueEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueEntry {
    pub name: String,
    #[serde(flatten)]
    pub spec: VenueSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VenueSpec {
    ConstantProduct {
        token0: Asset,
        token1: Asset,
        #[serde(with = "crate::asset::amount_str")]
        reserve0: Amount,
        #[serde(with = "crate::asset::amount_str")]
        reserve1: Amount,
        #[serde(default = "default_fee_bps")]
        fee_bps: u32,
    },
    OrderBook {
        base: Asset,
        quote: Asset,
        #[serde(default)]
        bids: Vec<Level>,
        #[serde(default)]
        asks: Vec<Level>,
    },
    Wrap {
        underlying: Asset,
        wrapped: Asset,
    },
    Bridged {
        bridge: Asset,
        first: Box<VenueSpec>,
        second: Box<VenueSpec>,
    },
}

fn default_fee_bps() -> u32 {
    30
}

impl VenueSpec {
    pub fn build(&self, name: &str) -> Result<Box<dyn Venue>> {
        let venue: Box<dyn Venue> = match self {
            VenueSpec::ConstantProduct {
                token0,
                token1,
                reserve0,
                reserve1,
                fee_bps,
            } => Box::new(ConstantProductPool::new(
                name,
                (*token0, *reserve0),
                (*token1, *reserve1),
                *fee_bps,
            )?),
            VenueSpec::OrderBook {
                base,
                quote,
                bids,
                asks,
            } => Box::new(OrderBookVenue::new(
                name,
                *base,
                *quote,
                bids.clone(),
                asks.clone(),
            )?),
            VenueSpec::Wrap {
                underlying,
                wrapped,
            } => Box::new(WrapVenue::new(name, *underlying, *wrapped)),
            VenueSpec::Bridged {
                bridge,
                first,
                second,
            } => {
                if matches!(**first, VenueSpec::Bridged { .. })
                    || matches!(**second, VenueSpec::Bridged { .. })
                {
                    return Err(AggrError::Config(format!(
                        "venue {name}: only a single bridge hop is supported"
                    )));
                }
                Box::new(BridgedVenue::new(
                    name,
                    *bridge,
                    first.build(&format!("{name}/first"))?,
                    second.build(&format!("{name}/second"))?,
                ))
            }
        };
        Ok(venue)
    }
}

impl VenueSetConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| AggrError::Config(format!("venue set: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AggrError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_yaml(&text)
    }

    pub fn build(&self) -> Result<VenueSet> {
        let mut set = VenueSet::new();
        for entry in &self.venues {
            set.push(entry.spec.build(&entry.name)?)?;
        }
        Ok(set)
    }
}
