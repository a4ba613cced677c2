//! Shared venue fixtures for integration tests

#![allow(dead_code)]

use split_aggr::venues::orderbook::PRICE_SCALE;
use split_aggr::venues::{
    BridgedVenue, ConstantProductPool, Level, OrderBookVenue, Venue, VenueSet, WrapVenue,
};
use split_aggr::{Amount, Asset};

pub const E18: Amount = 1_000_000_000_000_000_000;

pub fn eth() -> Asset {
    Asset::NATIVE
}

pub fn dai() -> Asset {
    "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse().unwrap()
}

pub fn bdai() -> Asset {
    "0x6a4FFAafa8DD400676Df8076AD6c724867b0e2e8".parse().unwrap()
}

fn uniswap() -> ConstantProductPool {
    ConstantProductPool::new("uniswap", (eth(), 1_000 * E18), (dai(), 2_000_000 * E18), 30).unwrap()
}

/// 0 uniswap, 1 sushiswap, 2 oasis book, 3 bdai wrap, 4 uniswap bridged into bdai
pub fn venue_set() -> VenueSet {
    let venues: Vec<Box<dyn Venue>> = vec![
        Box::new(uniswap()),
        Box::new(
            ConstantProductPool::new("sushiswap", (eth(), 400 * E18), (dai(), 810_000 * E18), 30)
                .unwrap(),
        ),
        Box::new(
            OrderBookVenue::new(
                "oasis",
                eth(),
                dai(),
                vec![
                    Level { price: 1_995 * PRICE_SCALE, size: 3 * E18 },
                    Level { price: 1_990 * PRICE_SCALE, size: 5 * E18 },
                ],
                vec![Level { price: 2_010 * PRICE_SCALE, size: 4 * E18 }],
            )
            .unwrap(),
        ),
        Box::new(WrapVenue::new("bdai", dai(), bdai())),
        Box::new(BridgedVenue::new(
            "uniswap-bdai",
            dai(),
            Box::new(uniswap()),
            Box::new(WrapVenue::new("bdai", dai(), bdai())),
        )),
    ];
    VenueSet::from_venues(venues).unwrap()
}

/// Every venue's table with unavailable venues as zeros; `None` when disabled
pub fn tables(
    set: &VenueSet,
    source: &Asset,
    dest: &Asset,
    total: Amount,
    parts: u32,
    disable_flags: u64,
) -> Vec<Option<Vec<Amount>>> {
    set.iter()
        .enumerate()
        .map(|(i, v)| {
            if !set.is_enabled(i, disable_flags) {
                return None;
            }
            Some(
                v.cumulative_return(source, dest, parts, total)
                    .unwrap_or_else(|_| vec![0; parts as usize + 1]),
            )
        })
        .collect()
}

/// Maximum over every distribution of `parts` across the enabled tables
pub fn brute_force_best(tables: &[Option<Vec<Amount>>], parts: u32) -> Amount {
    fn go(tables: &[Option<Vec<Amount>>], left: u32) -> Amount {
        match tables.split_first() {
            None => 0,
            Some((None, rest)) => go(rest, left),
            Some((Some(t), rest)) => {
                let rest_enabled = rest.iter().any(|t| t.is_some());
                if !rest_enabled {
                    return t[left as usize];
                }
                (0..=left)
                    .map(|u| t[u as usize] + go(rest, left - u))
                    .max()
                    .unwrap()
            }
        }
    }
    go(tables, parts)
}

pub fn recompute(tables: &[Option<Vec<Amount>>], distribution: &[u32]) -> Amount {
    tables
        .iter()
        .zip(distribution)
        .map(|(t, &d)| t.as_ref().map(|t| t[d as usize]).unwrap_or(0))
        .sum()
}
