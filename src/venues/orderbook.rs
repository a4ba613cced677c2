// Order book venue
// Price levels for one base/quote market. Selling base walks the bids from
// the highest price, buying base walks the asks from the lowest price, so the
// cumulative output is concave. Input past the book depth fills nothing.
//
// Numan Thabit 2025 Nov

use crate::asset::{checked_sum, mul_div, mul_div_up, Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::venues::adapter::{ensure_min_return, Venue};
use serde::Deserialize;

/// Fixed-point scale of level prices (quote per base).
pub const PRICE_SCALE: Amount = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Level {
    #[serde(with = "crate::asset::amount_str")]
    pub price: Amount,
    /// Base units resting at this price
    #[serde(with = "crate::asset::amount_str")]
    pub size: Amount,
}

#[derive(Debug, Clone)]
pub struct OrderBookVenue {
    name: String,
    base: Asset,
    quote: Asset,
    bids: Vec<Level>,
    asks: Vec<Level>,
}

/// Result of walking one side of the book
struct Walk {
    out: Amount,
    /// (level index, base units taken)
    fills: Vec<(usize, Amount)>,
}

impl OrderBookVenue {
    pub fn new(
        name: impl Into<String>,
        base: Asset,
        quote: Asset,
        mut bids: Vec<Level>,
        mut asks: Vec<Level>,
    ) -> Result<Self> {
        let name = name.into();
        if base == quote {
            return Err(AggrError::Config(format!("book {name}: identical assets")));
        }
        if bids.iter().chain(asks.iter()).any(|l| l.price == 0) {
            return Err(AggrError::Config(format!("book {name}: zero price level")));
        }
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(Self {
            name,
            base,
            quote,
            bids,
            asks,
        })
    }

    pub fn depth(&self) -> (Amount, Amount) {
        let bids = checked_sum(self.bids.iter().map(|l| l.size)).unwrap_or(Amount::MAX);
        let asks = checked_sum(self.asks.iter().map(|l| l.size)).unwrap_or(Amount::MAX);
        (bids, asks)
    }

    fn sell_base(&self, amount: Amount) -> Result<Walk> {
        let mut remaining = amount;
        let mut out: Amount = 0;
        let mut fills = Vec::new();
        for (i, level) in self.bids.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(level.size);
            out = out
                .checked_add(mul_div(take, level.price, PRICE_SCALE)?)
                .ok_or(AggrError::ArithmeticOverflow("book walk"))?;
            remaining -= take;
            fills.push((i, take));
        }
        Ok(Walk { out, fills })
    }

    fn buy_base(&self, amount: Amount) -> Result<Walk> {
        let mut remaining = amount;
        let mut out: Amount = 0;
        let mut fills = Vec::new();
        for (i, level) in self.asks.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            // cost of the whole level, rounded against the taker
            let capacity = mul_div_up(level.size, level.price, PRICE_SCALE)?;
            let (spent, bought) = if remaining >= capacity {
                (capacity, level.size)
            } else {
                (remaining, mul_div(remaining, PRICE_SCALE, level.price)?)
            };
            out = out
                .checked_add(bought)
                .ok_or(AggrError::ArithmeticOverflow("book walk"))?;
            remaining -= spent;
            fills.push((i, bought));
        }
        Ok(Walk { out, fills })
    }

    fn walk(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<(Walk, bool)> {
        if *source == self.base && *dest == self.quote {
            Ok((self.sell_base(amount)?, true))
        } else if *source == self.quote && *dest == self.base {
            Ok((self.buy_base(amount)?, false))
        } else {
            Err(AggrError::unavailable(&self.name, "market not listed"))
        }
    }
}

impl Venue for OrderBookVenue {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "order_book"
    }

    fn quote(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<Amount> {
        Ok(self.walk(source, dest, amount)?.0.out)
    }

    fn swap(
        &mut self,
        source: &Asset,
        dest: &Asset,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount> {
        let (walk, hits_bids) = self.walk(source, dest, amount)?;
        let out = ensure_min_return(walk.out, min_return)?;
        let side = if hits_bids { &mut self.bids } else { &mut self.asks };
        for (i, taken) in walk.fills {
            side[i].size -= taken;
        }
        side.retain(|l| l.size > 0);
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Venue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(price: Amount, size: Amount) -> Level {
        Level {
            price: price * PRICE_SCALE,
            size,
        }
    }

    fn book() -> (OrderBookVenue, Asset, Asset) {
        let base = Asset::from_bytes([1; 20]);
        let quote = Asset::from_bytes([2; 20]);
        let v = OrderBookVenue::new(
            "book",
            base,
            quote,
            vec![level(9, 100), level(10, 50)],
            vec![level(12, 100), level(11, 50)],
        )
        .unwrap();
        (v, base, quote)
    }

    #[test]
    fn selling_walks_best_bid_first() {
        let (v, base, quote) = book();
        assert_eq!(v.quote(&base, &quote, 50).unwrap(), 500);
        assert_eq!(v.quote(&base, &quote, 60).unwrap(), 590);
        // past the book depth nothing more fills
        assert_eq!(v.quote(&base, &quote, 1_000).unwrap(), 1_400);
    }

    #[test]
    fn buying_walks_best_ask_first() {
        let (v, base, quote) = book();
        assert_eq!(v.quote(&quote, &base, 550).unwrap(), 50);
        assert_eq!(v.quote(&quote, &base, 550 + 120).unwrap(), 60);
    }

    #[test]
    fn swap_consumes_levels() {
        let (mut v, base, quote) = book();
        assert_eq!(v.swap(&base, &quote, 60, 590).unwrap(), 590);
        assert_eq!(v.depth().0, 90);
        assert_eq!(v.quote(&base, &quote, 10).unwrap(), 90);
    }

    #[test]
    fn sub_unit_asks_are_not_free() {
        let base = Asset::from_bytes([1; 20]);
        let quote = Asset::from_bytes([2; 20]);
        let asks = vec![
            Level {
                price: PRICE_SCALE / 10 * 9,
                size: 1,
            };
            100
        ];
        let mut v = OrderBookVenue::new("dust", base, quote, Vec::new(), asks).unwrap();

        assert_eq!(v.quote(&quote, &base, 1).unwrap(), 1);
        assert_eq!(v.quote(&quote, &base, 100).unwrap(), 100);
        assert_eq!(v.swap(&quote, &base, 1, 0).unwrap(), 1);
        assert_eq!(v.depth().1, 99);
    }

    #[test]
    fn table_is_concave() {
        let (v, base, quote) = book();
        let table = v.cumulative_return(&base, &quote, 10, 200).unwrap();
        for w in table.windows(3) {
            assert!(w[2] - w[1] <= w[1] - w[0]);
        }
    }
}
