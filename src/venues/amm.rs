// AMM venue adapter module
// This file implements a constant-product pool (x * y = k with an input fee),
// the standard concave price curve for AMM DEX venues
//
// Numan Thabit 2025 Nov

use crate::asset::{narrow, Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::venues::adapter::{ensure_min_return, Venue};
use primitive_types::U256;
use tracing::debug;

pub const FEE_DENOMINATOR: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct ConstantProductPool {
    name: String,
    token0: Asset,
    token1: Asset,
    reserve0: Amount,
    reserve1: Amount,
    /// Input fee in basis points
    fee_bps: u32,
}

impl ConstantProductPool {
    pub fn new(
        name: impl Into<String>,
        (token0, reserve0): (Asset, Amount),
        (token1, reserve1): (Asset, Amount),
        fee_bps: u32,
    ) -> Result<Self> {
        let name = name.into();
        if token0 == token1 {
            return Err(AggrError::Config(format!("pool {name}: identical tokens")));
        }
        if fee_bps >= FEE_DENOMINATOR {
            return Err(AggrError::Config(format!(
                "pool {name}: fee {fee_bps} bps out of range"
            )));
        }
        Ok(Self {
            name,
            token0,
            token1,
            reserve0,
            reserve1,
            fee_bps,
        })
    }

    pub fn reserves(&self) -> (Amount, Amount) {
        (self.reserve0, self.reserve1)
    }

    /// (reserve_in, reserve_out, source_is_token0)
    fn orient(&self, source: &Asset, dest: &Asset) -> Result<(Amount, Amount, bool)> {
        if *source == self.token0 && *dest == self.token1 {
            Ok((self.reserve0, self.reserve1, true))
        } else if *source == self.token1 && *dest == self.token0 {
            Ok((self.reserve1, self.reserve0, false))
        } else {
            Err(AggrError::unavailable(&self.name, "pair not in pool"))
        }
    }

    fn amount_out(&self, reserve_in: Amount, reserve_out: Amount, amount: Amount) -> Result<Amount> {
        if amount == 0 || reserve_in == 0 || reserve_out == 0 {
            return Ok(0);
        }
        let fee_mul = U256::from(FEE_DENOMINATOR - self.fee_bps);
        let in_with_fee = U256::from(amount) * fee_mul;
        let numerator = in_with_fee * U256::from(reserve_out);
        let denominator = U256::from(reserve_in) * U256::from(FEE_DENOMINATOR) + in_with_fee;
        narrow(numerator / denominator)
    }
}

impl Venue for ConstantProductPool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "constant_product"
    }

    fn quote(&self, source: &Asset, dest: &Asset, amount: Amount) -> Result<Amount> {
        let (reserve_in, reserve_out, _) = self.orient(source, dest)?;
        self.amount_out(reserve_in, reserve_out, amount)
    }

    fn swap(
        &mut self,
        source: &Asset,
        dest: &Asset,
        amount: Amount,
        min_return: Amount,
    ) -> Result<Amount> {
        let (reserve_in, reserve_out, zero_for_one) = self.orient(source, dest)?;
        let out = ensure_min_return(self.amount_out(reserve_in, reserve_out, amount)?, min_return)?;
        let new_in = reserve_in
            .checked_add(amount)
            .ok_or(AggrError::ArithmeticOverflow("pool reserve"))?;
        let new_out = reserve_out - out;
        if zero_for_one {
            self.reserve0 = new_in;
            self.reserve1 = new_out;
        } else {
            self.reserve1 = new_in;
            self.reserve0 = new_out;
        }
        debug!(pool = %self.name, amount_in = amount, amount_out = out, "pool swap applied");
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Venue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: Amount = 1_000_000_000_000_000_000;

    fn pool() -> (ConstantProductPool, Asset, Asset) {
        let eth = Asset::NATIVE;
        let dai = Asset::from_bytes([0xda; 20]);
        let p = ConstantProductPool::new("uni", (eth, 1_000 * E18), (dai, 2_000_000 * E18), 30)
            .unwrap();
        (p, eth, dai)
    }

    #[test]
    fn quote_matches_constant_product_formula() {
        let (p, eth, dai) = pool();
        let out = p.quote(&eth, &dai, E18).unwrap();
        // 1 ETH into 1000/2_000_000 at 0.3% fee
        let in_with_fee = U256::from(E18) * U256::from(9_970u32);
        let expected = in_with_fee * U256::from(2_000_000 * E18)
            / (U256::from(1_000 * E18) * U256::from(10_000u32) + in_with_fee);
        assert_eq!(U256::from(out), expected);
        assert!(out < 2_000 * E18);
    }

    #[test]
    fn table_has_diminishing_increments() {
        let (p, eth, dai) = pool();
        let table = p.cumulative_return(&eth, &dai, 10, 100 * E18).unwrap();
        assert_eq!(table.len(), 11);
        assert_eq!(table[0], 0);
        for w in table.windows(3) {
            assert!(w[1] >= w[0]);
            assert!(w[2] - w[1] <= w[1] - w[0]);
        }
    }

    #[test]
    fn swap_moves_reserves() {
        let (mut p, eth, dai) = pool();
        let quoted = p.quote(&dai, &eth, 2_000 * E18).unwrap();
        let got = p.swap(&dai, &eth, 2_000 * E18, quoted).unwrap();
        assert_eq!(got, quoted);
        assert_eq!(p.reserves(), (1_000 * E18 - got, 2_002_000 * E18));
    }

    #[test]
    fn swap_enforces_min_return() {
        let (mut p, eth, dai) = pool();
        let before = p.reserves();
        let err = p.swap(&eth, &dai, E18, 10_000 * E18).unwrap_err();
        assert!(matches!(err, AggrError::SlippageExceeded { .. }));
        assert_eq!(p.reserves(), before);
    }

    #[test]
    fn unknown_pair_is_unavailable() {
        let (p, eth, _) = pool();
        let other = Asset::from_bytes([7; 20]);
        assert!(p.quote(&eth, &other, 1).unwrap_err().is_local());
    }
}
