// Distribution optimizer - splits discrete parts across venues
// Merges venue cumulative-return tables one at a time with an exhaustive
// max-plus convolution and reconstructs the split by back-substitution
//
// Numan Thabit 2025 Nov

use crate::asset::Amount;
use crate::errors::{AggrError, Result};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub return_amount: Amount,
    /// One entry per venue, summing to `parts`; disabled venues hold 0.
    pub distribution: Vec<u32>,
}

/// Find the split of `parts` units maximizing the summed table values.
///
/// `tables[i]` is `None` for a disabled venue. Enabled tables must have
/// `parts + 1` entries with `r[0] == 0`. Ties keep units on lower-indexed
/// venues, so the result is fully determined by the inputs.
pub fn optimize(tables: &[Option<&[Amount]>], parts: u32) -> Result<Allocation> {
    let width = parts as usize + 1;
    let enabled: Vec<(usize, &[Amount])> = tables
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.map(|t| (i, t)))
        .collect();

    for (i, table) in &enabled {
        if table.len() != width {
            return Err(AggrError::InvalidArgument(format!(
                "venue {i}: table has {} entries, expected {width}",
                table.len()
            )));
        }
        if table[0] != 0 {
            return Err(AggrError::InvalidArgument(format!(
                "venue {i}: zero units must return zero"
            )));
        }
    }

    let Some(&(_, first)) = enabled.first() else {
        return Err(AggrError::NoLiquidity(
            "no enabled venue to optimize over".to_string(),
        ));
    };

    // best[k]: best total for exactly k units over the venues merged so far
    let mut best: Vec<Amount> = first.to_vec();
    // choice[j][k]: units given to enabled venue j+1 when k units are in play
    let mut choice: Vec<Vec<u32>> = Vec::with_capacity(enabled.len().saturating_sub(1));

    for &(venue, table) in enabled.iter().skip(1) {
        let mut merged = vec![0 as Amount; width];
        let mut picks = vec![0u32; width];
        for k in 0..width {
            let mut top = best[k];
            let mut top_u = 0usize;
            for u in 1..=k {
                let total = best[k - u]
                    .checked_add(table[u])
                    .ok_or(AggrError::ArithmeticOverflow("distribution merge"))?;
                // strict: equal totals keep the smaller share for this venue
                if total > top {
                    top = total;
                    top_u = u;
                }
            }
            merged[k] = top;
            picks[k] = top_u as u32;
        }
        trace!(venue, best = merged[width - 1], "merged venue table");
        best = merged;
        choice.push(picks);
    }

    let mut distribution = vec![0u32; tables.len()];
    let mut remaining = parts as usize;
    for (j, &(venue, _)) in enabled.iter().enumerate().skip(1).rev() {
        let units = choice[j - 1][remaining];
        distribution[venue] = units;
        remaining -= units as usize;
    }
    distribution[enabled[0].0] = remaining as u32;

    Ok(Allocation {
        return_amount: best[width - 1],
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tables: &[Vec<Amount>], parts: u32) -> Allocation {
        let refs: Vec<Option<&[Amount]>> = tables.iter().map(|t| Some(t.as_slice())).collect();
        optimize(&refs, parts).unwrap()
    }

    fn recompute(tables: &[Vec<Amount>], dist: &[u32]) -> Amount {
        tables
            .iter()
            .zip(dist)
            .map(|(t, &d)| t[d as usize])
            .sum()
    }

    /// Every distribution of `parts` over `n` venues, lexicographically
    fn all_distributions(n: usize, parts: u32) -> Vec<Vec<u32>> {
        if n == 1 {
            return vec![vec![parts]];
        }
        let mut out = Vec::new();
        for first in (0..=parts).rev() {
            for mut rest in all_distributions(n - 1, parts - first) {
                rest.insert(0, first);
                out.push(rest);
            }
        }
        out
    }

    fn brute_force(tables: &[Vec<Amount>], parts: u32) -> Amount {
        all_distributions(tables.len(), parts)
            .iter()
            .map(|d| recompute(tables, d))
            .max()
            .unwrap()
    }

    /// r[u] = floor(scale * u / (u + depth)), a concave curve
    fn curve(scale: Amount, depth: Amount, parts: u32) -> Vec<Amount> {
        (0..=parts as Amount).map(|u| scale * u / (u + depth)).collect()
    }

    #[test]
    fn single_venue_takes_everything() {
        let a = run(&[curve(1_000, 5, 10)], 10);
        assert_eq!(a.distribution, vec![10]);
        assert_eq!(a.return_amount, curve(1_000, 5, 10)[10]);
    }

    #[test]
    fn identical_venues_split_evenly() {
        let t = curve(1_000, 3, 10);
        let a = run(&[t.clone(), t], 10);
        assert_eq!(a.distribution, vec![5, 5]);
    }

    #[test]
    fn matches_brute_force_and_recomputation() {
        let cases = vec![
            vec![curve(1_000, 3, 8), curve(700, 1, 8), curve(1_500, 9, 8)],
            vec![curve(10, 1, 6), vec![0; 7], curve(50, 20, 6)],
            vec![(0..=7).collect(), curve(9, 2, 7), curve(30, 10, 7), curve(4, 1, 7)],
        ];
        for tables in cases {
            let parts = (tables[0].len() - 1) as u32;
            let a = run(&tables, parts);
            assert_eq!(a.distribution.iter().sum::<u32>(), parts);
            assert_eq!(a.return_amount, recompute(&tables, &a.distribution));
            assert_eq!(a.return_amount, brute_force(&tables, parts));
        }
    }

    #[test]
    fn ties_prefer_lower_indexed_venue() {
        // linear, identical curves: every split ties
        let t: Vec<Amount> = (0..=10).map(|u| u * 7).collect();
        let a = run(&[t.clone(), t.clone(), t], 10);
        assert_eq!(a.distribution, vec![10, 0, 0]);
    }

    #[test]
    fn zero_table_never_beats_positive_return() {
        let a = run(&[vec![0; 11], curve(1_000, 4, 10)], 10);
        assert_eq!(a.distribution, vec![0, 10]);
        assert_eq!(a.return_amount, curve(1_000, 4, 10)[10]);
    }

    #[test]
    fn disabled_venues_get_nothing() {
        let t0 = curve(1_000, 2, 10);
        let t2 = curve(1_000, 2, 10);
        let a = optimize(&[Some(t0.as_slice()), None, Some(t2.as_slice())], 10).unwrap();
        assert_eq!(a.distribution[1], 0);
        assert_eq!(a.distribution, vec![5, 0, 5]);
    }

    #[test]
    fn nothing_enabled_is_no_liquidity() {
        assert!(matches!(
            optimize(&[None, None], 10),
            Err(AggrError::NoLiquidity(_))
        ));
        assert!(matches!(optimize(&[], 10), Err(AggrError::NoLiquidity(_))));
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let short = vec![0, 1, 2];
        assert!(matches!(
            optimize(&[Some(short.as_slice())], 10),
            Err(AggrError::InvalidArgument(_))
        ));
        let offset = vec![1, 2, 3];
        assert!(matches!(
            optimize(&[Some(offset.as_slice())], 2),
            Err(AggrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn overflow_aborts() {
        let big = vec![0, u128::MAX / 2 + 1, u128::MAX / 2 + 1];
        let refs = [Some(big.as_slice()), Some(big.as_slice())];
        assert!(matches!(
            optimize(&refs, 2),
            Err(AggrError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn deterministic() {
        let tables = vec![curve(1_000, 3, 20), curve(800, 2, 20), curve(1_200, 6, 20)];
        assert_eq!(run(&tables, 20), run(&tables, 20));
    }
}
