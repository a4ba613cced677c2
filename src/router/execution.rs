// Execution engine - applies a computed distribution to the venues
// This file splits the input according to a distribution, swaps every
// share on a staged copy of the venue set and commits only when the
// aggregate output clears the caller's slippage guard
//
// Numan Thabit 2025 Nov

use crate::asset::{checked_sum, Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::quant::to_parts;
use crate::router::validation::validate_distribution;
use crate::venues::VenueSet;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Execution statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStats {
    pub total_executions: u64,
    pub successful_executions: u64,
    pub failed_executions: u64,
    pub avg_execution_time_ms: Option<f64>,
    pub success_rate: f64,
}

/// One venue's executed share
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fill {
    pub index: usize,
    #[serde(with = "crate::asset::amount_str")]
    pub amount_in: Amount,
    #[serde(with = "crate::asset::amount_str")]
    pub amount_out: Amount,
}

/// Execution result with timing information
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    #[serde(with = "crate::asset::amount_str")]
    pub return_amount: Amount,
    pub fills: Vec<Fill>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Default)]
pub struct ExecutionEngine {
    total_executions: AtomicU64,
    successful_executions: AtomicU64,
    failed_executions: AtomicU64,
    // microseconds, summed over successful executions
    total_execution_time_us: AtomicU64,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get execution statistics
    pub fn get_stats(&self) -> ExecutionStats {
        let total = self.total_executions.load(Ordering::Relaxed);
        let successful = self.successful_executions.load(Ordering::Relaxed);
        let failed = self.failed_executions.load(Ordering::Relaxed);
        let total_ms = self.total_execution_time_us.load(Ordering::Relaxed) as f64 / 1000.0;

        ExecutionStats {
            total_executions: total,
            successful_executions: successful,
            failed_executions: failed,
            avg_execution_time_ms: if successful > 0 {
                Some(total_ms / successful as f64)
            } else {
                None
            },
            success_rate: if total > 0 {
                successful as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Execute `distribution` for `total` of `source` into `dest`.
    ///
    /// Either every share is applied to `venues` or none is.
    #[tracing::instrument(skip_all, fields(source = %source, dest = %dest, total = total, min_return = min_return))]
    pub fn execute(
        &self,
        venues: &mut VenueSet,
        source: &Asset,
        dest: &Asset,
        total: Amount,
        distribution: &[u32],
        min_return: Amount,
    ) -> Result<ExecutionResult> {
        self.total_executions.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();

        match self.run(venues, source, dest, total, distribution, min_return) {
            Ok((staged, return_amount, fills)) => {
                *venues = staged;
                let elapsed = started.elapsed();
                self.successful_executions.fetch_add(1, Ordering::Relaxed);
                self.total_execution_time_us
                    .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
                info!(return_amount, fills = fills.len(), "distribution executed");
                Ok(ExecutionResult {
                    return_amount,
                    fills,
                    execution_time_ms: elapsed.as_secs_f64() * 1000.0,
                })
            }
            Err(err) => {
                self.failed_executions.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "execution failed; venue state unchanged");
                Err(err)
            }
        }
    }

    fn run(
        &self,
        venues: &VenueSet,
        source: &Asset,
        dest: &Asset,
        total: Amount,
        distribution: &[u32],
        min_return: Amount,
    ) -> Result<(VenueSet, Amount, Vec<Fill>)> {
        validate_distribution(distribution, venues.len()).into_result()?;

        let parts: u32 = distribution.iter().sum();
        let mut staged = venues.clone();
        let mut fills = Vec::new();

        if total > 0 {
            if parts == 0 {
                return Err(AggrError::InvalidArgument(
                    "distribution allocates no parts for a non-zero input".to_string(),
                ));
            }
            let amounts = to_parts(total, parts)?.split(distribution)?;
            for (index, &amount_in) in amounts.iter().enumerate() {
                if amount_in == 0 {
                    continue;
                }
                let venue = staged.get_mut(index).ok_or_else(|| {
                    AggrError::InvalidArgument(format!("no venue at index {index}"))
                })?;
                let amount_out = venue.swap(source, dest, amount_in, 0)?;
                fills.push(Fill {
                    index,
                    amount_in,
                    amount_out,
                });
            }
        }

        let return_amount = checked_sum(fills.iter().map(|f| f.amount_out))?;
        if return_amount < min_return {
            return Err(AggrError::SlippageExceeded {
                expected: min_return,
                actual: return_amount,
            });
        }
        Ok((staged, return_amount, fills))
    }
}
