// Route types
// This file defines the quote returned to callers and the execution plan
// derived from it
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use serde::Serialize;

/// Result of `get_expected_return`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    #[serde(with = "crate::asset::amount_str")]
    pub return_amount: Amount,
    pub distribution: Vec<u32>,
}

impl Quote {
    pub fn zero(venues: usize) -> Self {
        Self {
            return_amount: 0,
            distribution: vec![0; venues],
        }
    }

    pub fn parts(&self) -> u32 {
        self.distribution.iter().sum()
    }
}

/// One venue's share of a planned trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShare {
    pub index: usize,
    pub venue: String,
    pub parts: u32,
    #[serde(with = "crate::asset::amount_str")]
    pub amount_in: Amount,
    /// Quoted output for the priced units (remainder excluded)
    #[serde(with = "crate::asset::amount_str")]
    pub expected_out: Amount,
}

/// Quote plus the executable input per venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub source: Asset,
    pub dest: Asset,
    #[serde(with = "crate::asset::amount_str")]
    pub total_input: Amount,
    pub quote: Quote,
    /// Venues with a non-zero allocation, in index order
    pub shares: Vec<VenueShare>,
}
