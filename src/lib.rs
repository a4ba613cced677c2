// Library root module for split-aggr
// This file defines the public API and module structure for the split-aggr library
// It exports the quoting, optimization and execution functionality
//
// Numan Thabit 2025 Nov

pub mod asset;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod quant;
pub mod router;
pub mod state;
pub mod venues;

pub use asset::{Amount, Asset};
pub use errors::{AggrError, Result};
