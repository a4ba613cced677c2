// Router module - quoting and execution plane
// This file wires the distribution optimizer, the quote service and
// the execution engine together
//
// Numan Thabit 2025 Nov

pub mod execution;
pub mod optimizer;
pub mod routes;
pub mod validation;

#[allow(clippy::module_inception)]
pub mod router;

pub use execution::{ExecutionEngine, ExecutionResult, ExecutionStats};
pub use optimizer::{optimize, Allocation};
pub use router::{create_api_router, ApiState, Router};
pub use routes::{ExecutionPlan, Quote, VenueShare};
