// Venue module - liquidity sources behind one capability contract
//
// Numan Thabit 2025 Nov

pub mod adapter;
pub mod amm;
pub mod bridge;
pub mod orderbook;
pub mod registry;
pub mod wrap;

pub use adapter::{Venue, VenueSet, MAX_VENUES};
pub use amm::ConstantProductPool;
pub use bridge::BridgedVenue;
pub use orderbook::{Level, OrderBookVenue};
pub use registry::{VenueSetConfig, VenueSpec};
pub use wrap::WrapVenue;
