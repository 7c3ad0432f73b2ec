//! Pipeline entry points for batch operations.
//!
//! - `run_discovery`: Harvest new posts from the configured targets and
//!   submit them as unverified entries

pub mod discover;
pub mod harvest;

pub use discover::{Discovery, run_discovery};
pub use harvest::{harvest_candidates, harvest_target};
