//! The four trip aggregators.
//!
//! Each aggregator is a pure function from a filtered, borrowed trip
//! collection to a result record. None of them share state, so the session
//! may run them in any order or in parallel.

pub mod duration;
pub mod riders;
pub mod stations;
pub mod time;
pub mod types;
pub mod utility;

#[cfg(test)]
pub(crate) mod fixtures;

pub use duration::duration_stats;
pub use riders::rider_stats;
pub use stations::station_stats;
pub use time::time_stats;
