//! Placement core: occupancy tracking, free-region search, and the
//! conflict-resolution pass that keeps items disjoint.
//!
//! One resolution pass is triggered per add/move/resize gesture tick. The
//! pass is synchronous, allocation-light, and bounded by `rows x cols` work,
//! so it always terminates and never needs a timeout.

mod occupancy;
mod resolve;
mod search;

pub use occupancy::Occupancy;
pub use resolve::{Resolution, resolve};
pub use search::find_region;

#[cfg(test)]
mod property_tests;
