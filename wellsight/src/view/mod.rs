//! Display-side state for the WellSight viewer.

pub mod chart;
pub mod formatting;
pub mod readout;
