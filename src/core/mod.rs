pub mod grid;
pub mod levies;
pub mod pricing;
pub mod ranking;
pub mod units;
