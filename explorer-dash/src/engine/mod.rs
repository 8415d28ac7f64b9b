//! Filtering, aggregation and KPI derivation over the upstream datasets

pub mod aggregate;
pub mod failures;
pub mod filter;
pub mod overrides;
