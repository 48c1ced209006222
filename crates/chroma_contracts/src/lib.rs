#![forbid(unsafe_code)]

pub mod common;
pub mod identity;
pub mod palette;

pub use common::{ContractViolation, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate};
