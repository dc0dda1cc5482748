//! Application layer: use cases and the failure-escalation seam.

pub mod escalation;
pub mod use_cases;
