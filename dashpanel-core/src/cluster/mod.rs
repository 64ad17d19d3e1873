//! Cluster-side state: indicator groups and per-switch policy

pub mod indicators;
pub mod policy;

pub use indicators::{group_of, IndicatorStatus, GROUP_COUNT, SWITCH_GROUPS};
pub use policy::SwitchPolicy;
