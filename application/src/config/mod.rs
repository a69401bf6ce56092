//! Application-level configuration.
//!
//! - [`CouncilConfig`] - per-mode council membership, title model and timeouts

pub mod council_config;

pub use council_config::{CouncilConfig, CouncilConfigError, ModeCouncil, ResolvedCouncil};
