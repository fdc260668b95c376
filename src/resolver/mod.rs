//! Dependency resolution.
//!
//! Two policies live here. [`compute_missing`] is the shallow check every
//! build attempt runs: it looks only at the recipe's immediate dependencies
//! and reports the uninstalled ones so the attempt can cascade.
//! [`create_install_plan`] is the driver-level planner that walks the full
//! graph and orders it so repeated attempts never cascade.

pub mod errors;
pub mod missing;
pub mod plan;

pub use crate::core::filter_dependencies;
pub use errors::ResolutionError;
pub use missing::compute_missing;
pub use plan::{create_install_plan, InstallPlanAction, PortProvider};
