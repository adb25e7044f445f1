//! Update planning
//!
//! This module provides:
//! - Selection of records that qualify for an update at a given level
//! - Prefix-preserving construction of the new declared version strings

mod planner;

pub use planner::{new_version_string, SkipReason, SkippedUpdate, UpdatePlan, UpdatePlanner};
