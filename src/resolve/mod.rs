//! Package resolution and classification core
//!
//! This module provides:
//! - Source classification of lockfile locations
//! - Version selection (latest patch, minor and overall)
//! - Deprecation lookup
//! - Update tier classification
//! - Aggregation into per-package records

mod aggregator;
mod classifier;
mod deprecation;
mod selector;
mod source;

pub use aggregator::PackageInfoAggregator;
pub use classifier::classify_update;
pub use deprecation::is_deprecated;
pub use selector::{parse_production, select_versions, VersionSelection};
pub use source::{classify_source, is_registry_source, SourceLocation};
