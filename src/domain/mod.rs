//! Core domain types for pkgscout
//!
//! This module contains:
//! - Declared and locked dependency types
//! - Declared version specification parsing
//! - Registry metadata payloads
//! - Per-package records produced by the resolution core
//! - Report summaries and update plan entries

mod dependency;
mod plan;
mod record;
mod registry_data;
mod summary;
mod version_spec;

pub use dependency::{DependencyDeclaration, DependencyType, LockedDependency};
pub(crate) use dependency::strip_alias_version;
pub use plan::{UpdateLevel, UpdatePlanEntry};
pub use record::{PackageRecord, PackageVersionInfo, RecordView, UpdateStatus};
pub use registry_data::{Deprecation, RegistryPackageData, RegistryVersionMetadata};
pub use summary::{ReportSummary, TierCounts, TypeSummary};
pub use version_spec::{RangePrefix, VersionSpec};
