//! package.json reading and writing
//!
//! This module provides functionality to:
//! - Load package.json and list its dependency declarations
//! - Apply an update plan and write the manifest back atomically

mod package_json;
mod writer;

pub use package_json::{PackageJson, MANIFEST_NAME};
pub use writer::{write_atomic, ManifestWriter, WriteResult};
