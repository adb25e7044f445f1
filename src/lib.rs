//! pkgscout - npm dependency inspector library
//!
//! This library provides the core functionality for inspecting the
//! dependencies of a Node.js project:
//! - Reading package.json and the installed versions from the lockfile
//! - Fetching package metadata from the npm registry
//! - Classifying each dependency's update status
//! - Writing CSV/JSON reports and bumping declared versions

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod resolve;
pub mod update;
