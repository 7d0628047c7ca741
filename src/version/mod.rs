//! Version layer for release lookup and comparison
//!
//! This module provides the core functionality for fetching a package's release
//! history from PyPI and reasoning about its versions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│    Types    │◀────│ Constraint  │
//! │  (fetch)    │     │ (releases)  │     │  (select)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │ Registries  │                         │   Semver    │
//! │   (pypi)    │                         │  (coerce)   │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`constraint`]: Constraint parsing, matching and selection
//! - [`error`]: Error types for version and registry operations
//! - [`registry`]: Registry trait for fetching releases and artifacts
//! - [`registries`]: Concrete registry implementations (PyPI)
//! - [`semver`]: Coercion of arbitrary release strings into semver versions
//! - [`types`]: Common types like `PackageReleases` and `Artifact`

pub mod constraint;
pub mod error;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
