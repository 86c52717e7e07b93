//! Prebuilt native binary retrieval for mirrored npm packages.
//!
//! When the packdock install workflow mirrors a package that ships native
//! modules, this crate substitutes for the local compilation step: it
//! derives artifact URLs from the package's naming templates and downloads
//! whatever prebuilt binaries the upstream host offers for the requested
//! build targets. Targets the host does not publish are an expected miss;
//! anything else aborts the operation so the workflow can fall back to
//! source compilation.
//!
//! # Modules
//!
//! - [`error`] - Semantic error types for the download pipeline
//! - [`fetch`] - Transport boundary and the `ureq`-backed fetcher
//! - [`metadata`] - Package release metadata and the support predicate
//! - [`prebuilt`] - The sequential download orchestrator
//! - [`template`] - Naming-template substitution

pub mod error;
pub mod fetch;
pub mod metadata;
pub mod prebuilt;
pub mod template;
