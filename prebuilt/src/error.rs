//! Error types for the prebuilt download pipeline.
//!
//! Variants carry the coordinates a caller needs to decide between
//! surfacing the failure and falling back to source compilation. The one
//! tolerated condition, a missing artifact for a single target, never
//! reaches this type: it is suppressed inside the download loop.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that abort a prebuilt download operation.
#[derive(Debug, Error)]
pub enum PrebuiltError {
    /// The download pipeline was invoked for a package whose metadata does
    /// not declare prebuilt binary support.
    #[error("package {package} does not declare prebuilt binary support")]
    PrebuiltUnsupported {
        /// Name of the package.
        package: String,
    },

    /// The release version in the package metadata is not a valid semantic
    /// version.
    #[error("invalid semantic version {version:?} for package {package}")]
    VersionParse {
        /// Name of the package.
        package: String,
        /// The malformed version string.
        version: String,
        /// The underlying parse error.
        #[source]
        source: semver::Error,
    },

    /// The declared binary host is not a valid base URL, or the derived
    /// artifact path cannot be resolved against it.
    #[error("invalid prebuilt binary host {host:?}")]
    InvalidHost {
        /// The declared host string.
        host: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// An artifact fetch failed for a reason other than a missing artifact.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Writing a downloaded artifact to the local folder failed.
    #[error("failed to write prebuilt binary to {path}")]
    Write {
        /// Destination path of the failed write.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`PrebuiltError`].
pub type Result<T> = std::result::Result<T, PrebuiltError>;
