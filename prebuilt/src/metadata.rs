//! Package release metadata consumed by the prebuilt download pipeline.
//!
//! These types mirror the fields of a mirrored registry document that the
//! prebuilt pipeline consumes. The mirror's metadata layer deserializes the
//! registry JSON and hands the structs here as read-only inputs; nothing in
//! this crate mutates them.

use serde::Deserialize;

/// Sentinel napi version used when a package declares no `napi_versions`.
///
/// Upstream hosts publish napi-unaware artifacts under this literal, so it
/// flows through the naming templates like any real version.
pub const NAPI_VERSION_UNKNOWN: &str = "unknown";

/// Metadata for one package release, as published to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionMetadata {
    /// The package name (e.g. `sharp`).
    pub name: String,
    /// The release version as a semantic-version string.
    pub version: String,
    /// The prebuilt binary declaration, when the package has one.
    #[serde(default)]
    pub binary: Option<BinaryMetadata>,
}

/// The `binary` block of a package release: where prebuilt artifacts live
/// and how their names are derived.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryMetadata {
    /// The native module name. Its presence is the sole signal that the
    /// package supports prebuilt binaries at all.
    #[serde(default)]
    pub module_name: Option<String>,
    /// Base URL of the host serving the prebuilt artifacts.
    pub host: String,
    /// Naming template for the remote directory holding the artifacts.
    pub remote_path: String,
    /// Naming template for the artifact file itself.
    pub package_name: String,
    /// Node-API versions the package publishes artifacts for. Absent for
    /// packages that predate napi; see [`NAPI_VERSION_UNKNOWN`].
    #[serde(default)]
    pub napi_versions: Option<Vec<String>>,
}

/// One row of the caller-supplied target matrix: a runtime environment a
/// prebuilt binary may be needed for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrebuiltTarget {
    /// Node ABI version (e.g. `108`).
    pub abi: String,
    /// CPU architecture (e.g. `x64`).
    pub arch: String,
    /// Operating system platform (e.g. `linux`).
    pub platform: String,
}

/// Whether a release declares prebuilt binary support.
///
/// True iff the `binary` block is present and names a non-empty
/// `module_name`. Callers gate the download pipeline on this predicate.
///
/// # Examples
///
/// ```
/// use packdock_prebuilt::metadata::{VersionMetadata, has_prebuilt_binaries};
///
/// let release: VersionMetadata = serde_json::from_str(
///     r#"{
///         "name": "sharp",
///         "version": "0.30.2",
///         "binary": {
///             "module_name": "sharp",
///             "host": "https://cdn.example.com/",
///             "remote_path": "v{version}",
///             "package_name": "{module_name}.tar.gz"
///         }
///     }"#,
/// )?;
/// assert!(has_prebuilt_binaries(&release));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn has_prebuilt_binaries(metadata: &VersionMetadata) -> bool {
    metadata
        .binary
        .as_ref()
        .is_some_and(|binary| binary.module_name.as_deref().is_some_and(|name| !name.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn release_json(binary: &str) -> String {
        format!(r#"{{"name":"sharp","version":"0.30.2"{binary}}}"#)
    }

    fn full_binary_block() -> &'static str {
        concat!(
            r#","binary":{"module_name":"sharp","#,
            r#""host":"https://cdn.example.com/","#,
            r#""remote_path":"releases/v{version}","#,
            r#""package_name":"{module_name}-{node_abi}.tar.gz","#,
            r#""napi_versions":["3","6"]}"#,
        )
    }

    #[test]
    fn deserializes_registry_document() {
        let release: VersionMetadata =
            serde_json::from_str(&release_json(full_binary_block())).expect("valid document");
        let binary = release.binary.expect("binary block");
        assert_eq!(binary.module_name.as_deref(), Some("sharp"));
        assert_eq!(binary.host, "https://cdn.example.com/");
        assert_eq!(
            binary.napi_versions.as_deref(),
            Some(["3".to_owned(), "6".to_owned()].as_slice())
        );
    }

    #[test]
    fn napi_versions_absent_deserializes_to_none() {
        let json = release_json(
            r#","binary":{"module_name":"m","host":"h","remote_path":"r","package_name":"p"}"#,
        );
        let release: VersionMetadata = serde_json::from_str(&json).expect("valid document");
        assert_eq!(release.binary.expect("binary block").napi_versions, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = release_json(r#","dist":{"tarball":"https://example.com/sharp.tgz"}"#);
        let release: VersionMetadata = serde_json::from_str(&json).expect("valid document");
        assert_eq!(release.binary, None);
    }

    #[rstest]
    #[case::no_binary("", false)]
    #[case::no_module_name(
        r#","binary":{"host":"h","remote_path":"r","package_name":"p"}"#,
        false
    )]
    #[case::empty_module_name(
        r#","binary":{"module_name":"","host":"h","remote_path":"r","package_name":"p"}"#,
        false
    )]
    #[case::module_name_present(
        r#","binary":{"module_name":"m","host":"h","remote_path":"r","package_name":"p"}"#,
        true
    )]
    fn has_prebuilt_binaries_variants(#[case] binary: &str, #[case] expected: bool) {
        let release: VersionMetadata =
            serde_json::from_str(&release_json(binary)).expect("valid document");
        assert_eq!(has_prebuilt_binaries(&release), expected);
    }
}
