//! Prebuilt binary download orchestration.
//!
//! Walks the cartesian product of caller-supplied build targets and the
//! package's declared napi versions, derives each cell's artifact URL and
//! local file name from the package's naming templates, and fetches the
//! cells strictly sequentially. A host reporting an artifact absent is an
//! expected per-cell outcome and never disturbs the other cells; any other
//! failure aborts the remaining enumeration and surfaces to the caller,
//! which decides whether to fall back to source compilation.

use camino::Utf8Path;
use url::Url;

use crate::error::{PrebuiltError, Result};
use crate::fetch::{BinaryFetcher, FetchError, HttpFetcher};
use crate::metadata::{BinaryMetadata, NAPI_VERSION_UNKNOWN, PrebuiltTarget, VersionMetadata};
use crate::template::{TemplateContext, format_prebuilt};

/// Download every prebuilt binary the remote host offers for `targets`,
/// using the production HTTP fetcher.
///
/// One file is written into `local_folder` per successfully fetched cell,
/// named by the package's `package_name` template. The caller ensures
/// `local_folder` exists. Targets are attempted in the order given,
/// enumerating each target's napi versions before moving to the next
/// target.
///
/// # Errors
///
/// Returns an error on the first failure that is not a missing artifact:
/// transport failures, write failures, malformed version metadata, an
/// invalid binary host, or a package without prebuilt support. Cells after
/// the failing one are not attempted.
pub fn download_prebuilt_binaries(
    metadata: &VersionMetadata,
    local_folder: &Utf8Path,
    targets: &[PrebuiltTarget],
) -> Result<()> {
    download_prebuilt_binaries_with(metadata, local_folder, targets, &HttpFetcher)
}

/// Testable inner function with an injected transport.
///
/// The production entry point [`download_prebuilt_binaries`] delegates
/// here with the real fetcher; tests inject mocks or scripted stubs.
///
/// # Errors
///
/// See [`download_prebuilt_binaries`].
pub fn download_prebuilt_binaries_with(
    metadata: &VersionMetadata,
    local_folder: &Utf8Path,
    targets: &[PrebuiltTarget],
    fetcher: &dyn BinaryFetcher,
) -> Result<()> {
    let (binary, module_name) = declared_binary(metadata)?;
    let napi_fallback = [NAPI_VERSION_UNKNOWN.to_owned()];
    let napi_versions = binary.napi_versions.as_deref().unwrap_or(&napi_fallback);

    let job = DownloadJob {
        fetcher,
        metadata,
        binary,
        module_name,
        local_folder,
    };

    targets
        .iter()
        .flat_map(|target| napi_versions.iter().map(move |napi| (target, napi.as_str())))
        .try_for_each(|(target, napi_version)| job.download_cell(target, napi_version))
}

/// Extract the binary declaration, enforcing the support precondition.
///
/// Callers of the pipeline gate on
/// [`has_prebuilt_binaries`](crate::metadata::has_prebuilt_binaries); a
/// release reaching this point without a declared module name is a caller
/// bug surfaced as [`PrebuiltError::PrebuiltUnsupported`].
fn declared_binary(metadata: &VersionMetadata) -> Result<(&BinaryMetadata, &str)> {
    metadata
        .binary
        .as_ref()
        .and_then(|binary| {
            binary
                .module_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .map(|name| (binary, name))
        })
        .ok_or_else(|| PrebuiltError::PrebuiltUnsupported {
            package: metadata.name.clone(),
        })
}

/// Per-operation invariants shared by every cell of one download run.
struct DownloadJob<'a> {
    fetcher: &'a dyn BinaryFetcher,
    metadata: &'a VersionMetadata,
    binary: &'a BinaryMetadata,
    module_name: &'a str,
    local_folder: &'a Utf8Path,
}

impl DownloadJob<'_> {
    /// Fetch one (target, napi-version) cell and persist the artifact.
    ///
    /// A missing artifact is the expected outcome for targets the package
    /// does not publish; it is logged at debug level and swallowed.
    fn download_cell(&self, target: &PrebuiltTarget, napi_version: &str) -> Result<()> {
        let context = self.template_context(target, napi_version)?;
        let file_name = format_prebuilt(&self.binary.package_name, &context);
        let url = self.artifact_url(&file_name, &context)?;

        match self.fetcher.fetch(url.as_str()) {
            Ok(data) => self.write_artifact(&file_name, &data),
            Err(FetchError::NotFound { url: missing }) => {
                log::debug!("no prebuilt binary at {missing}");
                Ok(())
            }
            Err(err) => {
                log::error!(
                    "unexpected error fetching prebuilt binary for {} and ABI v{} on {}-{} (n-api version {})",
                    self.metadata.name,
                    target.abi,
                    target.arch,
                    target.platform,
                    napi_version
                );
                Err(err.into())
            }
        }
    }

    /// Build the substitution context for one cell.
    fn template_context<'b>(
        &'b self,
        target: &'b PrebuiltTarget,
        napi_version: &'b str,
    ) -> Result<TemplateContext<'b>> {
        TemplateContext::new(
            &self.metadata.name,
            &self.metadata.version,
            self.module_name,
            &target.abi,
            &target.platform,
            &target.arch,
            napi_version,
        )
        .map_err(|source| PrebuiltError::VersionParse {
            package: self.metadata.name.clone(),
            version: self.metadata.version.clone(),
            source,
        })
    }

    /// Resolve the remote artifact URL for one cell.
    ///
    /// The formatted remote path loses its trailing slash before the file
    /// name is appended, then the whole path resolves against the declared
    /// host.
    fn artifact_url(&self, file_name: &str, context: &TemplateContext<'_>) -> Result<Url> {
        let remote_path = format_prebuilt(&self.binary.remote_path, context);
        let host = Url::parse(&self.binary.host).map_err(|source| self.invalid_host(source))?;
        host.join(&format!(
            "{}/{file_name}",
            remote_path.trim_end_matches('/')
        ))
        .map_err(|source| self.invalid_host(source))
    }

    fn invalid_host(&self, source: url::ParseError) -> PrebuiltError {
        PrebuiltError::InvalidHost {
            host: self.binary.host.clone(),
            source,
        }
    }

    /// Write one fetched artifact into the local folder, overwriting any
    /// previous download.
    fn write_artifact(&self, file_name: &str, data: &[u8]) -> Result<()> {
        let path = self.local_folder.join(file_name);
        std::fs::write(&path, data).map_err(|source| PrebuiltError::Write {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote prebuilt binary {path} ({} bytes)", data.len());
        Ok(())
    }
}

#[cfg(test)]
#[path = "prebuilt_tests.rs"]
mod tests;
