//! Naming-template substitution for prebuilt artifact paths.
//!
//! Registry packages describe their artifact layout with naming templates
//! (`{module_name}-v{version}-{node_abi}-{platform}-{arch}.tar.gz` and the
//! like). This module is the single place those templates are evaluated:
//! one left-to-right scan with a token-to-value lookup, so substituted
//! values are inserted literally and never re-interpreted as template text.

use std::borrow::Cow;

use semver::Version;

/// The fixed `{configuration}` substitution value. The mirror only serves
/// release artifacts.
const CONFIGURATION: &str = "Release";

/// The values a naming template can draw on for one (package, target,
/// napi-version) cell.
///
/// Construction parses the release version eagerly; a malformed version is
/// a hard error because it indicates corrupt package metadata, not a
/// missing artifact.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    name: &'a str,
    version: &'a str,
    parsed: Version,
    module_name: &'a str,
    abi: &'a str,
    platform: &'a str,
    arch: &'a str,
    napi_version: &'a str,
}

impl<'a> TemplateContext<'a> {
    /// Build a substitution context for one download cell.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `version` is not a valid semantic
    /// version.
    pub fn new(
        name: &'a str,
        version: &'a str,
        module_name: &'a str,
        abi: &'a str,
        platform: &'a str,
        arch: &'a str,
        napi_version: &'a str,
    ) -> Result<Self, semver::Error> {
        let parsed = Version::parse(version)?;
        Ok(Self {
            name,
            version,
            parsed,
            module_name,
            abi,
            platform,
            arch,
            napi_version,
        })
    }

    /// Look up the substitution value for a recognized token.
    ///
    /// Returns `None` for unrecognized tokens, which stay literal in the
    /// output.
    fn value(&self, token: &str) -> Option<Cow<'_, str>> {
        let value: Cow<'_, str> = match token {
            "name" => Cow::Borrowed(self.name),
            "version" => Cow::Borrowed(self.version),
            "major" => Cow::Owned(self.parsed.major.to_string()),
            "minor" => Cow::Owned(self.parsed.minor.to_string()),
            "patch" => Cow::Owned(self.parsed.patch.to_string()),
            "prerelease" => Cow::Borrowed(self.parsed.pre.as_str()),
            "build" => Cow::Borrowed(self.parsed.build.as_str()),
            "module_name" => Cow::Borrowed(self.module_name),
            "node_abi" => Cow::Owned(format!("node-v{}", self.abi)),
            "platform" => Cow::Borrowed(self.platform),
            "arch" => Cow::Borrowed(self.arch),
            "libc" => Cow::Borrowed(libc_family(self.platform)),
            "configuration" => Cow::Borrowed(CONFIGURATION),
            "toolset" => Cow::Borrowed(""),
            "napi_build_version" => Cow::Borrowed(self.napi_version),
            _ => return None,
        };
        Some(value)
    }
}

/// The libc family advertised for a platform.
///
/// Only glibc Linux hosts are served; every other platform publishes under
/// the `unknown` family.
fn libc_family(platform: &str) -> &'static str {
    if platform == "linux" { "glibc" } else { "unknown" }
}

/// Substitute a naming template against a [`TemplateContext`].
///
/// Each recognized `{token}` is replaced at its first occurrence only;
/// later duplicates of the same token stay literal. Unrecognized tokens
/// pass through untouched. After substitution, runs of consecutive `/` are
/// collapsed to a single `/` (empty substitutions such as `{toolset}`
/// otherwise leave double separators behind).
///
/// Pure function of its inputs; no I/O.
///
/// # Examples
///
/// ```
/// use packdock_prebuilt::template::{TemplateContext, format_prebuilt};
///
/// let context = TemplateContext::new(
///     "sharp", "0.30.2", "sharp", "108", "linux", "x64", "9",
/// )?;
/// assert_eq!(
///     format_prebuilt("{module_name}-v{version}-{node_abi}-{platform}-{arch}.tar.gz", &context),
///     "sharp-v0.30.2-node-v108-linux-x64.tar.gz",
/// );
/// # Ok::<(), semver::Error>(())
/// ```
#[must_use]
pub fn format_prebuilt(template: &str, context: &TemplateContext<'_>) -> String {
    collapse_separators(&substitute(template, context))
}

/// One left-to-right pass replacing each recognized token at most once.
fn substitute(template: &str, context: &TemplateContext<'_>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut replaced: Vec<&str> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (literal, tail) = rest.split_at(open);
        output.push_str(literal);

        let Some(close) = tail.find('}') else {
            output.push_str(tail);
            return output;
        };
        let token = &tail[1..close];
        if !replaced.contains(&token) {
            if let Some(value) = context.value(token) {
                output.push_str(&value);
                replaced.push(token);
                rest = &tail[close + 1..];
                continue;
            }
        }
        // Unrecognized or already-replaced token: emit the brace literally
        // and rescan from the next character.
        output.push('{');
        rest = &tail[1..];
    }

    output.push_str(rest);
    output
}

/// Collapse every run of consecutive `/` to a single separator.
fn collapse_separators(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_separator = false;
    for ch in input.chars() {
        if ch == '/' {
            if !previous_was_separator {
                output.push(ch);
            }
            previous_was_separator = true;
        } else {
            output.push(ch);
            previous_was_separator = false;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn linux_context() -> TemplateContext<'static> {
        TemplateContext::new(
            "sharp",
            "2.3.4-beta.1+build.7",
            "sharp_native",
            "115",
            "linux",
            "x64",
            "9",
        )
        .expect("valid version")
    }

    fn darwin_context() -> TemplateContext<'static> {
        TemplateContext::new("sharp", "1.2.3", "sharp_native", "108", "darwin", "arm64", "6")
            .expect("valid version")
    }

    #[rstest]
    #[case::name("{name}", "sharp")]
    #[case::version("{version}", "2.3.4-beta.1+build.7")]
    #[case::major("{major}", "2")]
    #[case::minor("{minor}", "3")]
    #[case::patch("{patch}", "4")]
    #[case::prerelease("{prerelease}", "beta.1")]
    #[case::build("{build}", "build.7")]
    #[case::module_name("{module_name}", "sharp_native")]
    #[case::node_abi("{node_abi}", "node-v115")]
    #[case::platform("{platform}", "linux")]
    #[case::arch("{arch}", "x64")]
    #[case::libc_linux("{libc}", "glibc")]
    #[case::configuration("{configuration}", "Release")]
    #[case::toolset("{toolset}", "")]
    #[case::napi_build_version("{napi_build_version}", "9")]
    fn single_placeholder_formats_to_its_value(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(format_prebuilt(template, &linux_context()), expected);
    }

    #[test]
    fn libc_is_unknown_off_linux() {
        assert_eq!(format_prebuilt("{libc}", &darwin_context()), "unknown");
    }

    #[test]
    fn version_components_concatenate() {
        assert_eq!(format_prebuilt("{major}{minor}{patch}", &linux_context()), "234");
    }

    #[test]
    fn prerelease_and_build_are_empty_without_identifiers() {
        let context = darwin_context();
        assert_eq!(format_prebuilt("{prerelease}", &context), "");
        assert_eq!(format_prebuilt("{build}", &context), "");
    }

    #[test]
    fn empty_substitution_collapses_double_separator() {
        let formatted = format_prebuilt("{module_name}/{toolset}/{arch}", &linux_context());
        assert_eq!(formatted, "sharp_native/x64");
        assert!(!formatted.contains("//"));
    }

    #[test]
    fn duplicate_placeholder_replaces_first_occurrence_only() {
        assert_eq!(format_prebuilt("{arch}-{arch}", &linux_context()), "x64-{arch}");
    }

    #[test]
    fn unrecognized_placeholder_stays_literal() {
        assert_eq!(
            format_prebuilt("{mystery}/{arch}", &linux_context()),
            "{mystery}/x64"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let context = TemplateContext::new(
            "{version}", "1.2.3", "m", "108", "linux", "x64", "3",
        )
        .expect("valid version");
        assert_eq!(format_prebuilt("{name}", &context), "{version}");
    }

    #[test]
    fn unterminated_brace_passes_through() {
        assert_eq!(format_prebuilt("{arch}/{oops", &linux_context()), "x64/{oops");
    }

    #[test]
    fn full_artifact_template_formats_deterministically() {
        let template = "{module_name}-v{version}-{node_abi}-napi-v{napi_build_version}-{platform}-{libc}-{arch}.tar.gz";
        assert_eq!(
            format_prebuilt(template, &darwin_context()),
            "sharp_native-v1.2.3-node-v108-napi-v6-darwin-unknown-arm64.tar.gz"
        );
    }

    #[test]
    fn malformed_version_is_a_hard_error() {
        let result = TemplateContext::new("pkg", "not-a-version", "m", "108", "linux", "x64", "3");
        assert!(result.is_err());
    }
}
