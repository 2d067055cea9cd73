//! Remote metadata model and version comparison.
//!
//! Each configured endpoint answers a GET with a JSON document describing the
//! latest package of one extension:
//!
//! ```json
//! {
//!   "id": "pub.ext",
//!   "name": "ext",
//!   "displayName": "Ext",
//!   "version": { "major": 1, "minor": 2, "patch": 0 },
//!   "download": "https://x/ext.vsix"
//! }
//! ```

use crate::config::VersionPolicy;
use crate::constants::PACKAGE_EXTENSION;
use crate::core::UpdaterError;
use crate::utils::fs::validate_file_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// `major.minor.patch` as published by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Identity and version of the latest published package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub name: String,
    pub version: Version,
}

impl ExtensionDescriptor {
    /// Name shown to the user: display name, else id, else package name.
    #[must_use]
    pub fn label(&self) -> &str {
        [self.display_name.as_deref(), Some(self.id.as_str()), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }
}

/// Full metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMetadata {
    #[serde(flatten)]
    pub descriptor: ExtensionDescriptor,
    /// Absolute package URL. Only the install path requires it.
    #[serde(default)]
    pub download: Option<String>,
}

impl UpdateMetadata {
    /// The download URL, or [`UpdaterError::MissingDownloadUrl`].
    pub fn download_url(&self) -> Result<&str, UpdaterError> {
        self.download.as_deref().filter(|d| !d.is_empty()).ok_or_else(|| {
            UpdaterError::MissingDownloadUrl {
                name: self.descriptor.name.clone(),
            }
        })
    }
}

/// Parse a metadata body fetched from `url`.
pub fn parse_metadata(url: &str, body: &[u8]) -> Result<UpdateMetadata, UpdaterError> {
    serde_json::from_slice(body).map_err(|e| UpdaterError::MalformedMetadata {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Whether the installed version already matches the published one.
///
/// Under [`VersionPolicy::Exact`] this is plain string equality with
/// `major.minor.patch`, so any difference (including a remote downgrade)
/// counts as an available update. Under [`VersionPolicy::Newer`] only a
/// strictly newer remote version counts; an installed version that is not
/// valid semver falls back to the exact rule.
#[must_use]
pub fn is_up_to_date(installed: Option<&str>, remote: &Version, policy: VersionPolicy) -> bool {
    let Some(installed) = installed else {
        return false;
    };
    let remote_str = remote.to_string();
    if installed == remote_str {
        return true;
    }
    match policy {
        VersionPolicy::Exact => false,
        VersionPolicy::Newer => match semver::Version::parse(installed) {
            Ok(current) => {
                let latest = semver::Version::new(remote.major, remote.minor, remote.patch);
                latest <= current
            }
            Err(_) => false,
        },
    }
}

/// File name the package is written under.
///
/// The metadata `name` must be a plain file name. A `.vsix` extension is
/// appended when the name has none.
pub fn package_file_name(name: &str) -> Result<String, UpdaterError> {
    validate_file_name(name).map_err(|reason| UpdaterError::InvalidPackageName {
        name: name.to_string(),
        reason,
    })?;
    if Path::new(name).extension().is_some() {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.{PACKAGE_EXTENSION}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "id": "pub.ext",
        "name": "ext",
        "displayName": "Ext",
        "version": {"major": 1, "minor": 2, "patch": 0},
        "download": "https://x/ext.vsix"
    }"#;

    #[test]
    fn test_parse_full_document() {
        let metadata = parse_metadata("https://x/api", FULL.as_bytes()).unwrap();
        assert_eq!(metadata.descriptor.id, "pub.ext");
        assert_eq!(metadata.descriptor.label(), "Ext");
        assert_eq!(metadata.descriptor.version.to_string(), "1.2.0");
        assert_eq!(metadata.download_url().unwrap(), "https://x/ext.vsix");
    }

    #[test]
    fn test_display_name_is_optional() {
        let body = br#"{"id":"pub.ext","name":"ext","version":{"major":0,"minor":1,"patch":9}}"#;
        let metadata = parse_metadata("u", body).unwrap();
        assert_eq!(metadata.descriptor.label(), "pub.ext");
        assert!(matches!(metadata.download_url(), Err(UpdaterError::MissingDownloadUrl { .. })));
    }

    #[test]
    fn test_label_skips_empty_display_name() {
        let body = br#"{"id":"","displayName":"","name":"ext","version":{"major":1,"minor":0,"patch":0}}"#;
        let metadata = parse_metadata("u", body).unwrap();
        assert_eq!(metadata.descriptor.label(), "ext");
    }

    #[test]
    fn test_missing_version_field_is_malformed() {
        let body = br#"{"id":"pub.ext","name":"ext","version":{"major":1,"minor":2}}"#;
        let err = parse_metadata("https://x/api", body).unwrap_err();
        match err {
            UpdaterError::MalformedMetadata {
                url,
                reason,
            } => {
                assert_eq!(url, "https://x/api");
                assert!(reason.contains("patch"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            parse_metadata("u", b"<html>"),
            Err(UpdaterError::MalformedMetadata { .. })
        ));
    }

    #[test]
    fn test_exact_policy_is_string_equality() {
        let remote = Version {
            major: 1,
            minor: 2,
            patch: 0,
        };
        assert!(is_up_to_date(Some("1.2.0"), &remote, VersionPolicy::Exact));
        assert!(!is_up_to_date(Some("1.1.0"), &remote, VersionPolicy::Exact));
        // An older remote version still counts as an update.
        assert!(!is_up_to_date(Some("1.3.0"), &remote, VersionPolicy::Exact));
        assert!(!is_up_to_date(Some("1.2"), &remote, VersionPolicy::Exact));
        assert!(!is_up_to_date(None, &remote, VersionPolicy::Exact));
    }

    #[test]
    fn test_newer_policy_uses_semver_ordering() {
        let remote = Version {
            major: 1,
            minor: 2,
            patch: 0,
        };
        assert!(is_up_to_date(Some("1.3.0"), &remote, VersionPolicy::Newer));
        assert!(is_up_to_date(Some("1.2.0"), &remote, VersionPolicy::Newer));
        assert!(!is_up_to_date(Some("1.1.9"), &remote, VersionPolicy::Newer));
        assert!(!is_up_to_date(Some("not-semver"), &remote, VersionPolicy::Newer));
        assert!(!is_up_to_date(None, &remote, VersionPolicy::Newer));
    }

    #[test]
    fn test_package_file_name() {
        assert_eq!(package_file_name("ext").unwrap(), "ext.vsix");
        assert_eq!(package_file_name("ext-1.2.0.vsix").unwrap(), "ext-1.2.0.vsix");
        assert!(matches!(
            package_file_name("../../etc/passwd"),
            Err(UpdaterError::InvalidPackageName { .. })
        ));
        assert!(package_file_name("").is_err());
    }
}
