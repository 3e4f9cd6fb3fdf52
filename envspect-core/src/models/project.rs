//! Project-level configuration types.
//!
//! Three kinds of per-repository secrets are inventoried: project
//! environment variables and SSH checkout keys from the v2 API, and
//! additional SSH keys from the v1.1 project settings. [`ProjectData`] is
//! the merged per-repository record the report carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repo::RepoId;

// ============================================================================
// Project environment variables
// ============================================================================

/// A project environment variable (v2 `envvar` item).
///
/// CircleCI masks the value down to its last four characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectVariable {
    /// Variable name.
    pub name: String,
    /// Masked value (e.g. `xxxx1234`).
    pub value: String,
}

// ============================================================================
// SSH checkout keys
// ============================================================================

/// An SSH checkout key (v2 `checkout-key` item, kebab-case on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutKey {
    /// Public key material.
    #[serde(rename = "public-key")]
    pub public_key: String,
    /// Key type (`deploy-key` or `github-user-key`).
    #[serde(rename = "type")]
    pub key_type: String,
    /// MD5 fingerprint of the key.
    pub fingerprint: String,
    /// Whether this is the project's preferred key.
    #[serde(default)]
    pub preferred: bool,
    /// When the key was created.
    #[serde(rename = "created-at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Additional SSH keys
// ============================================================================

/// An additional SSH key from the v1.1 project settings (`ssh_keys` item).
///
/// All fields are optional; the v1.1 API predates a stable schema and omits
/// what it does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    /// Hostname the key is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Public key material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// MD5 fingerprint of the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

// ============================================================================
// Report entry
// ============================================================================

/// One repository's collected configuration as recorded in the report.
///
/// A sub-fetch that failed leaves its field absent rather than empty, so the
/// report distinguishes "nothing configured" from "could not be read".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Repository name in `owner/name` form.
    pub name: RepoId,
    /// Project environment variables, when readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<ProjectVariable>>,
    /// SSH checkout keys, when readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_checkout_keys: Option<Vec<CheckoutKey>>,
    /// Additional SSH keys, when readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_ssh_keys: Option<Vec<SshKey>>,
}

impl ProjectData {
    /// Returns true if the repository has at least one variable or checkout
    /// key.
    ///
    /// This is the membership rule for the report's `projects` list;
    /// additional SSH keys alone do not qualify.
    pub fn has_inventory(&self) -> bool {
        self.variables.as_ref().is_some_and(|v| !v.is_empty())
            || self.ssh_checkout_keys.as_ref().is_some_and(|k| !k.is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(name: &str) -> ProjectData {
        ProjectData {
            name: RepoId::from_full_name(name),
            variables: None,
            ssh_checkout_keys: None,
            additional_ssh_keys: None,
        }
    }

    #[test]
    fn test_has_inventory_requires_nonempty_list() {
        let mut project = bare("acme/widgets");
        assert!(!project.has_inventory());

        project.variables = Some(vec![]);
        assert!(!project.has_inventory());

        project.variables = Some(vec![ProjectVariable {
            name: "DEPLOY_KEY".to_string(),
            value: "xxxx1234".to_string(),
        }]);
        assert!(project.has_inventory());
    }

    #[test]
    fn test_has_inventory_counts_checkout_keys() {
        let mut project = bare("acme/widgets");
        project.ssh_checkout_keys = Some(vec![CheckoutKey {
            public_key: "ssh-rsa AAAA".to_string(),
            key_type: "deploy-key".to_string(),
            fingerprint: "aa:bb".to_string(),
            preferred: true,
            created_at: None,
        }]);
        assert!(project.has_inventory());
    }

    #[test]
    fn test_additional_keys_alone_do_not_qualify() {
        let mut project = bare("acme/widgets");
        project.additional_ssh_keys = Some(vec![SshKey {
            hostname: Some("git.internal".to_string()),
            public_key: Some("ssh-rsa BBBB".to_string()),
            fingerprint: None,
        }]);
        assert!(!project.has_inventory());
    }
}
