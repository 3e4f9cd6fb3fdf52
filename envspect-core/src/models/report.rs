//! The consolidated report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::context::ContextData;
use super::project::ProjectData;
use super::repo::RepoId;

/// The consolidated inventory for one account.
///
/// Serialized pretty-printed (two-space indent) to the report file. Field
/// names and nesting match the established `circleci-data.json` format, so
/// downstream consumers of earlier exports keep working.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Every context under the account, with its variables.
    pub contexts: Vec<ContextData>,
    /// Repositories with at least one variable or checkout key.
    pub projects: Vec<ProjectData>,
    /// Per-repository failure descriptions, keyed by `owner/name`.
    ///
    /// A key is present iff at least one sub-fetch for that repository
    /// failed. Keys serialize in sorted order.
    #[serde(default)]
    pub unavailable: BTreeMap<RepoId, Vec<String>>,
}

impl Report {
    /// Returns true if the report carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty() && self.projects.is_empty() && self.unavailable.is_empty()
    }

    /// Serializes the report the way the report file is written
    /// (pretty-printed, two-space indent).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if JSON encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
