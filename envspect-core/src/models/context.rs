//! CircleCI context types.
//!
//! Contexts are account-level groups of environment variables. The listing
//! and variable shapes here follow the v2 API; [`ContextData`] is the merged
//! per-context record the report carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Context listing
// ============================================================================

/// A context as returned by the v2 context listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Unique context id (UUID).
    pub id: String,
    /// Human-readable context name.
    pub name: String,
    /// When the context was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Context variables
// ============================================================================

/// An environment variable attached to a context.
///
/// CircleCI never returns variable values; the name and metadata are the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextVariable {
    /// Variable name.
    pub variable: String,
    /// Id of the owning context.
    pub context_id: String,
    /// When the variable was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Report entry
// ============================================================================

/// One context and its variables as recorded in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextData {
    /// Context name.
    pub name: String,
    /// Context id.
    pub id: String,
    /// Variables attached to the context.
    pub variables: Vec<ContextVariable>,
}

impl ContextData {
    /// Merges a listed context with its fetched variables.
    pub fn new(context: Context, variables: Vec<ContextVariable>) -> Self {
        Self {
            name: context.name,
            id: context.id,
            variables,
        }
    }
}
