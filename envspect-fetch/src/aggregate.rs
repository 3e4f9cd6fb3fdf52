//! Report assembly.
//!
//! Folds per-context and per-repository results into the final [`Report`].
//! Membership rules are deliberate: a project appears under `projects` only
//! when it has inventory worth reading, and under `unavailable` only when a
//! sub-fetch failed. A repository can appear in both sections, or in
//! neither.

use std::collections::BTreeMap;

use tracing::debug;

use envspect_core::{ContextData, Report};

use crate::collector::ProjectOutcome;

/// Builds the report from collected contexts and repository outcomes.
///
/// Contexts are carried through untouched. Repository outcomes are split:
/// failure reasons (in sub-fetch order) go to `unavailable`, and the
/// remaining data becomes a `projects` entry when any variables or checkout
/// keys were found. Additional SSH keys alone do not qualify a project.
pub fn build_report(contexts: Vec<ContextData>, outcomes: Vec<ProjectOutcome>) -> Report {
    let mut projects = Vec::new();
    let mut unavailable = BTreeMap::new();

    for outcome in outcomes {
        let reasons = outcome.failure_reasons();
        if !reasons.is_empty() {
            unavailable.insert(outcome.repo.clone(), reasons);
        }
        let data = outcome.into_project_data();
        if data.has_inventory() {
            projects.push(data);
        }
    }

    debug!(
        contexts = contexts.len(),
        projects = projects.len(),
        unavailable = unavailable.len(),
        "Report assembled"
    );
    Report {
        contexts,
        projects,
        unavailable,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use envspect_core::{CheckoutKey, ProjectVariable, RepoId, SshKey};

    use crate::collector::SubFetch;

    fn repo(full_name: &str) -> RepoId {
        RepoId::from_full_name(full_name)
    }

    fn outcome(full_name: &str) -> ProjectOutcome {
        ProjectOutcome {
            repo: repo(full_name),
            variables: SubFetch::Success(Vec::new()),
            checkout_keys: SubFetch::Success(Vec::new()),
            additional_keys: SubFetch::Success(Vec::new()),
        }
    }

    fn variable(name: &str) -> ProjectVariable {
        ProjectVariable {
            name: name.to_string(),
            value: "xxxx1234".to_string(),
        }
    }

    fn checkout_key() -> CheckoutKey {
        CheckoutKey {
            public_key: "ssh-rsa AAAA".to_string(),
            key_type: "deploy-key".to_string(),
            fingerprint: "aa:bb:cc".to_string(),
            preferred: false,
            created_at: None,
        }
    }

    fn ssh_key(hostname: &str) -> SshKey {
        SshKey {
            hostname: Some(hostname.to_string()),
            public_key: Some("ssh-rsa BBBB".to_string()),
            fingerprint: None,
        }
    }

    #[test]
    fn test_project_with_variables_is_listed() {
        let mut with_vars = outcome("acme/alpha");
        with_vars.variables = SubFetch::Success(vec![variable("API_KEY")]);

        let report = build_report(Vec::new(), vec![with_vars]);

        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].name, repo("acme/alpha"));
        assert!(report.unavailable.is_empty());
    }

    #[test]
    fn test_project_with_only_checkout_keys_is_listed() {
        let mut with_keys = outcome("acme/beta");
        with_keys.checkout_keys = SubFetch::Success(vec![checkout_key()]);

        let report = build_report(Vec::new(), vec![with_keys]);

        assert_eq!(report.projects.len(), 1);
    }

    #[test]
    fn test_additional_keys_alone_do_not_qualify() {
        let mut host_keys_only = outcome("acme/gamma");
        host_keys_only.additional_keys = SubFetch::Success(vec![ssh_key("github.acme.com")]);

        let report = build_report(Vec::new(), vec![host_keys_only]);

        assert!(report.projects.is_empty());
        assert!(report.unavailable.is_empty());
    }

    #[test]
    fn test_empty_project_is_omitted() {
        let report = build_report(Vec::new(), vec![outcome("acme/empty")]);

        assert!(report.projects.is_empty());
        assert!(report.unavailable.is_empty());
    }

    #[test]
    fn test_failures_are_keyed_by_repository() {
        let mut denied = outcome("acme/locked");
        denied.variables = SubFetch::Failure {
            status: 403,
            status_text: "Forbidden".to_string(),
        };
        denied.additional_keys = SubFetch::Failure {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };

        let report = build_report(Vec::new(), vec![denied]);

        assert!(report.projects.is_empty());
        let reasons = report.unavailable.get(&repo("acme/locked")).unwrap();
        assert_eq!(
            reasons,
            &vec![
                "Project environment variables: 403 - Forbidden".to_string(),
                "Additional SSH keys: 500 - Internal Server Error".to_string(),
            ]
        );
    }

    #[test]
    fn test_partial_failure_can_appear_in_both_sections() {
        let mut partial = outcome("acme/delta");
        partial.variables = SubFetch::Success(vec![variable("DEPLOY_KEY")]);
        partial.checkout_keys = SubFetch::Failure {
            status: 404,
            status_text: "Not Found".to_string(),
        };

        let report = build_report(Vec::new(), vec![partial]);

        assert_eq!(report.projects.len(), 1);
        assert!(report.projects[0].ssh_checkout_keys.is_none());
        assert!(report.unavailable.contains_key(&repo("acme/delta")));
    }

    #[test]
    fn test_project_order_follows_outcome_order() {
        let mut first = outcome("acme/zeta");
        first.variables = SubFetch::Success(vec![variable("A")]);
        let mut second = outcome("acme/alpha");
        second.variables = SubFetch::Success(vec![variable("B")]);

        let report = build_report(Vec::new(), vec![first, second]);

        let names: Vec<_> = report.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["acme/zeta", "acme/alpha"]);
    }

    #[test]
    fn test_unavailable_keys_are_sorted() {
        let mut failures = Vec::new();
        for name in ["acme/zeta", "acme/alpha", "acme/mid"] {
            let mut bad = outcome(name);
            bad.variables = SubFetch::Failure {
                status: 403,
                status_text: "Forbidden".to_string(),
            };
            failures.push(bad);
        }

        let report = build_report(Vec::new(), failures);

        let keys: Vec<_> = report.unavailable.keys().map(RepoId::as_str).collect();
        assert_eq!(keys, vec!["acme/alpha", "acme/mid", "acme/zeta"]);
    }
}
