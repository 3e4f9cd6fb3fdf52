//! Text summary of a collection run.

use std::path::Path;

use envspect_core::Report;

/// Renders the end-of-run summary printed after the report is written.
///
/// Unavailable repositories are listed with every recorded reason, in the
/// sorted order the report stores them.
pub fn render_summary(report: &Report, output: &Path) -> String {
    let mut lines = vec![
        format!("Contexts:    {}", report.contexts.len()),
        format!("Projects:    {}", report.projects.len()),
    ];

    if !report.unavailable.is_empty() {
        lines.push(format!("Unavailable: {}", report.unavailable.len()));
        for (repo, reasons) in &report.unavailable {
            for reason in reasons {
                lines.push(format!("  {repo}: {reason}"));
            }
        }
    }

    lines.push(format!("Report written to {}", output.display()));
    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use envspect_core::{ContextData, ProjectData, RepoId};

    fn context(name: &str) -> ContextData {
        ContextData {
            name: name.to_string(),
            id: format!("{name}-id"),
            variables: Vec::new(),
        }
    }

    fn project(full_name: &str) -> ProjectData {
        ProjectData {
            name: RepoId::from_full_name(full_name),
            variables: Some(Vec::new()),
            ssh_checkout_keys: None,
            additional_ssh_keys: None,
        }
    }

    #[test]
    fn test_summary_without_failures() {
        let report = Report {
            contexts: vec![context("org-globals")],
            projects: vec![project("acme/widgets")],
            unavailable: BTreeMap::new(),
        };

        let summary = render_summary(&report, &PathBuf::from("circleci-data.json"));

        assert_eq!(
            summary,
            "Contexts:    1\n\
             Projects:    1\n\
             Report written to circleci-data.json"
        );
    }

    #[test]
    fn test_summary_lists_unavailable_reasons_in_order() {
        let mut unavailable = BTreeMap::new();
        unavailable.insert(
            RepoId::from_full_name("acme/zeta"),
            vec!["SSH checkout keys: 404 - Not Found".to_string()],
        );
        unavailable.insert(
            RepoId::from_full_name("acme/alpha"),
            vec![
                "Project environment variables: 403 - Forbidden".to_string(),
                "Additional SSH keys: 500 - Internal Server Error".to_string(),
            ],
        );
        let report = Report {
            contexts: Vec::new(),
            projects: Vec::new(),
            unavailable,
        };

        let summary = render_summary(&report, &PathBuf::from("out.json"));

        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines[2], "Unavailable: 2");
        assert_eq!(
            lines[3],
            "  acme/alpha: Project environment variables: 403 - Forbidden"
        );
        assert_eq!(
            lines[4],
            "  acme/alpha: Additional SSH keys: 500 - Internal Server Error"
        );
        assert_eq!(lines[5], "  acme/zeta: SSH checkout keys: 404 - Not Found");
    }
}
