//! Serde serialization/deserialization tests for core types.
//!
//! These tests pin the wire shapes: CircleCI's kebab-case v2 checkout-key
//! fields, the report's camelCase project fields, and omission of absent
//! sub-fetch results.

use crate::{
    CheckoutKey, Context, ContextData, ContextVariable, ProjectData, ProjectVariable, RepoId,
    Report, SshKey, Vcs,
};

// ============================================================================
// Vcs Serde Tests
// ============================================================================

#[test]
fn test_vcs_serde_roundtrip_all_variants() {
    for vcs in Vcs::all() {
        let json = serde_json::to_string(vcs).unwrap();
        let deserialized: Vcs = serde_json::from_str(&json).unwrap();
        assert_eq!(*vcs, deserialized, "Round-trip failed for {:?}", vcs);
    }
}

#[test]
fn test_vcs_deserialize_lowercase() {
    // Vcs uses serde(rename_all = "lowercase"), matching vcs_type values
    let github: Vcs = serde_json::from_str(r#""github""#).unwrap();
    let bitbucket: Vcs = serde_json::from_str(r#""bitbucket""#).unwrap();
    assert_eq!(github, Vcs::GitHub);
    assert_eq!(bitbucket, Vcs::Bitbucket);
}

#[test]
fn test_vcs_invalid_deserialize() {
    let result: Result<Vcs, _> = serde_json::from_str(r#""svn""#);
    assert!(result.is_err());
}

// ============================================================================
// RepoId Serde Tests
// ============================================================================

#[test]
fn test_repo_id_serializes_as_plain_string() {
    let id = RepoId::new("acme", "widgets");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""acme/widgets""#);

    let back: RepoId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ============================================================================
// Context Serde Tests
// ============================================================================

#[test]
fn test_context_deserialize_api_shape() {
    let json = r#"{
        "id": "0ce4e427-7c35-4d28-9ad6-5b9a2a4de13c",
        "name": "shared-secrets",
        "created_at": "2020-10-14T08:24:28.879Z"
    }"#;

    let context: Context = serde_json::from_str(json).unwrap();
    assert_eq!(context.name, "shared-secrets");
    assert!(context.created_at.is_some());
}

#[test]
fn test_context_variable_deserialize_api_shape() {
    let json = r#"{
        "variable": "NPM_TOKEN",
        "context_id": "0ce4e427-7c35-4d28-9ad6-5b9a2a4de13c",
        "created_at": "2021-02-01T16:40:10.000Z"
    }"#;

    let variable: ContextVariable = serde_json::from_str(json).unwrap();
    assert_eq!(variable.variable, "NPM_TOKEN");
}

#[test]
fn test_context_data_field_order() {
    let data = ContextData {
        name: "shared-secrets".to_string(),
        id: "ctx-1".to_string(),
        variables: vec![],
    };

    // name precedes id, matching the established report layout
    let json = serde_json::to_string(&data).unwrap();
    assert!(json.find(r#""name""#).unwrap() < json.find(r#""id""#).unwrap());
}

// ============================================================================
// CheckoutKey Serde Tests
// ============================================================================

#[test]
fn test_checkout_key_kebab_case_wire_names() {
    let json = r#"{
        "public-key": "ssh-rsa AAAAB3NzaC1yc2E= user@circleci",
        "type": "deploy-key",
        "fingerprint": "c9:0b:1c:4f:d5:65:56:b9:ad:88:f9:81:2b:37:74:2f",
        "preferred": true,
        "created-at": "2019-06-27T11:25:05.000Z"
    }"#;

    let key: CheckoutKey = serde_json::from_str(json).unwrap();
    assert_eq!(key.key_type, "deploy-key");
    assert!(key.preferred);

    let out = serde_json::to_string(&key).unwrap();
    assert!(out.contains(r#""public-key""#));
    assert!(out.contains(r#""type""#));
    assert!(out.contains(r#""created-at""#));
    assert!(!out.contains("key_type"));
}

// ============================================================================
// SshKey Serde Tests
// ============================================================================

#[test]
fn test_ssh_key_tolerates_missing_fields() {
    let key: SshKey = serde_json::from_str(r#"{"hostname": "git.internal"}"#).unwrap();
    assert_eq!(key.hostname.as_deref(), Some("git.internal"));
    assert!(key.public_key.is_none());

    // absent fields stay absent on the way back out
    let out = serde_json::to_string(&key).unwrap();
    assert!(!out.contains("public_key"));
}

// ============================================================================
// ProjectData Serde Tests
// ============================================================================

#[test]
fn test_project_data_camel_case_names() {
    let project = ProjectData {
        name: RepoId::new("acme", "widgets"),
        variables: Some(vec![ProjectVariable {
            name: "API_KEY".to_string(),
            value: "xxxx1234".to_string(),
        }]),
        ssh_checkout_keys: Some(vec![]),
        additional_ssh_keys: Some(vec![]),
    };

    let json = serde_json::to_string(&project).unwrap();
    assert!(json.contains(r#""sshCheckoutKeys""#));
    assert!(json.contains(r#""additionalSshKeys""#));
    assert!(!json.contains("ssh_checkout_keys"));
}

#[test]
fn test_project_data_omits_failed_sub_fetches() {
    let project = ProjectData {
        name: RepoId::new("acme", "widgets"),
        variables: Some(vec![]),
        ssh_checkout_keys: None,
        additional_ssh_keys: None,
    };

    let json = serde_json::to_string(&project).unwrap();
    assert!(json.contains(r#""variables""#));
    assert!(!json.contains("sshCheckoutKeys"));
    assert!(!json.contains("additionalSshKeys"));
}

// ============================================================================
// Report Serde Tests
// ============================================================================

#[test]
fn test_report_roundtrip() {
    let mut report = Report::default();
    report.contexts.push(ContextData {
        name: "shared-secrets".to_string(),
        id: "ctx-1".to_string(),
        variables: vec![ContextVariable {
            variable: "NPM_TOKEN".to_string(),
            context_id: "ctx-1".to_string(),
            created_at: None,
        }],
    });
    report.unavailable.insert(
        RepoId::new("acme", "widgets"),
        vec!["SSH checkout keys: 500 - Internal Server Error".to_string()],
    );

    let json = serde_json::to_string(&report).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_report_deserialize_minimal() {
    // unavailable defaults to an empty map when absent
    let json = r#"{"contexts": [], "projects": []}"#;
    let report: Report = serde_json::from_str(json).unwrap();
    assert!(report.is_empty());
}
