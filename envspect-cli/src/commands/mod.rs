//! CLI command implementations.

pub mod collect;
pub mod orgs;

/// Environment variable carrying the CircleCI API token.
pub(crate) const CIRCLE_TOKEN_ENV: &str = "CIRCLE_TOKEN";

/// Environment variable carrying the GitHub access token.
pub(crate) const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the CircleCI v2 base URL.
pub(crate) const CIRCLE_V2_API_ENV: &str = "CIRCLE_V2_API";

/// Environment variable overriding the CircleCI v1.1 base URL.
pub(crate) const CIRCLE_V1_API_ENV: &str = "CIRCLE_V1_API";

/// Environment variable overriding the GitHub API base URL.
pub(crate) const GITHUB_API_ENV: &str = "GITHUB_API";
