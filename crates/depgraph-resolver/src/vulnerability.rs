use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::issues::{IssueType, VersionIssue};
use depgraph_constants::{OSV_ECOSYSTEM, OSV_QUERY_URL, USER_AGENT};

/// Source of known-vulnerability diagnostics for a resolved package.
///
/// Failures carry no meaning for resolution: the resolver logs them and
/// continues as if nothing was found.
#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    async fn check(&self, name: &str, version: &str) -> anyhow::Result<Vec<VersionIssue>>;
}

/// Default source that never reports anything.
pub struct NoVulnerabilities;

#[async_trait]
impl VulnerabilitySource for NoVulnerabilities {
    async fn check(&self, _name: &str, _version: &str) -> anyhow::Result<Vec<VersionIssue>> {
        Ok(Vec::new())
    }
}

/// Queries the OSV.dev database, one request per resolved package version.
pub struct OsvClient {
    client: reqwest::Client,
    api_url: String,
}

impl OsvClient {
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new() -> anyhow::Result<Self> {
        Self::with_url(OSV_QUERY_URL)
    }

    pub fn with_url(api_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct OsvPackage<'a> {
    name: &'a str,
    ecosystem: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct OsvResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    database_specific: Option<OsvDatabaseSpecific>,
}

#[derive(Debug, Deserialize)]
struct OsvDatabaseSpecific {
    #[serde(default)]
    severity: Option<String>,
}

impl OsvVulnerability {
    fn into_issue(self, name: &str, version: &str) -> VersionIssue {
        let mut message = format!("{name}@{version} is affected by {}", self.id);
        if let Some(cve) = self.aliases.iter().find(|alias| alias.starts_with("CVE-")) {
            message.push_str(&format!(" ({cve})"));
        }
        if let Some(severity) = self.database_specific.and_then(|db| db.severity) {
            message.push_str(&format!(" [{}]", severity.to_lowercase()));
        }
        if let Some(summary) = self.summary.filter(|s| !s.trim().is_empty()) {
            message.push_str(&format!(": {}", summary.trim()));
        }

        VersionIssue::new(IssueType::Vulnerable, message)
            .with_affected_versions(vec![version.to_string()])
    }
}

#[async_trait]
impl VulnerabilitySource for OsvClient {
    async fn check(&self, name: &str, version: &str) -> anyhow::Result<Vec<VersionIssue>> {
        let query = OsvQuery {
            package: OsvPackage {
                name,
                ecosystem: OSV_ECOSYSTEM,
            },
            version,
        };

        let response = self.client.post(&self.api_url).json(&query).send().await?;
        if !response.status().is_success() {
            anyhow::bail!(
                "OSV API returned status code {} for {name}@{version}",
                response.status()
            );
        }

        let body: OsvResponse = response.json().await?;
        Ok(body
            .vulns
            .into_iter()
            .map(|vuln| vuln.into_issue(name, version))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_vulnerabilities_is_empty() {
        let issues = NoVulnerabilities.check("react", "19.2.0").await.unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_osv_response_becomes_issues() {
        let body: OsvResponse = serde_json::from_str(
            r#"{
                "vulns": [{
                    "id": "GHSA-xxxx-yyyy-zzzz",
                    "summary": "Prototype pollution in merge",
                    "aliases": ["CVE-2024-0001"],
                    "database_specific": { "severity": "HIGH" }
                }]
            }"#,
        )
        .unwrap();

        let issues: Vec<_> = body
            .vulns
            .into_iter()
            .map(|vuln| vuln.into_issue("lodash", "4.17.20"))
            .collect();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Vulnerable);
        assert_eq!(
            issues[0].message,
            "lodash@4.17.20 is affected by GHSA-xxxx-yyyy-zzzz (CVE-2024-0001) [high]: Prototype pollution in merge"
        );
    }

    #[test]
    fn test_empty_osv_response() {
        let body: OsvResponse = serde_json::from_str("{}").unwrap();
        assert!(body.vulns.is_empty());
    }
}
