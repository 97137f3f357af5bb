use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::range::{is_exact_version, is_outdated, normalize_range};
use crate::version_utils::parse_partial_version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Outdated,
    Duplicate,
    Conflict,
    Error,
    Vulnerable,
    Advice,
}

impl IssueType {
    pub const ALL: [Self; 6] = [
        Self::Outdated,
        Self::Duplicate,
        Self::Conflict,
        Self::Error,
        Self::Vulnerable,
        Self::Advice,
    ];

    /// Most severe first.
    pub const SEVERITY_ORDER: [Self; 6] = [
        Self::Vulnerable,
        Self::Error,
        Self::Conflict,
        Self::Outdated,
        Self::Duplicate,
        Self::Advice,
    ];

    #[must_use]
    pub fn severity_rank(self) -> usize {
        Self::SEVERITY_ORDER
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::SEVERITY_ORDER.len())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outdated => "outdated",
            Self::Duplicate => "duplicate",
            Self::Conflict => "conflict",
            Self::Error => "error",
            Self::Vulnerable => "vulnerable",
            Self::Advice => "advice",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic attached to a resolved node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_versions: Option<Vec<String>>,
}

impl VersionIssue {
    pub fn new(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            message: message.into(),
            affected_versions: None,
        }
    }

    #[must_use]
    pub fn with_affected_versions(mut self, versions: Vec<String>) -> Self {
        self.affected_versions = Some(versions);
        self
    }

    pub fn advice(message: impl Into<String>) -> Self {
        Self::new(IssueType::Advice, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(IssueType::Error, message)
    }

    fn same_as(&self, other: &Self) -> bool {
        self.issue_type == other.issue_type && self.message == other.message
    }
}

/// Range-quality advice for one declared range. Every rule is checked on
/// its own, so a single range can collect several pieces of advice.
#[must_use]
pub fn build_range_advice(
    range: &str,
    resolved: Option<&str>,
    latest: Option<&str>,
) -> Vec<VersionIssue> {
    let normalized = normalize_range(range);
    let preferred = resolved.or(latest);
    let mut advice = Vec::new();

    if normalized == "*" {
        advice.push(VersionIssue::advice(match preferred {
            Some(preferred) => format!(
                "Range \"*\" accepts any release, including breaking majors; declare ^{preferred} instead"
            ),
            None => "Range \"*\" accepts any release, including breaking majors; declare a caret range instead".to_string(),
        }));
    }

    if let Some(preferred) = preferred {
        if is_exact_version(&normalized) {
            advice.push(VersionIssue::advice(format!(
                "Exact pin {normalized} blocks compatible fixes; consider ^{preferred}"
            )));
        }

        if normalized.starts_with('~') {
            advice.push(VersionIssue::advice(format!(
                "Range {normalized} only accepts patch releases; broaden to ^{preferred} to receive compatible minor releases"
            )));
        }

        if let Some(minimum) = lower_bound(&normalized) {
            if parse_partial_version(minimum).is_ok() {
                advice.push(VersionIssue::advice(format!(
                    "Range {normalized} starts at an open lower bound; consider ^{preferred} to stay on reviewed majors"
                )));
            }
        }
    }

    if normalized.starts_with('^') {
        if let (Some(resolved), Some(latest)) = (resolved, latest) {
            if let (Ok(current), Ok(newest)) = (Version::parse(resolved), Version::parse(latest)) {
                if newest.major > current.major {
                    advice.push(VersionIssue::advice(format!(
                        "Major version {} is available ({latest}); {normalized} stays on {}.x, consider upgrading",
                        newest.major, current.major
                    )));
                }
            }
        }
    }

    advice
}

fn lower_bound(normalized: &str) -> Option<&str> {
    normalized
        .strip_prefix(">=")?
        .split_whitespace()
        .next()
}

#[must_use]
pub fn outdated_issue(resolved: Option<&str>, latest: Option<&str>) -> Option<VersionIssue> {
    if !is_outdated(resolved, latest) {
        return None;
    }
    let (resolved, latest) = (resolved?, latest?);
    Some(
        VersionIssue::new(
            IssueType::Outdated,
            format!("Resolved {resolved} is behind the latest release {latest}"),
        )
        .with_affected_versions(vec![resolved.to_string(), latest.to_string()]),
    )
}

#[must_use]
pub fn deprecation_issue(name: &str, version: &str, notice: &str) -> VersionIssue {
    VersionIssue::new(
        IssueType::Vulnerable,
        format!("{name}@{version} is deprecated: {notice}"),
    )
    .with_affected_versions(vec![version.to_string()])
}

#[must_use]
pub fn conflict_issue(range: &str, latest: Option<&str>) -> VersionIssue {
    let message = match latest {
        Some(latest) => format!("No published version satisfies {range} (latest is {latest})"),
        None => format!("No published version satisfies {range}"),
    };
    VersionIssue::new(IssueType::Conflict, message)
}

/// Appends the issues from `incoming` whose `(type, message)` pair is not
/// already present. Existing issues keep their position.
pub fn merge_issues<I>(existing: &mut Vec<VersionIssue>, incoming: I)
where
    I: IntoIterator<Item = VersionIssue>,
{
    for issue in incoming {
        if !existing.iter().any(|present| present.same_as(&issue)) {
            existing.push(issue);
        }
    }
}
