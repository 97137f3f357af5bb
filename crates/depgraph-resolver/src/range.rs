use semver::Version;
use std::cmp::Ordering;

use crate::semver::{canonicalize_range, parse_npm_semver_ranges, satisfies_any};
use depgraph_constants::NO_DATA_LABEL;

/// Canonical spelling of a declared range. Blank input and `*` collapse to
/// `*`; anything the range grammar rejects comes back untouched.
#[must_use]
pub fn normalize_range(range: &str) -> String {
    let trimmed = range.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return "*".to_string();
    }

    match canonicalize_range(trimmed) {
        Ok(canonical) => canonical,
        Err(e) => {
            depgraph_logger::warn(&format!("Unrecognized version range '{trimmed}': {e}"));
            range.to_string()
        }
    }
}

/// Highest stable version in `available_versions` satisfying `range`.
pub fn find_max_satisfying<'a, I>(range: &str, available_versions: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if range.trim().is_empty() {
        return None;
    }

    let ranges = parse_npm_semver_ranges(&normalize_range(range)).ok()?;

    available_versions
        .into_iter()
        .filter_map(|raw| Version::parse(raw).ok().map(|parsed| (parsed, raw)))
        .filter(|(parsed, _)| parsed.pre.is_empty() && satisfies_any(&ranges, parsed))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw.to_string())
}

/// Orders optional version strings: absent sorts first, then semver order.
/// Unparseable versions sort below parseable ones and among themselves
/// lexically.
#[must_use]
pub fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (Version::parse(a), Version::parse(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => a.cmp(b),
        },
    }
}

#[must_use]
pub fn is_outdated(resolved: Option<&str>, latest: Option<&str>) -> bool {
    let (Some(resolved), Some(latest)) = (resolved, latest) else {
        return false;
    };

    match (Version::parse(resolved), Version::parse(latest)) {
        (Ok(resolved), Ok(latest)) => resolved < latest,
        (Err(e), _) | (_, Err(e)) => {
            depgraph_logger::debug(&format!(
                "Cannot compare {resolved} with {latest}: {e}"
            ));
            false
        }
    }
}

#[must_use]
pub fn is_exact_version(range: &str) -> bool {
    Version::parse(range).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStyle {
    Unconstrained,
    Caret,
    Tilde,
    LowerBound,
    Exact,
    Custom,
}

impl RangeStyle {
    #[must_use]
    pub fn classify(range: &str) -> Self {
        let normalized = normalize_range(range);
        if normalized == "*" {
            Self::Unconstrained
        } else if normalized.starts_with('^') {
            Self::Caret
        } else if normalized.starts_with('~') {
            Self::Tilde
        } else if normalized.starts_with(">=") {
            Self::LowerBound
        } else if is_exact_version(&normalized) {
            Self::Exact
        } else {
            Self::Custom
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Unconstrained => "any version (unconstrained)",
            Self::Caret => "minor and patch updates within the same major",
            Self::Tilde => "patch updates within the same minor",
            Self::LowerBound => "open lower bound (at or above a minimum)",
            Self::Exact => "pinned to an exact version",
            Self::Custom => "custom range",
        }
    }
}

#[must_use]
pub fn describe_range(range: &str) -> String {
    RangeStyle::classify(range).description().to_string()
}

#[must_use]
pub fn format_version_label(resolved: Option<&str>, latest: Option<&str>) -> String {
    match (resolved, latest) {
        (None, None) => NO_DATA_LABEL.to_string(),
        (None, Some(latest)) => format!("unresolved (latest {latest})"),
        (Some(resolved), None) => resolved.to_string(),
        (Some(resolved), Some(latest)) if resolved == latest => resolved.to_string(),
        (Some(resolved), Some(latest)) => format!("{resolved} (latest {latest})"),
    }
}
