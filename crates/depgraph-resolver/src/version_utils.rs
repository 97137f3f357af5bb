use semver::Version;

/// A version as written inside a range: `1`, `1.2`, `1.x`, `*` or a full
/// semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialVersion {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub full: Option<Version>,
}

impl PartialVersion {
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.major.is_none()
    }

    /// Lowest version the partial admits, missing components filled with zero.
    #[must_use]
    pub fn floor(&self) -> Version {
        if let Some(full) = &self.full {
            return full.clone();
        }
        Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }

    /// First version past the partial: `1` → `2.0.0`, `1.2` → `1.3.0`.
    /// `None` for wildcards and full versions.
    pub fn next(&self) -> Result<Option<Version>, String> {
        if self.full.is_some() {
            return Ok(None);
        }
        Ok(match (self.major, self.minor) {
            (Some(major), None) => Some(Version::new(increment(major)?, 0, 0)),
            (Some(major), Some(minor)) => Some(Version::new(major, increment(minor)?, 0)),
            _ => None,
        })
    }
}

/// `component + 1`, failing instead of overflowing on `u64::MAX`.
pub fn increment(component: u64) -> Result<u64, String> {
    component
        .checked_add(1)
        .ok_or_else(|| "version component out of range".to_string())
}

fn is_wildcard_part(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

/// Strip the `v` and `=` prefixes npm tolerates in front of versions.
#[must_use]
pub fn clean_version_text(version_str: &str) -> &str {
    version_str
        .trim()
        .trim_start_matches('=')
        .trim_start_matches(['v', 'V'])
}

/// Parse a single version string into a [`PartialVersion`], handling partial
/// versions and x-ranges.
pub fn parse_partial_version(version_str: &str) -> Result<PartialVersion, String> {
    let cleaned = clean_version_text(version_str);

    if cleaned.is_empty() || is_wildcard_part(cleaned) {
        return Ok(PartialVersion {
            major: None,
            minor: None,
            patch: None,
            full: None,
        });
    }

    if let Ok(version) = Version::parse(cleaned) {
        return Ok(PartialVersion {
            major: Some(version.major),
            minor: Some(version.minor),
            patch: Some(version.patch),
            full: Some(version),
        });
    }

    let parts: Vec<&str> = cleaned.split('.').collect();
    if parts.len() > 3 {
        return Err(format!("Invalid version '{cleaned}'"));
    }

    let mut numbers = [None, None, None];
    let mut seen_wildcard = false;
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if seen_wildcard || is_wildcard_part(part) {
            seen_wildcard = true;
            continue;
        }
        let number = part
            .parse::<u64>()
            .map_err(|_| format!("Invalid version component '{part}' in '{cleaned}'"))?;
        *slot = Some(number);
    }

    let [major, minor, patch] = numbers;
    if major.is_some() && minor.is_some() && patch.is_some() {
        // Three numeric parts that semver rejected (e.g. leading zeros).
        return Err(format!("Invalid version '{cleaned}'"));
    }

    Ok(PartialVersion {
        major,
        minor,
        patch,
        full: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_versions_keep_prerelease() {
        let parsed = parse_partial_version("v1.2.3-beta.1").unwrap();
        assert_eq!(parsed.full, Some(Version::parse("1.2.3-beta.1").unwrap()));
        assert_eq!(parsed.next(), Ok(None));
    }

    #[test]
    fn test_partials_and_x_ranges() {
        let major_only = parse_partial_version("1").unwrap();
        assert_eq!(major_only.floor(), Version::new(1, 0, 0));
        assert_eq!(major_only.next(), Ok(Some(Version::new(2, 0, 0))));

        let minor = parse_partial_version("1.2.x").unwrap();
        assert_eq!(minor.floor(), Version::new(1, 2, 0));
        assert_eq!(minor.next(), Ok(Some(Version::new(1, 3, 0))));

        assert!(parse_partial_version("X").unwrap().is_wildcard());
        assert!(parse_partial_version("*").unwrap().is_wildcard());
    }

    #[test]
    fn test_next_fails_on_maximal_component() {
        let huge = parse_partial_version("18446744073709551615").unwrap();
        assert!(huge.next().is_err());
        let huge_minor = parse_partial_version("1.18446744073709551615").unwrap();
        assert!(huge_minor.next().is_err());
        assert_eq!(increment(41), Ok(42));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_partial_version("latest").is_err());
        assert!(parse_partial_version("1.2.3.4").is_err());
        assert!(parse_partial_version("01.2.3").is_err());
    }
}
