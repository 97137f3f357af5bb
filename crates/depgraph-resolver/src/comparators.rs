use semver::Version;

use crate::version_utils::increment;

/// One bound a version has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Exact(Version),
    Above(Version),
    AtLeast(Version),
    Below(Version),
    AtMost(Version),
    Any,
}

impl Bound {
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::Above(v) => version > v,
            Self::AtLeast(v) => version >= v,
            Self::Below(v) => version < v,
            Self::AtMost(v) => version <= v,
            Self::Any => true,
        }
    }

    /// `^v`: the left-most non-zero component may not change.
    pub fn caret(v: Version) -> Result<Vec<Self>, String> {
        let ceiling = if v.major > 0 {
            Version::new(increment(v.major)?, 0, 0)
        } else if v.minor > 0 {
            Version::new(0, increment(v.minor)?, 0)
        } else {
            Version::new(0, 0, increment(v.patch)?)
        };
        Ok(vec![Self::AtLeast(v), Self::Below(ceiling)])
    }

    /// `~v`: patch-level changes only.
    pub fn tilde(v: Version) -> Result<Vec<Self>, String> {
        let ceiling = Version::new(v.major, increment(v.minor)?, 0);
        Ok(vec![Self::AtLeast(v), Self::Below(ceiling)])
    }
}

/// Bounds that must all hold (one `||` clause of a range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub bounds: Vec<Bound>,
}

impl Range {
    #[must_use]
    pub const fn new(bounds: Vec<Bound>) -> Self {
        Self { bounds }
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.bounds.iter().all(|bound| bound.matches(version))
    }
}
