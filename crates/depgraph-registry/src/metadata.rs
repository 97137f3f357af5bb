use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Registry document for one package: every published version plus its
/// dist-tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub versions: IndexMap<String, VersionManifest>,
    #[serde(rename = "dist-tags", alias = "distTags", default)]
    pub dist_tags: DistTags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(flatten)]
    pub other: IndexMap<String, String>,
}

/// The per-version manifest fields the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionManifest {
    #[serde(default, deserialize_with = "dependency_map")]
    pub dependencies: IndexMap<String, String>,
    #[serde(
        rename = "devDependencies",
        default,
        deserialize_with = "dependency_map"
    )]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(
        rename = "peerDependencies",
        default,
        deserialize_with = "dependency_map"
    )]
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Value>,
}

// Published manifests occasionally carry `null` maps or non-string ranges.
// Those entries are dropped instead of rejecting the whole document.
fn dependency_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, range)| match range {
            Value::String(range) => Some((name, range)),
            _ => None,
        })
        .collect())
}

impl PackageMetadata {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: &str, manifest: VersionManifest) -> Self {
        self.versions.insert(version.to_string(), manifest);
        self
    }

    #[must_use]
    pub fn with_latest(mut self, version: &str) -> Self {
        self.dist_tags.latest = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: &str, version: &str) -> Self {
        if tag == "latest" {
            return self.with_latest(version);
        }
        self.dist_tags
            .other
            .insert(tag.to_string(), version.to_string());
        self
    }

    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn manifest(&self, version: &str) -> Option<&VersionManifest> {
        self.versions.get(version)
    }
}

impl DistTags {
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        if tag == "latest" {
            return self.latest.as_deref();
        }
        self.other.get(tag).map(String::as_str)
    }
}

impl VersionManifest {
    #[must_use]
    pub fn with_dependency(mut self, name: &str, range: &str) -> Self {
        self.dependencies.insert(name.to_string(), range.to_string());
        self
    }

    #[must_use]
    pub fn with_peer_dependency(mut self, name: &str, range: &str) -> Self {
        self.peer_dependencies
            .insert(name.to_string(), range.to_string());
        self
    }

    #[must_use]
    pub fn with_deprecation(mut self, notice: &str) -> Self {
        self.deprecated = Some(Value::String(notice.to_string()));
        self
    }

    /// `deprecated` is a free-form string in practice; `true` is treated as a
    /// notice without text and `false`/empty strings as no notice.
    #[must_use]
    pub fn deprecation_notice(&self) -> Option<String> {
        match self.deprecated.as_ref()? {
            Value::String(notice) if !notice.trim().is_empty() => Some(notice.trim().to_string()),
            Value::Bool(true) => Some("this version is deprecated".to_string()),
            _ => None,
        }
    }

    /// Runtime dependencies, overlaid with peer dependencies when requested.
    /// A peer entry replaces the range of a same-named runtime entry.
    #[must_use]
    pub fn expandable_dependencies(&self, include_peer: bool) -> IndexMap<String, String> {
        let mut combined = self.dependencies.clone();
        if include_peer {
            for (name, range) in &self.peer_dependencies {
                combined.insert(name.clone(), range.clone());
            }
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_registry_document() {
        let json = r#"{
            "name": "chalk",
            "dist-tags": { "latest": "5.3.0", "next": "6.0.0-beta.1" },
            "versions": {
                "4.1.2": {
                    "name": "chalk",
                    "dependencies": { "ansi-styles": "^4.1.0", "supports-color": "^7.1.0" }
                },
                "5.3.0": { "name": "chalk", "dependencies": null, "deprecated": false }
            }
        }"#;

        let metadata: PackageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.name, "chalk");
        assert_eq!(metadata.dist_tags.latest.as_deref(), Some("5.3.0"));
        assert_eq!(metadata.dist_tags.get("next"), Some("6.0.0-beta.1"));
        assert_eq!(metadata.version_names().collect::<Vec<_>>(), vec!["4.1.2", "5.3.0"]);

        let old = metadata.manifest("4.1.2").unwrap();
        assert_eq!(
            old.dependencies.keys().collect::<Vec<_>>(),
            vec!["ansi-styles", "supports-color"]
        );
        let new = metadata.manifest("5.3.0").unwrap();
        assert!(new.dependencies.is_empty());
        assert_eq!(new.deprecation_notice(), None);
    }

    #[test]
    fn test_non_string_ranges_are_dropped() {
        let manifest: VersionManifest =
            serde_json::from_str(r#"{ "dependencies": { "a": "^1.0.0", "b": 3 } }"#).unwrap();
        assert_eq!(manifest.dependencies.len(), 1);
        assert!(manifest.dependencies.contains_key("a"));
    }

    #[test]
    fn test_deprecation_notice_variants() {
        let manifest = VersionManifest::default().with_deprecation("use v2 instead");
        assert_eq!(manifest.deprecation_notice().as_deref(), Some("use v2 instead"));

        let flagged = VersionManifest {
            deprecated: Some(Value::Bool(true)),
            ..VersionManifest::default()
        };
        assert!(flagged.deprecation_notice().is_some());

        let blank = VersionManifest::default().with_deprecation("  ");
        assert_eq!(blank.deprecation_notice(), None);
    }

    #[test]
    fn test_peer_dependencies_override_runtime_ranges() {
        let manifest = VersionManifest::default()
            .with_dependency("react", "^18.0.0")
            .with_dependency("scheduler", "^0.23.0")
            .with_peer_dependency("react", "^19.0.0")
            .with_peer_dependency("react-dom", "^19.0.0");

        let without_peer = manifest.expandable_dependencies(false);
        assert_eq!(without_peer.get("react").map(String::as_str), Some("^18.0.0"));
        assert_eq!(without_peer.len(), 2);

        let with_peer = manifest.expandable_dependencies(true);
        assert_eq!(with_peer.get("react").map(String::as_str), Some("^19.0.0"));
        assert_eq!(
            with_peer.keys().collect::<Vec<_>>(),
            vec!["react", "scheduler", "react-dom"]
        );
    }
}
