use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The subset of a `package.json` that matters for dependency analysis.
/// Maps keep declaration order, which drives resolution order.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PackageJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, String>>,
    #[serde(rename = "devDependencies", skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<IndexMap<String, String>>,
    // Everything else, including peer and optional dependency maps.
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

impl PackageJson {
    #[must_use]
    pub fn from_dependencies<I, K, V>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            dependencies: Some(
                dependencies
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// `dependencies`, followed by `devDependencies` when requested. A dev
    /// entry replaces the range of a same-named runtime entry but keeps its
    /// position.
    #[must_use]
    pub fn direct_dependencies(&self, include_dev: bool) -> IndexMap<String, String> {
        let mut all_deps = IndexMap::new();

        if let Some(deps) = &self.dependencies {
            all_deps.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if include_dev {
            if let Some(dev_deps) = &self.dev_dependencies {
                all_deps.extend(dev_deps.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        all_deps
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => format!("{name}@{version}"),
            (Some(name), None) => name.clone(),
            _ => "(unnamed package)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_dependencies_keep_declaration_order() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{
                "name": "app",
                "dependencies": { "zod": "^3.0.0", "axios": "^1.6.0", "react": "^19.2.0" },
                "devDependencies": { "vitest": "^2.0.0" }
            }"#,
        )
        .unwrap();

        let names: Vec<_> = pkg.direct_dependencies(false).into_keys().collect();
        assert_eq!(names, vec!["zod", "axios", "react"]);

        let with_dev: Vec<_> = pkg.direct_dependencies(true).into_keys().collect();
        assert_eq!(with_dev, vec!["zod", "axios", "react", "vitest"]);
    }

    #[test]
    fn test_dev_range_wins_on_collision() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{
                "dependencies": { "typescript": "^5.0.0", "lodash": "^4.17.0" },
                "devDependencies": { "typescript": "~5.4.0" }
            }"#,
        )
        .unwrap();

        let deps = pkg.direct_dependencies(true);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.get_index(0).map(|(k, _)| k.as_str()), Some("typescript"));
        assert_eq!(deps.get("typescript").map(String::as_str), Some("~5.4.0"));
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let pkg: PackageJson = serde_json::from_str(
            r#"{ "name": "app", "private": true, "peerDependencies": { "react": "^19.0.0" } }"#,
        )
        .unwrap();
        assert_eq!(pkg.other.get("private"), Some(&serde_json::Value::Bool(true)));
        assert!(pkg.other.contains_key("peerDependencies"));
        assert!(pkg.direct_dependencies(true).is_empty());
        assert_eq!(pkg.display_name(), "app");
    }
}
