use depgraph_project::PackageJson;
use depgraph_registry::{InMemoryRegistry, PackageMetadata, VersionManifest};

const VERSIONS: [&str; 4] = ["1.0.0", "1.1.0", "1.2.3", "2.0.0"];

fn package_name(level: usize, index: usize) -> String {
    format!("pkg-{level}-{index}")
}

/// A layered registry: every package on `level` depends on all `width`
/// packages of `level + 1`, down to `depth` levels. Even-indexed packages
/// ask for `^1.0.0` and odd ones for `^2.0.0`, so every shared package ends
/// up duplicated.
#[must_use]
pub fn synthetic_registry(width: usize, depth: usize) -> InMemoryRegistry {
    (0..depth).fold(InMemoryRegistry::new(), |registry, level| {
        (0..width).fold(registry, |registry, index| {
            let manifest = if level + 1 < depth {
                (0..width).fold(VersionManifest::default(), |manifest, child| {
                    let range = if index % 2 == 0 { "^1.0.0" } else { "^2.0.0" };
                    manifest.with_dependency(&package_name(level + 1, child), range)
                })
            } else {
                VersionManifest::default()
            };

            let metadata = VERSIONS
                .iter()
                .fold(PackageMetadata::new(&package_name(level, index)), |metadata, version| {
                    metadata.with_version(version, manifest.clone())
                })
                .with_latest("2.0.0");
            registry.with_package(metadata)
        })
    })
}

/// Manifest depending on every top-level package of [`synthetic_registry`].
#[must_use]
pub fn synthetic_manifest(width: usize) -> PackageJson {
    PackageJson::from_dependencies((0..width).map(|index| (package_name(0, index), "^1.0.0")))
}

/// A mixed bag of range spellings seen in real manifests.
pub const SAMPLE_RANGES: &[&str] = &[
    "^1.2.3",
    "~0.4.0",
    ">=1.0.0 <3.0.0",
    "1.x",
    "1.2.3 - 2.0.0",
    "^1.0.0 || ^2.0.0",
    "*",
    "v2.0.0",
    "latest",
];

#[cfg(test)]
mod tests {
    use super::*;
    use depgraph_registry::RegistryClient;
    use depgraph_resolver::{ResolveOptions, resolve_package_graph};

    #[tokio::test]
    async fn test_synthetic_graph_shape() {
        let registry = RegistryClient::new(synthetic_registry(2, 3));
        let result =
            resolve_package_graph(&synthetic_manifest(2), ResolveOptions::default(), &registry)
                .await
                .unwrap();

        assert_eq!(result.tree.len(), 2);
        assert_eq!(result.tree[0].children.len(), 2);
        assert_eq!(result.tree[0].children[0].children.len(), 2);
        assert!(result.tree[0].children[0].children[0].is_leaf());
        assert!(result.duplicates.contains_key("pkg-1-0"));
        assert_eq!(result.edges.len(), 2 * 2 + 2 * 2 * 2);
    }
}
