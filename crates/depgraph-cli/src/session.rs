use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use crate::commands::ResolveArgs;
use depgraph_constants::{DEFAULT_REGISTRY_URL, REGISTRY_ENV_VAR};
use depgraph_registry::{InMemoryRegistry, RegistryClient};
use depgraph_resolver::{GraphResolver, OsvClient, ResolveOptions};

/// Collaborators for one analysis session. Resolvers created from the same
/// session share one registry cache.
pub struct Session {
    registry: RegistryClient,
    osv: Option<Arc<OsvClient>>,
}

impl Session {
    pub fn from_args(args: &ResolveArgs) -> Result<Self> {
        let registry = match &args.registry_snapshot {
            Some(path) => {
                depgraph_logger::debug(&format!("Using registry snapshot {}", path.display()));
                RegistryClient::new(InMemoryRegistry::from_snapshot_file(path)?)
            }
            None => {
                let url = registry_url(args.registry.as_deref(), env::var(REGISTRY_ENV_VAR).ok());
                depgraph_logger::debug(&format!("Using registry {url}"));
                RegistryClient::http(&url)?
            }
        };

        let osv = if args.osv {
            Some(Arc::new(
                OsvClient::new().context("Failed to create the OSV client")?,
            ))
        } else {
            None
        };

        Ok(Self { registry, osv })
    }

    #[must_use]
    pub fn resolver(&self, options: ResolveOptions) -> GraphResolver {
        let resolver = GraphResolver::new(self.registry.clone(), options);
        match &self.osv {
            Some(osv) => resolver.with_vulnerability_source(Arc::<OsvClient>::clone(osv)),
            None => resolver,
        }
    }
}

/// `--registry` wins, then a non-blank environment override, then the
/// public registry.
fn registry_url(flag: Option<&str>, from_env: Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| from_env.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_url_precedence() {
        assert_eq!(
            registry_url(Some("http://flag"), Some("http://env".to_string())),
            "http://flag"
        );
        assert_eq!(registry_url(None, Some("http://env".to_string())), "http://env");
        assert_eq!(registry_url(None, Some("  ".to_string())), DEFAULT_REGISTRY_URL);
        assert_eq!(registry_url(None, None), DEFAULT_REGISTRY_URL);
    }
}
