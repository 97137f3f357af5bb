pub mod client;
pub mod http;
pub mod memory;
pub mod metadata;

pub use client::{RegistryClient, RegistrySource};
pub use http::HttpRegistry;
pub use memory::InMemoryRegistry;
pub use metadata::{DistTags, PackageMetadata, VersionManifest};
