pub mod io;
pub mod package_json;

pub use io::{read_package_json, resolve_manifest_path};
pub use package_json::PackageJson;
