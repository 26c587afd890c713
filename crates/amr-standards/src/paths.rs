//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "AMR_STANDARDS_DIR";

/// File name of the reference document inside the standards directory.
pub const REFERENCE_FILE: &str = "reference.toml";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `AMR_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Path of the reference document under [`standards_root`].
pub fn reference_path() -> PathBuf {
    standards_root().join(REFERENCE_FILE)
}
