//! Asset path normalization.
//!
//! Historical project files carry Windows-style backslash paths and a
//! legacy `Sample_Files/` prefix pointing at the tool's install
//! directory. Normalization collapses separators and rewrites the
//! prefix to the configured assets root. It is idempotent, and can be
//! skipped entirely when a project is being round-tripped back to disk
//! unchanged.

const LEGACY_PREFIX: &str = "Sample_Files/";

/// Normalize one asset path against `assets_root`.
pub fn normalize(path: &str, assets_root: &str) -> String {
    let forward = path.replace('\\', "/");
    if let Some(rest) = forward.strip_prefix(LEGACY_PREFIX) {
        let root = assets_root.replace('\\', "/");
        let root = root.trim_end_matches('/');
        if root.is_empty() {
            rest.to_string()
        } else {
            format!("{root}/{rest}")
        }
    } else {
        forward
    }
}
