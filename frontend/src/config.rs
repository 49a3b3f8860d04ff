//! TOML configuration for the CLI: `cdgc.toml` in the working
//! directory, falling back to the per-user config directory. A missing
//! file means defaults; a malformed file is reported and ignored.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rewrite target for legacy `Sample_Files/` asset paths.
    pub assets_root: Option<String>,
    /// Integer upscale applied to inspect's PNG frame dumps.
    pub default_scale: Option<u32>,
}

impl Config {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str(&text) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                    }
                },
                Err(_) => continue,
            }
        }
        Self::default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("cdgc.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("cdgc").join("cdgc.toml"));
        }
        paths
    }
}
