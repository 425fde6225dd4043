// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings persistence. The configuration is a single pretty-printed JSON
// file; fields missing from it take their defaults.

use std::path::{Path, PathBuf};

use linkstamp_core::AppConfig;
use linkstamp_core::error::Result;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    resolve_config_dir(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join(CONFIG_FILE)
}

fn resolve_config_dir(xdg_config: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(base) = xdg_config.filter(|dir| !dir.as_os_str().is_empty()) {
        return base.join("linkstamp");
    }
    if let Some(home) = home.filter(|home| !home.as_os_str().is_empty()) {
        return home.join(".config").join("linkstamp");
    }
    PathBuf::from(".linkstamp")
}

/// Load settings from `path`.
///
/// A missing file yields the defaults. An unreadable or malformed file is
/// logged and also yields the defaults, so a bad edit never blocks startup.
pub fn load_config(path: &Path) -> AppConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return AppConfig::default();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
            return AppConfig::default();
        }
    };

    match serde_json::from_str(&data) {
        Ok(config) => {
            debug!(path = %path.display(), "config loaded");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config malformed, using defaults");
            AppConfig::default()
        }
    }
}

/// Write `config` to `path`, creating parent directories.
pub fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkstamp_core::ExportScope;

    #[test]
    fn config_dir_prefers_xdg() {
        let dir = resolve_config_dir(Some("/etc/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/etc/xdg/linkstamp"));
        let dir = resolve_config_dir(None, Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.config/linkstamp"));
        assert_eq!(resolve_config_dir(None, None), PathBuf::from(".linkstamp"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = load_config(&tmp.path().join("absent.json"));
        assert_eq!(config.export_file_name, "edited_pdf.pdf");
        assert_eq!(config.export_scope, ExportScope::EveryPage);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").expect("seed");
        assert_eq!(load_config(&path).export_file_name, "edited_pdf.pdf");
    }

    #[test]
    fn persisted_config_loads_back() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.export_file_name = "stamped.pdf".into();
        config.export_scope = ExportScope::AttachedPage;
        config.overlay.caption = "See also".into();

        persist_config(&path, &config).expect("persist");
        let loaded = load_config(&path);

        assert_eq!(loaded.export_file_name, "stamped.pdf");
        assert_eq!(loaded.export_scope, ExportScope::AttachedPage);
        assert_eq!(loaded.overlay.caption, "See also");
    }
}
