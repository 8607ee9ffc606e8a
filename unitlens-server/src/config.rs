//! Startup configuration from the environment

use crate::error::ServerError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use unitlens_core::Settings;

/// JSON file holding the initial settings snapshot
pub const SETTINGS_ENV: &str = "UNITLENS_SETTINGS";

/// Section holding global toggles
pub const GLOBAL_NAMESPACE: &str = "unitConversionHints";

pub const SHOW_TOOLTIP: &str = "showTooltip";
/// Older name of [`SHOW_TOOLTIP`]
pub const SHOW_HOVER: &str = "showHover";

pub fn settings_path() -> Option<PathBuf> {
    env::var_os(SETTINGS_ENV).map(PathBuf::from)
}

/// Settings from `UNITLENS_SETTINGS`, or an empty snapshot when unset
pub fn load_initial_settings() -> Result<Settings, ServerError> {
    match settings_path() {
        Some(path) => load_settings_file(&path),
        None => Ok(Settings::new()),
    }
}

pub fn load_settings_file(path: &Path) -> Result<Settings, ServerError> {
    let content = fs::read_to_string(path).map_err(|source| ServerError::SettingsFile {
        path: path.display().to_string(),
        source,
    })?;
    Settings::from_json_str(&content).map_err(ServerError::Settings)
}

/// Whether the tooltip path runs at all; defaults to on
pub fn show_tooltip(settings: &Settings) -> bool {
    let global = settings.section(GLOBAL_NAMESPACE);
    global
        .bool(SHOW_TOOLTIP)
        .or_else(|| global.bool(SHOW_HOVER))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_show_tooltip_default_on() {
        assert!(show_tooltip(&Settings::new()));
    }

    #[test]
    fn test_show_tooltip_flat_key() {
        let settings = Settings::from_json(json!({"unitConversionHints.showTooltip": false})).unwrap();
        assert!(!show_tooltip(&settings));
    }

    #[test]
    fn test_show_hover_alias() {
        let settings = Settings::from_json(json!({"unitConversionHints": {"showHover": false}})).unwrap();
        assert!(!show_tooltip(&settings));
    }

    #[test]
    fn test_show_tooltip_wins_over_alias() {
        let settings = Settings::new()
            .with(GLOBAL_NAMESPACE, SHOW_HOVER, false)
            .with(GLOBAL_NAMESPACE, SHOW_TOOLTIP, true);
        assert!(show_tooltip(&settings));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_settings_file(Path::new("/nonexistent/unitlens.json")).unwrap_err();
        assert!(matches!(err, ServerError::SettingsFile { .. }));
    }

    #[test]
    fn test_load_file() {
        let path = env::temp_dir().join(format!("unitlens-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{"unitConversionHints.remToPx": {"baseFontSize": 10}}"#).unwrap();
        let settings = load_settings_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(
            settings.section("unitConversionHints.remToPx").number("baseFontSize"),
            Some(10.0)
        );
    }
}
