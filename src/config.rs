//! Configuration loading and management
//!
//! Handles parsing of `.taskflow.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Defaults applied when creating tasks
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Calendar view configuration
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Attachment limits
    #[serde(default)]
    pub attachments: AttachmentsConfig,

    /// Presentation preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            calendar: CalendarConfig::default(),
            attachments: AttachmentsConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Task creation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Priority assigned when none is specified
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
        }
    }
}

/// Calendar-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First day of the week: "sunday" or "monday"
    #[serde(default = "default_week_start")]
    pub week_start: String,

    /// Tasks shown per day cell before the overflow counter
    #[serde(default = "default_day_display_limit")]
    pub day_display_limit: usize,
}

fn default_week_start() -> String {
    "sunday".to_string()
}

fn default_day_display_limit() -> usize {
    3
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            day_display_limit: default_day_display_limit(),
        }
    }
}

/// Attachment-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentsConfig {
    /// Per-file size cap in MiB
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Additional allowed MIME types beyond the built-in list.
    /// Entries may use glob wildcards, e.g. "audio/*".
    #[serde(default)]
    pub extra_allowed_types: Vec<String>,
}

fn default_max_size_mb() -> u64 {
    10
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
            extra_allowed_types: vec![],
        }
    }
}

/// Presentation preferences shared by every view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme: "dark" or "light"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskflow.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, falling back to the user config
    /// directory and then to defaults.
    pub fn load_from_dir(dir: &Path) -> Self {
        let local = dir.join(".taskflow.toml");
        if local.exists() {
            tracing::debug!(path = %local.display(), "loading local config");
            return Self::load(&local).unwrap_or_default();
        }
        if let Some(global) = Self::user_config_path() {
            if global.exists() {
                tracing::debug!(path = %global.display(), "loading user config");
                return Self::load(&global).unwrap_or_default();
            }
        }
        Self::default()
    }

    /// Path of the per-user configuration file, if a home exists.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "taskflow")
            .map(|dirs| dirs.config_dir().join("taskflow.toml"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.defaults.validate()?;
        self.calendar.validate()?;
        self.attachments.validate()?;
        self.ui.validate()?;
        Ok(())
    }
}

impl DefaultsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        match self.priority.as_str() {
            "low" | "medium" | "high" => Ok(()),
            other => Err(crate::error::Error::InvalidConfig(format!(
                "defaults.priority: invalid priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

impl CalendarConfig {
    fn validate(&self) -> crate::error::Result<()> {
        match self.week_start.as_str() {
            "sunday" | "monday" => {}
            other => {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "calendar.week_start: invalid value '{other}' (expected sunday|monday)"
                )))
            }
        }
        if self.day_display_limit == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "calendar.day_display_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl AttachmentsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.max_size_mb == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "attachments.max_size_mb must be > 0".to_string(),
            ));
        }
        for entry in &self.extra_allowed_types {
            validate_mime_pattern(entry)?;
        }
        Ok(())
    }

    /// Per-file size cap in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

fn validate_mime_pattern(pattern: &str) -> crate::error::Result<()> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::InvalidConfig(
            "attachments.extra_allowed_types: entry cannot be empty".to_string(),
        ));
    }
    if !trimmed.contains('/') {
        return Err(crate::error::Error::InvalidConfig(format!(
            "attachments.extra_allowed_types: '{trimmed}' is not a type/subtype pair"
        )));
    }
    glob::Pattern::new(trimmed).map_err(|err| {
        crate::error::Error::InvalidConfig(format!(
            "attachments.extra_allowed_types: invalid pattern '{trimmed}': {err}"
        ))
    })?;
    Ok(())
}

impl UiConfig {
    fn validate(&self) -> crate::error::Result<()> {
        match self.theme.as_str() {
            "dark" | "light" => Ok(()),
            other => Err(crate::error::Error::InvalidConfig(format!(
                "ui.theme: invalid theme '{other}' (expected dark|light)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.priority, "medium");
        assert_eq!(cfg.calendar.week_start, "sunday");
        assert_eq!(cfg.calendar.day_display_limit, 3);
        assert_eq!(cfg.attachments.max_size_mb, 10);
        assert_eq!(cfg.attachments.max_size_bytes(), 10 * 1024 * 1024);
        assert!(cfg.attachments.extra_allowed_types.is_empty());
        assert_eq!(cfg.ui.theme, "dark");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        let content = r#"
[defaults]
priority = "high"

[calendar]
week_start = "monday"
day_display_limit = 5

[attachments]
max_size_mb = 25
extra_allowed_types = ["audio/*", "application/zip"]

[ui]
theme = "light"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.defaults.priority, "high");
        assert_eq!(cfg.calendar.week_start, "monday");
        assert_eq!(cfg.calendar.day_display_limit, 5);
        assert_eq!(cfg.attachments.max_size_mb, 25);
        assert_eq!(
            cfg.attachments.extra_allowed_types,
            vec!["audio/*".to_string(), "application/zip".to_string()]
        );
        assert_eq!(cfg.ui.theme, "light");
    }

    #[test]
    fn invalid_priority_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        fs::write(&path, "[defaults]\npriority = \"urgent\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_week_start_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        fs::write(&path, "[calendar]\nweek_start = \"saturday\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_mime_pattern_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        fs::write(
            &path,
            "[attachments]\nextra_allowed_types = [\"not-a-mime\"]",
        )
        .expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_display_limit_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        fs::write(&path, "[calendar]\nday_display_limit = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.defaults.priority, "medium");
    }

    #[test]
    fn load_from_dir_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".taskflow.toml");
        fs::write(&path, "[ui]\ntheme = \"light\"").expect("write config");

        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.ui.theme, "light");
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("priority = \"medium\""));
        assert!(written.contains("week_start = \"sunday\""));
    }
}
