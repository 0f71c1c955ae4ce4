use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ShareError, ShareResult};

/// Default fragment budget, in characters, counted from the `#`.
pub const DEFAULT_MAX_FRAGMENT_LENGTH: usize = 2800;

/// Top-level configuration (loaded from noteshare.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub link: LinkConfig,
    pub compression: CompressionConfig,
    pub notes: NotesConfig,
    pub logging: LoggingConfig,
}

/// Where share links point and how long they may get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Scheme + host (+ port) of the app serving the shared-note page
    pub base_origin: String,
    /// Path the app is mounted under (default: /)
    pub base_path: String,
    /// Longest fragment (`#c=..&k=..`) a link may carry
    pub max_fragment_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Deflate payloads before encryption (default: true)
    pub enabled: bool,
    /// Deflate level 0-9 (default: 6)
    pub level: u32,
}

/// Note-store defaults applied to received notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub default_bg_color: String,
    pub default_text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_origin: "http://localhost:5173".into(),
            base_path: "/".into(),
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: 6,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            default_bg_color: "#FFF8C5".into(),
            default_text_color: "#222222".into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> ShareResult<()> {
        let origin = url::Url::parse(&self.base_origin)
            .map_err(|e| ShareError::Config(format!("base_origin {:?}: {e}", self.base_origin)))?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ShareError::Config(format!(
                "base_origin must be http or https, got {}",
                origin.scheme()
            )));
        }
        if origin.fragment().is_some() || origin.query().is_some() {
            return Err(ShareError::Config(
                "base_origin must not carry a query or fragment".into(),
            ));
        }
        if self.max_fragment_length == 0 {
            return Err(ShareError::Config("max_fragment_length must be positive".into()));
        }
        Ok(())
    }
}

impl ShareConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ShareResult<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| ShareError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> ShareResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ShareError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ShareResult<()> {
        self.link.validate()?;
        if self.compression.level > 9 {
            return Err(ShareError::Config(format!(
                "compression level must be 0-9, got {}",
                self.compression.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r##"
[link]
base_origin = "https://notes.example.com"
base_path = "/app/"
max_fragment_length = 4000

[compression]
enabled = false
level = 9

[notes]
default_bg_color = "#FFFFFF"
default_text_color = "#000000"

[logging]
level = "debug"
format = "json"
"##;
        let config = ShareConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.link.base_origin, "https://notes.example.com");
        assert_eq!(config.link.base_path, "/app/");
        assert_eq!(config.link.max_fragment_length, 4000);
        assert!(!config.compression.enabled);
        assert_eq!(config.compression.level, 9);
        assert_eq!(config.notes.default_bg_color, "#FFFFFF");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_parse_defaults() {
        let config = ShareConfig::from_toml("").unwrap();

        assert_eq!(config.link.base_origin, "http://localhost:5173");
        assert_eq!(config.link.base_path, "/");
        assert_eq!(config.link.max_fragment_length, 2800);
        assert!(config.compression.enabled);
        assert_eq!(config.compression.level, 6);
        assert_eq!(config.notes.default_text_color, "#222222");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[link]
base_origin = "https://example.app"
"#;
        let config = ShareConfig::from_toml(toml_str).unwrap();

        // Overridden
        assert_eq!(config.link.base_origin, "https://example.app");
        // Defaults
        assert_eq!(config.link.max_fragment_length, DEFAULT_MAX_FRAGMENT_LENGTH);
        assert!(config.compression.enabled);
    }

    #[test]
    fn test_rejects_bad_origin() {
        for origin in ["example.app", "ftp://example.app", "https://example.app/#x"] {
            let link = LinkConfig {
                base_origin: origin.into(),
                ..LinkConfig::default()
            };
            assert!(
                matches!(link.validate(), Err(ShareError::Config(_))),
                "origin {origin} must be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_limit_and_bad_level() {
        assert!(ShareConfig::from_toml("[link]\nmax_fragment_length = 0").is_err());
        assert!(ShareConfig::from_toml("[compression]\nlevel = 12").is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShareConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ShareConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[link]\nbase_path = \"/notes\"").unwrap();
        let config = ShareConfig::load(file.path()).unwrap();
        assert_eq!(config.link.base_path, "/notes");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[link]\nbase_origin = \"ftp://files.example\"").unwrap();
        let err = ShareConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ShareError::Config(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = ShareConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: ShareConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
