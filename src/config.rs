// Configuration for the codepane gallery
//
// Configuration is loaded in order of precedence:
// 1. Environment variables (highest priority)
// 2. Config file (~/.config/codepane/config.toml)
// 3. Built-in defaults (lowest priority)

use std::path::PathBuf;

use serde::Deserialize;

use codepane::Dimension;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Log Rotation
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LogRotation {
    /// Rotate log files hourly
    Hourly,
    /// Rotate log files daily (default)
    #[default]
    Daily,
    /// Never rotate - single log file
    Never,
}

impl LogRotation {
    /// Parse rotation string from config, defaulting to daily
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "daily" => Self::Daily,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    /// String form for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Enable JSON file logging alongside the TUI buffer
    pub file_enabled: bool,
    /// Directory for log files
    pub file_dir: PathBuf,
    /// Log file rotation strategy
    pub file_rotation: LogRotation,
    /// Prefix for log file names (e.g. "codepane" -> "codepane.2026-01-15.log")
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "codepane".to_string(),
        }
    }
}

/// Logging settings as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Block theme name: dark, light
    pub theme: String,
    /// Default block width
    pub width: Dimension,
    /// Default block height
    pub height: Dimension,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            width: Dimension::Percent(90),
            height: Dimension::Auto,
            logging: LoggingConfig::default(),
        }
    }
}

/// Raw config file contents; every field optional so partial files work
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub logging: Option<FileLogging>,
}

impl Config {
    /// Config file path: ~/.config/codepane/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("codepane").join("config.toml"))
    }

    /// Create the config file with defaults if it doesn't exist.
    /// Called during startup to help users discover the options.
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional, run without one
            }
        }

        let template = Self::default().to_toml();
        let _ = std::fs::write(&path, template);
    }

    /// Load the file config if it exists.
    ///
    /// A broken config fails fast with a clear error instead of silently
    /// falling back to defaults while the user debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration  ║");
                    eprintln!("╚════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, delete the file and restart codepane.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration      ║");
                eprintln!("╚════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: environment > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();

        let theme = std::env::var("CODEPANE_THEME")
            .ok()
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let width = std::env::var("CODEPANE_WIDTH")
            .ok()
            .or(file.width)
            .map(|v| v.parse().expect("Invalid width"))
            .unwrap_or(Dimension::Percent(90));

        let height = std::env::var("CODEPANE_HEIGHT")
            .ok()
            .or(file.height)
            .map(|v| v.parse().expect("Invalid height"))
            .unwrap_or(Dimension::Auto);

        let file_logging = file.logging.unwrap_or_default();
        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            level: file_logging.level.unwrap_or(defaults.level),
            file_enabled: file_logging.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file_logging
                .file_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: file_logging
                .file_rotation
                .map(|s| LogRotation::from_str(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file_logging.file_prefix.unwrap_or(defaults.file_prefix),
        };

        Self {
            theme,
            width,
            height,
            logging,
        }
    }

    /// Serialize to the commented TOML template.
    /// Single source of truth for the config file format.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# codepane configuration

# Block theme: dark, light
theme = "{theme}"

# Default block width: percentage ("90%"), cells ("120"), or "auto"
width = "{width}"

# Default block height: rows ("20"), percentage, or "auto" (fit content)
height = "{height}"

# Logging configuration (RUST_LOG env var overrides the level)
[logging]
level = "{log_level}"
# File logging (JSON lines, in addition to the TUI footer)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            width = self.width,
            height = self.height,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Catches TOML syntax errors in the template before users hit them
    #[test]
    fn test_default_template_round_trips() {
        let config = Config::default();
        let toml_str = config.to_toml();

        let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
        assert!(
            parsed.is_ok(),
            "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
            toml_str,
            parsed.err()
        );

        let file = parsed.unwrap();
        assert_eq!(file.theme.as_deref(), Some("dark"));
        assert_eq!(file.width.as_deref(), Some("90%"));
        assert_eq!(file.height.as_deref(), Some("auto"));
        let logging = file.logging.expect("logging section present");
        assert_eq!(logging.level.as_deref(), Some("info"));
        assert_eq!(logging.file_enabled, Some(false));
    }

    #[test]
    fn test_rotation_parse_fallback() {
        assert_eq!(LogRotation::from_str("hourly"), LogRotation::Hourly);
        assert_eq!(LogRotation::from_str("DAILY"), LogRotation::Daily);
        assert_eq!(LogRotation::from_str("never"), LogRotation::Never);
        assert_eq!(LogRotation::from_str("sometimes"), LogRotation::Daily);
    }

    #[test]
    fn test_file_values_parse_as_dimensions() {
        let file: FileConfig = toml::from_str("width = \"75%\"\nheight = \"20\"\n").unwrap();
        assert_eq!(
            file.width.unwrap().parse::<Dimension>().unwrap(),
            Dimension::Percent(75)
        );
        assert_eq!(
            file.height.unwrap().parse::<Dimension>().unwrap(),
            Dimension::Cells(20)
        );
    }
}
