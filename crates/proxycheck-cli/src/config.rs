//! Configuration loading and validation for the probe

use crate::cli::{Cli, OutputFormat};
use proxycheck::{AdminTool, Thresholds};
use proxycheck::types::{DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_SESSIONS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {0} not found")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdSettings,

    #[serde(default)]
    pub command: CommandSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.thresholds.validate()?;
        self.command.validate()?;
        Ok(())
    }
}

/// Default limits, overridden by command line flags
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ThresholdSettings {
    #[validate(range(min = 1))]
    pub connections: u64,

    #[validate(range(min = 1))]
    pub sessions: usize,
}

/// Administration tool invocation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommandSettings {
    pub tool: AdminTool,

    /// Binary to run instead of the tool name looked up on PATH
    #[validate(custom = "validate_command_path")]
    pub path: Option<String>,

    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_timeout")]
    pub timeout: Duration,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            connections: DEFAULT_MAX_CONNECTIONS,
            sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            tool: AdminTool::default(),
            path: None,
            timeout: proxycheck::source::DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Shortest accepted administration command timeout
pub const MIN_COMMAND_TIMEOUT: Duration = Duration::from_millis(100);

/// Longest accepted administration command timeout
pub const MAX_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

// Custom validators

fn validate_command_path(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::new("command_path_empty"));
    }
    Ok(())
}

fn validate_timeout(timeout: &Duration) -> Result<(), ValidationError> {
    if !(MIN_COMMAND_TIMEOUT..=MAX_COMMAND_TIMEOUT).contains(timeout) {
        return Err(ValidationError::new("command_timeout_out_of_range"));
    }
    Ok(())
}

// Configuration loading implementation

impl Config {
    /// The given file, else the first file found in the default search paths
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::find_config_file)
    }

    /// Load `path`, or defaults when there is no configuration file
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.is_file() => Err(ConfigError::FileNotFound(path.to_path_buf())),
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate YAML configuration
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // Empty and comment-only documents are null, not an empty mapping
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str::<Option<Config>>(contents)?.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/proxycheck/check-sqlproxy.yaml")];

        if let Some(home_path) = Self::home_config_path() {
            paths.push(home_path);
        }

        paths.push(PathBuf::from("./check-sqlproxy.yaml"));

        paths.into_iter().find(|p: &PathBuf| p.is_file())
    }

    /// Get home directory config path
    fn home_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/proxycheck/check-sqlproxy.yaml"))
    }
}

/// Effective settings of one run: flags override the file, which overrides
/// built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub tool: AdminTool,
    pub command_path: Option<String>,
    pub timeout: Duration,
    pub from_dir: Option<PathBuf>,
    pub verbose: bool,
    pub output: OutputFormat,
}

impl Settings {
    /// Merge command line flags over the configuration file
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let mut thresholds = Thresholds::new(cli.expected_servers)
            .with_max_connections(cli.max_connections.unwrap_or(config.thresholds.connections))
            .with_max_sessions(cli.max_sessions.unwrap_or(config.thresholds.sessions));
        if let Some(master) = &cli.expected_master {
            thresholds = thresholds.with_expected_master(master.clone());
        }

        Self {
            thresholds,
            tool: cli.tool.unwrap_or(config.command.tool),
            command_path: cli
                .command_path
                .clone()
                .or_else(|| config.command.path.clone()),
            timeout: cli.timeout.unwrap_or(config.command.timeout),
            from_dir: cli.from_dir.clone(),
            verbose: cli.verbose,
            output: cli.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.connections, 500);
        assert_eq!(config.thresholds.sessions, 1000);
        assert_eq!(config.command.tool, AdminTool::Maxadmin);
        assert_eq!(config.command.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_valid_yaml_parsing() {
        let yaml = r#"
thresholds:
  connections: 200
  sessions: 5000

command:
  tool: maxctrl
  path: /usr/local/bin/maxctrl
  timeout: 3s

logging:
  level: debug
  format: json
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.thresholds.connections, 200);
        assert_eq!(config.thresholds.sessions, 5000);
        assert_eq!(config.command.tool, AdminTool::Maxctrl);
        assert_eq!(config.command.path.as_deref(), Some("/usr/local/bin/maxctrl"));
        assert_eq!(config.command.timeout, Duration::from_secs(3));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let yaml = r#"
thresholds:
  connections: 50
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.thresholds.connections, 50);
        assert_eq!(config.thresholds.sessions, 1000);
        assert_eq!(config.command.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("\n").unwrap();
        assert_eq!(config.thresholds.connections, 500);
    }

    #[test]
    fn test_invalid_zero_threshold() {
        let yaml = r#"
thresholds:
  sessions: 0  # Invalid: < 1
"#;
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_timeout() {
        let yaml = r#"
command:
  timeout: 10ms  # Invalid: < 100ms
"#;
        assert!(Config::from_yaml(yaml).is_err());

        let yaml = r#"
command:
  timeout: 10m  # Invalid: > 5m
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_tool() {
        let yaml = r#"
command:
  tool: mysqladmin
"#;
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_command_path_validation() {
        assert!(validate_command_path("/usr/bin/maxadmin").is_ok());
        assert!(validate_command_path("maxadmin").is_ok());
        assert!(validate_command_path("").is_err());
        assert!(validate_command_path("   ").is_err());
    }

    #[test]
    fn test_comment_only_yaml_uses_defaults() {
        let config = Config::from_yaml("# defaults\n# thresholds:\n#   connections: 10\n").unwrap();
        assert_eq!(config.thresholds.connections, 500);

        let config = Config::from_yaml("~\n").unwrap();
        assert_eq!(config.command.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_bounds_inclusive() {
        assert!(validate_timeout(&MIN_COMMAND_TIMEOUT).is_ok());
        assert!(validate_timeout(&MAX_COMMAND_TIMEOUT).is_ok());
        assert!(validate_timeout(&Duration::from_millis(99)).is_err());
        assert!(validate_timeout(&Duration::ZERO).is_err());
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let path = Path::new("/etc/other/check-sqlproxy.yaml");
        assert_eq!(Config::locate(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.thresholds.sessions, 1000);
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/check-sqlproxy.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_resolve_defaults_from_config() {
        let cli = Cli::parse_from(["check-sqlproxy", "-e", "3"]);
        let mut config = Config::default();
        config.thresholds.connections = 42;
        config.command.tool = AdminTool::Maxctrl;
        config.command.path = Some("/opt/maxctrl".into());

        let settings = Settings::resolve(&cli, &config);
        assert_eq!(settings.thresholds.expected_servers, 3);
        assert_eq!(settings.thresholds.max_connections, 42);
        assert_eq!(settings.thresholds.max_sessions, 1000);
        assert_eq!(settings.tool, AdminTool::Maxctrl);
        assert_eq!(settings.command_path.as_deref(), Some("/opt/maxctrl"));
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_resolve_flags_win() {
        let cli = Cli::parse_from([
            "check-sqlproxy",
            "-e",
            "3",
            "-m",
            "db1",
            "-c",
            "7",
            "-t",
            "maxadmin",
            "--timeout",
            "2s",
        ]);
        let mut config = Config::default();
        config.thresholds.connections = 42;
        config.command.tool = AdminTool::Maxctrl;

        let settings = Settings::resolve(&cli, &config);
        assert_eq!(settings.thresholds.max_connections, 7);
        assert_eq!(settings.thresholds.expected_master.as_deref(), Some("db1"));
        assert_eq!(settings.tool, AdminTool::Maxadmin);
        assert_eq!(settings.timeout, Duration::from_secs(2));
    }
}
