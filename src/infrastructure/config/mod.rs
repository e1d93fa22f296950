//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::normalize_phone;

/// Bot configuration, built once at startup and shared read-only
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub admin: AdminConfig,
    pub group: GroupConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdminConfig {
    /// Admin phone number; `@c.us` suffixes and a leading `+` are accepted
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackupConfig {
    /// Where `!backup` writes snapshots. `None` only logs them.
    pub directory: Option<PathBuf>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: Some(PathBuf::from("backups")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

/// Transport selected at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adapter {
    Telegram(String),
    Console,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "🎵 Music Club Bot".to_string(),
            },
            admin: AdminConfig {
                phone: "94755982430".to_string(),
            },
            group: GroupConfig {
                id: "KifdgN1LWlODP2HwJj69mN@g.us".to_string(),
            },
            database: DatabaseConfig {
                path: "musicclub.db".to_string(),
            },
            backup: BackupConfig::default(),
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to render config: {}", e)))
    }

    /// Read `path` when it exists, otherwise start from defaults; env vars
    /// are overlaid either way. A file that exists but does not parse is an
    /// error, never a silent fallback.
    pub fn load_or_env(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::load_env());
        }
        let mut config = Self::load(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults overlaid with environment variables
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Overlay `BOT_TOKEN`, `ADMIN_NUMBER`, `GROUP_ID`, `DATABASE_PATH`
    /// and `BACKUP_DIR` when set
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("BOT_TOKEN") {
            let tg = self.adapters.telegram.get_or_insert(TelegramConfig {
                enabled: true,
                token: None,
            });
            tg.token = Some(token);
            tg.enabled = true;
        }

        if let Some(admin) = var("ADMIN_NUMBER") {
            self.admin.phone = admin;
        }

        if let Some(group) = var("GROUP_ID") {
            self.group.id = group;
        }

        if let Some(path) = var("DATABASE_PATH") {
            self.database.path = path;
        }

        if let Some(dir) = var("BACKUP_DIR") {
            self.backup.directory = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_phone().is_empty() {
            return Err(ConfigError::MissingField("admin.phone".to_string()));
        }
        if self.group.id.trim().is_empty() {
            return Err(ConfigError::MissingField("group.id".to_string()));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingField("database.path".to_string()));
        }
        Ok(())
    }

    /// Normalized admin phone number
    pub fn admin_phone(&self) -> String {
        normalize_phone(&self.admin.phone)
    }

    pub fn telegram_token(&self) -> Option<String> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.clone())
    }

    /// Telegram wins when it has a token; otherwise the console, if enabled
    pub fn adapter(&self) -> Result<Adapter, ConfigError> {
        if let Some(token) = self.telegram_token() {
            return Ok(Adapter::Telegram(token));
        }
        match &self.adapters.console {
            Some(console) if console.enabled => Ok(Adapter::Console),
            _ => Err(ConfigError::InvalidValue(
                "no adapter enabled: set adapters.telegram.token or enable adapters.console".to_string(),
            )),
        }
    }
}
