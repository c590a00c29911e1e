use crate::domain::model::{LocationKind, LocationTarget};
use crate::utils::error::{Result, WatchError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://cdn-api.co-vin.in/api/v2";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:88.0) Gecko/20100101 Firefox/88.0";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_INTERVAL_SECONDS: u64 = 180;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub locations: Vec<LocationEntry>,
}

/// 設定檔中的一個地區；min_age 在轉成 `LocationTarget` 時驗證
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub id: u64,
    pub min_age: u32,
    #[serde(default)]
    pub kind: LocationKind,
}

impl LocationEntry {
    pub fn to_target(&self) -> Result<LocationTarget> {
        Ok(LocationTarget::new(self.name.clone(), self.id, self.min_age)?.with_kind(self.kind))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_seconds: Option<u64>,
    pub max_rounds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default)]
    pub desktop: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            console: true,
            desktop: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS))
    }
}

/// 未提供設定檔時使用的地區列表
const BUILTIN_DISTRICTS: &[(&str, u64)] = &[
    ("Panipat", 195),
    ("East Delhi", 145),
    ("South Delhi", 149),
    ("South East Delhi", 144),
    ("Ghaziabad", 651),
    ("Gautam Budha Nagar", 650),
    ("Agra", 622),
    ("Lucknow", 670),
    ("Nainital", 709),
];

impl Default for WatchConfig {
    fn default() -> Self {
        let locations = BUILTIN_DISTRICTS
            .iter()
            .map(|(name, id)| LocationEntry {
                name: name.to_string(),
                id: *id,
                min_age: 18,
                kind: LocationKind::District,
            })
            .collect();

        Self {
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            notifications: NotificationConfig::default(),
            locations,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl WatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| WatchError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 年齡篩選不合法時在載入階段就失敗
        config.targets()?;
        Ok(config)
    }

    /// 轉換為輪詢使用的地區列表
    pub fn targets(&self) -> Result<Vec<LocationTarget>> {
        self.locations.iter().map(LocationEntry::to_target).collect()
    }

    /// 替換環境變數 (例如 ${COWIN_BASE_URL})
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.api.timeout_seconds(), 1)?;
        validation::validate_non_empty_string("api.user_agent", self.api.user_agent())?;

        if let Some(interval) = self.polling.interval_seconds {
            validation::validate_positive_number("polling.interval_seconds", interval, 1)?;
        }
        if let Some(rounds) = self.polling.max_rounds {
            validation::validate_positive_number("polling.max_rounds", u64::from(rounds), 1)?;
        }

        if self.locations.is_empty() {
            return Err(WatchError::MissingConfigError {
                field: "locations".to_string(),
            });
        }
        for location in &self.locations {
            validation::validate_non_empty_string("locations.name", &location.name)?;
            validation::validate_positive_number("locations.id", location.id, 1)?;
            location.to_target()?;
        }
        validation::validate_unique_names(
            "locations.name",
            self.locations.iter().map(|l| l.name.as_str()),
        )?;

        if !self.notifications.console && !self.notifications.desktop {
            return Err(WatchError::ConfigValidationError {
                field: "notifications".to_string(),
                message: "at least one notification sink must be enabled".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
