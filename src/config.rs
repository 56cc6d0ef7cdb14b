//! Configuration
//!
//! Loaded from an optional TOML file, then overridden by `NFL__*` environment
//! variables (e.g. `NFL__ESPN__TIMEOUT_SECS=5`).

use crate::error::{PredictorError, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use config::{Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub espn: EspnConfig,
    /// Text-completion service; absent means AI analysis is disabled
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonConfig {
    #[serde(default = "default_season")]
    pub current_season: i32,
    /// Approximate kickoff date, used to derive the current week
    #[serde(default = "default_season_start")]
    pub season_start: NaiveDate,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            current_season: default_season(),
            season_start: default_season_start(),
        }
    }
}

fn default_season() -> i32 {
    2025
}

fn default_season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 5).unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EspnConfig {
    /// Use live ESPN data before falling back to static tables
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_espn_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long fetched standings stay fresh
    #[serde(default = "default_cache_ttl_mins")]
    pub cache_ttl_mins: i64,
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_espn_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_mins: default_cache_ttl_mins(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_espn_url() -> String {
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_mins() -> i64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// openai, deepseek, anthropic, ollama or compatible
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// OpenAI defaults for a bare API key
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: api_key.into(),
            model: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_prompt_dir")]
    pub prompt_dir: String,
    /// Week cursor persisted between runs
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Accuracy ledger
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prompt_dir: default_prompt_dir(),
            state_file: default_state_file(),
            ledger_file: default_ledger_file(),
        }
    }
}

impl OutputConfig {
    pub fn prompt_dir_path(&self) -> PathBuf {
        expand(&self.prompt_dir)
    }

    pub fn state_file_path(&self) -> PathBuf {
        expand(&self.state_file)
    }

    pub fn ledger_file_path(&self) -> PathBuf {
        expand(&self.ledger_file)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn default_prompt_dir() -> String {
    "generated-prompts".to_string()
}

fn default_state_file() -> String {
    "generated-prompts/state.json".to_string()
}

fn default_ledger_file() -> String {
    "generated-prompts/ledger.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_weekly_day")]
    pub weekly_day: String,
    /// HH:MM, local to `utc_offset_hours`
    #[serde(default = "default_weekly_time")]
    pub weekly_time: String,
    #[serde(default = "default_daily_time")]
    pub daily_time: String,
    /// Eastern time by default
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    /// Ask the LLM for an analysis of every scheduled game
    #[serde(default)]
    pub ai_analysis: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weekly_day: default_weekly_day(),
            weekly_time: default_weekly_time(),
            daily_time: default_daily_time(),
            utc_offset_hours: default_utc_offset(),
            ai_analysis: false,
        }
    }
}

impl SchedulerConfig {
    pub fn weekday(&self) -> Result<Weekday> {
        self.weekly_day
            .parse::<Weekday>()
            .map_err(|_| PredictorError::Internal(format!("Invalid weekday: {}", self.weekly_day)))
    }

    pub fn weekly_at(&self) -> Result<NaiveTime> {
        parse_time(&self.weekly_time)
    }

    pub fn daily_at(&self) -> Result<NaiveTime> {
        parse_time(&self.daily_time)
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| PredictorError::Internal(format!("Invalid time '{}': {}", value, e)))
}

fn default_weekly_day() -> String {
    "Tue".to_string()
}

fn default_weekly_time() -> String {
    "10:00".to_string()
}

fn default_daily_time() -> String {
    "08:00".to_string()
}

fn default_utc_offset() -> i32 {
    -5
}

impl Config {
    /// Load configuration from a TOML file (optional) and the environment
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(File::from(Path::new(path)).required(false))
            .add_source(
                Environment::with_prefix("NFL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config.with_api_key_fallback(std::env::var("OPENAI_API_KEY").ok()))
    }

    /// Fill a missing OpenAI key from the environment
    pub fn with_api_key_fallback(mut self, key: Option<String>) -> Self {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return self;
        };

        match &mut self.llm {
            Some(llm) if llm.api_key.is_empty() && llm.provider.eq_ignore_ascii_case("openai") => {
                llm.api_key = key;
            }
            Some(_) => {}
            None => self.llm = Some(LlmConfig::openai(key)),
        }
        self
    }
}
