use caresync_core::vad::VadSettings;
use caresync_core::Locale;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 界面语言，不支持的值回退到 en
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hotkey: HotkeyConfig,
    #[serde(default)]
    pub vad: VadConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// 语音识别服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default = "default_asr_config_id")]
    pub asr_config_id: String,
    /// 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// 按住说话热键，默认 "Ctrl+Space"
    #[serde(default = "default_record_hotkey")]
    pub record: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// RMS 能量阈值
    #[serde(default = "default_speech_threshold")]
    pub speech_threshold: f32,
    /// 静音超时（毫秒）
    #[serde(default = "default_silence_timeout")]
    pub silence_timeout_ms: u64,
    /// 最短语音段（毫秒）
    #[serde(default = "default_min_speech_duration")]
    pub min_speech_duration_ms: u64,
    /// 无语音超时（毫秒）
    #[serde(default = "default_no_speech_timeout")]
    pub no_speech_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 固定"今天"的日期（YYYY-MM-DD），演示数据用；不填则取本地日期
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_day: Option<String>,
}

fn default_locale() -> String {
    Locale::default().code().to_string()
}
fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_asr_config_id() -> String {
    "your-asr-config-id".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_record_hotkey() -> String {
    "Ctrl+Space".to_string()
}
fn default_speech_threshold() -> f32 {
    0.03
}
fn default_silence_timeout() -> u64 {
    800
}
fn default_min_speech_duration() -> u64 {
    300
}
fn default_no_speech_timeout() -> u64 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            server: ServerConfig::default(),
            hotkey: HotkeyConfig::default(),
            vad: VadConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            asr_config_id: default_asr_config_id(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            record: default_record_hotkey(),
        }
    }
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            speech_threshold: default_speech_threshold(),
            silence_timeout_ms: default_silence_timeout(),
            min_speech_duration_ms: default_min_speech_duration(),
            no_speech_timeout_ms: default_no_speech_timeout(),
        }
    }
}

impl AppConfig {
    pub fn locale(&self) -> Locale {
        Locale::parse_or_default(&self.locale)
    }

    pub fn vad_settings(&self) -> VadSettings {
        VadSettings {
            speech_threshold: self.vad.speech_threshold,
            silence_timeout_ms: self.vad.silence_timeout_ms,
            min_speech_duration_ms: self.vad.min_speech_duration_ms,
            no_speech_timeout_ms: self.vad.no_speech_timeout_ms,
        }
    }

    /// 统计"今天"用的日期
    pub fn today(&self) -> NaiveDate {
        if let Some(day) = &self.dashboard.reference_day {
            match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                Ok(d) => return d,
                Err(e) => log::warn!("reference_day {day:?} 无法解析: {e}，使用本地日期"),
            }
        }
        chrono::Local::now().date_naive()
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("caresync");
    config_dir.join("config.toml")
}

/// 加载配置，文件不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, String> {
    if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| format!("读取配置失败: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("解析配置失败: {e}"))
    } else {
        let config = AppConfig::default();
        save_config_to(path, &config)?;
        Ok(config)
    }
}

/// 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("创建配置目录失败: {e}"))?;
    }
    let content = toml::to_string_pretty(config).map_err(|e| format!("序列化配置失败: {e}"))?;
    fs::write(path, content).map_err(|e| format!("写入配置失败: {e}"))?;
    Ok(())
}
