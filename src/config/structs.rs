use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PrintlinkerError, Result};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "printlinker.toml";

/// 应用配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - paths: 输入文件与输出目录
/// - qr: 二维码尺寸与标签
/// - http: 超时和 API 地址
/// - report: 报表选项
/// - logging: 日志配置
///
/// 活动列表、GA4 property 与服务账号凭据保存在各自的 YAML/JSON 文件中，
/// 由 `config::campaigns` 与 `config::platform` 负责读取。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > printlinker.toml > 默认值
    /// ENV 前缀：PL，分隔符：__
    /// 示例：PL__QR__MODULE_SIZE=12
    ///
    /// 通过 `-c` 显式指定的文件必须存在；默认文件缺失时只使用默认值。
    /// 文件无法解析时返回 `ConfigFile` 错误。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_FILE);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(explicit))
            .add_source(
                Environment::with_prefix("PL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                PrintlinkerError::config_file(format!(
                    "Failed to load settings file '{}': {}",
                    path, e
                ))
            })?;

        settings.try_deserialize::<StaticConfig>().map_err(|e| {
            PrintlinkerError::config_file(format!("Invalid settings in '{}': {}", path, e))
        })
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 输入输出路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_campaigns_file")]
    pub campaigns_file: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
    #[serde(default = "default_platform_config_file")]
    pub platform_config_file: String,
    #[serde(default = "default_qr_output_dir")]
    pub qr_output_dir: String,
    #[serde(default = "default_report_output_dir")]
    pub report_output_dir: String,
}

/// 二维码渲染配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    /// 每个模块的像素边长
    #[serde(default = "default_module_size")]
    pub module_size: u32,
    /// 静区宽度（模块数）
    #[serde(default = "default_border")]
    pub border: u32,
    /// 是否在二维码下方附加文字标签
    #[serde(default = "default_label")]
    pub label: bool,
}

/// HTTP 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_admin_base_url")]
    pub admin_base_url: String,
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
}

/// 报表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 用于按活动 token 过滤的 GA4 维度（utm_campaign 写入 sessionCampaignName）
    #[serde(default = "default_campaign_dimension")]
    pub campaign_dimension: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_campaigns_file() -> String {
    "campaigns.yml".to_string()
}

fn default_credentials_file() -> String {
    "config/credentials.json".to_string()
}

fn default_platform_config_file() -> String {
    "config/ga4_config.json".to_string()
}

fn default_qr_output_dir() -> String {
    "output/qr_codes".to_string()
}

fn default_report_output_dir() -> String {
    "output/reports".to_string()
}

fn default_module_size() -> u32 {
    10
}

fn default_border() -> u32 {
    4
}

fn default_label() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_admin_base_url() -> String {
    "https://analyticsadmin.googleapis.com/v1alpha".to_string()
}

fn default_data_base_url() -> String {
    "https://analyticsdata.googleapis.com/v1beta".to_string()
}

fn default_campaign_dimension() -> String {
    "sessionCampaignName".to_string()
}

fn default_currency_symbol() -> String {
    "¥".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            campaigns_file: default_campaigns_file(),
            credentials_file: default_credentials_file(),
            platform_config_file: default_platform_config_file(),
            qr_output_dir: default_qr_output_dir(),
            report_output_dir: default_report_output_dir(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            module_size: default_module_size(),
            border: default_border(),
            label: default_label(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            admin_base_url: default_admin_base_url(),
            data_base_url: default_data_base_url(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            campaign_dimension: default_campaign_dimension(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
