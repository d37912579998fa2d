use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{RobotError, RobotResult};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "robot.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 下单页面 URL
    pub order_url: String,
    /// 订单 CSV 下载地址，为空时直接读取本地文件
    pub orders_csv_url: String,
    /// 本地订单 CSV 路径
    pub orders_csv_path: String,
    /// 输出目录（截图、收据、压缩包）
    pub output_dir: String,
    /// 浏览器调试端口（仅在非无头模式下连接已有浏览器时使用）
    pub browser_debug_port: u16,
    /// 是否启动无头浏览器（打印 PDF 需要无头模式）
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 单个订单最多提交次数
    pub max_submit_attempts: usize,
    /// 页面操作后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 任意订单失败即终止整个运行
    pub fail_fast: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 页面元素选择器
    pub selectors: Selectors,
}

/// 下单页面用到的全部 CSS 选择器
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub modal_ok: String,
    pub head: String,
    /// 身体单选框前缀，后接订单中的 Body 值
    pub body_prefix: String,
    pub legs: String,
    pub address: String,
    pub preview: String,
    pub submit: String,
    pub error_alert: String,
    pub receipt: String,
    pub order_another: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            modal_ok: "div.alert-buttons > button.btn-dark".to_string(),
            head: "#head".to_string(),
            body_prefix: "#id-body-".to_string(),
            legs: r#"input[placeholder="Enter the part number for the legs"]"#.to_string(),
            address: "#address".to_string(),
            preview: "#preview".to_string(),
            submit: "#order".to_string(),
            error_alert: ".alert-danger".to_string(),
            receipt: "#receipt".to_string(),
            order_another: "#order-another".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: "orders.csv".to_string(),
            output_dir: "output".to_string(),
            browser_debug_port: 9222,
            headless: true,
            chrome_executable: None,
            max_submit_attempts: 10,
            settle_delay_ms: 300,
            fail_fast: false,
            verbose_logging: false,
            output_log_file: "output/run.log".to_string(),
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → 配置文件（若存在）→ 环境变量
    pub fn load() -> RobotResult<Self> {
        let path = std::env::var("ROBOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            debug!("读取配置文件: {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        let config = base.with_env();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> RobotResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RobotError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> RobotResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RobotError::Config(format!("无法解析配置文件: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env(self) -> Self {
        Self {
            order_url: std::env::var("ORDER_URL").unwrap_or(self.order_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(self.orders_csv_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(self.orders_csv_path),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.browser_debug_port),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(self.chrome_executable),
            max_submit_attempts: std::env::var("MAX_SUBMIT_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_submit_attempts),
            settle_delay_ms: std::env::var("SETTLE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.settle_delay_ms),
            fail_fast: std::env::var("FAIL_FAST").ok().and_then(|v| v.parse().ok()).unwrap_or(self.fail_fast),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            selectors: self.selectors,
        }
    }

    pub fn validate(&self) -> RobotResult<()> {
        if self.max_submit_attempts == 0 {
            return Err(RobotError::Config(
                "max_submit_attempts 必须大于 0".to_string(),
            ));
        }
        if self.order_url.is_empty() {
            return Err(RobotError::Config("order_url 不能为空".to_string()));
        }
        Ok(())
    }
}
