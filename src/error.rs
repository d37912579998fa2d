use std::path::PathBuf;

use thiserror::Error;

/// 订单机器人错误类型
#[derive(Debug, Error)]
pub enum RobotError {
    /// 订单数据缺失或格式错误
    #[error("订单数据无效 (第 {row} 行): {reason}")]
    Input { row: usize, reason: String },

    /// 浏览器交互失败（元素不存在、会话丢失等）
    #[error("页面操作 {action} 失败 ({selector}): {source}")]
    UiInteraction {
        action: &'static str,
        selector: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 提交后页面显示错误提示，重新提交即可恢复
    #[error("订单提交被页面拒绝 (第 {attempt} 次)")]
    TransientValidationRejection { attempt: usize },

    /// 重试次数用尽，错误提示仍然存在
    #[error("订单提交失败: 已尝试 {attempts} 次，错误提示仍未消失")]
    SubmissionExhausted { attempts: usize },

    /// 合成收据时缺少输入文件
    #[error("文件不存在: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    /// PDF 读写或合成失败
    #[error("PDF 处理失败 ({}): {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 压缩包写入失败
    #[error("压缩包处理失败 ({}): {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// 下载订单文件失败
    #[error("下载订单文件失败 ({url}): {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 文件读写失败
    #[error("文件操作失败 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 运行被用户中断
    #[error("运行已取消")]
    Cancelled,
}

// ========== 便捷构造函数 ==========

impl RobotError {
    /// 创建页面操作错误
    pub fn ui(
        action: &'static str,
        selector: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        RobotError::UiInteraction {
            action,
            selector: selector.into(),
            source: source.into(),
        }
    }

    /// 创建 PDF 处理错误
    pub fn document(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        RobotError::Document {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RobotError::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为需要立即终止整个运行的错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, RobotError::Cancelled)
    }
}

// ========== Result 类型别名 ==========

/// 订单机器人结果类型
pub type RobotResult<T> = Result<T, RobotError>;
