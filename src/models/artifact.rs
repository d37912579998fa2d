//! 订单产物及输出目录布局

use std::path::{Path, PathBuf};

/// 输出目录布局
///
/// ```text
/// <root>/screenshots/order_<N>.png
/// <root>/receipts/order_<N>.pdf
/// <root>/orders.zip
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.root.join("receipts")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join("orders.zip")
    }

    pub fn screenshot_path(&self, order_number: &str) -> PathBuf {
        self.screenshots_dir()
            .join(format!("order_{}.png", order_number))
    }

    pub fn receipt_path(&self, order_number: &str) -> PathBuf {
        self.receipts_dir().join(format!("order_{}.pdf", order_number))
    }
}

/// 下单前的机器人预览截图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotArtifact {
    pub order_number: String,
    pub path: PathBuf,
}

/// 收据 PDF，合成后即为最终收据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact {
    pub order_number: String,
    pub path: PathBuf,
}

/// 单个订单处理成功后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_number: String,
    pub path: PathBuf,
    /// 提交按钮被点击的次数
    pub submit_attempts: usize,
    /// 合成后的页数
    pub page_count: usize,
}
