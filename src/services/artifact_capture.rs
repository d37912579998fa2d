//! 产物采集服务 - 业务能力层
//!
//! 负责截图和收据 PDF 两种产物，文件名由订单号决定

use std::path::Path;
use std::time::Duration;

use tokio::fs;
use tokio::time::sleep;
use tracing::debug;

use crate::config::Config;
use crate::error::{RobotError, RobotResult};
use crate::infrastructure::{DocumentRenderer, UiDriver};
use crate::models::{DocumentArtifact, OutputLayout, ScreenshotArtifact};

pub struct ArtifactCapture {
    layout: OutputLayout,
    preview_selector: String,
    receipt_selector: String,
    settle_delay: Duration,
}

impl ArtifactCapture {
    pub fn new(config: &Config) -> Self {
        Self {
            layout: OutputLayout::new(&config.output_dir),
            preview_selector: config.selectors.preview.clone(),
            receipt_selector: config.selectors.receipt.clone(),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// 点击预览，等待预览图片渲染
    ///
    /// 必须在表单填好之后、提交之前调用。
    pub async fn show_preview(&self, driver: &dyn UiDriver) -> RobotResult<()> {
        driver.click(&self.preview_selector).await?;
        if !self.settle_delay.is_zero() {
            // 预览图片异步加载
            sleep(self.settle_delay).await;
        }
        Ok(())
    }

    /// 截取预览后的页面
    ///
    /// 在 `show_preview` 之后、提交之前调用，截图反映的是待提交的配置。
    pub async fn capture_screenshot(
        &self,
        driver: &dyn UiDriver,
        order_number: &str,
    ) -> RobotResult<ScreenshotArtifact> {
        let path = self.layout.screenshot_path(order_number);
        ensure_parent(&path).await?;
        driver.screenshot(&path).await?;
        debug!("截图已保存: {}", path.display());

        Ok(ScreenshotArtifact {
            order_number: order_number.to_string(),
            path,
        })
    }

    /// 读取收据片段并渲染为 PDF
    ///
    /// 收据只在提交成功后存在。
    pub async fn capture_document(
        &self,
        driver: &dyn UiDriver,
        renderer: &dyn DocumentRenderer,
        order_number: &str,
    ) -> RobotResult<DocumentArtifact> {
        let markup = driver.read_inner_markup(&self.receipt_selector).await?;

        let path = self.layout.receipt_path(order_number);
        ensure_parent(&path).await?;
        renderer.render_html_to_document(&markup, &path).await?;
        debug!("收据已保存: {}", path.display());

        Ok(DocumentArtifact {
            order_number: order_number.to_string(),
            path,
        })
    }
}

async fn ensure_parent(path: &Path) -> RobotResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RobotError::io(parent, e))?;
    }
    Ok(())
}
