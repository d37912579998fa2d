//! HTML → PDF 渲染

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::{RobotError, RobotResult};

/// 把一段 HTML 渲染成 PDF 文件
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_html_to_document(&self, markup: &str, path: &Path) -> RobotResult<()>;
}

/// 使用独立的浏览器页面打印 PDF，不影响下单页面的状态
///
/// Chrome 只有在无头模式下才支持打印 PDF。
pub struct ChromeRenderer {
    page: Page,
}

impl ChromeRenderer {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

/// 收据片段套上完整的 HTML 文档
fn wrap_markup(markup: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
        markup
    )
}

#[async_trait]
impl DocumentRenderer for ChromeRenderer {
    async fn render_html_to_document(&self, markup: &str, path: &Path) -> RobotResult<()> {
        debug!("渲染 PDF: {} ({} 字符)", path.display(), markup.len());

        self.page
            .set_content(wrap_markup(markup))
            .await
            .map_err(|e| RobotError::document(path, e))?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        self.page
            .save_pdf(params, path)
            .await
            .map_err(|e| RobotError::document(path, e))?;

        Ok(())
    }
}
