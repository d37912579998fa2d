//! 基于 chromiumoxide 的页面操作实现
//!
//! 持有唯一的下单页面，只暴露页面操作能力，不认识订单。

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{RobotError, RobotResult};
use crate::infrastructure::UiDriver;

/// 浏览器页面驱动
pub struct ChromeDriver {
    page: Page,
}

impl ChromeDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> RobotResult<T> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(|e| RobotError::ui("evaluate", "<script>", e))?;
        result
            .into_value()
            .map_err(|e| RobotError::ui("evaluate", "<script>", e))
    }
}

#[async_trait]
impl UiDriver for ChromeDriver {
    async fn navigate(&self, url: &str) -> RobotResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| RobotError::ui("navigate", url, e))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> RobotResult<()> {
        debug!("点击: {}", selector);
        self.page
            .find_element(selector)
            .await
            .map_err(|e| RobotError::ui("click", selector, e))?
            .click()
            .await
            .map_err(|e| RobotError::ui("click", selector, e))?;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> RobotResult<()> {
        debug!("选择: {} = {}", selector, value);
        // React 受控组件需要走原生 setter 再派发 change 事件
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return "missing";
                const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
                setter.call(el, {value});
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return el.value === {value} ? "ok" : "no-option";
            }})()
            "#,
            selector = serde_json::Value::from(selector),
            value = serde_json::Value::from(value),
        );

        let status: String = self.eval_as(js_code).await?;
        match status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(RobotError::ui("select_option", selector, "元素不存在")),
            _ => Err(RobotError::ui(
                "select_option",
                selector,
                format!("没有值为 {} 的选项", value),
            )),
        }
    }

    async fn fill_text(&self, selector: &str, value: &str) -> RobotResult<()> {
        debug!("输入: {} = {}", selector, value);
        self.page
            .find_element(selector)
            .await
            .map_err(|e| RobotError::ui("fill_text", selector, e))?
            .click()
            .await
            .map_err(|e| RobotError::ui("fill_text", selector, e))?
            .type_str(value)
            .await
            .map_err(|e| RobotError::ui("fill_text", selector, e))?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> RobotResult<()> {
        debug!("截图: {}", path.display());
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| RobotError::ui("screenshot", path.display().to_string(), e))?;
        Ok(())
    }

    async fn read_inner_markup(&self, selector: &str) -> RobotResult<String> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| RobotError::ui("read_inner_markup", selector, e))?
            .inner_html()
            .await
            .map_err(|e| RobotError::ui("read_inner_markup", selector, e))?
            .ok_or_else(|| RobotError::ui("read_inner_markup", selector, "元素内容为空"))
    }

    async fn query_optional(&self, selector: &str) -> RobotResult<bool> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| RobotError::ui("query_optional", selector, e))?;
        Ok(!found.is_empty())
    }
}
