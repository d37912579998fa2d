//! 页面操作接口
//!
//! 流程层和业务能力层只依赖这个 trait，不直接接触 chromiumoxide。

use std::path::Path;

use async_trait::async_trait;

use crate::error::RobotResult;

/// 单个浏览器会话的页面操作能力
///
/// 所有方法都作用于同一个页面，调用方必须串行使用。
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> RobotResult<()>;

    async fn click(&self, selector: &str) -> RobotResult<()>;

    /// 选中下拉框中 value 匹配的选项
    async fn select_option(&self, selector: &str, value: &str) -> RobotResult<()>;

    async fn fill_text(&self, selector: &str, value: &str) -> RobotResult<()>;

    /// 截取当前页面并写入 `path`（PNG）
    async fn screenshot(&self, path: &Path) -> RobotResult<()>;

    async fn read_inner_markup(&self, selector: &str) -> RobotResult<String>;

    /// 元素是否存在，不存在不算错误
    async fn query_optional(&self, selector: &str) -> RobotResult<bool>;
}
