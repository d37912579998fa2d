//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序（严格串行，只有提交步骤内部会重试）：
//! 1. 关闭提示框 → 填写表单
//! 2. 预览并截图（提交前）
//! 3. 提交订单
//! 4. 收据渲染为 PDF → 追加截图页
//! 5. 点击 "Order another" 回到下单页

use std::fmt::{self, Display};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{RobotError, RobotResult};
use crate::infrastructure::{CancelSignal, DocumentRenderer, UiDriver};
use crate::models::{Order, OrderReceipt};
use crate::services::{ArtifactCapture, FormFiller, ReceiptComposer, SubmissionController};
use crate::workflow::order_ctx::OrderCtx;

/// 单个订单的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Start,
    ModalDismissed,
    FormFilled,
    Previewed,
    Captured,
    Submitted,
    ReceiptRendered,
    Composed,
    Reset,
}

impl Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 订单处理失败
///
/// `stage` 是失败时正在进入的阶段。
#[derive(Debug, Error)]
#[error("订单 {order_number} 在 {stage} 阶段失败: {source}")]
pub struct OrderFailure {
    pub order_number: String,
    pub stage: OrderStage,
    #[source]
    pub source: RobotError,
}

/// 订单处理流程
///
/// - 编排一个订单从填表到回到下单页的全过程
/// - 不持有任何资源（page），页面和渲染器由调用方传入
/// - 失败时删除该订单已生成的截图和收据，避免被归档
pub struct OrderFlow {
    form_filler: FormFiller,
    capture: ArtifactCapture,
    submitter: SubmissionController,
    composer: ReceiptComposer,
    order_url: String,
    order_another_selector: String,
}

impl OrderFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            form_filler: FormFiller::new(&config.selectors),
            capture: ArtifactCapture::new(config),
            submitter: SubmissionController::new(config),
            composer: ReceiptComposer::new(),
            order_url: config.order_url.clone(),
            order_another_selector: config.selectors.order_another.clone(),
        }
    }

    pub async fn run(
        &self,
        driver: &dyn UiDriver,
        renderer: &dyn DocumentRenderer,
        order: &Order,
        ctx: &OrderCtx,
        cancel: &CancelSignal,
    ) -> Result<OrderReceipt, OrderFailure> {
        let mut stage = OrderStage::Start;

        match self
            .advance(driver, renderer, order, ctx, cancel, &mut stage)
            .await
        {
            Ok(receipt) => Ok(receipt),
            Err(source) => {
                self.discard_partial(ctx, &order.order_number).await;
                Err(OrderFailure {
                    order_number: order.order_number.clone(),
                    stage,
                    source,
                })
            }
        }
    }

    /// 回到下单页，用于某个订单失败后继续处理下一个
    pub async fn recover(&self, driver: &dyn UiDriver) -> RobotResult<()> {
        info!("↩️ 重新打开下单页: {}", self.order_url);
        driver.navigate(&self.order_url).await
    }

    async fn advance(
        &self,
        driver: &dyn UiDriver,
        renderer: &dyn DocumentRenderer,
        order: &Order,
        ctx: &OrderCtx,
        cancel: &CancelSignal,
        stage: &mut OrderStage,
    ) -> RobotResult<OrderReceipt> {
        let number = order.order_number.as_str();
        info!("{} 🤖 开始处理: {}", ctx, order);

        enter(stage, OrderStage::ModalDismissed, cancel)?;
        if self.form_filler.dismiss_modal(driver).await? {
            debug!("{} 已关闭提示框", ctx);
        }

        enter(stage, OrderStage::FormFilled, cancel)?;
        self.form_filler.fill(driver, order).await?;
        debug!("{} 表单已填写", ctx);

        enter(stage, OrderStage::Previewed, cancel)?;
        self.capture.show_preview(driver).await?;

        enter(stage, OrderStage::Captured, cancel)?;
        let screenshot = self.capture.capture_screenshot(driver, number).await?;
        debug!("{} 📸 截图: {}", ctx, screenshot.path.display());

        enter(stage, OrderStage::Submitted, cancel)?;
        let submit_attempts = self.submitter.submit(driver, cancel).await?;
        if submit_attempts > 1 {
            info!("{} ✓ 提交成功 (重试 {} 次)", ctx, submit_attempts - 1);
        } else {
            info!("{} ✓ 提交成功", ctx);
        }

        enter(stage, OrderStage::ReceiptRendered, cancel)?;
        let document = self
            .capture
            .capture_document(driver, renderer, number)
            .await?;

        enter(stage, OrderStage::Composed, cancel)?;
        let page_count = self.composer.compose(&screenshot, &document)?;
        debug!("{} 收据共 {} 页", ctx, page_count);

        enter(stage, OrderStage::Reset, cancel)?;
        driver.click(&self.order_another_selector).await?;

        info!("{} ✅ 收据: {}", ctx, document.path.display());
        Ok(OrderReceipt {
            order_number: number.to_string(),
            path: document.path,
            submit_attempts,
            page_count,
        })
    }

    /// 删除失败订单的截图和收据
    async fn discard_partial(&self, ctx: &OrderCtx, order_number: &str) {
        let layout = self.capture.layout();
        for path in [
            layout.screenshot_path(order_number),
            layout.receipt_path(order_number),
        ] {
            remove_if_exists(ctx, &path).await;
        }
    }
}

/// 检查取消信号后进入下一阶段
fn enter(stage: &mut OrderStage, next: OrderStage, cancel: &CancelSignal) -> RobotResult<()> {
    *stage = next;
    cancel.check()
}

async fn remove_if_exists(ctx: &OrderCtx, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("{} 已删除未完成的文件: {}", ctx, path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("{} 删除 {} 失败: {}", ctx, path.display(), e),
    }
}
