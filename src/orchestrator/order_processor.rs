//! 订单批处理 - 编排层
//!
//! 严格串行：同一个页面一次只处理一个订单。所有订单都结束之后才归档，
//! 归档时收据目录已经不会再被写入。

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{CancelSignal, DocumentRenderer, UiDriver};
use crate::models::{Order, OrderReceipt, OutputLayout};
use crate::services::{ArchiveManager, ArchiveSummary, FailureWriter};
use crate::utils::logging;
use crate::workflow::{OrderCtx, OrderFlow, OrderStage};

/// 失败订单记录文件名（位于输出目录根部，不会被归档）
pub const FAILURE_FILE: &str = "failed_orders.txt";

/// 失败的订单
#[derive(Debug, Clone)]
pub struct FailedOrder {
    pub order_number: String,
    pub stage: OrderStage,
    pub reason: String,
}

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<OrderReceipt>,
    pub failed: Vec<FailedOrder>,
    /// 没有成功的订单时为 None
    pub archive: Option<ArchiveSummary>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// 所有订单都成功
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn report_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .succeeded
            .iter()
            .map(|r| {
                format!(
                    "✅ 订单 {} | 提交 {} 次 | {}",
                    r.order_number,
                    r.submit_attempts,
                    r.path.display()
                )
            })
            .collect();
        lines.extend(self.failed.iter().map(|f| {
            format!("❌ 订单 {} | 阶段 {} | {}", f.order_number, f.stage, f.reason)
        }));
        if let Some(archive) = &self.archive {
            lines.push(format!(
                "📦 {} ({} 个收据)",
                archive.archive_path.display(),
                archive.files.len()
            ));
        }
        lines
    }
}

/// 处理全部订单并归档收据
///
/// 单个订单失败时：删除它的中间文件、写入失败记录、重新打开下单页，
/// 然后继续下一个订单。以下情况立即返回错误且不生成压缩包：
/// - 运行被取消
/// - 配置了 `fail_fast`
/// - 失败后无法重新打开下单页
pub async fn process_orders(
    config: &Config,
    driver: &dyn UiDriver,
    renderer: &dyn DocumentRenderer,
    orders: &[Order],
    cancel: &CancelSignal,
) -> Result<RunSummary> {
    let layout = OutputLayout::new(&config.output_dir);
    let archiver = ArchiveManager::new();
    prepare_output(&archiver, &layout)?;

    let mut summary = RunSummary::default();
    if orders.is_empty() {
        warn!("⚠️ 没有待处理的订单，程序结束");
        return Ok(summary);
    }
    logging::log_orders_loaded(orders.len());

    let flow = OrderFlow::new(config);
    let failures = FailureWriter::with_path(layout.root().join(FAILURE_FILE));
    let total = orders.len();

    for (idx, order) in orders.iter().enumerate() {
        let ctx = OrderCtx::new(&order.order_number, idx + 1, total);

        match flow.run(driver, renderer, order, &ctx, cancel).await {
            Ok(receipt) => summary.succeeded.push(receipt),
            Err(failure) => {
                error!("{} ❌ {}", ctx, failure);
                failures.write(
                    &failure.order_number,
                    &failure.stage.to_string(),
                    &failure.source.to_string(),
                )?;

                if failure.source.is_fatal() {
                    return Err(failure).context("运行已中止，未生成压缩包");
                }
                if config.fail_fast {
                    return Err(failure).context("fail_fast 已开启，未生成压缩包");
                }

                flow.recover(driver)
                    .await
                    .context("无法重新打开下单页，运行中止")?;

                summary.failed.push(FailedOrder {
                    order_number: failure.order_number,
                    stage: failure.stage,
                    reason: failure.source.to_string(),
                });
            }
        }
    }

    // 所有订单都已到达终态，收据目录不再变化
    if summary.succeeded.is_empty() {
        warn!("⚠️ 没有成功的订单，不生成压缩包");
    } else {
        let archive = archiver
            .archive_and_clean(&layout.receipts_dir(), &layout.archive_path())
            .context("归档收据失败")?;
        summary.archive = Some(archive);
    }

    logging::print_final_stats(
        summary.succeeded.len(),
        summary.failed.len(),
        summary.total(),
        &config.output_log_file,
    );
    if let Err(e) = logging::append_log_lines(&config.output_log_file, &summary.report_lines()) {
        warn!("写入日志文件失败: {}", e);
    }

    Ok(summary)
}

/// 清空截图和收据目录，删除上次运行的压缩包和失败记录
fn prepare_output(archiver: &ArchiveManager, layout: &OutputLayout) -> Result<()> {
    archiver.prepare(&layout.screenshots_dir())?;
    let stale = archiver.prepare(&layout.receipts_dir())?;
    if stale > 0 {
        info!("🧹 已清理上次运行遗留的 {} 个收据", stale);
    }
    remove_stale_file(&layout.archive_path())?;
    remove_stale_file(&layout.root().join(FAILURE_FILE))?;
    Ok(())
}

fn remove_stale_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("无法删除 {}", path.display())),
    }
}
