//! 无头模式启动
//!
//! 打印 PDF 只能在无头模式下进行，所以默认走这条路径。

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Handler, Page};
use futures::StreamExt;
use tracing::{debug, info, warn};

/// 容器和 CI 里没有 GPU，也经常没有足够的 /dev/shm
const LAUNCH_ARGS: [&str; 3] = ["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"];

/// 启动后等 CDP 目标列表同步完再开页面
const TARGET_SYNC_DELAY: Duration = Duration::from_millis(300);

/// 组装无头浏览器配置
///
/// `executable` 为空时由 chromiumoxide 自动查找本机的 Chrome / Chromium。
pub fn headless_config(executable: Option<&str>) -> Result<BrowserConfig> {
    let builder = BrowserConfig::builder()
        .new_headless_mode()
        .args(LAUNCH_ARGS);

    let builder = match executable {
        Some(path) => {
            debug!("使用指定的浏览器: {}", path);
            builder.chrome_executable(Path::new(path))
        }
        None => builder,
    };

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("无头浏览器配置无效: {}", e))
}

/// 启动无头浏览器，打开一个停在 `url` 的页面
pub async fn launch_headless_browser(
    url: &str,
    executable: Option<&str>,
) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器 → {}", url);

    let config = headless_config(executable)?;
    let (browser, handler) = Browser::launch(config)
        .await
        .context("无头浏览器启动失败")?;
    drive_events(handler);

    tokio::time::sleep(TARGET_SYNC_DELAY).await;

    let page = browser
        .new_page(url)
        .await
        .with_context(|| format!("无法打开页面: {}", url))?;

    info!("✅ 无头浏览器就绪");
    Ok((browser, page))
}

/// CDP 事件必须持续被消费，否则页面操作会一直挂起
fn drive_events(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                warn!("浏览器事件循环结束: {}", e);
                break;
            }
        }
    });
}
