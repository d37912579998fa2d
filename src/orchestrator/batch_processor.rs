//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：写日志文件头、启动或连接浏览器
//! 2. **资源管理**：持有 Browser、下单页面和渲染页面，确保生命周期正确
//! 3. **加载订单**：下载 CSV 并解析
//! 4. **取消**：Ctrl-C 触发取消信号，由流程层在检查点响应
//! 5. **向下委托**：委托 order_processor 处理订单和归档

use std::path::Path;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{CancelHandle, ChromeDriver, ChromeRenderer};
use crate::models::{self, Order};
use crate::orchestrator::order_processor::{self, RunSummary};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    driver: ChromeDriver,
    renderer: ChromeRenderer,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        let (browser, page) = if config.headless {
            browser::launch_headless_browser(&config.order_url, config.chrome_executable.as_deref())
                .await?
        } else {
            warn!("⚠️ 非无头模式下浏览器可能无法打印 PDF");
            browser::connect_to_browser_and_page(config.browser_debug_port, &config.order_url)
                .await?
        };

        // 收据渲染使用单独的页面，不破坏下单页的表单状态
        let render_page = browser::open_blank_page(&browser).await?;

        Ok(Self {
            config,
            _browser: browser,
            driver: ChromeDriver::new(page),
            renderer: ChromeRenderer::new(render_page),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let (handle, cancel) = CancelHandle::new();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⚠️ 收到中断信号，当前订单将被中止");
                handle.cancel();
            }
        });

        let orders = self.load_orders().await?;

        order_processor::process_orders(
            &self.config,
            &self.driver,
            &self.renderer,
            &orders,
            &cancel,
        )
        .await
    }

    /// 下载（可选）并读取订单
    async fn load_orders(&self) -> Result<Vec<Order>> {
        let csv_path = Path::new(&self.config.orders_csv_path);

        if self.config.orders_csv_url.is_empty() {
            info!("📁 使用本地订单文件: {}", csv_path.display());
        } else {
            models::download_orders_csv(&self.config.orders_csv_url, csv_path).await?;
        }

        models::load_orders_from_csv(csv_path)
            .await
            .context("读取订单失败")
    }
}
