use anyhow::Result;
use robot_order::utils::logging;
use robot_order::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run().await?;

    if !summary.is_complete() {
        let failed: Vec<&str> = summary
            .failed
            .iter()
            .map(|f| f.order_number.as_str())
            .collect();
        anyhow::bail!("{} 个订单处理失败: {}", failed.len(), failed.join(", "));
    }

    Ok(())
}
