use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::error::{RobotError, RobotResult};
use crate::models::order::Order;

/// 下载订单 CSV 文件，已存在时覆盖
pub async fn download_orders_csv(url: &str, target: &Path) -> RobotResult<()> {
    info!("⬇️ 正在下载订单文件: {}", url);

    let download_err = |source: reqwest::Error| RobotError::Download {
        url: url.to_string(),
        source,
    };

    let bytes = reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(download_err)?
        .bytes()
        .await
        .map_err(download_err)?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RobotError::io(parent, e))?;
    }
    fs::write(target, &bytes)
        .await
        .map_err(|e| RobotError::io(target, e))?;

    debug!("订单文件已保存: {} ({} 字节)", target.display(), bytes.len());
    Ok(())
}

/// 从本地 CSV 文件读取全部订单
pub async fn load_orders_from_csv(path: &Path) -> RobotResult<Vec<Order>> {
    let content = fs::read(path)
        .await
        .map_err(|e| RobotError::io(path, e))?;

    let orders = parse_orders(content.as_slice())?;
    info!(
        "成功加载 {} 个订单: {}",
        orders.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(orders)
}

/// 解析订单 CSV
///
/// 表头必须包含 `Order number,Head,Body,Legs,Address`。任何一行缺字段、
/// 字段为空、订单号不能用作文件名或与前面的行重复，都立即返回
/// `RobotError::Input`。
pub fn parse_orders<R: Read>(reader: R) -> RobotResult<Vec<Order>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut orders = Vec::new();
    let mut seen = HashSet::new();

    for (idx, record) in rdr.deserialize::<Order>().enumerate() {
        // 表头占第 1 行
        let row = idx + 2;
        let order = record.map_err(|e| RobotError::Input {
            row,
            reason: e.to_string(),
        })?;

        if let Some(field) = order.missing_field() {
            return Err(RobotError::Input {
                row,
                reason: format!("字段 {} 为空", field),
            });
        }
        if !order.has_valid_number() {
            return Err(RobotError::Input {
                row,
                reason: format!("订单号 {:?} 不能用作文件名", order.order_number),
            });
        }
        if !seen.insert(order.order_number.clone()) {
            return Err(RobotError::Input {
                row,
                reason: format!("订单号 {} 重复", order.order_number),
            });
        }

        orders.push(order);
    }

    Ok(orders)
}
