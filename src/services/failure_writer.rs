//! 失败记录服务 - 业务能力层
//!
//! 只负责把处理失败的订单追加写入文本文件，不关心流程

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RobotError, RobotResult};

/// 失败订单记录
///
/// 每行一个订单：`订单 <N> | 阶段 <stage> | 原因: <reason>`
pub struct FailureWriter {
    path: PathBuf,
}

impl FailureWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, order_number: &str, stage: &str, reason: &str) -> RobotResult<()> {
        debug!("记录失败订单: {} ({})", order_number, stage);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| RobotError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RobotError::io(&self.path, e))?;

        let line = format!("订单 {} | 阶段 {} | 原因: {}\n", order_number, stage, reason);
        file.write_all(line.as_bytes())
            .map_err(|e| RobotError::io(&self.path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_one_line_per_failure() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FailureWriter::with_path(dir.path().join("failed_orders.txt"));

        writer.write("4", "Submitted", "重试次数用尽").unwrap();
        writer.write("7", "FormFilled", "元素不存在").unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "订单 4 | 阶段 Submitted | 原因: 重试次数用尽");
        assert!(lines[1].starts_with("订单 7"));
    }
}
