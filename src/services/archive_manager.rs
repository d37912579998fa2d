//! 归档服务 - 业务能力层
//!
//! 全部订单处理完之后，把收据目录打成一个 zip

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{RobotError, RobotResult};

/// 归档结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub archive_path: PathBuf,
    /// 压缩包内的文件名，按名称排序
    pub files: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveManager;

impl ArchiveManager {
    pub fn new() -> Self {
        Self
    }

    /// 准备一个干净的输出目录，返回删除的旧文件数量
    ///
    /// 上一次运行留下的文件不能混进这一次的压缩包。
    pub fn prepare(&self, dir: &Path) -> RobotResult<usize> {
        fs::create_dir_all(dir).map_err(|e| RobotError::io(dir, e))?;
        let stale = list_files(dir)?;
        for path in &stale {
            fs::remove_file(path).map_err(|e| RobotError::io(path, e))?;
        }
        if !stale.is_empty() {
            debug!("已清理 {} 个旧文件: {}", stale.len(), dir.display());
        }
        Ok(stale.len())
    }

    /// 把 `source_dir` 下的全部文件压缩到 `archive_path`
    ///
    /// 只收录第一层的普通文件，不递归子目录。
    pub fn archive(&self, source_dir: &Path, archive_path: &Path) -> RobotResult<ArchiveSummary> {
        let sources: Vec<PathBuf> = list_files(source_dir)?
            .into_iter()
            .filter(|p| p != archive_path)
            .collect();

        if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RobotError::io(parent, e))?;
        }

        let zip_err = |source: zip::result::ZipError| RobotError::Archive {
            path: archive_path.to_path_buf(),
            source,
        };

        let file = File::create(archive_path).map_err(|e| RobotError::io(archive_path, e))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut files = Vec::with_capacity(sources.len());
        for path in &sources {
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            zip.start_file(name.as_str(), options).map_err(zip_err)?;
            let mut input = File::open(path).map_err(|e| RobotError::io(path, e))?;
            std::io::copy(&mut input, &mut zip).map_err(|e| RobotError::io(path, e))?;
            files.push(name);
        }

        zip.finish()
            .map_err(zip_err)?
            .flush()
            .map_err(|e| RobotError::io(archive_path, e))?;

        info!(
            "📦 已归档 {} 个文件: {}",
            files.len(),
            archive_path.display()
        );
        Ok(ArchiveSummary {
            archive_path: archive_path.to_path_buf(),
            files,
        })
    }

    /// 归档后删除已经收录的源文件
    pub fn archive_and_clean(
        &self,
        source_dir: &Path,
        archive_path: &Path,
    ) -> RobotResult<ArchiveSummary> {
        let summary = self.archive(source_dir, archive_path)?;
        for name in &summary.files {
            let path = source_dir.join(name);
            fs::remove_file(&path).map_err(|e| RobotError::io(&path, e))?;
        }
        debug!("已清理源目录: {}", source_dir.display());
        Ok(summary)
    }
}

/// 目录第一层的普通文件，按名称排序
fn list_files(dir: &Path) -> RobotResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| RobotError::io(dir, e))? {
        let entry = entry.map_err(|e| RobotError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
