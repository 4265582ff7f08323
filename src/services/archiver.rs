//! 批次压缩服务 - 业务能力层
//!
//! 扫描 `结果根/<发行方>/<批次前缀>*` 目录，逐个打成 ZIP。
//! 日期命名的目录不是候选，只处理带批次前缀的目录。

use crate::config::Config;
use crate::error::ArchiveError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 压缩结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// 成功生成的压缩包数
    pub archived: usize,
    /// 失败并被跳过的批次目录
    pub failed: Vec<PathBuf>,
}

/// 批次压缩器
pub struct Archiver {
    destination_dir: PathBuf,
    batch_prefix: String,
}

impl Archiver {
    pub fn new(config: &Config) -> Self {
        Self {
            destination_dir: config.destination_dir.clone(),
            batch_prefix: config.batch_prefix.clone(),
        }
    }

    /// 找出所有待压缩的批次目录（只看两层），按路径排序
    pub fn find_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for issuer_dir in list_dirs(&self.destination_dir) {
            for batch_dir in list_dirs(&issuer_dir) {
                let is_batch = batch_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with(&self.batch_prefix))
                    .unwrap_or(false);
                if is_batch {
                    candidates.push(batch_dir);
                }
            }
        }
        candidates.sort();
        candidates
    }

    /// 压缩所有候选目录
    pub fn archive_all(&self, keep_folders: bool) -> ArchiveSummary {
        self.archive_dirs(&self.find_candidates(), keep_folders)
    }

    /// 逐个压缩给定的批次目录；单个目录失败时记录并继续
    pub fn archive_dirs(&self, batch_dirs: &[PathBuf], keep_folders: bool) -> ArchiveSummary {
        let mut summary = ArchiveSummary::default();

        if batch_dirs.is_empty() {
            info!("没有找到需要压缩的批次");
            return summary;
        }

        let total = batch_dirs.len();
        for (index, batch_dir) in batch_dirs.iter().enumerate() {
            match self.archive_one(batch_dir, keep_folders) {
                Ok(zip_path) => {
                    summary.archived += 1;
                    info!("📦 [{}/{}] 已压缩: {}", index + 1, total, zip_path.display());
                }
                Err(e) => {
                    error!("❌ [{}/{}] 压缩失败，已跳过: {}", index + 1, total, e);
                    summary.failed.push(batch_dir.clone());
                }
            }
        }

        summary
    }

    /// 把一个批次目录打成同级的 `<目录名>.zip`
    ///
    /// 旧压缩包先删除；新包先写到 `.zip.tmp` 再改名，中断时不会留下半个 `.zip`。
    pub fn archive_one(
        &self,
        batch_dir: &Path,
        keep_folder: bool,
    ) -> Result<PathBuf, ArchiveError> {
        let name = batch_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent = batch_dir.parent().unwrap_or(&self.destination_dir);
        let zip_path = parent.join(format!("{}.zip", name));
        let tmp_path = parent.join(format!("{}.zip.tmp", name));

        if zip_path.exists() {
            fs::remove_file(&zip_path).map_err(|e| ArchiveError::io(&zip_path, e))?;
        }

        if let Err(e) = write_archive(batch_dir, &tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        fs::rename(&tmp_path, &zip_path).map_err(|e| ArchiveError::io(&zip_path, e))?;

        if !keep_folder {
            fs::remove_dir_all(batch_dir).map_err(|source| ArchiveError::Remove {
                path: batch_dir.to_path_buf(),
                source,
            })?;
        }

        Ok(zip_path)
    }
}

/// 按相对路径把目录下所有文件写进压缩包
fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let file = File::create(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_dir) else {
            continue;
        };
        let entry_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(entry_name, options)
            .map_err(|e| ArchiveError::zip(archive_path, e))?;
        let mut input = File::open(entry.path()).map_err(|e| ArchiveError::io(entry.path(), e))?;
        io::copy(&mut input, &mut zip).map_err(|e| ArchiveError::io(entry.path(), e))?;
    }

    zip.finish().map_err(|e| ArchiveError::zip(archive_path, e))?;
    Ok(())
}

fn list_dirs(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(e) => {
            warn!("无法读取目录 {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
