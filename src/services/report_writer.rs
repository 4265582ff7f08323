//! 报告写入服务 - 业务能力层
//!
//! 汇总计数和"发行方/日期"明细，覆盖写入固定位置的报告文件。

use crate::config::Config;
use crate::error::SetupError;
use crate::infrastructure::fs_ops;
use crate::models::{DateFolder, IssuerBreakdown, RunReport, RunStats};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 报告写入服务
pub struct ReportWriter {
    config: Config,
}

impl ReportWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 生成报告并写入 `结果根/0.relatorio.txt`
    pub fn generate(&self, stats: RunStats) -> Result<RunReport, SetupError> {
        let report = self.build(stats)?;
        self.write(&report)?;
        Ok(report)
    }

    /// 重新扫描结果目录，组装报告
    pub fn build(&self, stats: RunStats) -> Result<RunReport, SetupError> {
        let effectively_separated =
            fs_ops::count_files(&self.config.destination_dir, |p| self.config.is_document(p));
        if effectively_separated != stats.processed {
            // 结果目录里原本就有文档时两者会不同，仅作提示
            debug!(
                "重新统计的文档数 {} 与处理数 {} 不一致",
                effectively_separated, stats.processed
            );
        }

        Ok(RunReport {
            generated_at: Local::now(),
            stats,
            effectively_separated,
            breakdown: self.breakdown()?,
        })
    }

    /// 覆盖写入报告文件
    pub fn write(&self, report: &RunReport) -> Result<PathBuf, SetupError> {
        let path = self.config.report_path();
        fs::write(&path, report.render()).map_err(|source| SetupError::WriteReport {
            path: path.clone(),
            source,
        })?;
        info!("📝 报告已写入: {}", path.display());
        Ok(path)
    }

    /// 在错误区写入 `0.Erros_<n>.txt`
    pub fn write_error_log(&self, errors: usize) -> Result<PathBuf, SetupError> {
        let path = self
            .config
            .errors_dir()
            .join(format!("{}_{}.txt", self.config.errors_dir_name, errors));
        let content = format!(
            "Total de arquivos com erro: {}\nData do processamento: {}\n",
            errors,
            Local::now().format("%d/%m/%Y %H:%M:%S")
        );
        fs::write(&path, content).map_err(|source| SetupError::WriteReport {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// 按发行方、再按日期文件夹名（字典序）统计文档数；跳过错误区和重复区
    pub fn breakdown(&self) -> Result<Vec<IssuerBreakdown>, SetupError> {
        let mut result = Vec::new();
        for (issuer_id, issuer_path) in sorted_subdirs(&self.config.destination_dir)? {
            if self.config.is_holding_dir(&issuer_id) {
                continue;
            }

            let mut folders = Vec::new();
            for (name, folder_path) in sorted_subdirs(&issuer_path)? {
                let documents = fs::read_dir(&folder_path)
                    .map_err(|source| SetupError::Scan {
                        path: folder_path.clone(),
                        source,
                    })?
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file() && self.config.is_document(&e.path()))
                    .count();
                folders.push(DateFolder { name, documents });
            }

            result.push(IssuerBreakdown { issuer_id, folders });
        }
        Ok(result)
    }
}

/// 列出直接子目录，按名称排序
fn sorted_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, SetupError> {
    let mut subdirs: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .map_err(|source| SetupError::Scan {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
        .collect();
    subdirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(subdirs)
}
