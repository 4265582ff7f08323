//! 运行编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次运行的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **初始化**：创建源目录、结果目录、错误区、重复区
//! 2. **判断**：既无文档又无待压缩批次时提示后直接结束
//! 3. **分拣**：委托 `BatchWalker` 扫描并逐个处理
//! 4. **报告**：写入报告文件，清理空目录
//! 5. **压缩**：按 `ArchivePolicy` 询问或直接压缩批次目录
//! 6. **汇总**：错误日志、最终统计、询问是否打开报告
//!
//! 用户交互只发生在这些边界上，循环内只推送进度。

use crate::config::{ArchivePolicy, Config};
use crate::error::{AppResult, SetupError};
use crate::infrastructure::{Choice, Notifier};
use crate::models::{ArchiveChoice, RunStats, RunSummary};
use crate::orchestrator::batch_walker::BatchWalker;
use crate::services::{Archiver, ReportWriter};
use crate::utils::logging::{log_documents_found, log_startup, print_final_stats};
use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;
use tracing::{info, warn};

const KEEP_FOLDERS_PROMPT: &str = "Deseja manter as pastas após a compactação?\n\n\
• Sim: Manter pastas e arquivos ZIP (ambos)\n\
• Não: Manter apenas arquivos ZIP (pastas serão excluídas)";

/// 应用主结构
pub struct App<N: Notifier> {
    config: Config,
    notifier: N,
    started: Instant,
}

impl<N: Notifier> App<N> {
    /// 初始化应用，建好所有必需目录
    pub fn initialize(config: Config, notifier: N) -> AppResult<Self> {
        log_startup(&config);
        ensure_directories(&config)?;

        Ok(Self {
            config,
            notifier,
            started: Instant::now(),
        })
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// 运行应用主逻辑
    pub fn run(&self) -> Result<RunSummary> {
        let walker = BatchWalker::new(&self.config, &self.notifier)?;
        let archiver = Archiver::new(&self.config);

        info!("\n📁 正在扫描: {}", self.config.source_dir.display());
        let documents = walker.scan().context("扫描源目录失败")?;
        let pending_batches = archiver.find_candidates().len();

        if documents.is_empty() && pending_batches == 0 {
            warn!("⚠️ 没有待分拣的 XML，也没有待压缩的批次，程序结束");
            self.notifier.inform(
                "Aviso",
                "Nenhum arquivo XML encontrado para separar e nenhum lote para compactar!",
            );
            return Ok(RunSummary::nothing_to_do(self.started.elapsed()));
        }

        log_documents_found(documents.len(), pending_batches);

        let report_writer = ReportWriter::new(&self.config);
        let mut stats = RunStats::default();
        let message = if documents.is_empty() {
            "Nenhum arquivo XML encontrado para separar.\n\n".to_string()
        } else {
            stats = walker.run(&documents);
            report_writer.generate(stats).context("写入报告失败")?;
            walker.prune();
            format!(
                "Todos os {} arquivos XML foram separados.\n\n",
                stats.found
            )
        };

        let (archived, archive_choice) = self.archive_batches(&archiver, message);

        if stats.errors > 0 {
            if let Err(e) = report_writer.write_error_log(stats.errors) {
                warn!("错误日志写入失败: {}", e);
            }
        }

        let summary = RunSummary {
            stats,
            archived,
            archive_choice,
            elapsed: self.started.elapsed(),
            nothing_to_do: false,
        };
        print_final_stats(&summary);

        if self.notifier.confirm("Processo Concluído", &summary.message()) {
            self.open_report();
        }

        Ok(summary)
    }

    /// 压缩批次目录，返回 (压缩数, 选择)
    fn archive_batches(&self, archiver: &Archiver, mut message: String) -> (usize, ArchiveChoice) {
        let total = archiver.find_candidates().len();
        if total == 0 {
            message.push_str("Nenhum lote encontrado para compactar.");
            self.notifier.inform("Status", &message);
            return (0, ArchiveChoice::None);
        }

        message.push_str(&format!(
            "Foram encontrados {} lotes.\nDeseja compactá-los agora?",
            total
        ));

        let keep_folders = match self.config.archive_policy {
            ArchivePolicy::Keep => Some(true),
            ArchivePolicy::Remove => Some(false),
            ArchivePolicy::Skip => None,
            ArchivePolicy::Ask => {
                if self.notifier.confirm("Manter pastas?", &message) {
                    match self
                        .notifier
                        .choose("Opções de Compactação", KEEP_FOLDERS_PROMPT)
                    {
                        Choice::Yes => Some(true),
                        Choice::No => Some(false),
                        Choice::Cancel => None,
                    }
                } else {
                    None
                }
            }
        };

        match keep_folders {
            Some(keep) => {
                info!(
                    "\n📦 开始压缩 {} 个批次（{}）...",
                    total,
                    if keep { "保留目录" } else { "删除目录" }
                );
                let summary = archiver.archive_all(keep);
                if !summary.failed.is_empty() {
                    warn!("⚠️ {} 个批次压缩失败，已跳过", summary.failed.len());
                }
                let choice = if keep {
                    ArchiveChoice::KeepFolders
                } else {
                    ArchiveChoice::ZipOnly
                };
                (summary.archived, choice)
            }
            None => {
                info!("\n压缩已取消");
                (0, ArchiveChoice::None)
            }
        }
    }

    fn open_report(&self) {
        let path = self.config.report_path();
        if !path.exists() {
            warn!("报告文件不存在: {}", path.display());
            return;
        }
        if let Err(e) = self.notifier.open_with_default(&path) {
            warn!("无法打开报告 {}: {}", path.display(), e);
        }
    }
}

/// 创建源目录、结果目录、错误区、重复区
fn ensure_directories(config: &Config) -> Result<(), SetupError> {
    for dir in [
        config.source_dir.clone(),
        config.destination_dir.clone(),
        config.errors_dir(),
        config.duplicates_dir(),
    ] {
        fs::create_dir_all(&dir).map_err(|e| SetupError::create_dir(&dir, e))?;
    }
    Ok(())
}
