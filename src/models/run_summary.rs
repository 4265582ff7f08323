use super::RunStats;
use std::time::Duration;

/// 本次运行对批次目录做了什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveChoice {
    /// 压缩并保留原目录
    KeepFolders,
    /// 压缩后删除原目录
    ZipOnly,
    /// 没有压缩
    None,
}

impl ArchiveChoice {
    pub fn label(self) -> &'static str {
        match self {
            ArchiveChoice::KeepFolders => "Mantidas pastas e ZIPs",
            ArchiveChoice::ZipOnly => "Mantidos apenas ZIPs",
            ArchiveChoice::None => "Nenhuma opção de compactação",
        }
    }
}

/// 一次运行的最终汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RunStats,
    pub archived: usize,
    pub archive_choice: ArchiveChoice,
    pub elapsed: Duration,
    /// 既没有文档也没有待压缩批次，运行直接结束
    pub nothing_to_do: bool,
}

impl RunSummary {
    pub fn nothing_to_do(elapsed: Duration) -> Self {
        Self {
            stats: RunStats::default(),
            archived: 0,
            archive_choice: ArchiveChoice::None,
            elapsed,
            nothing_to_do: true,
        }
    }

    /// 最终弹窗内容
    pub fn message(&self) -> String {
        format!(
            "Processo finalizado!\n\n\
             ✓ Arquivos processados: {}\n\
             ✗ Arquivos com erro: {}\n\
             👥 Arquivos duplicados: {}\n\
             📦 Lotes compactados: {}\n\
             ⚙ Opção: {}\n\
             ⏱ Tempo total: {:.2}s\n\n\
             Deseja abrir o relatório final detalhado agora?",
            self.stats.processed,
            self.stats.errors,
            self.stats.duplicates,
            self.archived,
            self.archive_choice.label(),
            self.elapsed.as_secs_f64()
        )
    }
}
