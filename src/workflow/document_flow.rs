//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一份文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 分类（CNPJ + 签发日期）
//! 2. 计算目标位置，有同名文件时先挪到重复区
//! 3. 移动文档
//! 4. 以上任一步失败 → 原样移入错误区（兜底）
//!
//! 一份文档要么被完整移走，要么留在原处；不会被改写内容。

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::fs_ops;
use crate::models::Document;
use crate::services::{DocumentClassifier, Placement, PlacementResolver};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// 单份文档的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// 已放到 `目标根/发行方/日期/文件名`
    Placed {
        target: PathBuf,
        /// 目标位置原有的文件被挪进了重复区
        duplicate: bool,
    },
    /// 分类或放置失败
    Errored {
        /// 文档在错误区中的位置；移动也失败时为 None（文档留在原处）
        moved_to: Option<PathBuf>,
        /// 失败前已经挤出了一个同名旧文件
        duplicate: bool,
    },
}

impl DocumentOutcome {
    pub fn is_duplicate(&self) -> bool {
        match self {
            DocumentOutcome::Placed { duplicate, .. }
            | DocumentOutcome::Errored { duplicate, .. } => *duplicate,
        }
    }
}

/// 文档处理流程
///
/// - 编排"分类 → 放置 → 兜底"
/// - 不持有计数器，计数由调用方根据返回值累加
pub struct DocumentFlow {
    classifier: DocumentClassifier,
    resolver: PlacementResolver,
    errors_dir: PathBuf,
}

impl DocumentFlow {
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        Ok(Self {
            classifier: DocumentClassifier::new(config)?,
            resolver: PlacementResolver::new(config),
            errors_dir: config.errors_dir(),
        })
    }

    pub fn run(&self, document: &Document) -> DocumentOutcome {
        let mut evicted = None;
        match self.classify_and_place(document, &mut evicted) {
            Ok(placement) => {
                debug!("{} ✓ -> {}", document, placement.target.display());
                DocumentOutcome::Placed {
                    duplicate: placement.is_duplicate(),
                    target: placement.target,
                }
            }
            Err(e) => {
                warn!("{} ✗ {}", document, e);
                DocumentOutcome::Errored {
                    moved_to: self.move_to_errors(document),
                    duplicate: evicted.is_some(),
                }
            }
        }
    }

    fn classify_and_place(
        &self,
        document: &Document,
        evicted: &mut Option<PathBuf>,
    ) -> AppResult<Placement> {
        let classification = self.classifier.classify(document.path())?;
        let placement = self
            .resolver
            .prepare(&classification, &document.file_name())?;
        evicted.clone_from(&placement.evicted);
        self.resolver.commit(document.path(), &placement)?;
        Ok(placement)
    }

    /// 原样移入错误区，名称冲突时追加 ` (k)`
    fn move_to_errors(&self, document: &Document) -> Option<PathBuf> {
        if let Err(e) = fs::create_dir_all(&self.errors_dir) {
            error!("{} 无法创建错误区 {}: {}", document, self.errors_dir.display(), e);
            return None;
        }
        let target = fs_ops::unique_path(&self.errors_dir, &document.file_name(), false);
        match fs_ops::move_file(document.path(), &target) {
            Ok(()) => Some(target),
            Err(e) => {
                error!("{} 无法移入错误区: {}", document, e);
                None
            }
        }
    }
}
