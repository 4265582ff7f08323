//! 放置服务 - 业务能力层
//!
//! 计算 `目标根/发行方/日期/文件名`，处理同名冲突，然后把文档移进去。

use crate::config::Config;
use crate::error::PlacementError;
use crate::infrastructure::fs_ops;
use crate::models::Classification;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 一次放置的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// 文档最终所在路径
    pub target: PathBuf,
    /// 若目标位置原本有文件，它被挪到了这里（重复区）
    pub evicted: Option<PathBuf>,
}

impl Placement {
    pub fn is_duplicate(&self) -> bool {
        self.evicted.is_some()
    }
}

/// 放置解析器
///
/// 冲突策略：目标位置已有文件时，把"已有的"那份改名为 `name (k).ext`
/// 挪进重复区，新来的文件占据目标位置。
pub struct PlacementResolver {
    destination_dir: PathBuf,
    duplicates_dir: PathBuf,
}

impl PlacementResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            destination_dir: config.destination_dir.clone(),
            duplicates_dir: config.duplicates_dir(),
        }
    }

    pub fn target_dir(&self, classification: &Classification) -> PathBuf {
        self.destination_dir
            .join(&classification.issuer_id)
            .join(&classification.issue_date)
    }

    pub fn target_path(&self, classification: &Classification, file_name: &str) -> PathBuf {
        self.target_dir(classification).join(file_name)
    }

    /// 建好目标目录并腾出目标路径，不移动文档本身
    pub fn prepare(
        &self,
        classification: &Classification,
        file_name: &str,
    ) -> Result<Placement, PlacementError> {
        let dir = self.target_dir(classification);
        fs::create_dir_all(&dir).map_err(|source| PlacementError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let target = dir.join(file_name);
        let evicted = if target.exists() {
            Some(self.evict(&target, file_name)?)
        } else {
            None
        };

        Ok(Placement { target, evicted })
    }

    /// 把 `source` 放到分类结果对应的位置
    pub fn place(
        &self,
        source: &Path,
        classification: &Classification,
    ) -> Result<Placement, PlacementError> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let placement = self.prepare(classification, &file_name)?;
        self.commit(source, &placement)?;
        Ok(placement)
    }

    /// 把文档移到 `prepare` 腾出的目标路径
    pub fn commit(&self, source: &Path, placement: &Placement) -> Result<(), PlacementError> {
        fs_ops::move_file(source, &placement.target).map_err(|source_err| PlacementError::Move {
            from: source.to_path_buf(),
            to: placement.target.clone(),
            source: source_err,
        })
    }

    fn evict(&self, existing: &Path, file_name: &str) -> Result<PathBuf, PlacementError> {
        fs::create_dir_all(&self.duplicates_dir).map_err(|source| PlacementError::CreateDir {
            path: self.duplicates_dir.clone(),
            source,
        })?;

        let evicted_to = fs_ops::unique_path(&self.duplicates_dir, file_name, true);
        fs_ops::move_file(existing, &evicted_to).map_err(|source| PlacementError::Evict {
            from: existing.to_path_buf(),
            to: evicted_to.clone(),
            source,
        })?;

        debug!(
            "已存在同名文件，移至重复区: {} -> {}",
            existing.display(),
            evicted_to.display()
        );
        Ok(evicted_to)
    }
}
