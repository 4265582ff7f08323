use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 分类结果：发行方 CNPJ + 签发日期（`YYYY-MM-DD`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub issuer_id: String,
    pub issue_date: String,
}

impl Classification {
    pub fn new(issuer_id: impl Into<String>, issue_date: impl Into<String>) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            issue_date: issue_date.into(),
        }
    }
}

/// 扫描到的一份待分拣文档
///
/// 文档只会被移动，不会被改写内容；每次运行中最多移动一次。
#[derive(Debug, Clone)]
pub struct Document {
    /// 当前所在路径
    pub path: PathBuf,
    /// 扫描顺序中的序号（从1开始，仅用于日志）
    pub index: usize,
}

impl Document {
    pub fn new(path: PathBuf, index: usize) -> Self {
        Self { path, index }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 原始文件名；无法取得时退回 "documento"
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "documento".to_string())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档#{} {}]", self.index, self.file_name())
    }
}
