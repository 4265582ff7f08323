use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 每个分类对应一类处理方式：
/// - `Classification` / `Placement`：单个文档级别，就地恢复（移入错误区）
/// - `Setup` / `Config`：致命，终止本次运行
///
/// `ArchiveError` 不经过这里：单个批次失败只记入 `ArchiveSummary`，跳过继续。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档解析/字段提取失败
    #[error("文档分类失败: {0}")]
    Classification(#[from] ClassificationError),
    /// 文档放置（建目录、挤出旧文件、移动）失败
    #[error("文档放置失败: {0}")]
    Placement(#[from] PlacementError),
    /// 初始化失败（目录、报告）
    #[error("初始化失败: {0}")]
    Setup(#[from] SetupError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档分类错误
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// XML 解析失败
    #[error("XML解析失败 ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    /// 文档中没有期望的命名空间
    #[error("缺少命名空间 {namespace} ({path})")]
    NamespaceMissing { path: PathBuf, namespace: String },
    /// 必填字段缺失或为空
    #[error("缺少字段 {field} ({path})")]
    FieldMissing { path: PathBuf, field: &'static str },
    /// 发行方标识不能作为目录名
    #[error("无效的发行方标识 '{value}' ({path})")]
    InvalidIssuer { path: PathBuf, value: String },
    /// 签发日期格式不正确
    #[error("无效的签发日期 '{value}' ({path})")]
    InvalidDate { path: PathBuf, value: String },
}

/// 放置错误
#[derive(Debug, Error)]
pub enum PlacementError {
    /// 创建目标目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 把已存在的文件挪到重复区失败
    #[error("移出已存在文件失败 ({from} -> {to}): {source}")]
    Evict {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 移动文档失败
    #[error("移动文件失败 ({from} -> {to}): {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 归档错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// ZIP 写入失败
    #[error("ZIP写入失败 ({path}): {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    /// 遍历批次目录失败
    #[error("遍历目录失败: {0}")]
    Walk(#[from] walkdir::Error),
    /// 删除源目录失败
    #[error("删除目录失败 ({path}): {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 初始化错误
#[derive(Debug, Error)]
pub enum SetupError {
    /// 创建必需目录失败
    #[error("无法创建目录 ({path}): {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入报告失败
    #[error("无法写入报告 ({path}): {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 扫描目录失败
    #[error("无法扫描目录 ({path}): {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配置项取值无效
    #[error("配置项 {key} 的值 '{value}' 无效")]
    InvalidValue { key: String, value: String },
}

// ========== 便捷构造函数 ==========

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ArchiveError::Zip {
            path: path.into(),
            source,
        }
    }
}

impl SetupError {
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
