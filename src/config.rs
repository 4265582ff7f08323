use crate::error::ConfigError;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 签发日期的取值策略
///
/// `Truncate` 直接截取时间戳 `T` 之前的部分，不做时区换算；
/// 午夜前后、跨时区签发的文档可能落到"本地日期"之外的文件夹。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// 取 `T` 之前的日历日期
    #[default]
    Truncate,
    /// 按 RFC 3339 解析后换算为 UTC 日期
    Utc,
}

/// 批次压缩策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ArchivePolicy {
    /// 运行结束时询问用户
    #[default]
    Ask,
    /// 压缩并保留原目录
    Keep,
    /// 压缩并删除原目录
    Remove,
    /// 不压缩
    Skip,
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 待分拣的 XML 所在目录
    pub source_dir: PathBuf,
    /// 分拣结果根目录
    pub destination_dir: PathBuf,
    /// 错误区目录名（位于结果根目录下）
    pub errors_dir_name: String,
    /// 重复区目录名（位于结果根目录下）
    pub duplicates_dir_name: String,
    /// 报告文件名（位于结果根目录下）
    pub report_file_name: String,
    /// 待压缩批次目录的名称前缀
    pub batch_prefix: String,
    /// 文档扩展名（不区分大小写）
    pub document_extension: String,
    /// CT-e 命名空间
    pub namespace: String,
    pub date_policy: DatePolicy,
    pub archive_policy: ArchivePolicy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("1.A Separar"),
            destination_dir: PathBuf::from("0.Por CNPJ"),
            errors_dir_name: "0.Erros".to_string(),
            duplicates_dir_name: "1.Duplicados".to_string(),
            report_file_name: "0.relatorio.txt".to_string(),
            batch_prefix: "lote_".to_string(),
            document_extension: "xml".to_string(),
            namespace: "http://www.portalfiscal.inf.br/cte".to_string(),
            date_policy: DatePolicy::Truncate,
            archive_policy: ArchivePolicy::Ask,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 以指定目录为基准的默认配置
    pub fn rooted_at(base: &Path) -> Self {
        let default = Self::default();
        Self {
            source_dir: base.join(&default.source_dir),
            destination_dir: base.join(&default.destination_dir),
            ..default
        }
    }

    /// 从 TOML 文件加载，未出现的键保持默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 用环境变量覆盖当前配置；无法解析的值会被忽略
    pub fn with_env(mut self) -> Self {
        if let Ok(v) = std::env::var("CTE_SOURCE_DIR") {
            self.source_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CTE_DESTINATION_DIR") {
            self.destination_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CTE_BATCH_PREFIX") {
            self.batch_prefix = v;
        }
        if let Some(policy) = parse_env_enum::<DatePolicy>("CTE_DATE_POLICY") {
            self.date_policy = policy;
        }
        if let Some(policy) = parse_env_enum::<ArchivePolicy>("CTE_ARCHIVE_POLICY") {
            self.archive_policy = policy;
        }
        if let Some(verbose) = std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()) {
            self.verbose_logging = verbose;
        }
        self
    }

    pub fn errors_dir(&self) -> PathBuf {
        self.destination_dir.join(&self.errors_dir_name)
    }

    pub fn duplicates_dir(&self) -> PathBuf {
        self.destination_dir.join(&self.duplicates_dir_name)
    }

    pub fn report_path(&self) -> PathBuf {
        self.destination_dir.join(&self.report_file_name)
    }

    /// 错误区和重复区即使为空也不会被清理
    pub fn is_holding_dir(&self, name: &str) -> bool {
        name == self.errors_dir_name || name == self.duplicates_dir_name
    }

    /// 扩展名匹配（不区分大小写）
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.document_extension))
    }
}

fn parse_env_enum<T: ValueEnum>(var_name: &str) -> Option<T> {
    let value = std::env::var(var_name).ok()?;
    match T::from_str(&value, true) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("环境变量 {} 的值 '{}' 无法识别，已忽略", var_name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = Config::rooted_at(Path::new("/srv/cte"));
        assert_eq!(config.source_dir, PathBuf::from("/srv/cte/1.A Separar"));
        assert_eq!(config.errors_dir(), PathBuf::from("/srv/cte/0.Por CNPJ/0.Erros"));
        assert_eq!(
            config.duplicates_dir(),
            PathBuf::from("/srv/cte/0.Por CNPJ/1.Duplicados")
        );
        assert_eq!(
            config.report_path(),
            PathBuf::from("/srv/cte/0.Por CNPJ/0.relatorio.txt")
        );
    }

    #[test]
    fn test_document_extension_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_document(Path::new("a/b/nota.XML")));
        assert!(config.is_document(Path::new("nota.xml")));
        assert!(!config.is_document(Path::new("nota.xml.bak")));
        assert!(!config.is_document(Path::new("xml")));
    }

    #[test]
    fn test_from_file_overrides_only_present_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("separador.toml");
        std::fs::write(
            &path,
            "batch_prefix = \"batch-\"\ndate_policy = \"utc\"\narchive_policy = \"remove\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.batch_prefix, "batch-");
        assert_eq!(config.date_policy, DatePolicy::Utc);
        assert_eq!(config.archive_policy, ArchivePolicy::Remove);
        assert_eq!(config.errors_dir_name, "0.Erros");
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("separador.toml");
        std::fs::write(&path, "pasta_origem = \"x\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
