use crate::config::{ArchivePolicy, Config, DatePolicy};
use crate::error::{AppResult, ConfigError};
use clap::Parser;
use std::path::PathBuf;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "separador_cte",
    version,
    about = "Separa XMLs de CT-e por CNPJ do emitente e data de emissão"
)]
pub struct Cli {
    /// TOML 配置文件
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// 待分拣的 XML 目录
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// 分拣结果根目录
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub destination: Option<PathBuf>,

    /// 待压缩批次目录的名称前缀
    #[arg(long)]
    pub batch_prefix: Option<String>,

    /// 签发日期的取值策略
    #[arg(long, value_enum)]
    pub date_policy: Option<DatePolicy>,

    /// 批次压缩策略
    #[arg(long, value_enum)]
    pub archive: Option<ArchivePolicy>,

    /// 不弹出任何询问：确认一律为"否"，三选一一律为"取消"
    #[arg(long)]
    pub headless: bool,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 默认值 → 配置文件 → 环境变量 → 命令行，后者覆盖前者
    pub fn load_config(&self) -> AppResult<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = base.with_env();

        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(destination) = &self.destination {
            config.destination_dir = destination.clone();
        }
        if let Some(prefix) = &self.batch_prefix {
            config.batch_prefix = prefix.clone();
        }
        if let Some(policy) = self.date_policy {
            config.date_policy = policy;
        }
        if let Some(policy) = self.archive {
            config.archive_policy = policy;
        }
        if self.verbose {
            config.verbose_logging = true;
        }

        if config.batch_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "batch_prefix".to_string(),
                value: String::new(),
            }
            .into());
        }

        Ok(config)
    }
}
