//! # Separador CT-e
//!
//! 把一堆 CT-e（运输单据）XML 按发行方 CNPJ 和签发日期分拣到目录树中，
//! 并可选择把批次目录压缩成 ZIP。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/fs_ops` - 移动文件、生成不冲突的文件名、清理空目录
//! - `infrastructure/notifier` - 用户交互端口（控制台 / 无界面）
//!
//! ### ② 业务能力层（Services）
//! - `DocumentClassifier` - 解析 XML，取出 CNPJ 和签发日期
//! - `PlacementResolver` - 计算目标路径，处理同名冲突
//! - `ReportWriter` - 写报告和错误日志
//! - `Archiver` - 压缩批次目录
//!
//! ### ③ 流程层（Workflow）
//! - `DocumentFlow` - 一份文档：分类 → 放置 → 失败兜底
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchWalker` - 扫描、逐个处理、计数、清理
//! - `App` - 一次运行的完整生命周期
//!
//! ## 目录约定
//!
//! ```text
//! 0.Por CNPJ/
//! ├── 0.Erros/            无法分类的文档
//! ├── 1.Duplicados/       因同名被挤出的旧文档
//! ├── 0.relatorio.txt     本次运行报告
//! └── <CNPJ>/
//!     ├── <YYYY-MM-DD>/   分拣结果
//!     └── lote_*.zip      压缩后的批次
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{ArchivePolicy, Config, DatePolicy};
pub use error::{AppError, AppResult};
pub use infrastructure::{Choice, ConsoleNotifier, HeadlessNotifier, Notifier};
pub use models::{Classification, Document, RunReport, RunStats, RunSummary};
pub use orchestrator::{App, BatchWalker};
pub use workflow::{DocumentFlow, DocumentOutcome};
