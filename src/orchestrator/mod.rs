//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 运行编排器
//! - 管理一次运行的生命周期（初始化、分拣、报告、压缩、汇总）
//! - 唯一调用 `Notifier` 弹窗类方法的地方
//!
//! ### `batch_walker` - 批量分拣器
//! - 扫描源目录（`Vec<Document>`）
//! - 逐个调用 `DocumentFlow` 并持有计数器
//! - 清理空目录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (一次运行)
//!     ↓
//! batch_walker (处理 Vec<Document>)
//!     ↓
//! workflow::DocumentFlow (处理单个 Document)
//!     ↓
//! services (能力层：classifier / placement / report_writer / archiver)
//!     ↓
//! infrastructure (基础设施：fs_ops / notifier)
//! ```

pub mod batch_processor;
pub mod batch_walker;

// 重新导出主要类型
pub use batch_processor::App;
pub use batch_walker::BatchWalker;
