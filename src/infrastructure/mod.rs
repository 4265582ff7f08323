//! 基础设施层：文件系统操作和用户交互端口
//!
//! 上层只通过这里接触磁盘移动和弹窗/控制台交互。

pub mod fs_ops;
pub mod notifier;

pub use notifier::{Choice, ConsoleNotifier, HeadlessNotifier, Notifier, ProgressUpdate};
