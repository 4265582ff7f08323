/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use crate::config::Config;
use crate::models::RunSummary;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 info，详细模式下为 debug。重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 CT-e 分拣程序启动");
    info!("📂 源目录: {}", config.source_dir.display());
    info!("📁 结果目录: {}", config.destination_dir.display());
    info!("👥 重复区: {}", config.duplicates_dir().display());
    info!("{}", "=".repeat(60));
}

/// 记录扫描结果
///
/// # 参数
/// - `total`: 找到的文档数
/// - `pending_batches`: 待压缩的批次数
pub fn log_documents_found(total: usize, pending_batches: usize) {
    info!("✓ 找到 {} 个待分拣的 XML", total);
    info!("📦 已有 {} 个待压缩批次\n", pending_batches);
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已处理: {}/{}", summary.stats.processed, summary.stats.found);
    info!("❌ 错误: {}", summary.stats.errors);
    info!("👥 重复: {}", summary.stats.duplicates);
    info!("📦 已压缩批次: {}", summary.archived);
    info!("⚙ 压缩选项: {}", summary.archive_choice.label());
    info!("⏱ 用时: {:.2}s", summary.elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
}
