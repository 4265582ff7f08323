use anyhow::Result;
use clap::Parser;
use separador_cte::cli::Cli;
use separador_cte::utils::logging;
use separador_cte::{App, ConsoleNotifier, HeadlessNotifier};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 单据级别的错误只计数，不影响退出码；只有初始化失败才返回错误
    if cli.headless {
        App::initialize(config, HeadlessNotifier::declining())?.run()?;
    } else {
        App::initialize(config, ConsoleNotifier::new())?.run()?;
    }

    Ok(())
}
