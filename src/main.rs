use clap::Parser;
use log::LevelFilter;

use lsb_sentinel::{
    cli::{Cli, Commands},
    diagnostics::Diagnostics,
    handler::{Session, handle_capacity, handle_hide, handle_recover},
};

/// 程序的主入口点
///
/// 负责解析命令行参数、按 `--log-level` 初始化日志，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(LevelFilter::from(cli.global.log_level))
        .format_timestamp_millis()
        .init();

    let session = Session::from_args(&cli.global, Diagnostics::global())?;

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args, &session),
        Commands::Recover(args) => handle_recover(args, &session),
        Commands::Capacity(args) => handle_capacity(args, &session),
    }
}
