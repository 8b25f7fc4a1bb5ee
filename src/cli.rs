//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use crate::constants::DEFAULT_SENTINEL;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 中隐藏或恢复以结束标记终止的文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 中隐藏或恢复以结束标记终止的文本。\n每个像素的 R、G、B 通道各携带 1 位数据，Alpha 通道保持不变。"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 所有子命令共用的参数。
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// 诊断输出的详细程度。
    #[arg(long, value_enum, default_value_t = LogLevel::Critical, global = true)]
    pub log_level: LogLevel,

    /// 标记秘密文本结尾的字符串，隐藏与恢复时必须一致。
    #[arg(long, default_value = DEFAULT_SENTINEL, global = true)]
    pub sentinel: String,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像可容纳的位数以及可隐藏的最长文本。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径 (UTF-8)。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 缺省时为输入图像同目录下的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 输入图像文件为 base64 文本，结果同样以 base64 文本保存。
    #[arg(long)]
    pub base64: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 缺省时为图像同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 输入图像文件为 base64 文本。
    #[arg(long)]
    pub base64: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    #[arg(short, long)]
    pub image: PathBuf,

    #[arg(long)]
    pub base64: bool,
}

/// 诊断级别，从最安静的 `critical` 到最详细的 `debug`。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            // 库内没有 critical 级别的记录
            LogLevel::Critical => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Notice | LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}
