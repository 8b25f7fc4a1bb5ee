//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::bits::{Sentinel, StegConfig};
use crate::cli::{CapacityArgs, GlobalArgs, HideArgs, RecoverArgs};
use crate::codec::StegImage;
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::diagnostics::Diagnostics;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 由命令行全局参数构造隐写配置与诊断接收端。
#[derive(Debug, Default)]
pub struct Session {
    pub config: StegConfig,
    pub diag: Diagnostics,
}

impl Session {
    pub fn from_args(global: &GlobalArgs, diag: Diagnostics) -> Result<Self> {
        let sentinel = Sentinel::new(global.sentinel.as_str())
            .context("The --sentinel marker must contain at least one character.")?;
        Ok(Self {
            config: StegConfig::with_sentinel(sentinel),
            diag,
        })
    }

    fn image(&self) -> StegImage {
        StegImage::new(self.config.clone()).with_diagnostics(self.diag)
    }
}

/// 在 `source` 同目录下生成 `<prefix><文件名>.<extension>` 形式的路径。
fn sibling_path(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 目标文件已存在且未指定 `--force` 时拒绝写入。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn load_image(session: &Session, path: &Path, base64: bool) -> Result<StegImage> {
    let mut img = session.image();
    let loaded = if base64 {
        let encoded = fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read base64 image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
        img.load_from_base64(&encoded)
    } else {
        let picture = fs::read(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
        img.load_from_bytes(&picture)
    };
    loaded.with_context(|| {
        format!(
            "Unable to decode image: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(img)
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、检查隐写空间是否足够、调用隐写核心函数写入文本与结束标记，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
/// * `session` - 结束标记配置与诊断接收端。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像，或文本文件不是 UTF-8。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标文件。
pub fn handle_hide(args: HideArgs, session: &Session) -> Result<()> {
    let dest = args.dest.clone().unwrap_or_else(|| {
        let extension = if args.base64 { "b64" } else { "png" };
        sibling_path(&args.image, DOCTORED_PREFIX, extension)
    });
    ensure_writable(&dest, args.force)?;

    let mut img = load_image(session, &args.image, args.base64)?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let required_space = text.len();
    let available_space = img.max_secret_len()?;
    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {} bytes, Available: {} bytes",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    img.embed(&text)
        .context("Failed to hide the text in the image.")?;

    if args.base64 {
        let encoded = img.write_to_base64()?;
        fs::write(&dest, encoded).with_context(|| {
            format!(
                "Unable to write to target file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;
    } else {
        img.write_to_file(&dest).with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;
    }

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用提取函数查找结束标记之前的文本，
/// 最后将恢复的文本内容写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 图像中找不到结束标记。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs, session: &Session) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| sibling_path(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let img = load_image(session, &args.image, args.base64)?;

    let text = img.extract().with_context(|| {
        format!(
            "Failed to recover a secret from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：打印通道容量与当前结束标记下可隐藏的最长文本。
pub fn handle_capacity(args: CapacityArgs, session: &Session) -> Result<()> {
    let img = load_image(session, &args.image, args.base64)?;

    println!(
        "Capacity: {} bits, longest secret: {} bytes",
        img.capacity()?.to_string().green().bold(),
        img.max_secret_len()?.to_string().green().bold()
    );
    Ok(())
}
