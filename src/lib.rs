//! # lsb_sentinel 库
//!
//! 本库包含以结束标记终止的 LSB 隐写工具的核心逻辑：
//! 位序列化与容量检查 ([`bits`])、像素映射 ([`steganography`])、
//! 结束标记扫描 ([`scanner`])，以及图像编解码和 base64 传输 ([`codec`])。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod handler;
pub mod pixels;
pub mod scanner;
pub mod steganography;

pub use bits::{BitStream, Sentinel, StegConfig};
pub use codec::{
    StegImage, base64_embed, base64_extract, embed_file, embed_from_bytes, extract_file,
    extract_from_bytes,
};
pub use error::StegError;
