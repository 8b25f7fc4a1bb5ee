//! # 容量计算与位序列化模块
//!
//! 将秘密文本与结束标记展开为按最高位优先排列的位序列，
//! 并在修改任何像素之前检查位序列能否放入图像的通道容量。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, DEFAULT_SENTINEL};
use crate::error::{Result, StegError};

/// 标记隐写数据结尾的字节串。
///
/// 提取时以它在解码字节流中第一次出现的位置为准。
/// 如果秘密文本本身包含该标记，文本会在该处被截断。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel(Vec<u8>);

impl Sentinel {
    pub fn new(marker: impl Into<Vec<u8>>) -> Result<Self> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(StegError::EmptySentinel);
        }
        Ok(Self(marker))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 标记不可能为空，仅为配合 `len` 提供。
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self(DEFAULT_SENTINEL.as_bytes().to_vec())
    }
}

/// 隐写与提取共用的配置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StegConfig {
    pub sentinel: Sentinel,
}

impl StegConfig {
    pub fn with_sentinel(sentinel: Sentinel) -> Self {
        Self { sentinel }
    }
}

/// 待写入的位序列，每个元素为 0 或 1。
///
/// 长度始终是 8 的倍数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream(Vec<u8>);

impl BitStream {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

/// 将单个字节展开为 8 位，最高位在前。
fn byte_to_bits(byte: u8) -> impl Iterator<Item = u8> {
    (0..BITS_PER_BYTE).rev().map(move |shift| (byte >> shift) & 1)
}

/// 将秘密文本的 UTF-8 字节与结束标记依次展开为位序列。
pub fn serialize(secret: &str, sentinel: &Sentinel) -> BitStream {
    let bits = secret
        .as_bytes()
        .iter()
        .chain(sentinel.as_bytes())
        .flat_map(|&byte| byte_to_bits(byte))
        .collect();
    BitStream(bits)
}

/// 给定尺寸的像素缓冲区最多能容纳的位数：`width * height * 3`。
pub fn capacity(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

/// 在加上结束标记后仍能放入图像的最长秘密文本字节数。
pub fn max_secret_len(width: u32, height: u32, sentinel: &Sentinel) -> usize {
    (capacity(width, height) / BITS_PER_BYTE).saturating_sub(sentinel.len())
}

/// 位序列超出容量时返回 `CapacityExceeded`。
pub fn check_fits(bits: &BitStream, available: usize) -> Result<()> {
    if bits.len() > available {
        return Err(StegError::CapacityExceeded {
            required: bits.len(),
            available,
        });
    }
    Ok(())
}
