//! # 图像编解码与传输模块
//!
//! 在核心隐写算法外包了一层图像容器的解码、PNG 编码、base64 传输与文件读写。
//! 输出始终为无损的 PNG，以保证像素数据逐字节保留。

use crate::bits::{StegConfig, max_secret_len};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, StegError};
use crate::pixels::PixelBuffer;
use crate::steganography;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// 一次隐写或提取会话：已加载的源图像，以及隐写后得到的新图像。
#[derive(Debug, Default)]
pub struct StegImage {
    loaded: Option<DynamicImage>,
    format: Option<ImageFormat>,
    embedded: Option<PixelBuffer>,
    config: StegConfig,
    diag: Diagnostics,
}

impl StegImage {
    pub fn new(config: StegConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_diagnostics(mut self, diag: Diagnostics) -> Self {
        self.diag = diag;
        self
    }

    /// 已加载图像的容器格式 (由内容推断)。
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// 从内存中的图像文件字节加载源图像。
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let format = image::guess_format(bytes)
            .inspect_err(|e| self.diag.error(format_args!("{e}")))?;
        let img = image::load_from_memory_with_format(bytes, format)
            .inspect_err(|e| self.diag.error(format_args!("{e}")))?;
        self.diag.info(format_args!(
            "image type loaded: {format:?} ({}x{})",
            img.width(),
            img.height()
        ));
        self.loaded = Some(img);
        self.format = Some(format);
        self.embedded = None;
        Ok(())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|source| StegError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_from_bytes(&bytes)
    }

    /// 从标准字母表的 base64 文本加载源图像，首尾空白会被忽略。
    pub fn load_from_base64(&mut self, encoded: &str) -> Result<()> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .inspect_err(|e| self.diag.error(format_args!("{e}")))?;
        self.load_from_bytes(&bytes)
    }

    /// 已加载图像的通道容量 (位)。
    pub fn capacity(&self) -> Result<usize> {
        let img = self.loaded.as_ref().ok_or(StegError::NoImageLoaded)?;
        Ok(crate::bits::capacity(img.width(), img.height()))
    }

    /// 当前结束标记下可隐藏的最长秘密文本 (字节)。
    pub fn max_secret_len(&self) -> Result<usize> {
        let img = self.loaded.as_ref().ok_or(StegError::NoImageLoaded)?;
        Ok(max_secret_len(
            img.width(),
            img.height(),
            &self.config.sentinel,
        ))
    }

    /// 将秘密文本写入已加载图像的副本。失败时不保留任何部分结果。
    pub fn embed(&mut self, secret: &str) -> Result<()> {
        let img = self.loaded.as_ref().ok_or(StegError::NoImageLoaded)?;
        let source = PixelBuffer::from_image(img);
        let embedded = steganography::embed(&source, secret, &self.config, &self.diag)
            .inspect_err(|e| self.diag.error(format_args!("{e}")))?;
        self.embedded = Some(embedded);
        Ok(())
    }

    /// 从已加载的图像中提取秘密文本。
    pub fn extract(&self) -> Result<String> {
        let img = self.loaded.as_ref().ok_or(StegError::NoImageLoaded)?;
        let buffer = PixelBuffer::from_image(img);
        steganography::extract(&buffer, &self.config, &self.diag)
            .inspect_err(|e| self.diag.error(format_args!("{e}")))
    }

    /// 隐写后的像素缓冲区。尚未成功隐写时为 `None`。
    pub fn embedded(&self) -> Option<&PixelBuffer> {
        self.embedded.as_ref()
    }

    fn embedded_or_err(&self) -> Result<&PixelBuffer> {
        if self.loaded.is_none() {
            return Err(StegError::NoImageLoaded);
        }
        self.embedded.as_ref().ok_or(StegError::NothingEmbedded)
    }

    /// 将隐写后的图像编码为 PNG 字节。
    pub fn write_to_bytes(&self) -> Result<Vec<u8>> {
        let embedded = self.embedded_or_err()?;
        let mut out = Cursor::new(Vec::new());
        embedded.as_image().write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// 以最高压缩率将隐写后的图像写入 PNG 文件。
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let embedded = self.embedded_or_err()?;
        let mut out = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
        embedded.as_image().write_with_encoder(encoder)?;
        fs::write(path, out).map_err(|source| StegError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.diag
            .info(format_args!("embedded image written to {}", path.display()));
        Ok(())
    }

    pub fn write_to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.write_to_bytes()?))
    }
}

/// 解码图像字节、隐写秘密文本并返回 PNG 字节。
pub fn embed_from_bytes(
    image_bytes: &[u8],
    secret: &str,
    config: &StegConfig,
    diag: Diagnostics,
) -> Result<Vec<u8>> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_bytes(image_bytes)?;
    img.embed(secret)?;
    img.write_to_bytes()
}

pub fn extract_from_bytes(
    image_bytes: &[u8],
    config: &StegConfig,
    diag: Diagnostics,
) -> Result<String> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_bytes(image_bytes)?;
    img.extract()
}

pub fn embed_file(
    input: &Path,
    output: &Path,
    secret: &str,
    config: &StegConfig,
    diag: Diagnostics,
) -> Result<()> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_file(input)?;
    img.embed(secret)?;
    img.write_to_file(output)
}

pub fn extract_file(input: &Path, config: &StegConfig, diag: Diagnostics) -> Result<String> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_file(input)?;
    img.extract()
}

/// base64 文本进、base64 文本出的完整隐写流程。
pub fn base64_embed(
    image_b64: &str,
    secret: &str,
    config: &StegConfig,
    diag: Diagnostics,
) -> Result<String> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_base64(image_b64)?;
    img.embed(secret)?;
    img.write_to_base64()
}

pub fn base64_extract(image_b64: &str, config: &StegConfig, diag: Diagnostics) -> Result<String> {
    let mut img = StegImage::new(config.clone()).with_diagnostics(diag);
    img.load_from_base64(image_b64)?;
    img.extract()
}
