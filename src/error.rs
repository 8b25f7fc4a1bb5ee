//! # 错误类型模块
//!
//! 库内所有操作统一返回 [`StegError`]。上游图像编解码与 base64 错误原样包裹。

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StegError {
    /// 在没有加载任何源图像时尝试隐写或提取。
    #[error("no image loaded")]
    NoImageLoaded,

    /// 秘密文本加上结束标记所需的位数超出了图像的通道容量。
    #[error("not enough pixels to hide secret: {required} bits required, {available} bits available")]
    CapacityExceeded { required: usize, available: usize },

    /// 已加载图像，但尚未成功隐写就尝试写出结果。
    #[error("no embedded image to write; embed a secret first")]
    NothingEmbedded,

    /// 扫描完整个图像仍未找到结束标记。
    #[error("error finding embedded secret string")]
    SentinelNotFound,

    #[error("the end-of-secret marker must not be empty")]
    EmptySentinel,

    /// 结束标记之前的字节不是合法的 UTF-8。
    #[error("recovered secret is not valid UTF-8")]
    InvalidUtf8,

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StegError>;
