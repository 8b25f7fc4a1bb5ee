//! # 像素缓冲区模块
//!
//! 隐写与提取共用的 8 位 RGBA 像素网格。

use crate::bits::capacity;
use image::{DynamicImage, Rgba, RgbaImage};

/// 可隐写的颜色通道，按写入顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    /// 每个像素内的访问顺序：红、绿、蓝。Alpha 不在其中。
    pub const ORDER: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// 以 `(x, y)` 寻址的 8 位 RGBA 像素网格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    inner: RgbaImage,
}

impl PixelBuffer {
    /// 从解码后的图像创建一份独立的可变副本。
    ///
    /// 高精度或非 RGBA 的源图像会被规整为 8 位 RGBA，源图像本身不受影响。
    pub fn from_image(source: &DynamicImage) -> Self {
        Self {
            inner: source.to_rgba8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// 可写入的总位数。
    pub fn capacity(&self) -> usize {
        capacity(self.width(), self.height())
    }

    pub fn channel(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.inner.get_pixel(x, y)[channel as usize]
    }

    pub fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
        self.inner.get_pixel_mut(x, y)[channel as usize] = value;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.inner.get_pixel(x, y)
    }

    /// 按隐写顺序 (x 外层、y 内层，均为半开区间) 枚举所有像素坐标。
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let (width, height) = (self.width(), self.height());
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.inner
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(inner: RgbaImage) -> Self {
        Self { inner }
    }
}
