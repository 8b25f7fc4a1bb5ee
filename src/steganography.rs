use crate::bits::{BitStream, StegConfig, check_fits, serialize};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, StegError};
use crate::pixels::{Channel, PixelBuffer};
use crate::scanner::scan_bits;

/// 将 `value` 的最低位强制设为 `bit`，其余 7 位保持不变。
pub fn set_lsb(value: u8, bit: u8) -> u8 {
    (value & 0xFE) | (bit & 1)
}

/// 读取通道值的最低位：偶数为 0，奇数为 1。
pub fn lsb(value: u8) -> u8 {
    value & 1
}

/// 将位序列写入源缓冲区的副本。
///
/// 容量不足时在修改任何像素之前返回 `CapacityExceeded`。
pub fn embed_bits(source: &PixelBuffer, bits: &BitStream) -> Result<PixelBuffer> {
    check_fits(bits, source.capacity())?;

    let mut target = source.clone();
    let mut remaining = bits.iter().peekable();

    'pixels: for (x, y) in source.coordinates() {
        for channel in Channel::ORDER {
            let Some(bit) = remaining.next() else {
                break 'pixels;
            };
            let value = source.channel(x, y, channel);
            target.set_channel(x, y, channel, set_lsb(value, bit));
        }
        if remaining.peek().is_none() {
            break;
        }
    }

    Ok(target)
}

/// 序列化秘密文本并写入源缓冲区的副本。
pub fn embed(
    source: &PixelBuffer,
    secret: &str,
    config: &StegConfig,
    diag: &Diagnostics,
) -> Result<PixelBuffer> {
    let sentinel = config.sentinel.as_bytes();
    if secret
        .as_bytes()
        .windows(sentinel.len())
        .any(|window| window == sentinel)
    {
        diag.warn(format_args!(
            "secret contains the end-of-secret marker; extraction will stop at its first occurrence"
        ));
    }

    let bits = serialize(secret, &config.sentinel);
    diag.debug(format_args!(
        "secret of {} bytes serialized to {} bits, capacity {} bits",
        secret.len(),
        bits.len(),
        source.capacity()
    ));

    let embedded = embed_bits(source, &bits)?;
    diag.info(format_args!(
        "embedded {} bits into {}x{} image",
        bits.len(),
        source.width(),
        source.height()
    ));
    Ok(embedded)
}

/// 按隐写顺序读取每个像素 R、G、B 通道的最低位。
pub fn extract_bits(buffer: &PixelBuffer) -> impl Iterator<Item = u8> + '_ {
    buffer.coordinates().flat_map(move |(x, y)| {
        Channel::ORDER
            .into_iter()
            .map(move |channel| lsb(buffer.channel(x, y, channel)))
    })
}

/// 从缓冲区中恢复秘密文本。
///
/// 扫描完整个缓冲区仍未遇到结束标记时返回 `SentinelNotFound`。
pub fn extract(buffer: &PixelBuffer, config: &StegConfig, diag: &Diagnostics) -> Result<String> {
    diag.debug(format_args!(
        "scanning up to {} bits of a {}x{} image",
        buffer.capacity(),
        buffer.width(),
        buffer.height()
    ));

    let secret = scan_bits(extract_bits(buffer), &config.sentinel)?;
    let secret = String::from_utf8(secret).map_err(|_| StegError::InvalidUtf8)?;
    diag.info(format_args!("secret of {} bytes found", secret.len()));
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{Sentinel, capacity};
    use image::{Rgba, RgbaImage};

    fn buffer(width: u32, height: u32, fill: [u8; 4]) -> PixelBuffer {
        PixelBuffer::from(RgbaImage::from_pixel(width, height, Rgba(fill)))
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from(RgbaImage::from_fn(width, height, |x, y| {
            let v = (x * 31 + y * 17) as u8;
            Rgba([v, v.wrapping_add(85), v.wrapping_add(170), 200])
        }))
    }

    #[test]
    fn set_lsb_touches_only_bit_zero() {
        assert_eq!(set_lsb(0b1010_1010, 1), 0b1010_1011);
        assert_eq!(set_lsb(0b1010_1011, 0), 0b1010_1010);
        assert_eq!(set_lsb(255, 1), 255);
        assert_eq!(set_lsb(0, 0), 0);
    }

    #[test]
    fn bits_are_written_column_major_rgb() {
        let source = buffer(2, 2, [0, 0, 0, 255]);
        let bits = serialize("", &Sentinel::new([0b1011_0001u8].to_vec()).unwrap());
        let out = embed_bits(&source, &bits).unwrap();

        // (0,0) RGB, then (0,1) RGB, then (1,0) RG
        assert_eq!(out.pixel(0, 0), Rgba([1, 0, 1, 255]));
        assert_eq!(out.pixel(0, 1), Rgba([1, 0, 0, 255]));
        assert_eq!(out.pixel(1, 0), Rgba([0, 1, 0, 255]));
        assert_eq!(out.pixel(1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn round_trip() {
        let config = StegConfig::default();
        let source = gradient(20, 20);
        let out = embed(&source, "Karl", &config, &Diagnostics::silent()).unwrap();
        let secret = extract(&out, &config, &Diagnostics::silent()).unwrap();
        assert_eq!(secret, "Karl");
    }

    #[test]
    fn round_trip_every_printable_ascii_character() {
        let config = StegConfig::default();
        let source = gradient(20, 20);
        let printable: String = (b' '..=b'~').map(char::from).collect();
        assert_eq!(printable.len(), 95);

        let out = embed(&source, &printable, &config, &Diagnostics::silent()).unwrap();
        assert_eq!(extract(&out, &config, &Diagnostics::silent()).unwrap(), printable);
    }

    #[test]
    fn round_trip_random_printable_secrets() {
        use rand::Rng;

        let config = StegConfig::default();
        let source = gradient(32, 32);
        let mut rng = rand::rng();
        for _ in 0..50 {
            let len = rng.random_range(0..=200);
            let secret: String = (0..len)
                .map(|_| char::from(rng.random_range(b' '..=b'~')))
                .collect();
            let out = embed(&source, &secret, &config, &Diagnostics::silent()).unwrap();
            assert_eq!(extract(&out, &config, &Diagnostics::silent()).unwrap(), secret);
        }
    }

    #[test]
    fn perturbation_is_at_most_one() {
        let config = StegConfig::default();
        let source = gradient(16, 16);
        let out = embed(&source, "bounded change", &config, &Diagnostics::silent()).unwrap();

        for (x, y) in source.coordinates() {
            let (before, after) = (source.pixel(x, y), out.pixel(x, y));
            for c in 0..3 {
                assert!(before[c].abs_diff(after[c]) <= 1, "pixel ({x},{y}) channel {c}");
            }
            assert_eq!(before[3], after[3]);
        }
    }

    #[test]
    fn pixels_after_payload_are_untouched() {
        let config = StegConfig::default();
        let source = buffer(10, 10, [3, 3, 3, 9]);
        let out = embed(&source, "", &config, &Diagnostics::silent()).unwrap();

        // 104 bits occupy the first 34 pixels and 2 channels of the 35th.
        let visited: Vec<_> = source.coordinates().collect();
        let (x, y) = visited[34];
        assert_eq!(out.channel(x, y, Channel::Blue), 3);
        for &(x, y) in &visited[35..] {
            assert_eq!(out.pixel(x, y), source.pixel(x, y));
        }
    }

    #[test]
    fn exact_capacity_fits_and_one_more_byte_fails() {
        let config = StegConfig::default();
        let source = gradient(8, 13);
        assert_eq!(capacity(8, 13), 312);

        let fits = "x".repeat(26);
        let out = embed(&source, &fits, &config, &Diagnostics::silent()).unwrap();
        assert_eq!(extract(&out, &config, &Diagnostics::silent()).unwrap(), fits);

        let too_long = "x".repeat(27);
        assert!(matches!(
            embed(&source, &too_long, &config, &Diagnostics::silent()),
            Err(StegError::CapacityExceeded {
                required: 320,
                available: 312
            })
        ));
    }

    #[test]
    fn karl_into_four_by_four_black_fails() {
        let source = buffer(4, 4, [0, 0, 0, 255]);
        let result = embed(&source, "Karl", &StegConfig::default(), &Diagnostics::silent());
        assert!(matches!(result, Err(StegError::CapacityExceeded { .. })));
    }

    #[test]
    fn clean_buffer_has_no_secret() {
        let source = buffer(30, 30, [0, 0, 0, 255]);
        let result = extract(&source, &StegConfig::default(), &Diagnostics::silent());
        assert!(matches!(result, Err(StegError::SentinelNotFound)));
    }

    #[test]
    fn embedding_is_deterministic() {
        let config = StegConfig::default();
        let source = gradient(12, 12);
        let a = embed(&source, "same", &config, &Diagnostics::silent()).unwrap();
        let b = embed(&source, "same", &config, &Diagnostics::silent()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_sentinel_must_match_on_extract() {
        let custom = StegConfig::with_sentinel(Sentinel::new("<<END>>").unwrap());
        let out = embed(&gradient(20, 20), "hidden", &custom, &Diagnostics::silent()).unwrap();

        assert_eq!(extract(&out, &custom, &Diagnostics::silent()).unwrap(), "hidden");
        assert!(matches!(
            extract(&out, &StegConfig::default(), &Diagnostics::silent()),
            Err(StegError::SentinelNotFound)
        ));
    }

    #[test]
    fn invalid_utf8_prefix_is_rejected() {
        let sentinel = Sentinel::new("#").unwrap();
        let mut bits = Vec::new();
        for byte in [0xFFu8, b'#'] {
            bits.extend((0..8).rev().map(|s| (byte >> s) & 1));
        }
        let source = buffer(4, 4, [0, 0, 0, 255]);
        let mut target = source.clone();
        for ((x, y, channel), bit) in source
            .coordinates()
            .flat_map(|(x, y)| Channel::ORDER.into_iter().map(move |c| (x, y, c)))
            .zip(bits)
        {
            target.set_channel(x, y, channel, set_lsb(0, bit));
        }

        let config = StegConfig::with_sentinel(sentinel);
        assert!(matches!(
            extract(&target, &config, &Diagnostics::silent()),
            Err(StegError::InvalidUtf8)
        ));
    }
}
