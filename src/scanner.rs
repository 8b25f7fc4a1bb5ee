//! # 结束标记扫描模块
//!
//! 把提取出的最低位按最高位优先重新组合为字节，
//! 并在字节流中查找结束标记第一次出现的位置。

use crate::bits::Sentinel;
use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegError};

/// 逐位累积并检测结束标记的扫描器。
#[derive(Debug)]
pub struct SentinelScanner<'a> {
    sentinel: &'a Sentinel,
    decoded: Vec<u8>,
    current: u8,
    filled: usize,
    found: bool,
}

impl<'a> SentinelScanner<'a> {
    pub fn new(sentinel: &'a Sentinel) -> Self {
        Self {
            sentinel,
            decoded: Vec::new(),
            current: 0,
            filled: 0,
            found: false,
        }
    }

    /// 追加一位。返回 `true` 表示结束标记已经完整出现，后续的位不再需要。
    pub fn push_bit(&mut self, bit: u8) -> bool {
        if self.found {
            return true;
        }
        self.current = (self.current << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == BITS_PER_BYTE {
            self.decoded.push(self.current);
            self.current = 0;
            self.filled = 0;
            self.found = self.decoded.ends_with(self.sentinel.as_bytes());
        }
        self.found
    }

    /// 已完整组合出的字节数。不足 8 位的尾部不计入。
    pub fn bytes_decoded(&self) -> usize {
        self.decoded.len()
    }

    /// 结束扫描，返回标记之前的全部字节。
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.found {
            return Err(StegError::SentinelNotFound);
        }
        let mut secret = self.decoded;
        secret.truncate(secret.len() - self.sentinel.len());
        Ok(secret)
    }
}

/// 对一段完整的位序列执行扫描。
pub fn scan_bits(bits: impl IntoIterator<Item = u8>, sentinel: &Sentinel) -> Result<Vec<u8>> {
    let mut scanner = SentinelScanner::new(sentinel);
    for bit in bits {
        if scanner.push_bit(bit) {
            break;
        }
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::serialize;

    #[test]
    fn recovers_prefix_before_sentinel() {
        let sentinel = Sentinel::default();
        let bits = serialize("Karl", &sentinel);
        let secret = scan_bits(bits.iter(), &sentinel).unwrap();
        assert_eq!(secret, b"Karl");
    }

    #[test]
    fn trailing_bits_after_sentinel_are_ignored() {
        let sentinel = Sentinel::default();
        let bits = serialize("hi", &sentinel);
        let noisy = bits.iter().chain([1, 0, 1, 1, 0, 1, 1, 1, 1, 0, 1]);
        assert_eq!(scan_bits(noisy, &sentinel).unwrap(), b"hi");
    }

    #[test]
    fn first_occurrence_wins() {
        let sentinel = Sentinel::new("##").unwrap();
        let bits = serialize("a##b", &sentinel);
        assert_eq!(scan_bits(bits.iter(), &sentinel).unwrap(), b"a");
    }

    #[test]
    fn missing_sentinel_fails() {
        let sentinel = Sentinel::default();
        let zeros = std::iter::repeat_n(0u8, 8 * 64);
        assert!(matches!(
            scan_bits(zeros, &sentinel),
            Err(StegError::SentinelNotFound)
        ));
    }

    #[test]
    fn incomplete_final_byte_is_dropped() {
        let sentinel = Sentinel::new("#").unwrap();
        let mut scanner = SentinelScanner::new(&sentinel);
        for bit in [0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1] {
            assert!(!scanner.push_bit(bit));
        }
        assert_eq!(scanner.bytes_decoded(), 1);
        assert!(scanner.finish().is_err());
    }

    #[test]
    fn empty_secret_is_recovered() {
        let sentinel = Sentinel::default();
        let bits = serialize("", &sentinel);
        assert_eq!(scan_bits(bits.iter(), &sentinel).unwrap(), b"");
    }
}
