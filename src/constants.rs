/// 默认的结束标记。
/// 隐写时追加在秘密文本之后，提取时以它第一次出现的位置作为文本的结尾。
pub const DEFAULT_SENTINEL: &str = "##STOP_STEG##";

/// 每个像素可用于隐写的通道数 (R, G, B)。
/// Alpha 通道从不携带数据。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 每个字节的位数。隐写按最高位优先的顺序逐位写入。
pub const BITS_PER_BYTE: usize = 8;

/// 未指定输出路径时，隐写结果文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
