//! Bit-field codecs for one packed bucket.
//! 单个紧凑桶的位域编解码
//!
//! Slot `j` occupies bits `[j * BITS, (j + 1) * BITS)` of the bucket read as a
//! little-endian bit stream: bit 0 is the LSB of byte 0. Fields may straddle
//! byte boundaries (12-bit shape).
//!
//! 槽 `j` 占用桶（按小端位流）的 `[j * BITS, (j + 1) * BITS)` 位，字段可跨字节。

use std::fmt::Debug;

/// Lane pattern with bit 0 of every slot set.
/// 每个槽最低位为 1 的模式
const fn lane_ones(slots: usize, bits: usize) -> u64 {
    let mut v = 0u64;
    let mut j = 0;
    while j < slots {
        v |= 1 << (j * bits);
        j += 1;
    }
    v
}

/// True when any `bits`-wide lane of `x` is zero.
/// Exact: a borrow only leaves a lane that was zero.
/// 任一通道为零时返回 true
#[inline(always)]
const fn has_zero_lane(x: u64, ones: u64, highs: u64) -> bool {
    (x.wrapping_sub(ones) & !x & highs) != 0
}

/// Static layout of one supported (slots, bits, word) shape.
/// 一种受支持的（槽数, 位宽, 字类型）布局
pub trait Codec {
    /// Slots per bucket 每桶槽数
    const SLOTS: usize;
    /// Bits per fingerprint 每指纹位数
    const BITS: usize;
    /// Width of [`Codec::Word`] in bits 指纹字宽
    const WORD_BITS: usize;
    /// Bytes per bucket 每桶字节数
    const BYTES: usize = Self::SLOTS * Self::BITS / 8;
    /// Mask of one slot 单槽掩码
    const MASK: u32 = ((1u64 << Self::BITS) - 1) as u32;
    const LANE_ONES: u64 = lane_ones(Self::SLOTS, Self::BITS);
    const LANE_HIGHS: u64 = Self::LANE_ONES << (Self::BITS - 1);

    /// Fingerprint word 指纹字类型
    type Word: Copy + Into<u32>;
    /// Raw bucket bytes 桶原始字节
    type Bucket: Copy + Default + Debug + AsRef<[u8]> + AsMut<[u8]>;

    /// Read the field at `slot`, zero-extended.
    /// 读取 `slot` 处字段
    fn read(slot: usize, bucket: &Self::Bucket) -> Self::Word;

    /// Write the low `BITS` of `fp` at `slot`, other bits untouched.
    /// 在 `slot` 处写入 `fp` 低 `BITS` 位，其余位不变
    fn write(slot: usize, bucket: &mut Self::Bucket, fp: u32);

    /// Little-endian packed view of the whole bucket, upper bits zero.
    /// 整桶的小端打包视图，高位为零
    fn pack(bucket: &Self::Bucket) -> u64;

    /// Whether any slot of `packed` equals `fp`, without a per-slot loop.
    /// 判断打包桶中是否有槽等于 `fp`（无逐槽循环）
    #[inline(always)]
    fn has_value(packed: u64, fp: u32) -> bool {
        if fp & !Self::MASK != 0 {
            return false;
        }
        let x = packed ^ Self::LANE_ONES.wrapping_mul(fp as u64);
        has_zero_lane(x, Self::LANE_ONES, Self::LANE_HIGHS)
    }
}

/// 4 slots x 4 bits, `u8` word, 2-byte bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fp4x4;

/// 4 slots x 8 bits, `u8` word, 4-byte bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fp8x4;

/// 4 slots x 12 bits, `u16` word, 6-byte bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fp12x4;

/// 4 slots x 16 bits, `u16` word, 8-byte bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fp16x4;

/// 2 slots x 32 bits, `u32` word, 8-byte bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fp32x2;

impl Codec for Fp4x4 {
    const SLOTS: usize = 4;
    const BITS: usize = 4;
    const WORD_BITS: usize = 8;
    type Word = u8;
    type Bucket = [u8; 2];

    #[inline(always)]
    fn read(slot: usize, bucket: &[u8; 2]) -> u8 {
        debug_assert!(slot < Self::SLOTS);
        let b = bucket[slot >> 1];
        if slot & 1 == 0 { b & 0x0f } else { b >> 4 }
    }

    #[inline(always)]
    fn write(slot: usize, bucket: &mut [u8; 2], fp: u32) {
        debug_assert!(slot < Self::SLOTS);
        let fp = (fp & Self::MASK) as u8;
        let b = &mut bucket[slot >> 1];
        if slot & 1 == 0 {
            *b = (*b & 0xf0) | fp;
        } else {
            *b = (*b & 0x0f) | (fp << 4);
        }
    }

    #[inline(always)]
    fn pack(bucket: &[u8; 2]) -> u64 {
        u16::from_le_bytes(*bucket) as u64
    }
}

impl Codec for Fp8x4 {
    const SLOTS: usize = 4;
    const BITS: usize = 8;
    const WORD_BITS: usize = 8;
    type Word = u8;
    type Bucket = [u8; 4];

    #[inline(always)]
    fn read(slot: usize, bucket: &[u8; 4]) -> u8 {
        debug_assert!(slot < Self::SLOTS);
        bucket[slot]
    }

    #[inline(always)]
    fn write(slot: usize, bucket: &mut [u8; 4], fp: u32) {
        debug_assert!(slot < Self::SLOTS);
        bucket[slot] = fp as u8;
    }

    #[inline(always)]
    fn pack(bucket: &[u8; 4]) -> u64 {
        u32::from_le_bytes(*bucket) as u64
    }
}

impl Codec for Fp12x4 {
    const SLOTS: usize = 4;
    const BITS: usize = 12;
    const WORD_BITS: usize = 16;
    type Word = u16;
    type Bucket = [u8; 6];

    // Slot pair (2k, 2k+1) shares bytes 3k..3k+3; the middle byte is split by nibble.
    // 槽对 (2k, 2k+1) 共用字节 3k..3k+3，中间字节按半字节拆分
    #[inline(always)]
    fn read(slot: usize, bucket: &[u8; 6]) -> u16 {
        debug_assert!(slot < Self::SLOTS);
        let p = (slot >> 1) * 3;
        if slot & 1 == 0 {
            bucket[p] as u16 | (((bucket[p + 1] & 0x0f) as u16) << 8)
        } else {
            (bucket[p + 1] >> 4) as u16 | ((bucket[p + 2] as u16) << 4)
        }
    }

    #[inline(always)]
    fn write(slot: usize, bucket: &mut [u8; 6], fp: u32) {
        debug_assert!(slot < Self::SLOTS);
        let fp = fp & Self::MASK;
        let p = (slot >> 1) * 3;
        if slot & 1 == 0 {
            bucket[p] = fp as u8;
            bucket[p + 1] = (bucket[p + 1] & 0xf0) | ((fp >> 8) as u8);
        } else {
            bucket[p + 1] = (bucket[p + 1] & 0x0f) | ((fp as u8) << 4);
            bucket[p + 2] = (fp >> 4) as u8;
        }
    }

    #[inline(always)]
    fn pack(bucket: &[u8; 6]) -> u64 {
        let mut raw = [0u8; 8];
        raw[..6].copy_from_slice(bucket);
        u64::from_le_bytes(raw)
    }
}

impl Codec for Fp16x4 {
    const SLOTS: usize = 4;
    const BITS: usize = 16;
    const WORD_BITS: usize = 16;
    type Word = u16;
    type Bucket = [u8; 8];

    #[inline(always)]
    fn read(slot: usize, bucket: &[u8; 8]) -> u16 {
        debug_assert!(slot < Self::SLOTS);
        let o = slot << 1;
        u16::from_le_bytes([bucket[o], bucket[o + 1]])
    }

    #[inline(always)]
    fn write(slot: usize, bucket: &mut [u8; 8], fp: u32) {
        debug_assert!(slot < Self::SLOTS);
        let o = slot << 1;
        bucket[o..o + 2].copy_from_slice(&(fp as u16).to_le_bytes());
    }

    #[inline(always)]
    fn pack(bucket: &[u8; 8]) -> u64 {
        u64::from_le_bytes(*bucket)
    }
}

impl Codec for Fp32x2 {
    const SLOTS: usize = 2;
    const BITS: usize = 32;
    const WORD_BITS: usize = 32;
    type Word = u32;
    type Bucket = [u8; 8];

    #[inline(always)]
    fn read(slot: usize, bucket: &[u8; 8]) -> u32 {
        debug_assert!(slot < Self::SLOTS);
        let o = slot << 2;
        u32::from_le_bytes([bucket[o], bucket[o + 1], bucket[o + 2], bucket[o + 3]])
    }

    #[inline(always)]
    fn write(slot: usize, bucket: &mut [u8; 8], fp: u32) {
        debug_assert!(slot < Self::SLOTS);
        let o = slot << 2;
        bucket[o..o + 4].copy_from_slice(&fp.to_le_bytes());
    }

    #[inline(always)]
    fn pack(bucket: &[u8; 8]) -> u64 {
        u64::from_le_bytes(*bucket)
    }
}
