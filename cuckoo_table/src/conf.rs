//! Table configuration 表配置

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    codec::{Codec, Fp4x4, Fp8x4, Fp12x4, Fp16x4, Fp32x2},
    hash::fp_mask,
};

/// Bucket layout as (slots, bits per fingerprint, word width).
/// 桶布局：（槽数，指纹位数，字宽）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Shape {
    pub entries_per_bucket: usize,
    pub bits_per_fp: usize,
    pub word_bits: usize,
}

impl Shape {
    pub const fn new(entries_per_bucket: usize, bits_per_fp: usize, word_bits: usize) -> Self {
        Shape {
            entries_per_bucket,
            bits_per_fp,
            word_bits,
        }
    }

    /// Shape implemented by codec `C`.
    /// 编解码器 `C` 对应的布局
    pub const fn of<C: Codec>() -> Self {
        Shape::new(C::SLOTS, C::BITS, C::WORD_BITS)
    }

    /// Resolve to a supported codec, or fail.
    /// 解析为受支持的编解码器
    pub fn kind(&self) -> Result<Kind> {
        Kind::ALL
            .into_iter()
            .find(|k| k.shape() == *self)
            .ok_or(Error::UnsupportedShape {
                slots: self.entries_per_bucket,
                bits: self.bits_per_fp,
                word_bits: self.word_bits,
            })
    }
}

/// The five supported codecs.
/// 五种受支持的编解码器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Fp4x4,
    Fp8x4,
    Fp12x4,
    Fp16x4,
    Fp32x2,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Fp4x4,
        Kind::Fp8x4,
        Kind::Fp12x4,
        Kind::Fp16x4,
        Kind::Fp32x2,
    ];

    pub const fn shape(self) -> Shape {
        match self {
            Kind::Fp4x4 => Shape::of::<Fp4x4>(),
            Kind::Fp8x4 => Shape::of::<Fp8x4>(),
            Kind::Fp12x4 => Shape::of::<Fp12x4>(),
            Kind::Fp16x4 => Shape::of::<Fp16x4>(),
            Kind::Fp32x2 => Shape::of::<Fp32x2>(),
        }
    }
}

/// Table build parameters.
/// 建表参数
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Conf {
    /// Bucket count 桶数量
    pub table_size: usize,
    pub shape: Shape,
    /// Fingerprint width, at most `shape.bits_per_fp` 指纹位宽
    pub fp_bits: usize,
    /// Eviction RNG seed, random if None 驱逐随机种子
    pub seed: Option<u64>,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            table_size: 1024,
            shape: Shape::of::<Fp8x4>(),
            fp_bits: 8,
            seed: None,
        }
    }
}

impl Conf {
    /// Check every field, returning the resolved codec.
    /// 校验全部字段并返回对应编解码器
    pub fn validate(&self) -> Result<Kind> {
        if self.table_size == 0 {
            return Err(Error::EmptyTable);
        }
        let kind = self.shape.kind()?;
        let bits_per_fp = self.shape.bits_per_fp;
        if self.fp_bits == 0 || self.fp_bits > bits_per_fp {
            return Err(Error::FpBits {
                fp_bits: self.fp_bits,
                bits_per_fp,
            });
        }
        Ok(kind)
    }

    /// Mask for `fp_bits`. Call after [`Conf::validate`].
    /// `fp_bits` 对应的掩码
    #[inline]
    pub fn fp_mask(&self) -> u32 {
        fp_mask(self.fp_bits)
    }
}
