//! Bucket index and fingerprint derivation.
//! 桶索引与指纹推导

use std::hash::{Hash, Hasher};

use gxhash::GxHasher;

use crate::consts::{JUMP_MUL, SCRAMBLE};

/// Compute hash for item.
/// 计算元素的哈希值
#[inline(always)]
pub fn hash<T: ?Sized + Hash, H: Hasher + Clone>(hasher: &H, item: &T) -> u64 {
    let mut h = hasher.clone();
    item.hash(&mut h);
    h.finish()
}

/// Map a precomputed hash to `[0, num_buckets)` without modulo bias.
/// 将预计算的哈希无模偏差地映射到 `[0, num_buckets)`
///
/// Each round advances an LCG and jumps forward; the last index below
/// `num_buckets` is the answer. Expected `O(log n)` rounds, `O(n)` worst case.
///
/// `num_buckets == 0` is a caller bug (debug assert; release returns 0).
#[inline]
pub fn jump(hash: u64, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0, "num_buckets must be > 0");
    let n = num_buckets as u64;
    let mut state = hash;
    let mut b: u64 = 0;
    let mut j: u64 = 0;
    while j < n {
        b = j;
        state = state.wrapping_mul(JUMP_MUL).wrapping_add(1);
        // f64 -> u64 saturates, which still ends the loop
        j = ((b + 1) as f64 * ((1u64 << 31) as f64 / ((state >> 33) + 1) as f64)) as u64;
    }
    b as usize
}

/// Bucket index of `key` using the default [`GxHasher`].
/// 使用默认 [`GxHasher`] 计算 `key` 的桶索引
#[inline]
pub fn bucket_index<K: ?Sized + Hash>(key: &K, num_buckets: usize) -> usize {
    jump(hash(&GxHasher::default(), key), num_buckets)
}

/// Bucket index of `key` using a caller-supplied hasher.
/// 使用调用方提供的哈希器计算桶索引
#[inline]
pub fn bucket_index_with<K: ?Sized + Hash, H: Hasher + Clone>(
    hasher: &H,
    key: &K,
    num_buckets: usize,
) -> usize {
    jump(hash(hasher, key), num_buckets)
}

/// Partial-key cuckoo hashing: `index ^ (fp * SCRAMBLE)`.
/// 部分键布谷鸟哈希
///
/// Applying it twice with the same `fp` returns `index`. The result is not
/// reduced to the table size; reducing with a power-of-two mask keeps that
/// property, reducing with `%` does not.
#[inline(always)]
pub fn fingerprint_complement(index: usize, fp: u32) -> usize {
    index ^ fp.wrapping_mul(SCRAMBLE) as usize
}

/// Mask for a fingerprint `bits` wide, `bits` in `1..=32`.
/// 指纹位宽对应的掩码
#[inline]
pub const fn fp_mask(bits: usize) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32);
    ((1u64 << bits) - 1) as u32
}

/// Fingerprint from the high half of `hash`.
/// 从哈希高 32 位提取指纹
///
/// May be 0, which the table cannot tell apart from an empty slot. Use
/// [`fingerprint_nonzero`] unless bit compatibility with existing tables matters.
#[inline(always)]
pub fn fingerprint(hash: u64, fp_mask: u32) -> u32 {
    ((hash >> 32) as u32) & fp_mask
}

/// Like [`fingerprint`] but never 0: a zero fingerprint becomes 1.
/// 同 [`fingerprint`]，但零指纹映射为 1
#[inline(always)]
pub fn fingerprint_nonzero(hash: u64, fp_mask: u32) -> u32 {
    let fp = fingerprint(hash, fp_mask);
    fp + (fp == 0) as u32
}
