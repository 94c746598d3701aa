//! Packed bucket table for cuckoo filter fingerprints.
//! 布谷鸟过滤器指纹的紧凑桶表

use std::{fmt, marker::PhantomData};

use log::{debug, trace};

use crate::codec::Codec;

/// Outcome of [`CuckooTable::insert_with_eviction`].
/// 插入结果
///
/// | `inserted` | `evicted` | meaning |
/// |---|---|---|
/// | `true` | `None` | written to an empty slot |
/// | `false` | `Some(old)` | bucket was full, `old` was kicked out and must be re-homed |
/// | `false` | `None` | bucket was full, eviction disallowed, table unchanged |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Insert {
    pub inserted: bool,
    pub evicted: Option<u32>,
}

impl Insert {
    const OK: Self = Insert {
        inserted: true,
        evicted: None,
    };
    const FULL: Self = Insert {
        inserted: false,
        evicted: None,
    };

    /// Whether `fp` is now resident in the bucket.
    /// `fp` 是否已驻留桶中
    #[inline]
    pub fn resident(&self) -> bool {
        self.inserted || self.evicted.is_some()
    }
}

/// Fixed-size array of packed buckets, shape fixed by `C`.
/// 定长紧凑桶数组，布局由 `C` 决定
///
/// Slot value 0 means empty. A fingerprint that is itself 0 is therefore
/// invisible: inserting it reports success but stores nothing.
///
/// Not synchronized. Mutations need `&mut self`; share behind a lock for
/// concurrent writers.
///
/// 槽值 0 表示空。非线程安全。
#[derive(Debug, Clone)]
pub struct CuckooTable<C: Codec> {
    buckets: Vec<C::Bucket>,
    fp_mask: u32,
    rng: fastrand::Rng,
    _codec: PhantomData<C>,
}

impl<C: Codec> CuckooTable<C> {
    /// Create table of `table_size` empty buckets.
    /// 创建含 `table_size` 个空桶的表
    ///
    /// `fp_mask` is intersected with the codec's slot mask.
    pub fn new(table_size: usize, fp_mask: u32) -> Self {
        Self::with_rng(table_size, fp_mask, fastrand::Rng::new())
    }

    /// Create table whose eviction victims are reproducible.
    /// 创建驱逐选择可复现的表
    pub fn with_seed(table_size: usize, fp_mask: u32, seed: u64) -> Self {
        Self::with_rng(table_size, fp_mask, fastrand::Rng::with_seed(seed))
    }

    /// Create table with caller-supplied random generator.
    /// 使用调用方提供的随机数生成器创建表
    pub fn with_rng(table_size: usize, fp_mask: u32, rng: fastrand::Rng) -> Self {
        let fp_mask = fp_mask & C::MASK;
        debug!(
            "cuckoo table: {table_size} buckets, ({}, {}, u{}), mask {fp_mask:#x}",
            C::SLOTS,
            C::BITS,
            C::WORD_BITS
        );
        CuckooTable {
            buckets: vec![C::Bucket::default(); table_size],
            fp_mask,
            rng,
            _codec: PhantomData,
        }
    }

    /// Returns number of buckets.
    /// 返回桶数量
    #[inline]
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns total slot count.
    /// 返回总槽数
    #[inline]
    pub fn max_elements(&self) -> usize {
        C::SLOTS * self.buckets.len()
    }

    #[inline]
    pub fn fp_mask(&self) -> u32 {
        self.fp_mask
    }

    #[inline]
    pub const fn entries_per_bucket(&self) -> usize {
        C::SLOTS
    }

    #[inline]
    pub const fn bits_per_fp(&self) -> usize {
        C::BITS
    }

    #[inline]
    pub const fn bucket_bytes(&self) -> usize {
        C::BYTES
    }

    /// Fingerprint at slot `(i, j)`, 0 if empty.
    /// 获取 `(i, j)` 处指纹，空槽为 0
    #[inline]
    pub fn fingerprint_at(&self, i: usize, j: usize) -> u32 {
        let fp: u32 = C::read(j, &self.buckets[i]).into();
        fp & self.fp_mask
    }

    /// Count of non-empty slots in bucket `i`.
    /// 桶 `i` 中非空槽数
    #[inline]
    pub fn occupancy(&self, i: usize) -> usize {
        (0..C::SLOTS)
            .filter(|&j| self.fingerprint_at(i, j) != 0)
            .count()
    }

    /// Count of empty slots in the whole table.
    /// 全表空槽数
    pub fn free_slot_count(&self) -> usize {
        (0..self.buckets.len())
            .map(|i| C::SLOTS - self.occupancy(i))
            .sum()
    }

    /// Count of occupied slots.
    /// 已占用槽数
    #[inline]
    pub fn len(&self) -> usize {
        self.max_elements() - self.free_slot_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied fraction of all slots.
    /// 负载因子
    pub fn load_factor(&self) -> f64 {
        let max = self.max_elements();
        if max == 0 {
            return 0.0;
        }
        self.len() as f64 / max as f64
    }

    /// Overwrite slot `(i, j)` with `fp & fp_mask`; 0 clears it.
    /// 覆盖写入 `(i, j)`，写 0 即清空
    #[inline]
    pub fn set_fingerprint(&mut self, i: usize, j: usize, fp: u32) {
        C::write(j, &mut self.buckets[i], fp & self.fp_mask);
    }

    /// Put `fp` into the first empty slot of bucket `i`; if full and
    /// `allow_eviction`, replace a uniformly random slot and hand back its
    /// previous fingerprint.
    ///
    /// 将 `fp` 写入桶 `i` 的首个空槽；桶满且允许驱逐时，随机替换一个槽并返回旧指纹
    pub fn insert_with_eviction(&mut self, i: usize, fp: u32, allow_eviction: bool) -> Insert {
        for j in 0..C::SLOTS {
            if self.fingerprint_at(i, j) == 0 {
                self.set_fingerprint(i, j, fp);
                return Insert::OK;
            }
        }

        if !allow_eviction {
            return Insert::FULL;
        }

        let victim = self.rng.usize(0..C::SLOTS);
        let old = self.fingerprint_at(i, victim);
        self.set_fingerprint(i, victim, fp);
        trace!("kick {old:#x} from ({i}, {victim}) for {fp:#x}");
        Insert {
            inserted: false,
            evicted: Some(old),
        }
    }

    /// Check if bucket `i` holds `fp`.
    /// 检查桶 `i` 是否包含 `fp`
    #[inline]
    pub fn contains(&self, i: usize, fp: u32) -> bool {
        C::has_value(C::pack(&self.buckets[i]), fp & self.fp_mask)
    }

    /// Check if either candidate bucket holds `fp`.
    /// 检查两个候选桶之一是否包含 `fp`
    #[inline]
    pub fn contains_either(&self, i1: usize, i2: usize, fp: u32) -> bool {
        let fp = fp & self.fp_mask;
        // | instead of || keeps it branchless
        // 使用 | 代替 || 避免分支
        C::has_value(C::pack(&self.buckets[i1]), fp)
            | C::has_value(C::pack(&self.buckets[i2]), fp)
    }

    /// Clear the first slot of bucket `i` equal to `fp`. Only bucket `i` is searched.
    /// 清除桶 `i` 中首个等于 `fp` 的槽，仅搜索桶 `i`
    pub fn delete(&mut self, fp: u32, i: usize) -> bool {
        let fp = fp & self.fp_mask;
        for j in 0..C::SLOTS {
            if self.fingerprint_at(i, j) == fp {
                self.set_fingerprint(i, j, 0);
                return true;
            }
        }
        false
    }

    /// Empty every slot.
    /// 清空所有槽
    pub fn clear(&mut self) {
        self.buckets.fill(C::Bucket::default());
    }

    /// Returns iterator over non-empty `(bucket, slot, fp)`.
    /// 返回非空 `(桶, 槽, 指纹)` 的迭代器
    #[inline]
    pub fn iter(&self) -> Iter<'_, C> {
        Iter {
            table: self,
            bucket_i: 0,
            entry_i: 0,
        }
    }

    /// Hex rendering, one bucket per line. Debug aid, format not stable.
    /// 十六进制渲染，每行一个桶（调试用）
    pub fn dump(&self) -> Dump<'_, C> {
        Dump(self)
    }

    /// Print [`Self::dump`] to stdout.
    pub fn print_table(&self) {
        print!("{}", self.dump());
    }
}

/// Iterator over occupied slots.
/// 已占用槽迭代器
#[derive(Debug)]
pub struct Iter<'a, C: Codec> {
    table: &'a CuckooTable<C>,
    bucket_i: usize,
    entry_i: usize,
}

impl<C: Codec> Iterator for Iter<'_, C> {
    type Item = (usize, usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.bucket_i == self.table.table_size() {
                return None;
            }
            if self.entry_i == C::SLOTS {
                self.bucket_i += 1;
                self.entry_i = 0;
                continue;
            }
            let j = self.entry_i;
            let fp = self.table.fingerprint_at(self.bucket_i, j);
            self.entry_i += 1;
            if fp != 0 {
                return Some((self.bucket_i, j, fp));
            }
        }
    }
}

/// See [`CuckooTable::dump`].
pub struct Dump<'a, C: Codec>(&'a CuckooTable<C>);

impl<C: Codec> fmt::Display for Dump<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.0.buckets.iter().enumerate() {
            write!(f, "{i} | ")?;
            for j in 0..C::SLOTS {
                let fp: u32 = C::read(j, bucket).into();
                write!(f, "{fp:08x} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{Fp4x4, Fp8x4, Fp12x4, Fp16x4, Fp32x2};

    fn fill_bucket3() -> CuckooTable<Fp8x4> {
        let mut t = CuckooTable::<Fp8x4>::with_seed(8, 0xff, 42);
        for fp in 0x2a..=0x2d {
            assert_eq!(t.insert_with_eviction(3, fp, false), Insert::OK);
        }
        t
    }

    #[test]
    fn accessors() {
        let t = CuckooTable::<Fp12x4>::new(10, 0xfff);
        assert_eq!(t.table_size(), 10);
        assert_eq!(t.max_elements(), 40);
        assert_eq!(t.bucket_bytes(), 6);
        assert_eq!(t.bits_per_fp(), 12);
        assert_eq!(t.entries_per_bucket(), 4);
        assert_eq!(t.free_slot_count(), 40);
        assert!(t.is_empty());

        let t = CuckooTable::<Fp32x2>::new(3, u32::MAX);
        assert_eq!(t.max_elements(), 6);
    }

    #[test]
    fn scenario_fill_and_kick() {
        let mut t = CuckooTable::<Fp8x4>::with_seed(8, 0xff, 1);
        assert_eq!(t.free_slot_count(), 32);
        t.set_fingerprint(3, 0, 0x2a);
        assert_eq!(t.fingerprint_at(3, 0), 0x2a);
        t.set_fingerprint(3, 0, 0);

        let mut t = fill_bucket3();
        assert_eq!(t.free_slot_count(), 28);
        assert_eq!(t.occupancy(3), 4);

        let before = t.clone();
        assert_eq!(t.insert_with_eviction(3, 0x2e, false), Insert::FULL);
        assert_eq!(t.dump().to_string(), before.dump().to_string());

        let r = t.insert_with_eviction(3, 0x2e, true);
        assert!(!r.inserted);
        assert!(r.resident());
        let old = r.evicted.unwrap();
        assert!((0x2a..=0x2d).contains(&old));
        assert!(t.contains(3, 0x2e));
        assert!(!t.contains(3, old));
        assert_eq!(t.occupancy(3), 4);
        assert_eq!(t.free_slot_count(), 28);
    }

    #[test]
    fn scenario_delete() {
        let mut t = fill_bucket3();
        assert!(t.delete(0x2a, 3));
        assert!(!t.contains(3, 0x2a));
        assert!(!t.delete(0x2a, 3));
        assert_eq!(t.occupancy(3), 3);
        // Freed slot is reused first
        assert_eq!(t.insert_with_eviction(3, 0x77, false), Insert::OK);
        assert_eq!(t.fingerprint_at(3, 0), 0x77);
    }

    #[test]
    fn delete_one_duplicate() {
        let mut t = CuckooTable::<Fp16x4>::new(2, 0xffff);
        assert!(t.insert_with_eviction(1, 0xbeef, false).inserted);
        assert!(t.insert_with_eviction(1, 0xbeef, false).inserted);
        assert!(t.delete(0xbeef, 1));
        assert!(t.contains(1, 0xbeef));
        assert!(t.delete(0xbeef, 1));
        assert!(!t.contains(1, 0xbeef));
        assert!(!t.delete(0xbeef, 0));
    }

    #[test]
    fn contains_either_checks_both() {
        let mut t = CuckooTable::<Fp4x4>::new(4, 0xf);
        assert!(t.insert_with_eviction(2, 0x9, false).inserted);
        assert!(t.contains_either(2, 0, 0x9));
        assert!(t.contains_either(0, 2, 0x9));
        assert!(!t.contains_either(0, 1, 0x9));
        assert!(!t.contains_either(0, 2, 0x8));
    }

    #[test]
    fn insert_bumps_occupancy() {
        let mut t = CuckooTable::<Fp12x4>::new(4, 0xfff);
        for (n, fp) in [0xabc, 0x001, 0xfff, 0x800].into_iter().enumerate() {
            assert_eq!(t.occupancy(1), n);
            assert!(t.insert_with_eviction(1, fp, false).inserted);
            assert!(t.contains(1, fp));
            assert_eq!(t.occupancy(1), n + 1);
        }
        assert_eq!(t.occupancy(0), 0);
        assert_eq!(t.occupancy(2), 0);
    }

    #[test]
    fn narrow_mask() {
        // 12-bit fingerprints stored in 16-bit slots
        let mut t = CuckooTable::<Fp16x4>::new(2, 0x0fff);
        t.set_fingerprint(0, 2, 0xf123);
        assert_eq!(t.fingerprint_at(0, 2), 0x123);
        assert!(t.contains(0, 0x123));
        assert!(t.contains(0, 0xf123));
        assert!(t.delete(0xa123, 0));
        assert_eq!(t.occupancy(0), 0);
    }

    #[test]
    fn wide_mask_clamped() {
        let t = CuckooTable::<Fp8x4>::new(1, u32::MAX);
        assert_eq!(t.fp_mask(), 0xff);
    }

    #[test]
    fn zero_fingerprint_is_invisible() {
        let mut t = CuckooTable::<Fp8x4>::new(1, 0xff);
        assert!(t.insert_with_eviction(0, 0x100, false).inserted);
        assert_eq!(t.occupancy(0), 0);
    }

    #[test]
    fn seeded_eviction_repeats() {
        let kicks = |seed| {
            let mut t = CuckooTable::<Fp32x2>::with_seed(1, u32::MAX, seed);
            assert!(t.insert_with_eviction(0, 1, true).inserted);
            assert!(t.insert_with_eviction(0, 2, true).inserted);
            (3..50)
                .map(|fp| t.insert_with_eviction(0, fp, true).evicted.unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(kicks(9), kicks(9));
    }

    #[test]
    fn eviction_picks_every_slot() {
        let mut t = CuckooTable::<Fp8x4>::with_seed(1, 0xff, 5);
        for fp in 1..=4 {
            assert!(t.insert_with_eviction(0, fp, false).inserted);
        }
        let mut hit = [false; 4];
        for fp in 10..200u32 {
            let before: Vec<u32> = (0..4).map(|j| t.fingerprint_at(0, j)).collect();
            let old = t.insert_with_eviction(0, fp, true).evicted.unwrap();
            let j = before.iter().position(|&v| v == old).unwrap();
            assert_eq!(t.fingerprint_at(0, j), fp);
            hit[j] = true;
        }
        assert_eq!(hit, [true; 4]);
    }

    #[test]
    fn iter_and_clear() {
        let mut t = CuckooTable::<Fp4x4>::new(3, 0xf);
        t.set_fingerprint(0, 1, 0x3);
        t.set_fingerprint(2, 3, 0xe);
        let all: Vec<_> = t.iter().collect();
        assert_eq!(all, vec![(0, 1, 0x3), (2, 3, 0xe)]);
        assert_eq!(t.len(), 2);
        assert!((t.load_factor() - 2.0 / 12.0).abs() < 1e-9);
        t.clear();
        assert_eq!(t.iter().count(), 0);
        assert_eq!(t.free_slot_count(), 12);
    }

    #[test]
    fn dump_format() {
        let mut t = CuckooTable::<Fp12x4>::new(2, 0xfff);
        t.set_fingerprint(1, 1, 0xabc);
        assert_eq!(
            t.dump().to_string(),
            "0 | 00000000 00000000 00000000 00000000 \n\
             1 | 00000000 00000abc 00000000 00000000 \n"
        );
    }
}
