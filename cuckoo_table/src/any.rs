//! Table whose shape is picked at runtime.
//! 运行时选择布局的表
//!
//! Dispatch is a `match` over five concrete tables, each fully monomorphized.
//! 通过 `match` 分派到五个单态化的具体表

use std::fmt;

use log::warn;

use crate::{
    Result,
    codec::{Fp4x4, Fp8x4, Fp12x4, Fp16x4, Fp32x2},
    conf::{Conf, Kind, Shape},
    table::{CuckooTable, Insert, Iter},
};

/// Runtime-selected [`CuckooTable`].
#[derive(Debug, Clone)]
pub enum AnyTable {
    Fp4x4(CuckooTable<Fp4x4>),
    Fp8x4(CuckooTable<Fp8x4>),
    Fp12x4(CuckooTable<Fp12x4>),
    Fp16x4(CuckooTable<Fp16x4>),
    Fp32x2(CuckooTable<Fp32x2>),
}

macro_rules! each {
    ($self:expr, $t:ident => $body:expr) => {
        match $self {
            AnyTable::Fp4x4($t) => $body,
            AnyTable::Fp8x4($t) => $body,
            AnyTable::Fp12x4($t) => $body,
            AnyTable::Fp16x4($t) => $body,
            AnyTable::Fp32x2($t) => $body,
        }
    };
}

impl AnyTable {
    /// Build a table for `shape`; unsupported shapes are rejected.
    /// 按布局建表，不支持的布局返回错误
    pub fn new(shape: Shape, table_size: usize, fp_mask: u32) -> Result<Self> {
        Self::build(shape, table_size, fp_mask, None)
    }

    /// Build from a validated [`Conf`].
    /// 由配置建表
    pub fn from_conf(conf: &Conf) -> Result<Self> {
        if let Err(e) = conf.validate() {
            warn!("reject table conf {conf:?}: {e}");
            return Err(e);
        }
        Self::build(conf.shape, conf.table_size, conf.fp_mask(), conf.seed)
    }

    fn build(shape: Shape, table_size: usize, fp_mask: u32, seed: Option<u64>) -> Result<Self> {
        let kind = shape.kind().inspect_err(|e| warn!("{e}"))?;
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(match kind {
            Kind::Fp4x4 => AnyTable::Fp4x4(CuckooTable::with_rng(table_size, fp_mask, rng)),
            Kind::Fp8x4 => AnyTable::Fp8x4(CuckooTable::with_rng(table_size, fp_mask, rng)),
            Kind::Fp12x4 => AnyTable::Fp12x4(CuckooTable::with_rng(table_size, fp_mask, rng)),
            Kind::Fp16x4 => AnyTable::Fp16x4(CuckooTable::with_rng(table_size, fp_mask, rng)),
            Kind::Fp32x2 => AnyTable::Fp32x2(CuckooTable::with_rng(table_size, fp_mask, rng)),
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            AnyTable::Fp4x4(_) => Kind::Fp4x4,
            AnyTable::Fp8x4(_) => Kind::Fp8x4,
            AnyTable::Fp12x4(_) => Kind::Fp12x4,
            AnyTable::Fp16x4(_) => Kind::Fp16x4,
            AnyTable::Fp32x2(_) => Kind::Fp32x2,
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.kind().shape()
    }

    #[inline]
    pub fn table_size(&self) -> usize {
        each!(self, t => t.table_size())
    }

    #[inline]
    pub fn max_elements(&self) -> usize {
        each!(self, t => t.max_elements())
    }

    #[inline]
    pub fn fp_mask(&self) -> u32 {
        each!(self, t => t.fp_mask())
    }

    #[inline]
    pub fn fingerprint_at(&self, i: usize, j: usize) -> u32 {
        each!(self, t => t.fingerprint_at(i, j))
    }

    #[inline]
    pub fn occupancy(&self, i: usize) -> usize {
        each!(self, t => t.occupancy(i))
    }

    pub fn free_slot_count(&self) -> usize {
        each!(self, t => t.free_slot_count())
    }

    pub fn len(&self) -> usize {
        each!(self, t => t.len())
    }

    pub fn is_empty(&self) -> bool {
        each!(self, t => t.is_empty())
    }

    pub fn load_factor(&self) -> f64 {
        each!(self, t => t.load_factor())
    }

    #[inline]
    pub fn set_fingerprint(&mut self, i: usize, j: usize, fp: u32) {
        each!(self, t => t.set_fingerprint(i, j, fp))
    }

    #[inline]
    pub fn insert_with_eviction(&mut self, i: usize, fp: u32, allow_eviction: bool) -> Insert {
        each!(self, t => t.insert_with_eviction(i, fp, allow_eviction))
    }

    #[inline]
    pub fn contains(&self, i: usize, fp: u32) -> bool {
        each!(self, t => t.contains(i, fp))
    }

    #[inline]
    pub fn contains_either(&self, i1: usize, i2: usize, fp: u32) -> bool {
        each!(self, t => t.contains_either(i1, i2, fp))
    }

    #[inline]
    pub fn delete(&mut self, fp: u32, i: usize) -> bool {
        each!(self, t => t.delete(fp, i))
    }

    pub fn clear(&mut self) {
        each!(self, t => t.clear())
    }

    pub fn iter(&self) -> AnyIter<'_> {
        match self {
            AnyTable::Fp4x4(t) => AnyIter::Fp4x4(t.iter()),
            AnyTable::Fp8x4(t) => AnyIter::Fp8x4(t.iter()),
            AnyTable::Fp12x4(t) => AnyIter::Fp12x4(t.iter()),
            AnyTable::Fp16x4(t) => AnyIter::Fp16x4(t.iter()),
            AnyTable::Fp32x2(t) => AnyIter::Fp32x2(t.iter()),
        }
    }

    /// Print the hex dump to stdout.
    pub fn print_table(&self) {
        print!("{self}");
    }
}

impl fmt::Display for AnyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each!(self, t => fmt::Display::fmt(&t.dump(), f))
    }
}

/// Iterator over occupied slots of an [`AnyTable`].
#[derive(Debug)]
pub enum AnyIter<'a> {
    Fp4x4(Iter<'a, Fp4x4>),
    Fp8x4(Iter<'a, Fp8x4>),
    Fp12x4(Iter<'a, Fp12x4>),
    Fp16x4(Iter<'a, Fp16x4>),
    Fp32x2(Iter<'a, Fp32x2>),
}

impl Iterator for AnyIter<'_> {
    type Item = (usize, usize, u32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            AnyIter::Fp4x4(it) => it.next(),
            AnyIter::Fp8x4(it) => it.next(),
            AnyIter::Fp12x4(it) => it.next(),
            AnyIter::Fp16x4(it) => it.next(),
            AnyIter::Fp32x2(it) => it.next(),
        }
    }
}
