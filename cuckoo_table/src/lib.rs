//! Packed bucket table for [Cuckoo Filters][cuckoo filter].
//! 布谷鸟过滤器的紧凑桶表
//!
//! Fingerprints of 4, 8, 12, 16 or 32 bits live in fixed-size buckets with no
//! padding. The bucket layout is a type parameter ([`Codec`]), so the hot
//! read / write / lookup path is resolved at compile time. [`AnyTable`] picks
//! the layout from runtime parameters instead.
//!
//! The kick loop, resizing and (de)serialization belong to the filter built on
//! top; this crate gives it the primitives.
//!
//! # Examples
//!
//! ```
//! use cuckoo_table::{CuckooTable, Fp8x4, Insert, bucket_index, fingerprint_complement};
//!
//! let mut table = CuckooTable::<Fp8x4>::with_seed(8, 0xff, 1);
//! let i1 = bucket_index("foo", 8);
//! let fp = 0x2a;
//! let i2 = fingerprint_complement(i1, fp) & 7;
//! assert_eq!(fingerprint_complement(i2, fp) & 7, i1);
//!
//! assert_eq!(
//!     table.insert_with_eviction(i1, fp, false),
//!     Insert { inserted: true, evicted: None }
//! );
//! assert!(table.contains_either(i1, i2, fp));
//! assert!(table.delete(fp, i1));
//! assert!(!table.contains(i1, fp));
//! ```
//!
//! Runtime shape:
//!
//! ```
//! use cuckoo_table::{AnyTable, Shape};
//!
//! let table = AnyTable::new(Shape::new(4, 12, 16), 16, 0xfff).unwrap();
//! assert_eq!(table.max_elements(), 64);
//! assert!(AnyTable::new(Shape::new(3, 12, 16), 16, 0xfff).is_err());
//! ```
//!
//! [cuckoo filter]: https://www.cs.cmu.edu/~dga/papers/cuckoo-conext2014.pdf

#![cfg_attr(docsrs, feature(doc_cfg))]

mod any;
mod codec;
mod conf;
pub mod consts;
mod error;
mod hash;
mod table;

pub use any::{AnyIter, AnyTable};
pub use codec::{Codec, Fp4x4, Fp8x4, Fp12x4, Fp16x4, Fp32x2};
pub use conf::{Conf, Kind, Shape};
pub use error::{Error, Result};
pub use hash::{
    bucket_index, bucket_index_with, fingerprint, fingerprint_complement, fingerprint_nonzero,
    fp_mask, hash, jump,
};
pub use table::{CuckooTable, Dump, Insert, Iter};

/// Default hasher type.
/// 默认哈希器类型
pub type DefaultHasher = gxhash::GxHasher;
