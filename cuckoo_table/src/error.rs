//! Error types for cuckoo_table
//! cuckoo_table 错误类型

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(
        "unsupported shape ({slots}, {bits}, u{word_bits}), expect one of \
         (4, 4, u8) (4, 8, u8) (4, 12, u16) (4, 16, u16) (2, 32, u32)"
    )]
    UnsupportedShape {
        slots: usize,
        bits: usize,
        word_bits: usize,
    },

    #[error("table size must be > 0")]
    EmptyTable,

    #[error("fingerprint bits {fp_bits} out of 1..={bits_per_fp}")]
    FpBits { fp_bits: usize, bits_per_fp: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
