//! Shared constants 共享常量

/// Odd multiplier scrambling a fingerprint before XOR with a bucket index (murmur2 `m`)
/// 与桶索引异或前打散指纹的奇数乘子（murmur2 的 `m`）
pub const SCRAMBLE: u32 = 0x5bd1_e995;

/// LCG multiplier for bucket index refinement
/// 桶索引迭代的线性同余乘子
pub const JUMP_MUL: u64 = 2_862_933_555_777_941_757;

/// Kick budget a caller should give its displacement loop
/// 调用方置换循环建议的最大踢出次数
pub const MAX_KICKS: usize = 500;
