//! Lightweight statistics shared by [`crate::trie`] and
//! [`crate::bitmap`], grounded on `types/stats.rs`'s `StrideStats`: a
//! small struct of cheap O(1) counters plus a `Display` impl useful for
//! logging and debugging, not a full profiling subsystem.

use std::fmt;

/// Node-count and byte-size snapshot for a trie or bitmap.
///
/// All fields are read directly off the container's own counters
/// (`num_l1`, `num_l2`, ...); nothing here is recomputed by walking the
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub num_entries: u32,
    pub num_l1: u32,
    pub num_l2: u32,
    pub l0_node_size: usize,
    pub l1_node_size: usize,
    pub l2_node_size: usize,
}

impl LevelStats {
    /// Total bytes currently held by L0.
    pub fn n_bytes_l0(&self) -> usize {
        self.l0_node_size
    }

    /// Total bytes currently held by all L1 nodes.
    pub fn n_bytes_l1(&self) -> usize {
        self.num_l1 as usize * self.l1_node_size
    }

    /// Total bytes currently held by all L2 nodes.
    pub fn n_bytes_l2(&self) -> usize {
        self.num_l2 as usize * self.l2_node_size
    }

    /// Total bytes held across all three levels.
    pub fn mem_usage(&self) -> usize {
        self.n_bytes_l0() + self.n_bytes_l1() + self.n_bytes_l2()
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entries:{:>8} l1:{:>6} l2:{:>6} ({}k)",
            self.num_entries,
            self.num_l1,
            self.num_l2,
            self.mem_usage() / 1024
        )
    }
}
